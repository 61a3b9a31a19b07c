//! Avatar компоненты: состояние игрока, facing, locomotion intent, route task.

use bevy::prelude::*;
use bevy::tasks::Task;

use crate::feedback::compass::DEFAULT_FORWARD;
use crate::feedback::orientation::AimTracker;
use crate::navigation::pathfinder::Pathfinder;
use crate::navigation::proximity::ProximityMonitor;
use crate::navigation::registry::ResolvedTarget;
use crate::navigation::validator::PathQuery;

/// Аватар игрока (единственный в headless runner'е, но системы итерируют по всем).
///
/// Автоматически добавляет Pathfinder, ProximityMonitor и остальное через Required Components.
#[derive(Component, Debug, Clone)]
#[require(Transform, Facing, LocomotionIntent, ObservedTarget, Pathfinder, ProximityMonitor, AimTracker)]
pub struct Avatar {
    /// Host уже привязал аватар к сцене (до этого навигация запрещена)
    pub initialized: bool,
    pub dead: bool,
    /// Суммарный вес в руках (замедляет ходьбу)
    pub carry_weight: f32,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            initialized: true,
            dead: false,
            carry_weight: 0.0,
        }
    }
}

impl Avatar {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_available(&self) -> bool {
        self.initialized && !self.dead
    }
}

/// Горизонтальное направление взгляда (North = +Z).
///
/// Отдельно от Transform.rotation: forward в Bevy это -Z, а compass считается от +Z.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Facing(pub Vec3);

impl Default for Facing {
    fn default() -> Self {
        Self(DEFAULT_FORWARD)
    }
}

/// Куда и с какой скоростью аватар хочет идти в этом кадре.
///
/// Пишет locomotion система Pathfinder'а, читает host (или headless integrator).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionIntent {
    /// Нормализованное горизонтальное направление; ZERO = стоять
    pub direction: Vec3,
    /// Метры/сек
    pub speed: f32,
}

impl LocomotionIntent {
    pub fn halt(&mut self) {
        self.direction = Vec3::ZERO;
        self.speed = 0.0;
    }

    pub fn is_moving(&self) -> bool {
        self.speed > 0.0 && self.direction != Vec3::ZERO
    }
}

/// Цель, за которой следит ProximityMonitor (выбор из меню или навигация).
#[derive(Component, Debug, Clone, Default)]
pub struct ObservedTarget(pub Option<ResolvedTarget>);

/// Route query в AsyncComputeTaskPool. Не больше одного на аватара.
#[derive(Component)]
pub struct RouteQueryTask {
    pub epoch: u64,
    pub task: Task<PathQuery>,
}

/// Headless integrator двигает Transform по LocomotionIntent (без физики).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SimulatedLocomotion {
    /// Амплитуда шума позиции (метры за кадр), для проверок hysteresis
    pub jitter: f32,
}
