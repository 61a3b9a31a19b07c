//! ProximityMonitor — "дошли ли мы до цели, на которую смотрим".
//!
//! Edge-trigger с latch: событие ровно один раз за подход.
//! Latch сбрасывается только когда дистанция > radius + hysteresis, чтобы
//! шум позиции на границе радиуса не давал повторных срабатываний.

use bevy::prelude::*;

/// Радиус по умолчанию (если у Pathfinder нет своего)
pub const DEFAULT_STOPPING_RADIUS: f32 = 2.2;
/// Минимальный радиус для registered точек
pub const REGISTERED_MIN_RADIUS: f32 = 3.0;
pub const DEFAULT_HYSTERESIS: f32 = 1.0;

/// Итоговый stopping radius для цели.
pub fn stopping_radius_for(configured: Option<f32>, registered: bool, registered_min: f32) -> f32 {
    let radius = configured.unwrap_or(DEFAULT_STOPPING_RADIUS);
    if registered {
        radius.max(registered_min)
    } else {
        radius
    }
}

#[derive(Component, Debug, Clone)]
pub struct ProximityMonitor {
    pub hysteresis: f32,
    has_played_arrival: bool,
}

impl Default for ProximityMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_HYSTERESIS)
    }
}

impl ProximityMonitor {
    pub fn new(hysteresis: f32) -> Self {
        Self {
            hysteresis: hysteresis.max(0.0),
            has_played_arrival: false,
        }
    }

    /// Один sample за tick. true → "reached" (ровно один раз за подход).
    pub fn sample(&mut self, distance: f32, stopping_radius: f32) -> bool {
        if !distance.is_finite() {
            return false;
        }
        if distance <= stopping_radius {
            if !self.has_played_arrival {
                self.has_played_arrival = true;
                return true;
            }
        } else if distance > stopping_radius + self.hysteresis {
            self.has_played_arrival = false;
        }
        false
    }

    /// Прибытие уже объявлено кем-то другим (Pathfinder) — не повторяем.
    pub fn latch(&mut self) {
        self.has_played_arrival = true;
    }

    /// Новая наблюдаемая цель.
    pub fn reset(&mut self) {
        self.has_played_arrival = false;
    }

    pub fn has_played_arrival(&self) -> bool {
        self.has_played_arrival
    }
}
