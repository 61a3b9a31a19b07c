//! Orientation cues: aim alignment к цели и north beacon.

use bevy::prelude::*;

use super::audio::CueKind;
use super::compass::horizontal;

/// Угол "точно на цели"
pub const ON_TARGET_ANGLE: f32 = 10.0;
/// Угол "почти на цели"
pub const ALMOST_ON_TARGET_ANGLE: f32 = 25.0;
/// Дальше этой дистанции aim cue не играем
pub const AIM_MAX_DISTANCE: f32 = 8.0;

/// Beacon ставится на этом расстоянии к северу от аватара
pub const BEACON_DISTANCE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AimClass {
    OnTarget,
    AlmostOnTarget,
    OffTarget,
}

impl AimClass {
    pub fn cue(&self) -> CueKind {
        match self {
            AimClass::OnTarget => CueKind::OnTarget,
            AimClass::AlmostOnTarget => CueKind::AlmostOnTarget,
            AimClass::OffTarget => CueKind::OffTarget,
        }
    }
}

/// Горизонтальный угол между facing и направлением на цель (градусы).
pub fn aim_angle(facing: Vec3, avatar: Vec3, target: Vec3) -> Option<f32> {
    let facing = horizontal(facing)?;
    let to_target = horizontal(target - avatar)?;
    Some(facing.dot(to_target).clamp(-1.0, 1.0).acos().to_degrees())
}

pub fn classify_aim(angle_degrees: f32) -> AimClass {
    if angle_degrees <= ON_TARGET_ANGLE {
        AimClass::OnTarget
    } else if angle_degrees <= ALMOST_ON_TARGET_ANGLE {
        AimClass::AlmostOnTarget
    } else {
        AimClass::OffTarget
    }
}

/// Aim cue tracker: cue только при смене класса и только вблизи цели.
#[derive(Component, Debug, Default, Clone)]
pub struct AimTracker {
    last: Option<AimClass>,
}

impl AimTracker {
    pub fn update(&mut self, facing: Vec3, avatar: Vec3, target: Vec3) -> Option<CueKind> {
        if avatar.distance(target) > AIM_MAX_DISTANCE {
            self.last = None;
            return None;
        }
        let class = classify_aim(aim_angle(facing, avatar, target)?);
        if self.last == Some(class) {
            return None;
        }
        self.last = Some(class);
        Some(class.cue())
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Периодический тон с севера.
#[derive(Resource, Debug, Clone)]
pub struct NorthBeacon {
    pub enabled: bool,
    pub interval: f32,
    next_at: Option<f32>,
}

impl Default for NorthBeacon {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: 1.5,
            next_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeaconPulse {
    pub kind: CueKind,
    pub position: Vec3,
}

impl NorthBeacon {
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.next_at = None;
        self.enabled
    }

    pub fn tick(&mut self, now: f32, avatar: Vec3, facing: Vec3) -> Option<BeaconPulse> {
        if !self.enabled {
            return None;
        }
        let due = self.next_at.is_none_or(|at| now >= at);
        if !due {
            return None;
        }
        self.next_at = Some(now + self.interval);

        let behind = horizontal(facing).is_some_and(|f| f.dot(Vec3::Z) < 0.0);
        Some(BeaconPulse {
            kind: if behind { CueKind::NorthBehind } else { CueKind::NorthAhead },
            position: avatar + Vec3::Z * BEACON_DISTANCE,
        })
    }
}
