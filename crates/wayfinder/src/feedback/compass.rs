//! Компас: горизонтальный угол, 8 направлений, snap turn, текст направления/дистанции.
//!
//! Соглашение: North = +Z, East = +X, угол = atan2(x, z) в градусах по часовой.

use bevy::prelude::*;

pub const COMPASS_LABELS: [&str; 8] = [
    "North",
    "Northeast",
    "East",
    "Southeast",
    "South",
    "Southwest",
    "West",
    "Northwest",
];

/// Подставляется вместо вырожденного forward
pub const DEFAULT_FORWARD: Vec3 = Vec3::Z;

/// Порог "выше/ниже" для нормализованного направления
const VERTICAL_THRESHOLD: f32 = 0.3;

const DEGENERATE_EPSILON: f32 = 1e-3;

pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid(-1e-7) может дать ровно 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn compass_direction(angle_degrees: f32) -> &'static str {
    let angle = if angle_degrees.is_finite() {
        normalize_degrees(angle_degrees)
    } else {
        crate::logger::log_warning("compass_direction: non-finite angle, using North");
        0.0
    };
    let index = ((angle / 45.0).round_ties_even() as usize) % COMPASS_LABELS.len();
    COMPASS_LABELS[index]
}

/// Горизонтальная проекция; None если она вырождена.
pub fn horizontal(direction: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    (flat.is_finite() && flat.length() >= DEGENERATE_EPSILON).then(|| flat.normalize())
}

/// Угол направления в [0, 360).
pub fn heading_degrees(direction: Vec3) -> f32 {
    let flat = horizontal(direction).unwrap_or(DEFAULT_FORWARD);
    normalize_degrees(flat.x.atan2(flat.z).to_degrees())
}

pub fn forward_from_heading(angle_degrees: f32) -> Vec3 {
    let radians = angle_degrees.to_radians();
    Vec3::new(radians.sin(), 0.0, radians.cos())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTurn {
    pub forward: Vec3,
    pub heading: f32,
    pub label: &'static str,
}

/// Поворот с квантованием в сетку 8 направлений (не накопление).
pub fn snap_turn(current_forward: Vec3, increment_degrees: f32) -> SnapTurn {
    let source = match horizontal(current_forward) {
        Some(flat) => flat,
        None => {
            crate::logger::log_warning("snap_turn: degenerate forward, using default");
            DEFAULT_FORWARD
        }
    };
    let raw = heading_degrees(source) + increment_degrees;
    let heading = normalize_degrees((raw / 45.0).round_ties_even() * 45.0);
    SnapTurn {
        forward: forward_from_heading(heading),
        heading,
        label: compass_direction(heading),
    }
}

/// "North", "Northeast and above" и т.п. для вектора до цели.
pub fn direction_text(direction: Vec3, include_vertical: bool) -> String {
    let label = compass_direction(heading_degrees(direction));
    if !include_vertical {
        return label.to_string();
    }
    let normalized = direction.normalize_or_zero();
    if normalized.y > VERTICAL_THRESHOLD {
        format!("{} and above", label)
    } else if normalized.y < -VERTICAL_THRESHOLD {
        format!("{} and below", label)
    } else {
        label.to_string()
    }
}

pub fn distance_text(distance: f32) -> String {
    if distance < 1.0 {
        "very close".to_string()
    } else if distance < 2.0 {
        "close".to_string()
    } else if distance < 5.0 {
        format!("{:.1} meters away", distance)
    } else if distance < 20.0 {
        format!("{} meters away", distance.round() as i32)
    } else {
        "far away".to_string()
    }
}
