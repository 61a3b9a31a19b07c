//! Пользовательские настройки навигации (`wayfinder.toml`).
//!
//! Все поля опциональны в файле: отсутствующее значение берётся из Default.
//! Ядро читает NavConfig только на чтение.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Специальное значение shortcut слота: ближайший предмет на земле.
pub const NEAREST_ITEM_SHORTCUT: &str = "NearestItem";

pub const SHORTCUT_SLOTS: usize = 6;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub master_volume: f32,
    pub navigation_sound_volume: f32,
    /// Период north beacon (секунды)
    pub north_sound_interval: f32,
    /// Градусы/сек для плавного поворота (host side)
    pub turn_speed: f32,
    pub snap_turn_angle: f32,
    pub pathfinding_stopping_radius: f32,
    /// Минимальный радиус для registered точек (настенные объекты)
    pub registered_min_radius: f32,
    pub proximity_hysteresis: f32,
    pub enable_speech: bool,
    pub enable_audio_cues: bool,
    pub scan_radius: f32,
    pub max_objects_to_scan: u32,
    pub object_scan_interval: f32,
    pub replan_interval: f32,
    pub path_query_timeout: f32,
    /// false → route queries считаются inline (детерминизм в тестах)
    pub route_queries_in_background: bool,
    pub shortcuts: Vec<String>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            navigation_sound_volume: 0.8,
            north_sound_interval: 1.5,
            turn_speed: 90.0,
            snap_turn_angle: 45.0,
            pathfinding_stopping_radius: 2.2,
            registered_min_radius: 3.0,
            proximity_hysteresis: 1.0,
            enable_speech: true,
            enable_audio_cues: true,
            scan_radius: 80.0,
            max_objects_to_scan: 100,
            object_scan_interval: 0.1,
            replan_interval: 1.0,
            path_query_timeout: 5.0,
            route_queries_in_background: true,
            shortcuts: default_shortcuts(),
        }
    }
}

fn default_shortcuts() -> Vec<String> {
    [
        "EntranceTeleportA",
        "EntranceTeleportA(Clone)",
        "ShipInside",
        NEAREST_ITEM_SHORTCUT,
        "",
        "",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl NavConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: NavConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn ranged_fields(&self) -> [(&'static str, f32, f32, f32); 12] {
        [
            ("master_volume", self.master_volume, 0.0, 1.0),
            ("navigation_sound_volume", self.navigation_sound_volume, 0.0, 1.0),
            ("north_sound_interval", self.north_sound_interval, 0.5, 5.0),
            ("turn_speed", self.turn_speed, 30.0, 360.0),
            ("snap_turn_angle", self.snap_turn_angle, 15.0, 90.0),
            ("pathfinding_stopping_radius", self.pathfinding_stopping_radius, 0.5, 10.0),
            ("registered_min_radius", self.registered_min_radius, 0.5, 10.0),
            ("proximity_hysteresis", self.proximity_hysteresis, 0.1, 5.0),
            ("scan_radius", self.scan_radius, 20.0, 200.0),
            ("max_objects_to_scan", self.max_objects_to_scan as f32, 50.0, 500.0),
            ("object_scan_interval", self.object_scan_interval, 0.05, 1.0),
            ("replan_interval", self.replan_interval, 0.1, 10.0),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value, min, max) in self.ranged_fields() {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value, min, max });
            }
        }
        if !(0.5..=30.0).contains(&self.path_query_timeout) {
            return Err(ConfigError::OutOfRange {
                field: "path_query_timeout",
                value: self.path_query_timeout,
                min: 0.5,
                max: 30.0,
            });
        }
        Ok(())
    }

    /// Копия со всеми значениями, прижатыми к допустимым диапазонам.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        out.master_volume = out.master_volume.clamp(0.0, 1.0);
        out.navigation_sound_volume = out.navigation_sound_volume.clamp(0.0, 1.0);
        out.north_sound_interval = out.north_sound_interval.clamp(0.5, 5.0);
        out.turn_speed = out.turn_speed.clamp(30.0, 360.0);
        out.snap_turn_angle = out.snap_turn_angle.clamp(15.0, 90.0);
        out.pathfinding_stopping_radius = out.pathfinding_stopping_radius.clamp(0.5, 10.0);
        out.registered_min_radius = out.registered_min_radius.clamp(0.5, 10.0);
        out.proximity_hysteresis = out.proximity_hysteresis.clamp(0.1, 5.0);
        out.scan_radius = out.scan_radius.clamp(20.0, 200.0);
        out.max_objects_to_scan = out.max_objects_to_scan.clamp(50, 500);
        out.object_scan_interval = out.object_scan_interval.clamp(0.05, 1.0);
        out.replan_interval = out.replan_interval.clamp(0.1, 10.0);
        out.path_query_timeout = out.path_query_timeout.clamp(0.5, 30.0);
        out.shortcuts.resize(SHORTCUT_SLOTS, String::new());
        out
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Итоговая громкость навигационных cue.
    pub fn cue_volume(&self) -> f32 {
        self.master_volume * self.navigation_sound_volume
    }

    pub fn shortcut(&self, slot: usize) -> Option<&str> {
        self.shortcuts
            .get(slot)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}
