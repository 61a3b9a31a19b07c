//! Типизированные ошибки навигационного слоя.
//!
//! Ни одна из них не должна ронять tick loop: системы логируют и деградируют
//! в no-op (+ опциональная озвучка на уровне Pathfinder/ProximityMonitor).

use thiserror::Error;

/// Ошибка примитива mesh query (snap / calculate path).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshQueryError {
    #[error("position {0:?} is not finite")]
    NonFinitePosition([f32; 3]),

    #[error("walkable surface is not loaded")]
    NotLoaded,

    #[error("mesh query failed: {0}")]
    Backend(String),
}

/// Итог навигационной операции, который видит Pathfinder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    #[error("target '{target}' is not reachable")]
    NotReachable { target: String },

    #[error("target '{key}' could not be resolved")]
    ResolutionFailure { key: String },

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    #[error("route result for epoch {result_epoch} discarded (session epoch {session_epoch})")]
    StaleResult { result_epoch: u64, session_epoch: u64 },

    #[error("transient mesh query failure: {0}")]
    TransientQuery(#[from] MeshQueryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("navigation target key is empty")]
    EmptyKey,

    #[error("display name for '{0}' is empty")]
    EmptyDisplayName(String),

    #[error("category for '{0}' is empty")]
    EmptyCategory(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config value '{field}' = {value} outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}
