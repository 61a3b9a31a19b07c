//! Avatar domain — компоненты игрока и navigation events
//!
//! Содержит:
//! - Avatar (required components: Pathfinder, ProximityMonitor, AimTracker, ...)
//! - Facing, LocomotionIntent, ObservedTarget
//! - RouteQueryTask (background route query)
//! - NavAction / NavEvent / SceneObjectDestroyed / SceneReset

pub mod components;
pub mod events;

pub use components::*;
pub use events::*;
