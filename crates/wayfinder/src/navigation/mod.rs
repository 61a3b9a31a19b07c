//! Navigation core: каталог целей, проверка маршрутов, identity, pathfinder.
//!
//! Всё здесь — обычные структуры без ECS-зависимостей (кроме derive Resource/Component),
//! ECS-обвязка живёт в `crate::systems`.

pub mod identity;
pub mod menu;
pub mod names;
pub mod nearby;
pub mod pathfinder;
pub mod proximity;
pub mod registry;
pub mod validator;

#[cfg(test)]
mod identity_tests;
#[cfg(test)]
mod menu_tests;
#[cfg(test)]
mod pathfinder_tests;
#[cfg(test)]
mod proximity_tests;

// Re-export основных типов
pub use identity::IdentityLedger;
pub use menu::{resolve_shortcut, MenuCursor, MenuEntry, MenuSelection, MenuView};
pub use nearby::{nearest_item, NearbyCatalog, NearbyEntry, NearbyScan, ScanSettings};
pub use pathfinder::{
    locomotion_speed, NavigateOutcome, Pathfinder, PathfinderSettings, PathfinderState, RouteOutcome,
    RouteRequest, TickOutcome,
};
pub use proximity::{stopping_radius_for, ProximityMonitor};
pub use registry::{CategoryVisibility, NavTarget, ResolvedTarget, TargetRegistry, TargetResolution};
pub use validator::{PathQuery, PathValidator, Rejection, ValidationPolicy};
