//! Navigation events: входящие действия пользователя и исходящие уведомления.

use bevy::prelude::*;

use crate::scene::InstanceId;

/// Event: дискретное действие пользователя (hotkey / menu).
///
/// Генерируется host'ом (input mapping), применяется ко всем аватарам.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum NavAction {
    /// Точка каталога по registry key
    Navigate { key: String },
    /// Живой объект из nearby scan
    NavigateToObject { instance: InstanceId },
    /// Shortcut slot (0-based)
    Shortcut(usize),
    NearestItem,
    /// Навигация к текущей наблюдаемой цели
    NavigateToObserved,
    Stop,
    AnnounceRoom,
    AnnounceFacing,
    SnapTurnLeft,
    SnapTurnRight,
    NextItem,
    PrevItem,
    NextCategory,
    PrevCategory,
    /// Сделать выбор курсора наблюдаемой целью
    SelectCurrent,
    ToggleNorthBeacon,
}

/// Event: исходящее уведомление навигации (для host'а и тестов).
#[derive(Event, Debug, Clone, PartialEq)]
pub enum NavEvent {
    Started { entity: Entity, display_name: String },
    RouteReady { entity: Entity, degraded: bool },
    Paused { entity: Entity },
    Resumed { entity: Entity },
    Stopped { entity: Entity },
    /// Pathfinder дошёл до конца маршрута
    Arrived { entity: Entity, display_name: String },
    NotReachable { entity: Entity, display_name: String },
    LostPath { entity: Entity, display_name: String },
    TimedOut { entity: Entity, display_name: String },
    /// ProximityMonitor: дошли до наблюдаемой цели пешком
    Reached { entity: Entity, display_name: String },
}

/// Event: объект сцены уничтожен (освобождает identity номер).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneObjectDestroyed {
    pub instance: InstanceId,
}

/// Event: смена сцены/уровня. Сбрасывает ledger, сессии и наблюдаемые цели.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneReset;
