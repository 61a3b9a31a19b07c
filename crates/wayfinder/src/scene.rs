//! Scene resolution collaborator + world context (read-only signals от host).

use bevy::prelude::*;
use std::sync::Arc;

/// Tag, которым host помечает подбираемые предметы.
pub const ITEM_TAG: &str = "PhysicsProp";

/// Стабильная identity живого объекта сцены (engine instance id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// Snapshot живого объекта сцены на момент запроса.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub instance: InstanceId,
    /// Сырое имя объекта в сцене, например "EntranceTeleportA(Clone)"
    pub name: String,
    pub position: Vec3,
    pub tags: Vec<String>,
    /// Имя предмета из его свойств (только grabbable)
    pub item_label: Option<String>,
    pub two_handed: bool,
    /// Предмет в руках / в инвентаре
    pub held: bool,
}

impl SceneObject {
    pub fn new(instance: u64, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            instance: InstanceId(instance),
            name: name.into(),
            position,
            tags: Vec::new(),
            item_label: None,
            two_handed: false,
            held: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Grabbable предмет с собственным именем.
    pub fn as_item(mut self, label: impl Into<String>) -> Self {
        self.tags.push(ITEM_TAG.to_string());
        self.item_label = Some(label.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_item(&self) -> bool {
        self.has_tag(ITEM_TAG)
    }
}

/// Scene-graph discovery (engine side). "Не найдено" — обычный результат.
pub trait SceneQuery: Send + Sync {
    /// Путь вида "Environment/HangarShip/Terminal" или просто имя объекта.
    fn find_by_path(&self, path: &str) -> Option<SceneObject>;

    fn find_all_with_tag(&self, tag: &str) -> Vec<SceneObject>;

    fn live_objects(&self) -> Vec<SceneObject>;
}

#[derive(Resource, Clone)]
pub struct SceneGraph(pub Arc<dyn SceneQuery>);

impl SceneGraph {
    pub fn new(scene: impl SceneQuery + 'static) -> Self {
        Self(Arc::new(scene))
    }
}

/// In-memory сцена: headless runner и тесты.
///
/// `find_by_path` матчит полный путь или последний сегмент пути с именем объекта.
#[derive(Default, Clone)]
pub struct StaticScene {
    objects: Arc<std::sync::RwLock<Vec<SceneObject>>>,
}

impl StaticScene {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self {
            objects: Arc::new(std::sync::RwLock::new(objects)),
        }
    }

    pub fn insert(&self, object: SceneObject) {
        if let Ok(mut objects) = self.objects.write() {
            objects.retain(|o| o.instance != object.instance);
            objects.push(object);
        }
    }

    pub fn remove(&self, instance: InstanceId) -> Option<SceneObject> {
        let mut objects = self.objects.write().ok()?;
        let index = objects.iter().position(|o| o.instance == instance)?;
        Some(objects.remove(index))
    }

    pub fn move_object(&self, instance: InstanceId, position: Vec3) {
        if let Ok(mut objects) = self.objects.write() {
            if let Some(object) = objects.iter_mut().find(|o| o.instance == instance) {
                object.position = position;
            }
        }
    }

    fn snapshot(&self) -> Vec<SceneObject> {
        self.objects.read().map(|o| o.clone()).unwrap_or_default()
    }
}

impl SceneQuery for StaticScene {
    fn find_by_path(&self, path: &str) -> Option<SceneObject> {
        let leaf = path.rsplit('/').next().unwrap_or(path);
        self.snapshot()
            .into_iter()
            .find(|o| o.name == path || o.name == leaf)
    }

    fn find_all_with_tag(&self, tag: &str) -> Vec<SceneObject> {
        self.snapshot().into_iter().filter(|o| o.has_tag(tag)).collect()
    }

    fn live_objects(&self) -> Vec<SceneObject> {
        self.snapshot()
    }
}

/// Context state provider: сигналы видимости категорий, обновляются host'ом.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct WorldContext {
    pub vessel_landed: bool,
    pub zone_name: String,
}

impl WorldContext {
    pub fn landed_at(zone: impl Into<String>) -> Self {
        Self {
            vessel_landed: true,
            zone_name: zone.into(),
        }
    }
}

/// Room/tile bookkeeping (engine side) — только query surface.
pub trait RoomQuery: Send + Sync {
    fn room_at(&self, position: Vec3) -> Option<RoomInfo>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfo {
    pub name: String,
    pub on_main_path: bool,
}

#[derive(Resource, Clone)]
pub struct RoomIndex(pub Arc<dyn RoomQuery>);

impl RoomIndex {
    pub fn new(rooms: impl RoomQuery + 'static) -> Self {
        Self(Arc::new(rooms))
    }
}

/// Axis-aligned комнаты для headless runner'а.
#[derive(Debug, Clone, Default)]
pub struct BoxRooms {
    pub rooms: Vec<(Vec3, Vec3, RoomInfo)>,
}

impl RoomQuery for BoxRooms {
    fn room_at(&self, position: Vec3) -> Option<RoomInfo> {
        self.rooms
            .iter()
            .find(|(min, max, _)| position.cmpge(*min).all() && position.cmple(*max).all())
            .map(|(_, _, info)| info.clone())
    }
}
