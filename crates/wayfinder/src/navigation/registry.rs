//! TargetRegistry — каталог именованных точек навигации по категориям.
//!
//! Регистрация происходит на старте (read-mostly после этого). Видимость
//! категорий считается от `WorldContext` каждый раз заново.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use super::names;
use crate::error::RegistryError;
use crate::scene::{InstanceId, SceneObject, SceneQuery, WorldContext};

pub const COMPANY_BUILDING: &str = "Company Building";
pub const FACTORY: &str = "Factory";
pub const SHIP: &str = "Ship";
pub const SHIP_UTILITIES: &str = "Ship Utilities";
pub const OTHER_UTILITIES: &str = "Other Utilities";
pub const ITEMS: &str = "Items";
pub const UNLABELED: &str = "Unlabeled Nearby Objects";

/// Зона, где стоит Company Building
pub const COMPANY_ZONE: &str = "71 Gordion";

#[derive(Debug, Clone, PartialEq)]
pub enum TargetResolution {
    Fixed(Vec3),
    /// Живой объект, ищется через scene collaborator при каждом resolve
    ScenePath(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavTarget {
    pub key: String,
    pub display_name: String,
    pub category: String,
    pub resolution: TargetResolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryVisibility {
    Always,
    WhenLanded,
    WhenLandedAt(String),
    WhenLandedAwayFrom(String),
}

impl CategoryVisibility {
    pub fn is_visible(&self, context: &WorldContext) -> bool {
        match self {
            Self::Always => true,
            Self::WhenLanded => context.vessel_landed,
            Self::WhenLandedAt(zone) => context.vessel_landed && context.zone_name == *zone,
            Self::WhenLandedAwayFrom(zone) => context.vessel_landed && context.zone_name != *zone,
        }
    }
}

/// Живая привязка цели к точке пространства (не кэшируется дольше одного запроса).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    /// Registry key; None для объектов из nearby scan
    pub key: Option<String>,
    pub display_name: String,
    pub position: Vec3,
    pub object: Option<InstanceId>,
    pub resolved_at: f32,
    pub registered: bool,
}

impl ResolvedTarget {
    /// Цель может двигаться (живой объект) → Pathfinder делает re-plan.
    pub fn is_live(&self) -> bool {
        self.object.is_some()
    }

    /// Идентичность цели для toggle pause/resume.
    pub fn same_target(&self, other: &ResolvedTarget) -> bool {
        match (&self.key, &other.key, self.object, other.object) {
            (Some(a), Some(b), _, _) => a == b,
            (None, None, Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Цель из живого объекта сцены, не из каталога.
    pub fn from_object(object: &SceneObject, display_name: String, registered: bool, now: f32) -> Self {
        Self {
            key: registered.then(|| object.name.clone()),
            display_name,
            position: object.position,
            object: Some(object.instance),
            resolved_at: now,
            registered,
        }
    }
}

#[derive(Debug, Clone)]
struct Category {
    name: String,
    rule: CategoryVisibility,
    members: Vec<String>,
}

#[derive(Resource, Debug, Default, Clone)]
pub struct TargetRegistry {
    targets: HashMap<String, NavTarget>,
    categories: Vec<Category>,
    /// Последняя объявленная видимость категорий
    announced_visibility: Option<HashMap<String, bool>>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Задаёт правило видимости (создаёт категорию при необходимости).
    pub fn define_category(&mut self, name: &str, rule: CategoryVisibility) {
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(category) => category.rule = rule,
            None => self.insert_category(name, rule),
        }
    }

    /// Новые категории встают перед "Unlabeled Nearby Objects" (он всегда последний).
    fn insert_category(&mut self, name: &str, rule: CategoryVisibility) {
        let category = Category {
            name: name.to_string(),
            rule,
            members: Vec::new(),
        };
        match self.categories.iter().position(|c| c.name == UNLABELED) {
            Some(index) if name != UNLABELED => self.categories.insert(index, category),
            _ => self.categories.push(category),
        }
    }

    pub fn register(
        &mut self,
        key: &str,
        display_name: &str,
        category: &str,
        resolution: TargetResolution,
    ) -> Result<(), RegistryError> {
        let key = key.trim();
        let display_name = display_name.trim();
        let category = category.trim();
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if display_name.is_empty() {
            return Err(RegistryError::EmptyDisplayName(key.to_string()));
        }
        if category.is_empty() {
            return Err(RegistryError::EmptyCategory(key.to_string()));
        }

        if !self.categories.iter().any(|c| c.name == category) {
            self.insert_category(category, CategoryVisibility::Always);
        }
        if let Some(group) = self.categories.iter_mut().find(|c| c.name == category) {
            if !group.members.iter().any(|m| m == key) {
                group.members.push(key.to_string());
            }
        }

        self.targets.insert(
            key.to_string(),
            NavTarget {
                key: key.to_string(),
                display_name: display_name.to_string(),
                category: category.to_string(),
                resolution,
            },
        );
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&NavTarget> {
        self.targets.get(key)
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.targets.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn resolve(&self, key: &str, scene: &dyn SceneQuery, now: f32) -> Option<ResolvedTarget> {
        let target = self.targets.get(key)?;
        let (position, object) = match &target.resolution {
            TargetResolution::Fixed(position) => (*position, None),
            TargetResolution::ScenePath(path) => {
                let found = scene.find_by_path(path)?;
                (found.position, Some(found.instance))
            }
        };
        Some(ResolvedTarget {
            key: Some(target.key.clone()),
            display_name: target.display_name.clone(),
            position,
            object,
            resolved_at: now,
            registered: true,
        })
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn is_category_visible(&self, name: &str, context: &WorldContext) -> bool {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .is_some_and(|c| c.rule.is_visible(context))
    }

    pub fn visible_categories(&self, context: &WorldContext) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|c| c.rule.is_visible(context))
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn members(&self, category: &str) -> Vec<&NavTarget> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.members.iter().filter_map(|k| self.targets.get(k)).collect())
            .unwrap_or_default()
    }

    /// Все видимые цели: порядок категорий, затем порядок регистрации.
    pub fn list_visible(&self, context: &WorldContext) -> Vec<&NavTarget> {
        let mut seen = HashSet::new();
        self.categories
            .iter()
            .filter(|c| c.rule.is_visible(context))
            .flat_map(|c| c.members.iter())
            .filter(|key| seen.insert(key.as_str()))
            .filter_map(|key| self.targets.get(key))
            .collect()
    }

    /// registry display name → friendly table → нормализованный identifier.
    pub fn display_name_for(&self, object: &SceneObject) -> String {
        match self.targets.get(&object.name) {
            Some(target) => target.display_name.clone(),
            None => names::spoken_name(&object.name),
        }
    }

    /// Цепочка для озвучки прибытия: registry → item label → friendly fallback.
    pub fn arrival_name_for(&self, object: &SceneObject) -> String {
        if let Some(target) = self.targets.get(&object.name) {
            return target.display_name.clone();
        }
        match object.item_label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => names::spoken_name(&object.name),
        }
    }

    /// Изменения видимости с прошлого вызова. Первый вызов только запоминает baseline.
    pub fn visibility_changes(&mut self, context: &WorldContext) -> Vec<(String, bool)> {
        let current: HashMap<String, bool> = self
            .categories
            .iter()
            .map(|c| (c.name.clone(), c.rule.is_visible(context)))
            .collect();

        let changes = match &self.announced_visibility {
            None => Vec::new(),
            Some(previous) => self
                .categories
                .iter()
                .filter_map(|c| {
                    let now_visible = current.get(&c.name).copied().unwrap_or(false);
                    let was_visible = previous.get(&c.name).copied().unwrap_or(now_visible);
                    (now_visible != was_visible).then(|| (c.name.clone(), now_visible))
                })
                .collect(),
        };
        self.announced_visibility = Some(current);
        changes
    }

    /// Каталог по умолчанию (ship, factory, company building + динамические категории).
    pub fn with_default_catalog() -> Self {
        let mut registry = Self::new();
        registry.define_category(ITEMS, CategoryVisibility::Always);
        registry.define_category(UNLABELED, CategoryVisibility::Always);
        registry.define_category(
            COMPANY_BUILDING,
            CategoryVisibility::WhenLandedAt(COMPANY_ZONE.to_string()),
        );
        registry.define_category(
            FACTORY,
            CategoryVisibility::WhenLandedAwayFrom(COMPANY_ZONE.to_string()),
        );

        let by_name = |name: &str| TargetResolution::ScenePath(name.to_string());
        let entries = [
            ("ItemCounter", "Item Counter", COMPANY_BUILDING, TargetResolution::Fixed(Vec3::new(-29.141, -1.154, -31.461))),
            ("BellDinger", "Sell Bell", COMPANY_BUILDING, by_name("CompanyBuilding/BellDinger")),
            ("EntranceTeleportA", "Enter Factory", FACTORY, by_name("EntranceTeleportA")),
            ("EntranceTeleportA(Clone)", "Exit Factory", FACTORY, by_name("EntranceTeleportA(Clone)")),
            ("EntranceTeleportB", "Enter Fire Escape", FACTORY, by_name("EntranceTeleportB")),
            ("EntranceTeleportB(Clone)", "Exit Fire Escape", FACTORY, by_name("EntranceTeleportB(Clone)")),
            ("TerminalScript", "Terminal", SHIP, by_name("TerminalScript")),
            ("StartGameLever", "Start Ship Lever", SHIP, by_name("StartGameLever")),
            ("ShipInside", "Inside of Ship", SHIP, by_name("ShipInside")),
            ("StorageCloset", "Storage Closet", SHIP_UTILITIES, by_name("StorageCloset")),
            (names::CHARGING_STATION, "Charging Station", SHIP_UTILITIES, by_name(names::CHARGING_STATION)),
            ("Bunkbeds", "Bunk Beds", SHIP_UTILITIES, by_name("Bunkbeds")),
            ("LightSwitch", "Light Switch", SHIP_UTILITIES, by_name("LightSwitch")),
            ("ItemShip", "Item Ship", OTHER_UTILITIES, by_name("ItemShip")),
            ("RedButton", "Activate Teleporter", OTHER_UTILITIES, by_name("RedButton")),
        ];
        for (key, display_name, category, resolution) in entries {
            // Статичная таблица выше заведомо валидна
            if let Err(err) = registry.register(key, display_name, category, resolution) {
                crate::logger::log_error(&format!("default catalog: {}", err));
            }
        }
        registry
    }
}
