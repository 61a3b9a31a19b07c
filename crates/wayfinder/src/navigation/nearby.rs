//! Nearby scan: динамические категории "Items" и "Unlabeled Nearby Objects".
//!
//! Скан throttled (`object_scan_interval`), кандидаты ближе `scan_radius`,
//! сначала ближайшие, не больше `max_objects_to_scan`.

use bevy::prelude::*;

use super::identity::IdentityLedger;
use super::names;
use super::registry::{ResolvedTarget, TargetRegistry, ITEMS, UNLABELED};
use super::validator::PathValidator;
use crate::scene::{InstanceId, SceneObject, SceneQuery, ITEM_TAG};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSettings {
    pub radius: f32,
    pub max_objects: usize,
    pub interval: f32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            radius: 80.0,
            max_objects: 100,
            interval: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyEntry {
    pub instance: InstanceId,
    /// Озвучиваемое имя с номером ("Flashlight 2")
    pub label: String,
    pub position: Vec3,
    pub distance: f32,
    pub registered: bool,
}

impl NearbyEntry {
    pub fn to_target(&self, now: f32) -> ResolvedTarget {
        ResolvedTarget {
            key: None,
            display_name: self.label.clone(),
            position: self.position,
            object: Some(self.instance),
            resolved_at: now,
            registered: self.registered,
        }
    }
}

#[derive(Resource, Debug, Default, Clone)]
pub struct NearbyCatalog {
    items: Vec<NearbyEntry>,
    unlabeled: Vec<NearbyEntry>,
    last_scan_at: Option<f32>,
}

impl NearbyCatalog {
    pub fn scan_due(&self, now: f32, interval: f32) -> bool {
        self.last_scan_at.is_none_or(|at| now - at >= interval)
    }

    pub fn entries(&self, category: &str) -> &[NearbyEntry] {
        match category {
            ITEMS => &self.items,
            UNLABELED => &self.unlabeled,
            _ => &[],
        }
    }

    pub fn find(&self, instance: InstanceId) -> Option<&NearbyEntry> {
        self.items
            .iter()
            .chain(self.unlabeled.iter())
            .find(|e| e.instance == instance)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.unlabeled.clear();
        self.last_scan_at = None;
    }

    pub fn rescan(&mut self, scan: NearbyScan<'_>, avatar: Vec3, now: f32) {
        let objects = scan.scene.live_objects();
        let mut candidates: Vec<(f32, &SceneObject)> = objects
            .iter()
            .map(|object| (avatar.distance(object.position), object))
            .filter(|(distance, _)| distance.is_finite() && *distance <= scan.settings.radius)
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        self.items.clear();
        self.unlabeled.clear();
        let cap = scan.settings.max_objects;

        for (distance, object) in candidates {
            if self.items.len() >= cap && self.unlabeled.len() >= cap {
                break;
            }
            if object.is_item() {
                if object.held || self.items.len() >= cap {
                    continue;
                }
                let label = item_label(object, scan.ledger, scan.scene);
                self.items.push(NearbyEntry {
                    instance: object.instance,
                    label,
                    position: object.position,
                    distance,
                    registered: false,
                });
                continue;
            }

            // Catalog точки уже есть в своих категориях
            if scan.registry.is_registered(&object.name) || self.unlabeled.len() >= cap {
                continue;
            }
            let landmark = names::is_landmark(&object.name);
            if !scan
                .validator
                .should_include_in_candidate_set(landmark, object.position, avatar)
            {
                continue;
            }
            let label = if landmark {
                names::spoken_name(&object.name)
            } else {
                scan.ledger.display_label(&object.name, object.instance, scan.scene)
            };
            self.unlabeled.push(NearbyEntry {
                instance: object.instance,
                label,
                position: object.position,
                distance,
                registered: landmark,
            });
        }
        self.last_scan_at = Some(now);
    }
}

/// Зависимости одного прохода скана.
pub struct NearbyScan<'a> {
    pub scene: &'a dyn SceneQuery,
    pub registry: &'a TargetRegistry,
    pub ledger: &'a mut IdentityLedger,
    pub validator: &'a PathValidator,
    pub settings: ScanSettings,
}

/// Label предмета из его свойств + номер из ledger'а ("Shovel 2").
fn item_label(object: &SceneObject, ledger: &mut IdentityLedger, scene: &dyn SceneQuery) -> String {
    let id = ledger.assign_or_get_id(&object.name, object.instance, scene);
    let label = match object.item_label.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => names::base_name(&object.name),
    };
    if id > 0 {
        format!("{} {}", label, id)
    } else {
        label
    }
}

/// Ближайший не-взятый предмет (shortcut "NearestItem").
pub fn nearest_item(scene: &dyn SceneQuery, avatar: Vec3) -> Option<SceneObject> {
    scene
        .find_all_with_tag(ITEM_TAG)
        .into_iter()
        .filter(|object| !object.held && object.position.is_finite())
        .min_by(|a, b| {
            avatar
                .distance(a.position)
                .total_cmp(&avatar.distance(b.position))
        })
}
