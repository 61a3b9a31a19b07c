//! IdentityLedger — номера для одинаковых живых объектов ("Box 1", "Box 2").
//!
//! Правила:
//! - одиночный объект не нумеруется (0), пока не появится второй с тем же base name
//! - положительный номер остаётся за instance до его уничтожения
//! - освобождённые номера переиспользуются, первым берётся наименьший свободный
//!
//! События spawn/destroy применяются строго в порядке поступления (main tick).

use bevy::prelude::*;
use std::collections::{BTreeSet, HashMap};

use super::names::{self, base_name};
use crate::scene::{InstanceId, SceneQuery};

#[derive(Resource, Debug, Default, Clone)]
pub struct IdentityLedger {
    next_available: HashMap<String, u32>,
    assigned: HashMap<String, BTreeSet<u32>>,
    /// 0 = instance запрошен, но был одиночкой
    by_instance: HashMap<InstanceId, u32>,
    base_of_instance: HashMap<InstanceId, String>,
}

impl IdentityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_excluded(label: &str) -> bool {
        let label = label.trim();
        names::is_landmark(label) || label == names::CHARGING_STATION
    }

    pub fn assign_or_get_id(&mut self, label: &str, instance: InstanceId, scene: &dyn SceneQuery) -> u32 {
        if Self::is_excluded(label) {
            return 0;
        }

        if let Some(&id) = self.by_instance.get(&instance) {
            if id > 0 {
                return id;
            }
        }

        let base = base_name(label);
        if Self::live_count(scene, &base) < 2 {
            self.by_instance.insert(instance, 0);
            self.base_of_instance.insert(instance, base);
            return 0;
        }

        let taken = self.assigned.entry(base.clone()).or_default();
        let id = (1..).find(|candidate| !taken.contains(candidate)).unwrap_or(1);
        taken.insert(id);

        let next = self.next_available.entry(base.clone()).or_insert(1);
        *next = (*next).max(id + 1);

        self.by_instance.insert(instance, id);
        self.base_of_instance.insert(instance, base);
        id
    }

    /// Останавливаемся на 2: больше знать не нужно.
    fn live_count(scene: &dyn SceneQuery, base: &str) -> usize {
        scene
            .live_objects()
            .iter()
            .filter(|object| base_name(&object.name) == base)
            .take(2)
            .count()
    }

    /// Освобождает номер уничтоженного instance. Повторный вызов — no-op.
    pub fn release(&mut self, instance: InstanceId) {
        let id = self.by_instance.remove(&instance);
        let base = self.base_of_instance.remove(&instance);
        if let (Some(id), Some(base)) = (id, base) {
            if id > 0 {
                if let Some(taken) = self.assigned.get_mut(&base) {
                    taken.remove(&id);
                }
            }
        }
    }

    pub fn id_of(&self, instance: InstanceId) -> Option<u32> {
        self.by_instance.get(&instance).copied()
    }

    /// Счётчик "следующий номер" для base name (1, если номеров ещё не было).
    pub fn next_available(&self, label: &str) -> u32 {
        self.next_available.get(&base_name(label)).copied().unwrap_or(1)
    }

    /// "Box 2" / "Box".
    pub fn display_label(&mut self, label: &str, instance: InstanceId, scene: &dyn SceneQuery) -> String {
        let id = self.assign_or_get_id(label, instance, scene);
        let base = base_name(label);
        if id > 0 {
            format!("{} {}", base, id)
        } else {
            base
        }
    }

    /// Смена сцены: все instance недействительны.
    pub fn reset(&mut self) {
        self.next_available.clear();
        self.assigned.clear();
        self.by_instance.clear();
        self.base_of_instance.clear();
    }
}
