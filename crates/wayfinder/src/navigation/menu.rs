//! Menu browsing: курсор по видимым категориям + shortcut slots.

use bevy::prelude::*;

use super::nearby::{nearest_item, NearbyCatalog};
use super::registry::{ResolvedTarget, TargetRegistry, ITEMS, UNLABELED};
use crate::config::{NavConfig, NEAREST_ITEM_SHORTCUT};
use crate::scene::{SceneQuery, WorldContext};

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub name: String,
    /// None — точка каталога сейчас не резолвится
    pub target: Option<ResolvedTarget>,
}

/// Snapshot меню на один кадр: видимые непустые категории в порядке registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuView {
    pub categories: Vec<(String, Vec<MenuEntry>)>,
}

impl MenuView {
    pub fn build(
        registry: &TargetRegistry,
        context: &WorldContext,
        catalog: &NearbyCatalog,
        scene: &dyn SceneQuery,
        now: f32,
    ) -> Self {
        let categories = registry
            .visible_categories(context)
            .into_iter()
            .map(|category| {
                let entries: Vec<MenuEntry> = match category {
                    ITEMS | UNLABELED => catalog
                        .entries(category)
                        .iter()
                        .map(|entry| MenuEntry {
                            name: entry.label.clone(),
                            target: Some(entry.to_target(now)),
                        })
                        .collect(),
                    _ => registry
                        .members(category)
                        .into_iter()
                        .map(|target| MenuEntry {
                            name: target.display_name.clone(),
                            target: registry.resolve(&target.key, scene, now),
                        })
                        .collect(),
                };
                (category.to_string(), entries)
            })
            .filter(|(_, entries)| !entries.is_empty())
            .collect();
        Self { categories }
    }

    fn position_of(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|(name, _)| name == category)
    }
}

/// Текущий выбор курсора.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSelection {
    pub category: String,
    pub entry: MenuEntry,
    /// 1-based
    pub index: usize,
    pub count: usize,
}

impl MenuSelection {
    /// "{category}, {name}, {distance} meters away, {i} of {n}"
    pub fn announcement(&self, distance: Option<f32>) -> String {
        match distance.filter(|d| d.is_finite()) {
            Some(distance) => format!(
                "{}, {}, {:.1} meters away, {} of {}",
                self.category, self.entry.name, distance, self.index, self.count
            ),
            None => format!(
                "{}, {}, Not found nearby, {} of {}",
                self.category, self.entry.name, self.index, self.count
            ),
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct MenuCursor {
    category: Option<String>,
    index: usize,
}

impl MenuCursor {
    /// Текущий выбор; курсор подтягивается, если категория исчезла или сжалась.
    pub fn current(&mut self, view: &MenuView) -> Option<MenuSelection> {
        let category_index = self.settle(view)?;
        self.selection(view, category_index)
    }

    pub fn next_item(&mut self, view: &MenuView) -> Option<MenuSelection> {
        self.step_item(view, 1)
    }

    pub fn prev_item(&mut self, view: &MenuView) -> Option<MenuSelection> {
        self.step_item(view, -1)
    }

    pub fn next_category(&mut self, view: &MenuView) -> Option<MenuSelection> {
        self.step_category(view, 1)
    }

    pub fn prev_category(&mut self, view: &MenuView) -> Option<MenuSelection> {
        self.step_category(view, -1)
    }

    fn settle(&mut self, view: &MenuView) -> Option<usize> {
        if view.categories.is_empty() {
            self.category = None;
            self.index = 0;
            return None;
        }
        let category_index = match self.category.as_deref().and_then(|c| view.position_of(c)) {
            Some(index) => index,
            None => {
                self.index = 0;
                0
            }
        };
        let (name, entries) = &view.categories[category_index];
        self.category = Some(name.clone());
        self.index = self.index.min(entries.len().saturating_sub(1));
        Some(category_index)
    }

    fn step_item(&mut self, view: &MenuView, step: isize) -> Option<MenuSelection> {
        let category_index = self.settle(view)?;
        let count = view.categories[category_index].1.len();
        self.index = wrap(self.index, step, count);
        self.selection(view, category_index)
    }

    fn step_category(&mut self, view: &MenuView, step: isize) -> Option<MenuSelection> {
        let current = self.settle(view)?;
        let category_index = wrap(current, step, view.categories.len());
        self.category = Some(view.categories[category_index].0.clone());
        self.index = 0;
        self.selection(view, category_index)
    }

    fn selection(&self, view: &MenuView, category_index: usize) -> Option<MenuSelection> {
        let (category, entries) = view.categories.get(category_index)?;
        let entry = entries.get(self.index)?;
        Some(MenuSelection {
            category: category.clone(),
            entry: entry.clone(),
            index: self.index + 1,
            count: entries.len(),
        })
    }
}

fn wrap(index: usize, step: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + step).rem_euclid(len as isize) as usize
}

/// Цель shortcut slot'а. "NearestItem" — ближайший предмет, иначе registry key.
pub fn resolve_shortcut(
    slot: usize,
    config: &NavConfig,
    registry: &TargetRegistry,
    scene: &dyn SceneQuery,
    avatar: Vec3,
    now: f32,
) -> Option<ResolvedTarget> {
    let key = config.shortcut(slot)?;
    if key == NEAREST_ITEM_SHORTCUT {
        let item = nearest_item(scene, avatar)?;
        let name = registry.arrival_name_for(&item);
        return Some(ResolvedTarget::from_object(&item, name, false, now));
    }
    registry.resolve(key, scene, now)
}
