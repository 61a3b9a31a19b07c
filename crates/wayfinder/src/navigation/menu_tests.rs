//! Tests for menu browsing and shortcuts.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::config::NavConfig;
    use crate::navigation::menu::*;
    use crate::navigation::nearby::NearbyCatalog;
    use crate::navigation::registry::*;
    use crate::scene::{InstanceId, SceneObject, StaticScene, WorldContext};

    fn registry() -> TargetRegistry {
        let mut registry = TargetRegistry::new();
        registry.define_category(ITEMS, CategoryVisibility::Always);
        registry.define_category(UNLABELED, CategoryVisibility::Always);
        registry
            .register("Lever", "Lever", SHIP, TargetResolution::Fixed(Vec3::new(4.0, 0.0, 0.0)))
            .unwrap();
        registry
            .register("Door", "Door", SHIP, TargetResolution::ScenePath("Ship/Door".into()))
            .unwrap();
        registry
            .register("Bed", "Bunk Beds", SHIP_UTILITIES, TargetResolution::Fixed(Vec3::new(0.0, 0.0, 3.0)))
            .unwrap();
        registry.define_category(
            FACTORY,
            CategoryVisibility::WhenLandedAwayFrom(COMPANY_ZONE.to_string()),
        );
        registry
            .register("EntranceTeleportA", "Enter Factory", FACTORY, TargetResolution::Fixed(Vec3::X))
            .unwrap();
        registry
    }

    fn view(context: &WorldContext) -> MenuView {
        let scene = StaticScene::default();
        MenuView::build(&registry(), context, &NearbyCatalog::default(), &scene, 0.0)
    }

    #[test]
    fn test_view_skips_hidden_and_empty_categories() {
        let names: Vec<String> = view(&WorldContext::default())
            .categories
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec![SHIP.to_string(), SHIP_UTILITIES.to_string()]);

        let landed = view(&WorldContext::landed_at("Experimentation"));
        assert_eq!(landed.categories.len(), 3);
    }

    #[test]
    fn test_item_cursor_wraps() {
        let view = view(&WorldContext::default());
        let mut cursor = MenuCursor::default();

        let first = cursor.current(&view).unwrap();
        assert_eq!((first.category.as_str(), first.index, first.count), (SHIP, 1, 2));
        assert_eq!(first.entry.name, "Lever");

        let second = cursor.next_item(&view).unwrap();
        assert_eq!(second.entry.name, "Door");
        // ScenePath без объекта в сцене
        assert!(second.entry.target.is_none());

        let wrapped = cursor.next_item(&view).unwrap();
        assert_eq!(wrapped.index, 1);
        let back = cursor.prev_item(&view).unwrap();
        assert_eq!(back.index, 2);
    }

    #[test]
    fn test_category_cursor_wraps_and_resets_index() {
        let view = view(&WorldContext::default());
        let mut cursor = MenuCursor::default();
        cursor.next_item(&view);

        let utilities = cursor.next_category(&view).unwrap();
        assert_eq!(utilities.category, SHIP_UTILITIES);
        assert_eq!(utilities.index, 1);

        let ship = cursor.next_category(&view).unwrap();
        assert_eq!(ship.category, SHIP);
        let utilities = cursor.prev_category(&view).unwrap();
        assert_eq!(utilities.category, SHIP_UTILITIES);
    }

    #[test]
    fn test_cursor_recovers_when_category_disappears() {
        let landed = view(&WorldContext::landed_at("Experimentation"));
        let mut cursor = MenuCursor::default();
        cursor.prev_category(&landed);
        assert_eq!(cursor.current(&landed).unwrap().category, FACTORY);

        let docked = view(&WorldContext::landed_at(COMPANY_ZONE));
        assert_eq!(cursor.current(&docked).unwrap().category, SHIP);

        assert!(cursor.next_item(&MenuView::default()).is_none());
    }

    #[test]
    fn test_announcement_text() {
        let selection = MenuSelection {
            category: SHIP.to_string(),
            entry: MenuEntry {
                name: "Lever".into(),
                target: None,
            },
            index: 1,
            count: 2,
        };
        assert_eq!(selection.announcement(Some(4.04)), "Ship, Lever, 4.0 meters away, 1 of 2");
        assert_eq!(selection.announcement(None), "Ship, Lever, Not found nearby, 1 of 2");
    }

    #[test]
    fn test_shortcut_resolution() {
        let scene = StaticScene::new(vec![
            SceneObject::new(7, "Bolt", Vec3::new(2.0, 0.0, 0.0)).as_item("Bolt"),
        ]);
        let registry = registry();
        let mut config = NavConfig::default();
        config.shortcuts[0] = "Lever".into();

        let lever = resolve_shortcut(0, &config, &registry, &scene, Vec3::ZERO, 0.0).unwrap();
        assert_eq!(lever.display_name, "Lever");
        assert!(lever.registered);

        // Слот 3 по умолчанию — NearestItem
        let item = resolve_shortcut(3, &config, &registry, &scene, Vec3::ZERO, 0.0).unwrap();
        assert_eq!(item.display_name, "Bolt");
        assert_eq!(item.object, Some(InstanceId(7)));

        assert!(resolve_shortcut(4, &config, &registry, &scene, Vec3::ZERO, 0.0).is_none());
        assert!(resolve_shortcut(9, &config, &registry, &scene, Vec3::ZERO, 0.0).is_none());
    }
}
