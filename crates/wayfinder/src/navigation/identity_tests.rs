//! Tests for IdentityLedger numbering.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::navigation::identity::IdentityLedger;
    use crate::scene::{InstanceId, SceneObject, StaticScene};

    fn boxed(id: u64) -> SceneObject {
        SceneObject::new(id, "Box", Vec3::new(id as f32, 0.0, 0.0))
    }

    #[test]
    fn test_single_instance_is_unnumbered() {
        let scene = StaticScene::new(vec![boxed(1)]);
        let mut ledger = IdentityLedger::new();

        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(1), &scene), 0);
        assert_eq!(ledger.id_of(InstanceId(1)), Some(0));
        assert_eq!(ledger.display_label("Box", InstanceId(1), &scene), "Box");
    }

    #[test]
    fn test_siblings_fill_lowest_free_first() {
        let scene = StaticScene::new(vec![boxed(1)]);
        let mut ledger = IdentityLedger::new();
        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(1), &scene), 0);

        // Появился второй Box: одиночка получает номер при следующем запросе
        scene.insert(boxed(2));
        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(2), &scene), 1);
        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(1), &scene), 2);

        // Стабильно для того же instance
        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(2), &scene), 1);
        assert_eq!(ledger.next_available("Box"), 3);

        // Держатель номера 1 уничтожен → новый instance получает 1
        scene.remove(InstanceId(2));
        ledger.release(InstanceId(2));
        scene.insert(boxed(3));
        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(3), &scene), 1);
        assert_eq!(ledger.display_label("Box", InstanceId(3), &scene), "Box 1");
    }

    #[test]
    fn test_clone_and_item_suffixes_share_base() {
        let scene = StaticScene::new(vec![
            SceneObject::new(1, "FlashlightItem", Vec3::ZERO),
            SceneObject::new(2, "FlashlightItem(Clone)", Vec3::ONE),
        ]);
        let mut ledger = IdentityLedger::new();

        assert_eq!(ledger.display_label("FlashlightItem", InstanceId(1), &scene), "Flashlight 1");
        assert_eq!(ledger.display_label("FlashlightItem(Clone)", InstanceId(2), &scene), "Flashlight 2");
    }

    #[test]
    fn test_landmarks_never_numbered() {
        let scene = StaticScene::new(vec![
            SceneObject::new(1, "EntranceTeleportA", Vec3::ZERO),
            SceneObject::new(2, "EntranceTeleportA", Vec3::ONE),
        ]);
        let mut ledger = IdentityLedger::new();
        assert_eq!(ledger.assign_or_get_id("EntranceTeleportA", InstanceId(1), &scene), 0);
        assert_eq!(ledger.assign_or_get_id("EntranceTeleportA", InstanceId(2), &scene), 0);
        assert_eq!(ledger.id_of(InstanceId(1)), None);
        assert!(IdentityLedger::is_excluded("PlacementBlocker (5)"));
    }

    #[test]
    fn test_release_is_idempotent() {
        let scene = StaticScene::new(vec![boxed(1), boxed(2)]);
        let mut ledger = IdentityLedger::new();
        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(1), &scene), 1);

        ledger.release(InstanceId(1));
        ledger.release(InstanceId(1));
        ledger.release(InstanceId(99));
        assert_eq!(ledger.id_of(InstanceId(1)), None);

        // Номер свободен
        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(2), &scene), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let scene = StaticScene::new(vec![boxed(1), boxed(2)]);
        let mut ledger = IdentityLedger::new();
        ledger.assign_or_get_id("Box", InstanceId(1), &scene);
        ledger.assign_or_get_id("Box", InstanceId(2), &scene);

        ledger.reset();
        assert_eq!(ledger.id_of(InstanceId(1)), None);
        assert_eq!(ledger.next_available("Box"), 1);
        assert_eq!(ledger.assign_or_get_id("Box", InstanceId(2), &scene), 1);
    }
}
