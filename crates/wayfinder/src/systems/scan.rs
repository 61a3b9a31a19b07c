//! Throttled nearby scan вокруг аватара.

use bevy::prelude::*;

use super::NavWorld;
use crate::avatar::Avatar;
use crate::navigation::identity::IdentityLedger;
use crate::navigation::nearby::{NearbyCatalog, NearbyScan, ScanSettings};

pub fn nearby_scan_system(
    avatars: Query<&Transform, With<Avatar>>,
    world: NavWorld,
    mut catalog: ResMut<NearbyCatalog>,
    mut ledger: ResMut<IdentityLedger>,
) {
    let now = world.now();
    let settings = ScanSettings {
        radius: world.config.scan_radius,
        max_objects: world.config.max_objects_to_scan as usize,
        interval: world.config.object_scan_interval,
    };
    if !catalog.scan_due(now, settings.interval) {
        return;
    }
    let Some(transform) = avatars.iter().next() else {
        return;
    };

    let validator = world.validator();
    catalog.rescan(
        NearbyScan {
            scene: world.scene.0.as_ref(),
            registry: &world.registry,
            ledger: &mut ledger,
            validator: &validator,
            settings,
        },
        transform.translation,
        now,
    );
}
