//! ProximityMonitor по наблюдаемой цели (работает и без активного Pathfinder).

use bevy::prelude::*;

use super::{arrival_name, Feedback, NavWorld};
use crate::avatar::{NavEvent, ObservedTarget};
use crate::navigation::pathfinder::Pathfinder;
use crate::navigation::proximity::ProximityMonitor;

pub fn monitor_proximity_system(
    mut avatars: Query<(Entity, &Transform, &Pathfinder, &mut ObservedTarget, &mut ProximityMonitor)>,
    world: NavWorld,
    mut feedback: Feedback,
) {
    for (entity, transform, pathfinder, mut observed, mut monitor) in avatars.iter_mut() {
        let Some(target) = observed.0.as_mut() else {
            continue;
        };
        if let Some(position) = world.refresh(target) {
            target.position = position;
        }

        // Радиус по наблюдаемой цели, а не по цели сессии
        let radius = pathfinder.radius_for(target);
        let distance = transform.translation.distance(target.position);
        if !monitor.sample(distance, radius) {
            continue;
        }

        let (name, object) = arrival_name(&world, target);
        crate::logger::log_info(&format!(
            "Proximity {:?}: reached '{}' ({:.2} ≤ {:.2})",
            entity, name, distance, radius
        ));
        feedback.arrival(&name, target.position, object.as_ref());
        feedback.notify(NavEvent::Reached {
            entity,
            display_name: name,
        });
    }
}
