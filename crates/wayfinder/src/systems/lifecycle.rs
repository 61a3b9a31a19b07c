//! Config propagation, scene lifecycle, category visibility анонсы.

use bevy::prelude::*;

use super::{phrases, Feedback};
use crate::avatar::{Avatar, LocomotionIntent, ObservedTarget, RouteQueryTask, SceneObjectDestroyed, SceneReset};
use crate::config::NavConfig;
use crate::feedback::orientation::{AimTracker, NorthBeacon};
use crate::feedback::speech::SpeechPipeline;
use crate::navigation::identity::IdentityLedger;
use crate::navigation::menu::MenuCursor;
use crate::navigation::nearby::NearbyCatalog;
use crate::navigation::pathfinder::{Pathfinder, PathfinderSettings};
use crate::navigation::proximity::ProximityMonitor;
use crate::navigation::registry::TargetRegistry;
use crate::scene::WorldContext;

/// NavConfig → компоненты/ресурсы. Новые аватары получают настройки в первом кадре.
pub fn apply_config_system(
    config: Res<NavConfig>,
    mut avatars: Query<(Ref<Avatar>, &mut Pathfinder, &mut ProximityMonitor)>,
    mut speech: ResMut<SpeechPipeline>,
    mut beacon: ResMut<NorthBeacon>,
) {
    let changed = config.is_changed();
    if changed {
        speech.enabled = config.enable_speech;
        beacon.interval = config.north_sound_interval;
        crate::logger::log_info("NavConfig applied");
    }

    for (avatar, mut pathfinder, mut monitor) in avatars.iter_mut() {
        if !changed && !avatar.is_added() {
            continue;
        }
        pathfinder.settings = PathfinderSettings {
            stopping_radius: config.pathfinding_stopping_radius,
            registered_min_radius: config.registered_min_radius,
            replan_interval: config.replan_interval,
            query_timeout: config.path_query_timeout,
        };
        monitor.hysteresis = config.proximity_hysteresis.max(0.0);
    }
}

/// SceneObjectDestroyed → освобождаем номер; SceneReset → всё с нуля.
#[allow(clippy::too_many_arguments)]
pub fn scene_lifecycle_system(
    mut commands: Commands,
    mut destroyed: EventReader<SceneObjectDestroyed>,
    mut resets: EventReader<SceneReset>,
    mut ledger: ResMut<IdentityLedger>,
    mut catalog: ResMut<NearbyCatalog>,
    mut cursor: ResMut<MenuCursor>,
    mut avatars: Query<(
        Entity,
        &mut Pathfinder,
        &mut ObservedTarget,
        &mut ProximityMonitor,
        &mut AimTracker,
        &mut LocomotionIntent,
    )>,
) {
    // Порядок поступления: destroy до reset в том же кадре уже неважен, reset чистит всё
    for event in destroyed.read() {
        ledger.release(event.instance);
    }

    if resets.read().count() == 0 {
        return;
    }

    ledger.reset();
    catalog.clear();
    *cursor = MenuCursor::default();
    for (entity, mut pathfinder, mut observed, mut monitor, mut aim, mut intent) in avatars.iter_mut() {
        pathfinder.stop();
        observed.0 = None;
        monitor.reset();
        aim.reset();
        intent.halt();
        commands.entity(entity).remove::<RouteQueryTask>();
    }
    crate::logger::log_info("Scene reset: identity ledger, nearby catalog and sessions cleared");
}

pub fn category_visibility_system(
    mut registry: ResMut<TargetRegistry>,
    context: Res<WorldContext>,
    mut feedback: Feedback,
) {
    // Первый вызов — baseline, дальше только по изменению контекста
    if !context.is_changed() && !registry.is_changed() {
        return;
    }
    for (category, visible) in registry.bypass_change_detection().visibility_changes(&context) {
        feedback.say_now(phrases::category_visibility(&category, visible));
    }
}
