//! NavAction → Pathfinder / menu / orientation.

use bevy::prelude::*;

use super::{phrases, Feedback, NavWorld};
use crate::avatar::{Avatar, Facing, LocomotionIntent, NavAction, NavEvent, ObservedTarget};
use crate::feedback::compass::{compass_direction, direction_text, distance_text, heading_degrees, snap_turn};
use crate::feedback::orientation::{AimTracker, NorthBeacon};
use crate::navigation::menu::{resolve_shortcut, MenuCursor, MenuSelection, MenuView};
use crate::navigation::nearby::{nearest_item, NearbyCatalog};
use crate::navigation::pathfinder::{NavigateOutcome, Pathfinder};
use crate::navigation::proximity::ProximityMonitor;
use crate::navigation::registry::ResolvedTarget;
use crate::scene::RoomIndex;

type AvatarItem = (
    Entity,
    &'static Transform,
    &'static Avatar,
    &'static mut Facing,
    &'static mut Pathfinder,
    &'static mut ObservedTarget,
    &'static mut ProximityMonitor,
    &'static mut AimTracker,
    &'static mut LocomotionIntent,
);

/// Изменяемое состояние одного аватара на время обработки действия.
struct AvatarCtx<'a> {
    entity: Entity,
    position: Vec3,
    avatar: &'a Avatar,
    facing: Mut<'a, Facing>,
    pathfinder: Mut<'a, Pathfinder>,
    observed: Mut<'a, ObservedTarget>,
    monitor: Mut<'a, ProximityMonitor>,
    aim: Mut<'a, AimTracker>,
    intent: Mut<'a, LocomotionIntent>,
}

impl AvatarCtx<'_> {
    fn observe(&mut self, target: Option<ResolvedTarget>) {
        self.observed.0 = target;
        self.monitor.reset();
        self.aim.reset();
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_nav_actions_system(
    mut actions: EventReader<NavAction>,
    mut avatars: Query<AvatarItem>,
    world: NavWorld,
    catalog: Res<NearbyCatalog>,
    rooms: Option<Res<RoomIndex>>,
    mut cursor: ResMut<MenuCursor>,
    mut beacon: ResMut<NorthBeacon>,
    mut feedback: Feedback,
) {
    for action in actions.read() {
        crate::logger::log(&format!("NavAction: {:?}", action));

        // Глобальные действия (не зависят от аватара)
        if let NavAction::ToggleNorthBeacon = action {
            let enabled = beacon.toggle();
            feedback.say_now(phrases::north_sound(enabled));
            continue;
        }

        for (entity, transform, avatar, facing, pathfinder, observed, monitor, aim, intent) in avatars.iter_mut() {
            let mut ctx = AvatarCtx {
                entity,
                position: transform.translation,
                avatar,
                facing,
                pathfinder,
                observed,
                monitor,
                aim,
                intent,
            };
            apply_action(action, &mut ctx, &world, &catalog, rooms.as_deref(), &mut cursor, &mut feedback);
        }
    }
}

fn apply_action(
    action: &NavAction,
    ctx: &mut AvatarCtx,
    world: &NavWorld,
    catalog: &NearbyCatalog,
    rooms: Option<&RoomIndex>,
    cursor: &mut MenuCursor,
    feedback: &mut Feedback,
) {
    let now = world.now();
    match action {
        NavAction::Navigate { key } => {
            let target = world.registry.resolve(key, world.scene.0.as_ref(), now);
            start_navigation(target, ctx, world, feedback);
        }
        NavAction::NavigateToObject { instance } => {
            let target = catalog.find(*instance).map(|entry| entry.to_target(now)).or_else(|| {
                world.find_object(*instance).map(|object| {
                    let name = world.registry.display_name_for(&object);
                    let registered = world.registry.is_registered(&object.name);
                    ResolvedTarget::from_object(&object, name, registered, now)
                })
            });
            start_navigation(target, ctx, world, feedback);
        }
        NavAction::Shortcut(slot) => {
            let Some(key) = world.config.shortcut(*slot) else {
                crate::logger::log(&format!("Shortcut slot {} is empty", slot));
                return;
            };
            crate::logger::log(&format!("Shortcut {} → {}", slot, key));
            let target = resolve_shortcut(*slot, &world.config, &world.registry, world.scene.0.as_ref(), ctx.position, now);
            start_navigation(target, ctx, world, feedback);
        }
        NavAction::NearestItem => {
            let target = nearest_item(world.scene.0.as_ref(), ctx.position).map(|item| {
                let name = world.registry.arrival_name_for(&item);
                ResolvedTarget::from_object(&item, name, false, now)
            });
            start_navigation(target, ctx, world, feedback);
        }
        NavAction::NavigateToObserved => {
            let target = ctx.observed.0.clone().map(|mut target| {
                if let Some(position) = world.refresh(&target) {
                    target.position = position;
                }
                target.resolved_at = now;
                target
            });
            start_navigation(target, ctx, world, feedback);
        }
        NavAction::Stop => {
            if ctx.pathfinder.stop() {
                ctx.intent.halt();
                feedback.say_now(phrases::STOPPED);
                feedback.notify(NavEvent::Stopped { entity: ctx.entity });
            }
        }
        NavAction::AnnounceRoom => {
            let room = rooms.and_then(|rooms| rooms.0.room_at(ctx.position));
            match room {
                Some(room) => feedback.say_now(phrases::room(&room.name, room.on_main_path)),
                None => feedback.say_now(phrases::ROOM_UNAVAILABLE),
            }
        }
        NavAction::AnnounceFacing => {
            feedback.say_now(compass_direction(heading_degrees(ctx.facing.0)));
        }
        NavAction::SnapTurnLeft | NavAction::SnapTurnRight => {
            let angle = world.config.snap_turn_angle;
            let increment = if *action == NavAction::SnapTurnLeft { -angle } else { angle };
            let turn = snap_turn(ctx.facing.0, increment);
            ctx.facing.0 = turn.forward;
            feedback.say_now(turn.label);
        }
        NavAction::NextItem | NavAction::PrevItem | NavAction::NextCategory | NavAction::PrevCategory => {
            let view = MenuView::build(&world.registry, &world.context, catalog, world.scene.0.as_ref(), now);
            let selection = match action {
                NavAction::NextItem => cursor.next_item(&view),
                NavAction::PrevItem => cursor.prev_item(&view),
                NavAction::NextCategory => cursor.next_category(&view),
                _ => cursor.prev_category(&view),
            };
            announce_selection(selection, ctx, world, feedback);
        }
        NavAction::SelectCurrent => {
            let view = MenuView::build(&world.registry, &world.context, catalog, world.scene.0.as_ref(), now);
            let Some(selection) = cursor.current(&view) else {
                feedback.say_now(phrases::NO_CATEGORIES);
                return;
            };
            match selection.entry.target {
                Some(target) => {
                    let offset = target.position - ctx.position;
                    feedback.say_now(phrases::looking_at(
                        &target.display_name,
                        &direction_text(offset, true),
                        &distance_text(offset.length()),
                    ));
                    ctx.observe(Some(target));
                }
                None => feedback.say_now(phrases::TARGET_NOT_FOUND),
            }
        }
        NavAction::ToggleNorthBeacon => {}
    }
}

fn announce_selection(selection: Option<MenuSelection>, ctx: &AvatarCtx, world: &NavWorld, feedback: &mut Feedback) {
    let Some(selection) = selection else {
        feedback.say_now(phrases::NO_CATEGORIES);
        return;
    };
    let distance = selection
        .entry
        .target
        .as_ref()
        .map(|target| world.validator().estimate_distance(ctx.position, target.position));
    feedback.say_now(selection.announcement(distance));
}

/// Общие preconditions + navigate_to.
fn start_navigation(target: Option<ResolvedTarget>, ctx: &mut AvatarCtx, world: &NavWorld, feedback: &mut Feedback) {
    if !world.context.vessel_landed {
        feedback.say_now(phrases::NOT_LANDED);
        return;
    }
    if !ctx.avatar.is_initialized() {
        feedback.say_now(phrases::NOT_INITIALIZED);
        return;
    }
    if ctx.avatar.dead {
        feedback.say_now(phrases::PLAYER_DEAD);
        return;
    }
    let Some(target) = target else {
        feedback.say_now(phrases::TARGET_NOT_FOUND);
        return;
    };

    let name = target.display_name.clone();
    match ctx.pathfinder.navigate_to(target.clone(), world.now()) {
        NavigateOutcome::Started { epoch } => {
            crate::logger::log_info(&format!(
                "Pathfinder {:?}: start '{}' at {:?} (epoch {})",
                ctx.entity, name, target.position, epoch
            ));
            ctx.intent.halt();
            ctx.observe(Some(target));
            feedback.say_now(phrases::starting(&name));
            feedback.notify(NavEvent::Started {
                entity: ctx.entity,
                display_name: name,
            });
        }
        NavigateOutcome::Paused => {
            ctx.intent.halt();
            feedback.say_now(phrases::PAUSED);
            feedback.notify(NavEvent::Paused { entity: ctx.entity });
        }
        NavigateOutcome::Resumed => {
            feedback.say_now(phrases::RESUMED);
            feedback.notify(NavEvent::Resumed { entity: ctx.entity });
        }
    }
}
