//! Steering по маршруту + headless integrator движения.

use bevy::prelude::*;
use rand::Rng;

use super::{arrival_name, phrases, Feedback, NavWorld};
use crate::avatar::{Avatar, LocomotionIntent, NavEvent, RouteQueryTask, SimulatedLocomotion};
use crate::navigation::pathfinder::{locomotion_speed, Pathfinder, PathfinderState, TickOutcome};
use crate::navigation::proximity::ProximityMonitor;
use crate::DeterministicRng;

/// Pathfinder.tick → LocomotionIntent. Arrival латчит ProximityMonitor (одно объявление).
pub fn drive_locomotion_system(
    mut commands: Commands,
    mut avatars: Query<(
        Entity,
        &Transform,
        &Avatar,
        &mut Pathfinder,
        &mut ProximityMonitor,
        &mut LocomotionIntent,
    )>,
    world: NavWorld,
    mut feedback: Feedback,
    mut frame: Local<u64>,
) {
    let now = world.now();
    *frame += 1;

    for (entity, transform, avatar, mut pathfinder, mut monitor, mut intent) in avatars.iter_mut() {
        if !avatar.is_available() {
            if pathfinder.state() != PathfinderState::Idle {
                pathfinder.stop();
                commands.entity(entity).remove::<RouteQueryTask>();
                if avatar.dead {
                    feedback.say_now(phrases::PLAYER_DEAD);
                    feedback.notify(NavEvent::Stopped { entity });
                } else {
                    crate::logger::log_warning(&format!(
                        "Pathfinder {:?}: avatar detached, session dropped",
                        entity
                    ));
                }
            }
            intent.halt();
            continue;
        }

        // Живая цель: пиннутая позиция догоняет объект
        let refreshed = pathfinder
            .session()
            .filter(|session| session.target.is_live())
            .and_then(|session| world.refresh(&session.target));
        if let Some(position) = refreshed {
            pathfinder.update_target_position(position);
        }

        match pathfinder.tick(transform.translation, now) {
            TickOutcome::Idle | TickOutcome::Hold => {
                if intent.is_moving() {
                    intent.halt();
                }
            }
            TickOutcome::Steer { waypoint, direction } => {
                crate::logger::log_every_n_frames(
                    *frame,
                    60,
                    &format!(
                        "Pathfinder {:?}: at {:.1?} → waypoint {:.1?}",
                        entity, transform.translation, waypoint
                    ),
                );
                intent.direction = direction;
                intent.speed = locomotion_speed(avatar.carry_weight);
            }
            TickOutcome::Arrived { target } => {
                intent.halt();
                // ProximityMonitor мог уже объявить этот подход (пауза, Routing)
                let announced = monitor.has_played_arrival();
                monitor.latch();
                let (name, object) = arrival_name(&world, &target);
                crate::logger::log_info(&format!(
                    "Pathfinder {:?}: arrived at '{}' (announced: {})",
                    entity, name, announced
                ));
                if !announced {
                    feedback.arrival(&name, target.position, object.as_ref());
                }
                feedback.notify(NavEvent::Arrived {
                    entity,
                    display_name: name,
                });
            }
        }
    }
}

/// Headless: Transform += intent * dt (+ детерминированный шум).
pub fn simulate_locomotion_system(
    mut avatars: Query<(&mut Transform, &LocomotionIntent, &SimulatedLocomotion)>,
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
) {
    let delta = time.delta_secs();
    for (mut transform, intent, simulated) in avatars.iter_mut() {
        if intent.is_moving() {
            transform.translation += intent.direction * intent.speed * delta;
        }
        if simulated.jitter > 0.0 {
            let jitter = simulated.jitter;
            transform.translation.x += rng.rng.gen_range(-jitter..jitter);
            transform.translation.z += rng.rng.gen_range(-jitter..jitter);
        }
    }
}
