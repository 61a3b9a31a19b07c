//! Route queries: выдача (inline или AsyncComputeTaskPool), poll, применение по epoch.

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool};

use super::{phrases, Feedback, NavWorld};
use crate::avatar::{LocomotionIntent, NavEvent, RouteQueryTask};
use crate::feedback::audio::CueKind;
use crate::navigation::pathfinder::{Pathfinder, RouteOutcome, RouteRequest};
use crate::navigation::validator::{PathQuery, PathValidator};

/// Timeout зависших запросов + новые route queries (не больше одного на аватара).
pub fn issue_route_queries_system(
    mut commands: Commands,
    mut avatars: Query<(Entity, &Transform, &mut Pathfinder, &mut LocomotionIntent, Has<RouteQueryTask>)>,
    world: NavWorld,
    mut feedback: Feedback,
) {
    let now = world.now();

    for (entity, transform, mut pathfinder, mut intent, has_task) in avatars.iter_mut() {
        if let Some(target) = pathfinder.check_timeout(now) {
            crate::logger::log_warning(&format!(
                "Pathfinder {:?}: route query for '{}' timed out",
                entity, target.display_name
            ));
            commands.entity(entity).remove::<RouteQueryTask>();
            intent.halt();
            feedback.say_now(phrases::QUERY_TIMEOUT);
            feedback.notify(NavEvent::TimedOut {
                entity,
                display_name: target.display_name,
            });
            continue;
        }

        let Some(request) = pathfinder.next_route_request(transform.translation, now) else {
            continue;
        };

        let validator = world.validator();
        if world.config.route_queries_in_background {
            if has_task {
                // Задача старой сессии: замена дропает её (Task отменяется при drop)
                crate::logger::log(&format!("Pathfinder {:?}: superseding route task", entity));
            }
            let task = AsyncComputeTaskPool::get().spawn(async move { run_route_query(&validator, &request) });
            commands.entity(entity).insert(RouteQueryTask {
                epoch: request.epoch,
                task,
            });
        } else {
            let query = run_route_query(&validator, &request);
            apply_route(entity, &mut pathfinder, &mut intent, request.epoch, query, now, &mut feedback);
        }
    }
}

/// Готовые background результаты → Pathfinder (stale отбрасываются внутри apply_route).
pub fn poll_route_queries_system(
    mut commands: Commands,
    mut avatars: Query<(Entity, &mut RouteQueryTask, &mut Pathfinder, &mut LocomotionIntent)>,
    time: Res<Time>,
    mut feedback: Feedback,
) {
    let now = time.elapsed_secs();

    for (entity, mut route_task, mut pathfinder, mut intent) in avatars.iter_mut() {
        let Some(query) = block_on(future::poll_once(&mut route_task.task)) else {
            continue;
        };
        let epoch = route_task.epoch;
        commands.entity(entity).remove::<RouteQueryTask>();
        apply_route(entity, &mut pathfinder, &mut intent, epoch, query, now, &mut feedback);
    }
}

fn run_route_query(validator: &PathValidator, request: &RouteRequest) -> PathQuery {
    validator.validate(request.start, request.target, request.max_length, request.policy)
}

fn apply_route(
    entity: Entity,
    pathfinder: &mut Pathfinder,
    intent: &mut LocomotionIntent,
    epoch: u64,
    query: PathQuery,
    now: f32,
    feedback: &mut Feedback,
) {
    let rejection = query.rejection;
    match pathfinder.apply_route(epoch, query, now) {
        RouteOutcome::Stale => {}
        RouteOutcome::Ready { degraded, replanned } => {
            if degraded {
                crate::logger::log_warning(&format!("Pathfinder {:?}: degraded route accepted", entity));
            }
            if !replanned {
                if let Some(session) = pathfinder.session() {
                    crate::logger::log_info(&format!(
                        "Pathfinder {:?}: route to '{}' ready, {} waypoints",
                        entity,
                        session.target.display_name,
                        session.waypoints.len()
                    ));
                    feedback.cue(CueKind::Completion, session.target.position);
                }
                feedback.notify(NavEvent::RouteReady { entity, degraded });
            }
        }
        RouteOutcome::NotReachable { target } => {
            crate::logger::log_info(&format!(
                "Pathfinder {:?}: '{}' not reachable ({:?})",
                entity, target.display_name, rejection
            ));
            intent.halt();
            feedback.say_now(phrases::NOT_REACHABLE);
            feedback.notify(NavEvent::NotReachable {
                entity,
                display_name: target.display_name,
            });
        }
        RouteOutcome::LostPath { target } => {
            crate::logger::log_warning(&format!(
                "Pathfinder {:?}: lost path to '{}' ({:?})",
                entity, target.display_name, rejection
            ));
            intent.halt();
            feedback.say_now(phrases::LOST_PATH);
            feedback.notify(NavEvent::LostPath {
                entity,
                display_name: target.display_name,
            });
        }
    }
}
