//! Tests for the Pathfinder state machine.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::navigation::pathfinder::*;
    use crate::navigation::registry::ResolvedTarget;
    use crate::navigation::validator::{PathQuery, Rejection, ValidationPolicy};
    use crate::scene::InstanceId;

    fn lever() -> ResolvedTarget {
        ResolvedTarget {
            key: Some("Lever".into()),
            display_name: "Lever".into(),
            position: Vec3::new(10.0, 0.0, 0.0),
            object: None,
            resolved_at: 0.0,
            registered: true,
        }
    }

    fn crate_object(id: u64, position: Vec3) -> ResolvedTarget {
        ResolvedTarget {
            key: None,
            display_name: "Crate".into(),
            position,
            object: Some(InstanceId(id)),
            resolved_at: 0.0,
            registered: false,
        }
    }

    fn straight_route() -> PathQuery {
        PathQuery::reachable(
            vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)],
            false,
        )
    }

    /// navigate_to + route ready → Following
    fn following(pathfinder: &mut Pathfinder) {
        pathfinder.navigate_to(lever(), 0.0);
        let request = pathfinder.next_route_request(Vec3::ZERO, 0.0).unwrap();
        let outcome = pathfinder.apply_route(request.epoch, straight_route(), 0.1);
        assert!(matches!(outcome, RouteOutcome::Ready { .. }));
    }

    #[test]
    fn test_navigate_issues_route_request() {
        let mut pathfinder = Pathfinder::default();
        assert_eq!(pathfinder.state(), PathfinderState::Idle);

        let outcome = pathfinder.navigate_to(lever(), 0.0);
        assert!(matches!(outcome, NavigateOutcome::Started { .. }));
        assert_eq!(pathfinder.state(), PathfinderState::Routing);
        assert_eq!(pathfinder.stopping_radius(), Some(3.0));

        let request = pathfinder.next_route_request(Vec3::ZERO, 0.0).unwrap();
        assert_eq!(request.target, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(request.policy, ValidationPolicy::Relaxed);
        assert_eq!(request.max_length, MAX_ROUTE_LENGTH);

        // Один запрос в полёте
        assert!(pathfinder.next_route_request(Vec3::ZERO, 0.1).is_none());
    }

    #[test]
    fn test_route_ready_switches_to_following() {
        let mut pathfinder = Pathfinder::default();
        following(&mut pathfinder);
        assert_eq!(pathfinder.state(), PathfinderState::Following);
        let session = pathfinder.session().unwrap();
        assert_eq!(session.waypoint_index, 1);
        assert!(!session.degraded);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut pathfinder = Pathfinder::default();
        following(&mut pathfinder);

        assert!(pathfinder.stop());
        assert_eq!(pathfinder.state(), PathfinderState::Idle);
        assert!(!pathfinder.stop());
        assert_eq!(pathfinder.state(), PathfinderState::Idle);
    }

    #[test]
    fn test_same_target_toggles_pause() {
        let mut pathfinder = Pathfinder::default();
        following(&mut pathfinder);

        assert_eq!(pathfinder.navigate_to(lever(), 1.0), NavigateOutcome::Paused);
        assert_eq!(pathfinder.state(), PathfinderState::Paused);
        assert_eq!(pathfinder.tick(Vec3::ZERO, 1.1), TickOutcome::Hold);

        assert_eq!(pathfinder.navigate_to(lever(), 2.0), NavigateOutcome::Resumed);
        assert_eq!(pathfinder.state(), PathfinderState::Following);
    }

    #[test]
    fn test_pause_while_routing_resumes_to_routing() {
        let mut pathfinder = Pathfinder::default();
        pathfinder.navigate_to(lever(), 0.0);
        assert_eq!(pathfinder.navigate_to(lever(), 0.1), NavigateOutcome::Paused);
        assert_eq!(pathfinder.navigate_to(lever(), 0.2), NavigateOutcome::Resumed);
        assert_eq!(pathfinder.state(), PathfinderState::Routing);
    }

    #[test]
    fn test_stale_result_after_stop_is_discarded() {
        let mut pathfinder = Pathfinder::default();
        pathfinder.navigate_to(lever(), 0.0);
        let request = pathfinder.next_route_request(Vec3::ZERO, 0.0).unwrap();

        pathfinder.stop();
        assert_eq!(
            pathfinder.apply_route(request.epoch, straight_route(), 0.5),
            RouteOutcome::Stale
        );
        assert_eq!(pathfinder.state(), PathfinderState::Idle);
    }

    #[test]
    fn test_superseded_session_ignores_old_result() {
        let mut pathfinder = Pathfinder::default();
        pathfinder.navigate_to(lever(), 0.0);
        let old = pathfinder.next_route_request(Vec3::ZERO, 0.0).unwrap();

        let other = crate_object(9, Vec3::new(0.0, 0.0, 6.0));
        pathfinder.navigate_to(other.clone(), 0.1);
        assert_eq!(pathfinder.apply_route(old.epoch, straight_route(), 0.2), RouteOutcome::Stale);

        // Новая сессия продолжает ждать свой маршрут
        assert_eq!(pathfinder.state(), PathfinderState::Routing);
        assert!(pathfinder.is_targeting(&other));
        let fresh = pathfinder.next_route_request(Vec3::ZERO, 0.2).unwrap();
        assert!(fresh.epoch > old.epoch);
        assert_eq!(fresh.policy, ValidationPolicy::Standard);
    }

    #[test]
    fn test_unreachable_route_returns_to_idle() {
        let mut pathfinder = Pathfinder::default();
        pathfinder.navigate_to(lever(), 0.0);
        let request = pathfinder.next_route_request(Vec3::ZERO, 0.0).unwrap();

        let outcome = pathfinder.apply_route(request.epoch, PathQuery::unreachable(Rejection::NoRoute), 0.1);
        match outcome {
            RouteOutcome::NotReachable { target } => assert_eq!(target.display_name, "Lever"),
            other => panic!("expected NotReachable, got {:?}", other),
        }
        assert_eq!(pathfinder.state(), PathfinderState::Idle);
    }

    #[test]
    fn test_failed_replan_reports_lost_path() {
        let mut pathfinder = Pathfinder::default();
        following(&mut pathfinder);

        // Статичная цель: re-plan через replan_interval * 5
        assert!(pathfinder.next_route_request(Vec3::ZERO, 1.0).is_none());
        let replan = pathfinder.next_route_request(Vec3::ZERO, 6.0).unwrap();

        let outcome = pathfinder.apply_route(replan.epoch, PathQuery::unreachable(Rejection::TooLong), 6.1);
        assert!(matches!(outcome, RouteOutcome::LostPath { .. }));
        assert_eq!(pathfinder.state(), PathfinderState::Idle);
    }

    #[test]
    fn test_live_target_replans_every_interval() {
        let mut pathfinder = Pathfinder::default();
        let target = crate_object(3, Vec3::new(10.0, 0.0, 0.0));
        pathfinder.navigate_to(target, 0.0);
        let request = pathfinder.next_route_request(Vec3::ZERO, 0.0).unwrap();
        pathfinder.apply_route(request.epoch, straight_route(), 0.0);

        pathfinder.update_target_position(Vec3::new(12.0, 0.0, 0.0));
        assert!(pathfinder.next_route_request(Vec3::ZERO, 0.5).is_none());
        let replan = pathfinder.next_route_request(Vec3::ZERO, 1.0).unwrap();
        assert_eq!(replan.target, Vec3::new(12.0, 0.0, 0.0));

        let outcome = pathfinder.apply_route(replan.epoch, straight_route(), 1.1);
        assert_eq!(outcome, RouteOutcome::Ready { degraded: false, replanned: true });
        assert_eq!(pathfinder.state(), PathfinderState::Following);
    }

    #[test]
    fn test_steer_then_arrive_once() {
        let mut pathfinder = Pathfinder::default();
        following(&mut pathfinder);

        match pathfinder.tick(Vec3::ZERO, 0.2) {
            TickOutcome::Steer { waypoint, direction } => {
                assert_eq!(waypoint, Vec3::new(5.0, 0.0, 0.0));
                assert!((direction - Vec3::X).length() < 1e-5);
            }
            other => panic!("expected Steer, got {:?}", other),
        }

        // Промежуточный waypoint в радиусе → следующий
        match pathfinder.tick(Vec3::new(4.0, 0.0, 0.0), 0.3) {
            TickOutcome::Steer { waypoint, .. } => assert_eq!(waypoint, Vec3::new(10.0, 0.0, 0.0)),
            other => panic!("expected Steer, got {:?}", other),
        }

        match pathfinder.tick(Vec3::new(8.0, 0.0, 0.0), 0.4) {
            TickOutcome::Arrived { target } => assert_eq!(target.display_name, "Lever"),
            other => panic!("expected Arrived, got {:?}", other),
        }
        assert_eq!(pathfinder.state(), PathfinderState::Idle);
        assert_eq!(pathfinder.tick(Vec3::new(8.0, 0.0, 0.0), 0.5), TickOutcome::Idle);
    }

    #[test]
    fn test_initial_query_timeout_ends_session() {
        let mut pathfinder = Pathfinder::default();
        pathfinder.navigate_to(lever(), 0.0);
        let request = pathfinder.next_route_request(Vec3::ZERO, 0.0).unwrap();

        assert!(pathfinder.check_timeout(4.0).is_none());
        let timed_out = pathfinder.check_timeout(5.5).unwrap();
        assert_eq!(timed_out.display_name, "Lever");
        assert_eq!(pathfinder.state(), PathfinderState::Idle);

        // Запоздавший результат игнорируется
        assert_eq!(pathfinder.apply_route(request.epoch, straight_route(), 6.0), RouteOutcome::Stale);
    }

    #[test]
    fn test_stuck_avatar_skips_waypoint() {
        let mut pathfinder = Pathfinder::default();
        pathfinder.navigate_to(lever(), 0.0);
        let request = pathfinder.next_route_request(Vec3::ZERO, 0.0).unwrap();
        let route = PathQuery::reachable(
            vec![
                Vec3::ZERO,
                Vec3::new(20.0, 0.0, 0.0),
                Vec3::new(20.0, 0.0, 20.0),
                Vec3::new(10.0, 0.0, 0.0),
            ],
            false,
        );
        pathfinder.apply_route(request.epoch, route, 0.0);

        let stuck_at = Vec3::new(1.0, 0.0, -5.0);
        pathfinder.tick(stuck_at, 0.0);
        match pathfinder.tick(stuck_at, 3.0) {
            TickOutcome::Steer { waypoint, .. } => assert_eq!(waypoint, Vec3::new(20.0, 0.0, 20.0)),
            other => panic!("expected Steer, got {:?}", other),
        }
        assert_eq!(pathfinder.session().unwrap().waypoint_index, 2);

        // Cooldown 5с: на 6с ещё не перескакиваем
        pathfinder.tick(stuck_at, 6.0);
        assert_eq!(pathfinder.session().unwrap().waypoint_index, 2);
    }

    #[test]
    fn test_radius_for_follows_target_not_session() {
        let mut pathfinder = Pathfinder::default();
        pathfinder.navigate_to(crate_object(7, Vec3::new(-5.0, 0.0, 0.0)), 0.0);
        assert_eq!(pathfinder.stopping_radius(), Some(2.2));

        // Наблюдаемая registered цель получает свой минимум
        assert_eq!(pathfinder.radius_for(&lever()), 3.0);
        assert_eq!(pathfinder.radius_for(&crate_object(8, Vec3::ZERO)), 2.2);
    }

    #[test]
    fn test_locomotion_speed_drops_with_weight() {
        let empty = locomotion_speed(0.0);
        assert!((empty - 6.125).abs() < 1e-4);
        let heavy = locomotion_speed(1.4);
        assert!((heavy - 6.125 * 0.15).abs() < 1e-4);
        assert_eq!(locomotion_speed(5.0), heavy);
    }
}
