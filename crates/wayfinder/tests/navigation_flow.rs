//! Integration тесты навигации (inline route queries)
//!
//! Проверяем:
//! - Полный цикл: Navigate → RouteReady → движение → ровно одно прибытие
//! - Stop идемпотентен
//! - Preconditions (не приземлились, аватар мёртв)
//! - Недостижимая цель → NotReachable без движения
//! - SceneReset сбрасывает сессию

mod common;

use bevy::prelude::*;
use common::{Harness, LEVER};
use wayfinder::*;

fn is_arrived(event: &NavEvent) -> bool {
    matches!(event, NavEvent::Arrived { .. })
}

/// Крутим кадры, пока Pathfinder не вернётся в Idle.
fn run_until_idle(harness: &mut Harness, max_ticks: usize) -> usize {
    for tick in 0..max_ticks {
        harness.step(1);
        if harness.state() == PathfinderState::Idle {
            return tick;
        }
    }
    max_ticks
}

#[test]
fn test_navigate_to_lever_arrives_once() {
    let mut harness = Harness::new(false, Vec::new());

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(1);

    assert_eq!(harness.state(), PathfinderState::Following);
    let events = harness.events();
    assert!(matches!(&events[0], NavEvent::Started { display_name, .. } if display_name == "Lever"));
    assert!(matches!(events[1], NavEvent::RouteReady { degraded: false, .. }));
    assert_eq!(harness.said("Starting pathfinding to Lever"), 1);

    let ticks = run_until_idle(&mut harness, 200);
    assert!(ticks < 200, "avatar should arrive");

    // Стоим на месте ещё пару секунд: повторных прибытий нет
    harness.step(20);

    assert_eq!(harness.count(is_arrived), 1);
    assert_eq!(harness.count(|e| matches!(e, NavEvent::Reached { .. })), 0);
    assert_eq!(harness.said("Reached Lever"), 1);
    assert!(harness.position().distance(LEVER) <= 3.0 + 0.7);

    let cues: Vec<CueKind> = harness.audio.played().iter().map(|(kind, _, _)| *kind).collect();
    assert!(cues.contains(&CueKind::Completion));
    assert!(cues.contains(&CueKind::ReachedDestination));
}

#[test]
fn test_navigate_same_target_toggles_pause() {
    let mut harness = Harness::new(false, Vec::new());

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(3);
    let paused_at = harness.position();

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(5);
    assert_eq!(harness.state(), PathfinderState::Paused);
    assert!(harness.position().distance(paused_at) < 0.7, "paused avatar must stand still");
    assert_eq!(harness.said("Pathfinding paused."), 1);

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(1);
    assert_ne!(harness.state(), PathfinderState::Paused);
    assert_eq!(harness.said("Resuming pathfinding."), 1);

    let ticks = run_until_idle(&mut harness, 200);
    assert!(ticks < 200);
    assert_eq!(harness.count(is_arrived), 1);
}

#[test]
fn test_reached_while_paused_is_not_announced_again_on_arrival() {
    let mut harness = Harness::new(false, Vec::new());

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(1);
    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(1);
    assert_eq!(harness.state(), PathfinderState::Paused);

    // Пока на паузе, игрок сам подошёл к рычагу
    harness.set_position(Vec3::new(9.0, 0.0, 0.0));
    harness.step(1);
    assert_eq!(harness.count(|e| matches!(e, NavEvent::Reached { .. })), 1);
    assert_eq!(harness.said("Reached Lever"), 1);

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(3);

    assert_eq!(harness.state(), PathfinderState::Idle);
    assert_eq!(harness.count(is_arrived), 1);
    assert_eq!(harness.count(|e| matches!(e, NavEvent::Reached { .. })), 1);
    assert_eq!(harness.said("Reached Lever"), 1);
}

#[test]
fn test_stop_twice_reports_once() {
    let mut harness = Harness::new(false, Vec::new());

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(2);
    harness.send(NavAction::Stop);
    harness.step(1);
    harness.send(NavAction::Stop);
    harness.step(3);

    assert_eq!(harness.state(), PathfinderState::Idle);
    assert_eq!(harness.count(|e| matches!(e, NavEvent::Stopped { .. })), 1);
    assert_eq!(harness.said("Stopped pathfinding"), 1);

    let stopped_at = harness.position();
    harness.step(5);
    assert_eq!(harness.position(), stopped_at);
}

#[test]
fn test_not_landed_blocks_navigation() {
    let mut harness = Harness::new(false, Vec::new());
    harness.app.insert_resource(WorldContext::default());

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(1);

    assert_eq!(harness.state(), PathfinderState::Idle);
    assert_eq!(harness.count(|e| matches!(e, NavEvent::Started { .. })), 0);
    assert_eq!(
        harness.said("The ship has not landed yet. Pathfinding is not allowed."),
        1
    );
}

#[test]
fn test_unknown_key_reports_not_found() {
    let mut harness = Harness::new(false, Vec::new());

    harness.send(NavAction::Navigate { key: "Moon".to_string() });
    harness.step(1);

    assert_eq!(harness.state(), PathfinderState::Idle);
    assert_eq!(harness.said("Selected object not found at current location."), 1);
}

#[test]
fn test_unreachable_object_reports_not_reachable() {
    // Бочка внутри замкнутой комнаты
    let barrel = SceneObject::new(5, "Barrel", Vec3::new(12.5, 0.0, 12.5));
    let mut harness = Harness::new(false, vec![barrel]);

    harness.send(NavAction::NavigateToObject { instance: InstanceId(5) });
    harness.step(1);

    assert_eq!(harness.state(), PathfinderState::Idle);
    assert_eq!(harness.count(|e| matches!(e, NavEvent::NotReachable { .. })), 1);
    assert_eq!(harness.count(|e| matches!(e, NavEvent::RouteReady { .. })), 0);
    assert_eq!(
        harness.said("Cannot find a valid path to the target. Please try a different location."),
        1
    );

    harness.step(5);
    assert_eq!(harness.position(), Vec3::ZERO);
}

#[test]
fn test_dead_avatar_stops_navigation() {
    let mut harness = Harness::new(false, Vec::new());

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(2);
    assert_eq!(harness.state(), PathfinderState::Following);

    let avatar = harness.avatar;
    if let Some(mut state) = harness.app.world_mut().get_mut::<Avatar>(avatar) {
        state.dead = true;
    }
    harness.step(1);

    assert_eq!(harness.state(), PathfinderState::Idle);
    assert_eq!(harness.said("Pathfinding stopped because the player is dead."), 1);

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(1);
    assert_eq!(harness.state(), PathfinderState::Idle);
}

#[test]
fn test_scene_reset_clears_session() {
    let mut harness = Harness::new(false, Vec::new());

    harness.send(NavAction::Navigate { key: "Lever".to_string() });
    harness.step(2);
    assert_eq!(harness.state(), PathfinderState::Following);

    harness.app.world_mut().send_event(SceneReset);
    harness.step(1);

    assert_eq!(harness.state(), PathfinderState::Idle);
    let observed = harness.app.world().get::<ObservedTarget>(harness.avatar).cloned();
    assert_eq!(observed.and_then(|o| o.0), None);

    let intent = harness.app.world().get::<LocomotionIntent>(harness.avatar).copied();
    assert!(intent.is_some_and(|i| !i.is_moving()));
}
