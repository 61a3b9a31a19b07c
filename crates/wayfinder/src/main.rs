//! Headless прогон Wayfinder
//!
//! Плоская сетка со стеной, пара объектов, аватар идёт к рычагу.
//! Речь — в консоль, cue — в лог.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use wayfinder::navigation::registry::SHIP;
use wayfinder::{
    create_headless_app, AudioOutput, Avatar, BoxRooms, ConsoleSpeech, GridNavMesh, HeadlessLocomotionPlugin,
    LoggedAudio, NavAction, NavConfig, NavEvent, Pathfinder, PathfinderState, RoomIndex, RoomInfo, SceneGraph,
    SceneObject, SharedNavMesh, SimulatedLocomotion, SpeechOutput, StaticScene, TargetRegistry, TargetResolution,
    WayfinderPlugin, WorldContext,
};

fn main() {
    let seed = 42;
    println!("Starting Wayfinder headless run (seed: {})", seed);

    let config = match std::env::args().nth(1) {
        Some(path) => match NavConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Config {} rejected ({}), using defaults", path, err);
                NavConfig::default()
            }
        },
        None => NavConfig::default(),
    };

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)));

    // Стена поперёк пути, проход с краю
    let mut mesh = GridNavMesh::new(Vec3::new(-20.0, 0.0, -20.0), 40, 40, 1.0);
    mesh.block_rect((25, 5), (26, 34));
    app.insert_resource(SharedNavMesh::new(mesh));

    let scene = StaticScene::new(vec![
        SceneObject::new(1, "StartGameLever", Vec3::new(14.5, 0.0, 0.5)),
        SceneObject::new(2, "FlashlightItem(Clone)", Vec3::new(-3.0, 0.0, 4.0)).as_item("Flashlight"),
        SceneObject::new(3, "FlashlightItem(Clone)", Vec3::new(-6.0, 0.0, -2.0)).as_item("Flashlight"),
    ]);
    app.insert_resource(SceneGraph::new(scene));

    let mut registry = TargetRegistry::with_default_catalog();
    if let Err(err) = registry.register(
        "Lever",
        "Lever",
        SHIP,
        TargetResolution::Fixed(Vec3::new(14.5, 0.0, 0.5)),
    ) {
        eprintln!("register: {}", err);
    }
    app.insert_resource(registry)
        .insert_resource(config)
        .insert_resource(WorldContext::landed_at("41 Experimentation"))
        .insert_resource(RoomIndex::new(BoxRooms {
            rooms: vec![(
                Vec3::new(-20.0, -5.0, -20.0),
                Vec3::new(20.0, 5.0, 20.0),
                RoomInfo {
                    name: "Hangar".to_string(),
                    on_main_path: true,
                },
            )],
        }))
        .insert_resource(SpeechOutput(Box::new(ConsoleSpeech)))
        .insert_resource(AudioOutput(Box::new(LoggedAudio)))
        .add_plugins((WayfinderPlugin, HeadlessLocomotionPlugin));

    app.world_mut()
        .spawn((Avatar::default(), SimulatedLocomotion { jitter: 0.02 }));

    app.update();
    app.world_mut().send_event(NavAction::AnnounceRoom);
    app.world_mut().send_event(NavAction::Navigate { key: "Lever".to_string() });

    for tick in 0..2000 {
        app.update();

        let mut query = app.world_mut().query::<(&Transform, &Pathfinder)>();
        let states: Vec<(Vec3, PathfinderState)> = query
            .iter(app.world())
            .map(|(transform, pathfinder)| (transform.translation, pathfinder.state()))
            .collect();
        if tick % 100 == 0 {
            for (position, state) in &states {
                println!("Tick {}: {:?} at {:.1?}", tick, state, position);
            }
        }

        let events = app.world().resource::<Events<NavEvent>>();
        let arrived = events
            .iter_current_update_events()
            .any(|event| matches!(event, NavEvent::Arrived { .. }));
        if arrived {
            println!("Arrived after {} ticks", tick);
            break;
        }
    }

    println!("Run complete!");
}
