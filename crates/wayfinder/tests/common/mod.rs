//! Общий headless harness для integration тестов.

#![allow(dead_code)]

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use wayfinder::navigation::registry::{CategoryVisibility, ITEMS, SHIP, UNLABELED};
use wayfinder::*;

pub const LEVER: Vec3 = Vec3::new(10.0, 0.0, 0.0);

/// Все NavEvent'ы за прогон (собираются в PostUpdate).
#[derive(Resource, Default)]
pub struct CollectedEvents(pub Vec<NavEvent>);

fn collect_nav_events(mut reader: EventReader<NavEvent>, mut collected: ResMut<CollectedEvents>) {
    collected.0.extend(reader.read().cloned());
}

/// Плоская сетка 40×40 с центром в (0,0,0) и замкнутой комнатой (10..15, 10..15).
pub fn test_mesh() -> GridNavMesh {
    let mut mesh = GridNavMesh::new(Vec3::new(-20.0, 0.0, -20.0), 40, 40, 1.0);
    mesh.block_rect((29, 29), (35, 29))
        .block_rect((29, 35), (35, 35))
        .block_rect((29, 29), (29, 35))
        .block_rect((35, 29), (35, 35));
    mesh
}

pub fn test_registry() -> TargetRegistry {
    let mut registry = TargetRegistry::new();
    registry.define_category(ITEMS, CategoryVisibility::Always);
    registry.define_category(UNLABELED, CategoryVisibility::Always);
    registry
        .register("Lever", "Lever", SHIP, TargetResolution::Fixed(LEVER))
        .expect("valid target");
    registry
}

pub struct Harness {
    pub app: App,
    pub speech: RecordingSpeech,
    pub audio: RecordingAudio,
    pub scene: StaticScene,
    pub avatar: Entity,
}

impl Harness {
    pub fn new(background: bool, objects: Vec<SceneObject>) -> Self {
        Self::with_mesh(background, objects, SharedNavMesh::new(test_mesh()))
    }

    pub fn with_mesh(background: bool, objects: Vec<SceneObject>, mesh: SharedNavMesh) -> Self {
        let mut app = create_headless_app(7);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));

        let speech = RecordingSpeech::default();
        let audio = RecordingAudio::default();
        let scene = StaticScene::new(objects);
        let config = NavConfig {
            route_queries_in_background: background,
            path_query_timeout: 30.0,
            ..NavConfig::default()
        };

        app.insert_resource(mesh)
            .insert_resource(SceneGraph::new(scene.clone()))
            .insert_resource(test_registry())
            .insert_resource(config)
            .insert_resource(WorldContext::landed_at("41 Experimentation"))
            .insert_resource(SpeechOutput(Box::new(speech.clone())))
            .insert_resource(AudioOutput(Box::new(audio.clone())))
            .init_resource::<CollectedEvents>()
            .add_plugins((WayfinderPlugin, HeadlessLocomotionPlugin))
            .add_systems(PostUpdate, collect_nav_events);

        let avatar = app
            .world_mut()
            .spawn((Avatar::default(), SimulatedLocomotion::default()))
            .id();
        app.update();

        Self {
            app,
            speech,
            audio,
            scene,
            avatar,
        }
    }

    pub fn send(&mut self, action: NavAction) {
        self.app.world_mut().send_event(action);
    }

    pub fn step(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.app.update();
        }
    }

    pub fn state(&self) -> PathfinderState {
        self.app
            .world()
            .get::<Pathfinder>(self.avatar)
            .map(|p| p.state())
            .unwrap_or_default()
    }

    pub fn position(&self) -> Vec3 {
        self.app
            .world()
            .get::<Transform>(self.avatar)
            .map(|t| t.translation)
            .unwrap_or_default()
    }

    pub fn set_position(&mut self, position: Vec3) {
        if let Some(mut transform) = self.app.world_mut().get_mut::<Transform>(self.avatar) {
            transform.translation = position;
        }
    }

    pub fn has_route_task(&self) -> bool {
        self.app.world().get::<RouteQueryTask>(self.avatar).is_some()
    }

    pub fn events(&self) -> Vec<NavEvent> {
        self.app.world().resource::<CollectedEvents>().0.clone()
    }

    pub fn count(&self, predicate: impl Fn(&NavEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.speech.spoken()
    }

    pub fn said(&self, text: &str) -> usize {
        self.spoken().iter().filter(|s| s.as_str() == text).count()
    }
}
