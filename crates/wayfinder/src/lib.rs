//! Wayfinder — assistive navigation layer
//!
//! ECS-слой на Bevy 0.16 поверх внешнего движка:
//! - navigation: каталог целей, PathValidator, identity ledger, Pathfinder, ProximityMonitor
//! - feedback: compass / snap turn, speech pipeline, spatial audio cues
//! - systems: ECS обвязка (Update, одна цепочка)
//!
//! Движок (navmesh, сцена, речь, звук) подключается через traits:
//! NavMeshQuery, SceneQuery, RoomQuery, SpeechSink, AudioCueSink.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod avatar;
pub mod config;
pub mod error;
pub mod feedback;
pub mod logger;
pub mod navigation;
pub mod navmesh;
pub mod scene;
pub mod systems;


// Re-export базовых типов для удобства
pub use avatar::*;
pub use config::NavConfig;
pub use error::{ConfigError, MeshQueryError, NavError, RegistryError};
pub use feedback::{
    AudioCueRequest, AudioOutput, ConsoleSpeech, CueKind, LoggedAudio, NorthBeacon, RecordingAudio,
    RecordingSpeech, SpeechOutput, SpeechPipeline, SpeechRequest,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use navigation::{
    IdentityLedger, MenuCursor, NearbyCatalog, PathValidator, Pathfinder, PathfinderState, ProximityMonitor,
    ResolvedTarget, TargetRegistry, TargetResolution,
};
pub use navmesh::{GridNavMesh, NavMeshQuery, SharedNavMesh};
pub use scene::{BoxRooms, InstanceId, RoomIndex, RoomInfo, SceneGraph, SceneObject, SceneQuery, StaticScene, WorldContext};
pub use systems::NavigationSystemsPlugin;

/// Главный plugin навигации (events + resources + systems)
///
/// Collaborators host вставляет сам: SharedNavMesh, SceneGraph, SpeechOutput, AudioOutput
/// (опционально RoomIndex). Остальные ресурсы создаются по умолчанию, если их нет.
pub struct WayfinderPlugin;

impl Plugin for WayfinderPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NavAction>()
            .add_event::<NavEvent>()
            .add_event::<SceneObjectDestroyed>()
            .add_event::<SceneReset>()
            .add_event::<SpeechRequest>()
            .add_event::<AudioCueRequest>()
            .init_resource::<NavConfig>()
            .init_resource::<WorldContext>()
            .init_resource::<IdentityLedger>()
            .init_resource::<NearbyCatalog>()
            .init_resource::<MenuCursor>()
            .init_resource::<NorthBeacon>()
            .init_resource::<SpeechPipeline>()
            .add_plugins(NavigationSystemsPlugin);

        if !app.world().contains_resource::<TargetRegistry>() {
            app.insert_resource(TargetRegistry::with_default_catalog());
        }
    }
}

/// Headless integrator: двигает Transform аватара по LocomotionIntent.
///
/// Host с собственной физикой этот plugin не добавляет.
pub struct HeadlessLocomotionPlugin;

impl Plugin for HeadlessLocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            systems::locomotion::simulate_locomotion_system.after(systems::locomotion::drive_locomotion_system),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless прогона
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}
