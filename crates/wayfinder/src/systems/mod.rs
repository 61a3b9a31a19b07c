//! ECS обвязка навигации.
//!
//! Порядок выполнения (Update, chain):
//! 1. apply_config_system: NavConfig → Pathfinder / ProximityMonitor / SpeechPipeline
//! 2. scene_lifecycle_system: destroy/reset события сцены
//! 3. handle_nav_actions_system: действия пользователя
//! 4. issue_route_queries_system: timeout + новые route queries (inline или background)
//! 5. poll_route_queries_system: готовые background результаты
//! 6. drive_locomotion_system: steering по waypoint'ам, arrival
//! 7. monitor_proximity_system: "дошли до наблюдаемой цели"
//! 8. aim_cue_system, north_beacon_system: orientation cues
//! 9. category_visibility_system: анонс появления/скрытия категорий
//! 10. nearby_scan_system: throttled скан Items / Unlabeled
//! 11. dispatch_speech_system, dispatch_audio_system: вывод в sinks

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::avatar::NavEvent;
use crate::config::NavConfig;
use crate::feedback::audio::{AudioCueRequest, CueKind};
use crate::feedback::speech::SpeechRequest;
use crate::navigation::registry::{ResolvedTarget, TargetRegistry};
use crate::navigation::validator::PathValidator;
use crate::navmesh::SharedNavMesh;
use crate::scene::{InstanceId, SceneGraph, SceneObject, WorldContext};

pub mod actions;
pub mod cues;
pub mod lifecycle;
pub mod locomotion;
pub mod output;
pub mod phrases;
pub mod proximity;
pub mod routing;
pub mod scan;

/// Navigation systems plugin
///
/// Регистрирует все системы в Update одной цепочкой (детерминированный порядок).
pub struct NavigationSystemsPlugin;

impl Plugin for NavigationSystemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                lifecycle::apply_config_system,
                lifecycle::scene_lifecycle_system,
                actions::handle_nav_actions_system,
                routing::issue_route_queries_system,
                routing::poll_route_queries_system,
                locomotion::drive_locomotion_system,
                proximity::monitor_proximity_system,
                cues::aim_cue_system,
                cues::north_beacon_system,
                lifecycle::category_visibility_system,
                scan::nearby_scan_system,
                output::dispatch_speech_system,
                output::dispatch_audio_system,
            )
                .chain(),
        );
    }
}

/// Read-only окружение навигации (один SystemParam вместо шести Res).
#[derive(SystemParam)]
pub struct NavWorld<'w> {
    pub registry: Res<'w, TargetRegistry>,
    pub scene: Res<'w, SceneGraph>,
    pub context: Res<'w, WorldContext>,
    pub config: Res<'w, NavConfig>,
    pub mesh: Res<'w, SharedNavMesh>,
    pub time: Res<'w, Time>,
}

impl NavWorld<'_> {
    pub fn now(&self) -> f32 {
        self.time.elapsed_secs()
    }

    pub fn validator(&self) -> PathValidator {
        PathValidator::new(self.mesh.0.clone())
    }

    pub fn find_object(&self, instance: InstanceId) -> Option<SceneObject> {
        find_object(&self.scene, instance)
    }

    /// Свежая позиция живой цели (None → объект исчез, держим старую).
    pub fn refresh(&self, target: &ResolvedTarget) -> Option<Vec3> {
        let instance = target.object?;
        self.find_object(instance).map(|object| object.position)
    }
}

pub fn find_object(scene: &SceneGraph, instance: InstanceId) -> Option<SceneObject> {
    scene
        .0
        .live_objects()
        .into_iter()
        .find(|object| object.instance == instance)
}

/// Исходящие каналы: речь, spatial cues, navigation events.
#[derive(SystemParam)]
pub struct Feedback<'w> {
    speech: EventWriter<'w, SpeechRequest>,
    audio: EventWriter<'w, AudioCueRequest>,
    events: EventWriter<'w, NavEvent>,
}

impl Feedback<'_> {
    /// Ответ на действие пользователя (мимо rate limiter).
    pub fn say_now(&mut self, text: impl Into<String>) {
        self.speech.write(SpeechRequest::immediate(text));
    }

    pub fn say(&mut self, text: impl Into<String>) {
        self.speech.write(SpeechRequest::new(text));
    }

    pub fn cue(&mut self, kind: CueKind, position: Vec3) {
        self.audio.write(AudioCueRequest::at(kind, position));
    }

    pub fn notify(&mut self, event: NavEvent) {
        self.events.write(event);
    }

    /// Озвучка прибытия + cue в позиции цели (предметы — свой тон).
    pub fn arrival(&mut self, name: &str, position: Vec3, object: Option<&SceneObject>) {
        self.say_now(phrases::reached(name));
        let kind = match object {
            Some(object) if object.is_item() && object.two_handed => CueKind::TwoHandedItem,
            Some(object) if object.is_item() => CueKind::ItemPickup,
            _ => CueKind::ReachedDestination,
        };
        self.cue(kind, position);
    }
}

/// Имя для озвучки прибытия: registry → label предмета → friendly fallback.
pub fn arrival_name(world: &NavWorld, target: &ResolvedTarget) -> (String, Option<SceneObject>) {
    let object = target.object.and_then(|instance| world.find_object(instance));
    let name = match (&target.key, &object) {
        (Some(_), _) | (None, None) => target.display_name.clone(),
        (None, Some(object)) => world.registry.arrival_name_for(object),
    };
    (name, object)
}
