//! Orientation cues: aim alignment и north beacon.

use bevy::prelude::*;

use crate::avatar::{Avatar, Facing, ObservedTarget};
use crate::feedback::audio::AudioCueRequest;
use crate::feedback::orientation::{AimTracker, NorthBeacon};

pub fn aim_cue_system(
    mut avatars: Query<(&Transform, &Facing, &ObservedTarget, &mut AimTracker)>,
    mut cues: EventWriter<AudioCueRequest>,
) {
    for (transform, facing, observed, mut tracker) in avatars.iter_mut() {
        let Some(target) = observed.0.as_ref() else {
            continue;
        };
        if let Some(kind) = tracker.update(facing.0, transform.translation, target.position) {
            cues.write(AudioCueRequest::at(kind, target.position));
        }
    }
}

pub fn north_beacon_system(
    avatars: Query<(&Transform, &Facing), With<Avatar>>,
    mut beacon: ResMut<NorthBeacon>,
    time: Res<Time>,
    mut cues: EventWriter<AudioCueRequest>,
) {
    if !beacon.enabled {
        return;
    }
    let now = time.elapsed_secs();
    // Один beacon на игрока
    let Some((transform, facing)) = avatars.iter().next() else {
        return;
    };
    if let Some(pulse) = beacon.tick(now, transform.translation, facing.0) {
        cues.write(AudioCueRequest::at(pulse.kind, pulse.position));
    }
}
