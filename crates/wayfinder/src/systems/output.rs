//! Speech / audio dispatch в host sinks.

use bevy::prelude::*;

use crate::config::NavConfig;
use crate::feedback::audio::{AudioCueRequest, AudioOutput};
use crate::feedback::speech::{SpeechOutput, SpeechPipeline, SpeechRequest};

pub fn dispatch_speech_system(
    mut requests: EventReader<SpeechRequest>,
    mut pipeline: ResMut<SpeechPipeline>,
    output: Res<SpeechOutput>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();
    for request in requests.read() {
        if let Some(text) = pipeline.prepare(request, now) {
            output.0.speak(&text);
        }
    }
}

pub fn dispatch_audio_system(
    mut requests: EventReader<AudioCueRequest>,
    output: Res<AudioOutput>,
    config: Res<NavConfig>,
) {
    if !config.enable_audio_cues {
        // Дочитываем, чтобы не проиграть старые cue после включения
        requests.clear();
        return;
    }
    let volume = config.cue_volume();
    for request in requests.read() {
        output.0.play_cue(request.kind, request.position, request.volume * volume);
    }
}
