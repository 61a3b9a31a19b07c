//! Directional feedback: compass, speech pipeline, spatial audio cues.

pub mod audio;
pub mod compass;
pub mod orientation;
pub mod speech;


pub use audio::{AudioCueRequest, AudioCueSink, AudioOutput, CueKind, LoggedAudio, RecordingAudio, Waveform};
pub use compass::{compass_direction, snap_turn, SnapTurn};
pub use orientation::{AimTracker, NorthBeacon};
pub use speech::{ConsoleSpeech, RecordingSpeech, SpeechOutput, SpeechPipeline, SpeechRequest, SpeechSink};
