//! Audio cues: процедурные waveforms вместо sampled assets.
//!
//! Каждый `CueKind` детерминированно мапится в `Waveform` (параметры, не байты).
//! Воспроизведение — внешний collaborator (`AudioCueSink`).

use bevy::prelude::*;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    ItemPickup,
    TwoHandedItem,
    ReachedDestination,
    OnTarget,
    AlmostOnTarget,
    OffTarget,
    Completion,
    /// North beacon: север впереди
    NorthAhead,
    /// North beacon: север за спиной
    NorthBehind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    /// Огибающая sin(πt)
    Tone { frequency: f32, duration: f32, volume: f32 },
    DualTone {
        first: f32,
        second: f32,
        tone_duration: f32,
        pause: f32,
        volume: f32,
    },
    /// Линейный sweep частоты, огибающая 4t(1-t)
    Sweep { start: f32, end: f32, duration: f32, volume: f32 },
    /// Короткий щелчок, огибающая exp(-10t)
    Click { frequency: f32, duration: f32, volume: f32 },
}

impl CueKind {
    pub fn waveform(&self) -> Waveform {
        match self {
            CueKind::ItemPickup => Waveform::DualTone {
                first: 544.5,
                second: 647.5,
                tone_duration: 0.1,
                pause: 0.028,
                volume: 0.35,
            },
            CueKind::TwoHandedItem => Waveform::DualTone {
                first: 272.25,
                second: 323.75,
                tone_duration: 0.1,
                pause: 0.028,
                volume: 0.35,
            },
            CueKind::ReachedDestination => Waveform::Click {
                frequency: 2000.0,
                duration: 0.05,
                volume: 0.8,
            },
            CueKind::OnTarget => Waveform::Tone {
                frequency: 880.0,
                duration: 0.15,
                volume: 0.7,
            },
            CueKind::AlmostOnTarget => Waveform::Tone {
                frequency: 660.0,
                duration: 0.15,
                volume: 0.7,
            },
            CueKind::OffTarget => Waveform::Sweep {
                start: 440.0,
                end: 220.0,
                duration: 0.3,
                volume: 0.5,
            },
            CueKind::Completion => Waveform::DualTone {
                first: 660.0,
                second: 785.0,
                tone_duration: 0.15,
                pause: 0.05,
                volume: 0.5,
            },
            CueKind::NorthAhead => Waveform::Tone {
                frequency: 440.0,
                duration: 0.2,
                volume: 0.15,
            },
            CueKind::NorthBehind => Waveform::Tone {
                frequency: 220.0,
                duration: 0.2,
                volume: 0.15,
            },
        }
    }
}

impl Waveform {
    pub fn duration(&self) -> f32 {
        match *self {
            Waveform::Tone { duration, .. }
            | Waveform::Sweep { duration, .. }
            | Waveform::Click { duration, .. } => duration,
            Waveform::DualTone { tone_duration, pause, .. } => tone_duration * 2.0 + pause,
        }
    }

    pub fn volume(&self) -> f32 {
        match *self {
            Waveform::Tone { volume, .. }
            | Waveform::DualTone { volume, .. }
            | Waveform::Sweep { volume, .. }
            | Waveform::Click { volume, .. } => volume,
        }
    }

    /// Mono PCM в [-1, 1].
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate.max(1) as f32;
        match *self {
            Waveform::Tone { frequency, duration, volume } => tone(frequency, duration, volume, rate),
            Waveform::DualTone {
                first,
                second,
                tone_duration,
                pause,
                volume,
            } => {
                let mut samples = tone(first, tone_duration, volume, rate);
                samples.extend(std::iter::repeat_n(0.0, (pause * rate) as usize));
                samples.extend(tone(second, tone_duration, volume, rate));
                samples
            }
            Waveform::Sweep { start, end, duration, volume } => {
                let count = (duration * rate) as usize;
                let mut phase = 0.0_f32;
                (0..count)
                    .map(|i| {
                        let t = i as f32 / count as f32;
                        let frequency = start + (end - start) * t;
                        phase += 2.0 * PI * frequency / rate;
                        volume * 4.0 * t * (1.0 - t) * phase.sin()
                    })
                    .collect()
            }
            Waveform::Click { frequency, duration, volume } => {
                let count = (duration * rate) as usize;
                (0..count)
                    .map(|i| {
                        let t = i as f32 / count as f32;
                        let time = i as f32 / rate;
                        volume * (-10.0 * t).exp() * (2.0 * PI * frequency * time).sin()
                    })
                    .collect()
            }
        }
    }
}

fn tone(frequency: f32, duration: f32, volume: f32, rate: f32) -> Vec<f32> {
    let count = (duration * rate) as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let time = i as f32 / rate;
            volume * (PI * t).sin() * (2.0 * PI * frequency * time).sin()
        })
        .collect()
}

/// Запрос spatial cue (fire-and-forget).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AudioCueRequest {
    pub kind: CueKind,
    pub position: Vec3,
    /// Множитель поверх громкости waveform
    pub volume: f32,
}

impl AudioCueRequest {
    pub fn at(kind: CueKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            volume: 1.0,
        }
    }
}

pub trait AudioCueSink: Send + Sync {
    fn play_cue(&self, kind: CueKind, position: Vec3, volume: f32);
}

#[derive(Resource)]
pub struct AudioOutput(pub Box<dyn AudioCueSink>);

/// Без звука: headless runner просто логирует cue.
pub struct LoggedAudio;

impl AudioCueSink for LoggedAudio {
    fn play_cue(&self, kind: CueKind, position: Vec3, volume: f32) {
        crate::logger::log(&format!("🔔 cue {:?} at {:?} vol {:.2}", kind, position, volume));
    }
}

#[derive(Clone, Default)]
pub struct RecordingAudio {
    played: Arc<Mutex<Vec<(CueKind, Vec3, f32)>>>,
}

impl RecordingAudio {
    pub fn played(&self) -> Vec<(CueKind, Vec3, f32)> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl AudioCueSink for RecordingAudio {
    fn play_cue(&self, kind: CueKind, position: Vec3, volume: f32) {
        if let Ok(mut played) = self.played.lock() {
            played.push((kind, position, volume));
        }
    }
}
