//! Speech pipeline: replacement table → cleanup → rate limit → sink.
//!
//! Сам синтез речи — внешний collaborator (`SpeechSink`), сюда приходит
//! только готовая строка.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};

/// Минимальный интервал между фразами (секунды)
pub const MIN_SPEECH_INTERVAL: f32 = 0.05;

/// Внутренние identifiers → фразы для озвучки.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("EntranceTeleportA(Clone)", "Exit Factory"),
    ("EntranceTeleportB(Clone)", "Exit Fire Escape"),
    ("EntranceTeleportA", "Enter Factory"),
    ("EntranceTeleportB", "Enter Fire Escape"),
    ("PlacementBlocker (5)", "Charging Station"),
    ("TerminalScript", "Terminal"),
    ("StartGameLever", "Start Ship Lever"),
    ("ShipInside", "Inside of Ship"),
    ("StorageCloset", "Storage Closet"),
    ("Bunkbeds", "Bunk Beds"),
    ("LightSwitch", "Light Switch"),
    ("ItemShip", "Item Ship"),
    ("RedButton", "Teleporter Button"),
    ("BellDinger", "Sell Bell"),
    ("ItemCounter", "Item Counter"),
];

const SYMBOL_WORDS: &[(char, &str)] = &[
    ('&', "and"),
    ('@', "at"),
    ('#', "number"),
    ('$', "dollars"),
    ('%', "percent"),
];

/// Запрос озвучки (fire-and-forget).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    /// Мимо rate limiter (ответ на прямое действие пользователя)
    pub immediate: bool,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            immediate: false,
        }
    }

    pub fn immediate(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            immediate: true,
        }
    }
}

pub trait SpeechSink: Send + Sync {
    fn speak(&self, text: &str);
}

#[derive(Resource)]
pub struct SpeechOutput(pub Box<dyn SpeechSink>);

pub struct ConsoleSpeech;

impl SpeechSink for ConsoleSpeech {
    fn speak(&self, text: &str) {
        println!("🔊 {}", text);
    }
}

/// Запоминает всё сказанное (тесты, субтитры).
#[derive(Clone, Default)]
pub struct RecordingSpeech {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeech {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl SpeechSink for RecordingSpeech {
    fn speak(&self, text: &str) {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Заменяет `key` только как отдельный токен (не внутри другого identifier).
fn replace_identifier(text: &str, key: &str, phrase: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in text.match_indices(key) {
        if start < last {
            continue;
        }
        let end = start + key.len();
        let before_ok = text[..start].chars().next_back().is_none_or(|c| !is_identifier_char(c));
        let after_ok = text[end..].chars().next().is_none_or(|c| !is_identifier_char(c));
        if before_ok && after_ok {
            out.push_str(&text[last..start]);
            out.push_str(phrase);
            last = end;
        }
    }
    out.push_str(&text[last..]);
    out
}

pub fn apply_replacements(text: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (key, phrase)| replace_identifier(&acc, key, phrase))
}

pub fn clean_text(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\r' | '\t' => expanded.push(' '),
            _ => match SYMBOL_WORDS.iter().find(|(symbol, _)| *symbol == c) {
                Some((_, word)) => {
                    expanded.push(' ');
                    expanded.push_str(word);
                    expanded.push(' ');
                }
                None => expanded.push(c),
            },
        }
    }

    let mut punctuated = expanded.replace("...", ".");
    for (repeated, single) in [("!!", "!"), ("??", "?")] {
        while punctuated.contains(repeated) {
            punctuated = punctuated.replace(repeated, single);
        }
    }

    punctuated.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Состояние speech dispatch: toggle + rate limiter.
#[derive(Resource, Debug, Clone)]
pub struct SpeechPipeline {
    pub enabled: bool,
    pub min_interval: f32,
    last_spoken_at: Option<f32>,
}

impl Default for SpeechPipeline {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval: MIN_SPEECH_INTERVAL,
            last_spoken_at: None,
        }
    }
}

impl SpeechPipeline {
    /// Готовая к отправке строка или None (выключено / пусто / rate limit).
    pub fn prepare(&mut self, request: &SpeechRequest, now: f32) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let text = clean_text(&apply_replacements(&request.text));
        if text.is_empty() {
            return None;
        }
        if !request.immediate {
            if let Some(last) = self.last_spoken_at {
                if now - last < self.min_interval {
                    crate::logger::log(&format!("speech rate-limited: '{}'", text));
                    return None;
                }
            }
        }
        self.last_spoken_at = Some(now);
        Some(text)
    }
}
