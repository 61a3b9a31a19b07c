//! Человекочитаемые имена объектов: таблица + чистая нормализация.

pub const CLONE_SUFFIX: &str = "(Clone)";

pub const UNKNOWN_OBJECT: &str = "Unknown Object";

/// Ориентиры мира, которые есть в единственном экземпляре.
/// Всегда проходят в candidate set и никогда не нумеруются.
pub const LANDMARKS: &[&str] = &[
    "TerminalScript",
    "StartGameLever",
    "ShipInside",
    "StorageCloset",
    "Bunkbeds",
    "LightSwitch",
    "ItemShip",
    "RedButton",
    "EntranceTeleportA",
    "EntranceTeleportA(Clone)",
    "EntranceTeleportB",
    "EntranceTeleportB(Clone)",
    "BellDinger",
    "ItemCounter",
];

/// Charging station — singleton, но не whitelisted для candidate set.
pub const CHARGING_STATION: &str = "PlacementBlocker (5)";

const FRIENDLY_NAMES: &[(&str, &str)] = &[
    ("EntranceTeleportA", "Factory Entrance"),
    ("EntranceTeleportA(Clone)", "Factory Exit"),
    ("EntranceTeleportB", "Fire Escape Entrance"),
    ("EntranceTeleportB(Clone)", "Fire Escape Exit"),
    ("TerminalScript", "Terminal"),
    ("StartGameLever", "Ship Start Lever"),
    ("ShipInside", "Inside of Ship"),
    ("StorageCloset", "Storage Closet"),
    ("Bunkbeds", "Bunk Beds"),
    ("LightSwitch", "Light Switch"),
    ("ItemShip", "Item Ship"),
    ("RedButton", "Teleporter Button"),
    ("BellDinger", "Sell Bell"),
    ("ItemCounter", "Item Counter"),
    (CHARGING_STATION, "Charging Station"),
];

pub fn is_landmark(identifier: &str) -> bool {
    LANDMARKS.contains(&identifier)
}

pub fn friendly_name(identifier: &str) -> Option<&'static str> {
    FRIENDLY_NAMES
        .iter()
        .find(|(raw, _)| *raw == identifier)
        .map(|(_, friendly)| *friendly)
}

/// Нормализованное base name: без "(Clone)" и без хвостового "Item".
///
/// "FlashlightItem(Clone)" → "Flashlight", "Box (Clone)" → "Box".
pub fn base_name(raw: &str) -> String {
    let stripped = raw.replace(CLONE_SUFFIX, "");
    let trimmed = stripped.trim();
    match trimmed.strip_suffix("Item") {
        Some(rest) if !rest.trim().is_empty() => rest.trim().to_string(),
        _ => trimmed.to_string(),
    }
}

/// Последний fallback: сырой identifier без декоративных суффиксов.
pub fn normalized_label(raw: &str) -> String {
    let mut label = base_name(raw);
    if let Some(rest) = label.strip_suffix("Script") {
        if !rest.trim().is_empty() {
            label = rest.trim().to_string();
        }
    }
    if label.is_empty() {
        let raw = raw.trim();
        if raw.is_empty() {
            UNKNOWN_OBJECT.to_string()
        } else {
            raw.to_string()
        }
    } else {
        label
    }
}

/// friendly table → нормализованный identifier. Никогда не пустая строка.
pub fn spoken_name(identifier: &str) -> String {
    friendly_name(identifier)
        .map(str::to_string)
        .unwrap_or_else(|| normalized_label(identifier))
}
