//! Озвучиваемые фразы навигации.

pub const NOT_LANDED: &str = "The ship has not landed yet. Pathfinding is not allowed.";
pub const NOT_INITIALIZED: &str = "Player not initialized, cannot navigate";
pub const PLAYER_DEAD: &str = "Pathfinding stopped because the player is dead.";
pub const TARGET_NOT_FOUND: &str = "Selected object not found at current location.";
pub const NOT_REACHABLE: &str = "Cannot find a valid path to the target. Please try a different location.";
pub const LOST_PATH: &str = "Failed to recover pathfinding. Stopped.";
pub const QUERY_TIMEOUT: &str = "Path generation is taking too long. Please try again.";
pub const PAUSED: &str = "Pathfinding paused.";
pub const RESUMED: &str = "Resuming pathfinding.";
pub const STOPPED: &str = "Stopped pathfinding";
pub const ROOM_UNAVAILABLE: &str = "Room information not available";
pub const NO_CATEGORIES: &str = "No categories available";

pub fn starting(name: &str) -> String {
    format!("Starting pathfinding to {}", name)
}

pub fn reached(name: &str) -> String {
    format!("Reached {}", name)
}

pub fn room(name: &str, on_main_path: bool) -> String {
    format!(
        "You are in {}, {}",
        name,
        if on_main_path { "main path" } else { "branch" }
    )
}

pub fn category_visibility(category: &str, visible: bool) -> String {
    if visible {
        format!("{} category is now available.", category)
    } else {
        format!("{} category is now hidden.", category)
    }
}

pub fn north_sound(enabled: bool) -> String {
    format!("North Sound {}", if enabled { "enabled" } else { "disabled" })
}

/// "Lever, Northeast, 3.3 meters away"
pub fn looking_at(name: &str, direction: &str, distance: &str) -> String {
    format!("{}, {}, {}", name, direction, distance)
}
