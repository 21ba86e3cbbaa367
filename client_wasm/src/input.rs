//! Keyboard input handling
//!
//! F/V drive the left paddle, J/N the right one. Only the local side's keys
//! have any effect; the other paddle is remote or robot controlled.

use game_core::{KeyState, Side};

/// Which paddle and direction a key maps to
pub fn key_binding(key: &str) -> Option<(Side, i8)> {
    match key {
        "f" | "F" => Some((Side::Left, -1)),
        "v" | "V" => Some((Side::Left, 1)),
        "j" | "J" => Some((Side::Right, -1)),
        "n" | "N" => Some((Side::Right, 1)),
        _ => None,
    }
}

fn slot(keys: &mut KeyState, side: Side, dir: i8) -> &mut bool {
    match (side, dir < 0) {
        (Side::Left, true) => &mut keys.left_up,
        (Side::Left, false) => &mut keys.left_down,
        (Side::Right, true) => &mut keys.right_up,
        (Side::Right, false) => &mut keys.right_down,
    }
}

/// Handle key down event. Returns whether the key was bound.
pub fn handle_key_down(keys: &mut KeyState, key: &str) -> bool {
    match key_binding(key) {
        Some((side, dir)) => {
            *slot(keys, side, dir) = true;
            true
        }
        None => false,
    }
}

/// Handle key up event
pub fn handle_key_up(keys: &mut KeyState, key: &str) -> bool {
    match key_binding(key) {
        Some((side, dir)) => {
            *slot(keys, side, dir) = false;
            true
        }
        None => false,
    }
}
