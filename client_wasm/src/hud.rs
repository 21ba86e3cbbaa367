//! Score labels and prompts shown over the board

use game_core::{Score, Side};

pub const JOIN_PROMPT: &str = "Please join a room...";
pub const WAITING_PROMPT: &str = "Waiting for opponent...";
pub const ADD_AI_PROMPT: &str = "Click to add a robot opponent!";
pub const OPPONENT_LEFT_PROMPT: &str = "Opponent left. Waiting for them to return...";
pub const ROBOT_PREFIX: &str = "Robot: ";

/// Escape a remotely supplied string before it reaches the page
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Display names known for each side (untrusted)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opponents {
    pub left: Option<String>,
    pub right: Option<String>,
}

impl Opponents {
    pub fn get(&self, side: Side) -> Option<&str> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    pub fn set(&mut self, side: Side, name: Option<String>) {
        match side {
            Side::Left => self.left = name,
            Side::Right => self.right = name,
        }
    }
}

/// Label for one side's score.
///
/// `"You: 3"` for the local side, `"<name>: 3"` for a named opponent, and a
/// `"Robot: "` prefix in front of whatever the AI side would show.
pub fn score_label(
    side: Side,
    score: &Score,
    local: Side,
    opponents: &Opponents,
    robot: Option<Side>,
) -> String {
    let points = score.get(side);
    let mut label = if side == local {
        format!("You: {points}")
    } else {
        match opponents.get(side) {
            Some(name) => format!("{}: {points}", sanitize(name)),
            None => points.to_string(),
        }
    };
    if robot == Some(side) {
        label.insert_str(0, ROBOT_PREFIX);
    }
    label
}
