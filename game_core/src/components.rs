use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which paddle a client controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who drives a paddle's velocity on this client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Controller {
    #[default]
    Human,
    Ai,
    /// Mirrored from the peer's position broadcasts
    Remote,
}

/// Paddle component
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: Side,
    pub y: f32,  // vertical centre, clamped to the world
    pub vy: f32, // px per second, negative = up
}

impl Paddle {
    pub fn new(side: Side, y: f32) -> Self {
        Self { side, y, vy: 0.0 }
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Put the ball back on `center` and serve it in a random direction
    pub fn serve(&mut self, center: Vec2, speed: f32, rng: &mut crate::GameRng) {
        self.pos = center;
        self.vel = crate::systems::velocity_from_rotation(crate::systems::launch_angle(rng), speed);
    }

    /// Park the ball on `center` without velocity
    pub fn park(&mut self, center: Vec2) {
        self.pos = center;
        self.vel = Vec2::ZERO;
    }
}

/// Per-paddle commitment windows for the AI.
///
/// Wanting a direction keeps that direction committed until the stored
/// deadline; the opposite direction may only take over once it has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AiDwell {
    pub up_until: f32,
    pub down_until: f32,
}

impl AiDwell {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
        let side: Side = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(side, Side::Right);
    }

    #[test]
    fn test_serve_resets_to_center_at_constant_speed() {
        let mut rng = crate::GameRng::new(7);
        let mut ball = Ball::new(Vec2::new(-5.0, 42.0), Vec2::new(-1.0, 0.0));
        let center = Vec2::new(400.0, 300.0);
        ball.serve(center, 400.0, &mut rng);
        assert_eq!(ball.pos, center);
        assert!((ball.vel.length() - 400.0).abs() < 1e-3);
    }
}
