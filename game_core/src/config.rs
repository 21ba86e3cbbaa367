use glam::Vec2;
use serde::Deserialize;

use crate::{ConfigError, Params, Side};

/// Game configuration
///
/// Defaults come from [`Params`]; any field can be overridden from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub ball_size: f32,
    pub ball_speed: f32,
    pub ai_deadband: f32,
    pub ai_up_dwell: f32,
    pub ai_down_dwell: f32,
    pub max_score: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: Params::WORLD_WIDTH,
            height: Params::WORLD_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_speed: Params::PADDLE_SPEED,
            ball_size: Params::BALL_SIZE,
            ball_speed: Params::BALL_SPEED,
            ai_deadband: Params::AI_DEADBAND,
            ai_up_dwell: Params::AI_UP_DWELL,
            ai_down_dwell: Params::AI_DOWN_DWELL,
            max_score: Params::MAX_SCORE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("ball_speed", self.ball_speed),
        ];
        for (field, value) in positive {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let non_negative = [
            ("ai_deadband", self.ai_deadband),
            ("ai_up_dwell", self.ai_up_dwell),
            ("ai_down_dwell", self.ai_down_dwell),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.max_score == 0 {
            return Err(ConfigError::ZeroMaxScore);
        }
        if self.paddle_height >= self.height {
            return Err(ConfigError::PaddleTooTall {
                paddle: self.paddle_height,
                world: self.height,
            });
        }
        Ok(())
    }

    /// Get X position for a paddle
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.width / 60.0,
            Side::Right => self.width / 60.0 * 59.0,
        }
    }

    /// Clamp paddle Y (its centre) to the world
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        let half_height = self.paddle_height / 2.0;
        y.clamp(half_height, self.height - half_height)
    }

    /// Board centre, where paddles start and the ball is served from
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Height of one of the paddle's bounce segments
    pub fn segment_height(&self) -> f32 {
        self.paddle_height / Params::PADDLE_SEGMENTS as f32
    }
}
