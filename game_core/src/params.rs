/// Game tuning parameters for Pong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // World (pixels, y grows downwards)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 60.0;
    pub const PADDLE_SPEED: f32 = 500.0; // px per second, digital control
    pub const PADDLE_SEGMENTS: u8 = 20;
    pub const SEGMENT_ANGLE: f32 = 0.1; // radians per segment off centre

    // Ball
    pub const BALL_SIZE: f32 = 16.0;
    pub const BALL_SPEED: f32 = 400.0; // constant magnitude, only direction changes

    // AI
    pub const AI_DEADBAND: f32 = 10.0;
    pub const AI_UP_DWELL: f32 = 0.130; // seconds
    pub const AI_DOWN_DWELL: f32 = 0.150;

    // Score
    pub const MAX_SCORE: u8 = 11;

    // Physics
    pub const FIXED_DT: f32 = 1.0 / 60.0;
    pub const MAX_DT: f32 = 0.1; // Clamp to prevent large jumps
}
