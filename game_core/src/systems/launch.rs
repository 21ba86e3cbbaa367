use std::f32::consts::PI;

use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::{Ball, Config, GameRng};

/// Angular range `(min, max)` for a serve, picked by a uniform roll in [0, 1).
///
/// A quarter of serves go steeply into the left-rear arc, a quarter into the
/// mirrored arc below it, the rest within ±60° of straight to the right.
pub fn launch_arc(roll: f32) -> (f32, f32) {
    if roll < 0.25 {
        (2.0 / 3.0 * PI, PI)
    } else if roll > 0.75 {
        (-2.0 / 3.0 * PI, -PI)
    } else {
        (-1.0 / 3.0 * PI, 1.0 / 3.0 * PI)
    }
}

/// Random serve direction in radians
pub fn launch_angle(rng: &mut GameRng) -> f32 {
    let (min, max) = launch_arc(rng.0.gen::<f32>());
    rng.0.gen::<f32>() * (max - min) + min
}

/// Vector of length `speed` pointing along `angle`
pub fn velocity_from_rotation(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Serve every ball from the board centre
pub fn launch_ball(world: &mut World, config: &Config, rng: &mut GameRng) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.serve(config.center(), config.ball_speed, rng);
        tracing::debug!(vx = ball.vel.x, vy = ball.vel.y, "ball launched");
    }
}
