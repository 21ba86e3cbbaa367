use crate::{Ball, Config, Paddle, Time};
use hecs::World;

/// Integrate paddle velocities, clamped to the world
pub fn move_paddles(world: &mut World, time: &Time, config: &Config) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.vy != 0.0 {
            paddle.y = config.clamp_paddle_y(paddle.y + paddle.vy * time.dt);
        }
    }
}

/// Move ball based on velocity
pub fn move_ball(world: &mut World, time: &Time) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.pos += ball.vel * time.dt;
    }
}
