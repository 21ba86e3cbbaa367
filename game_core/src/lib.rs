pub mod components;
pub mod config;
pub mod error;
pub mod params;
pub mod resources;
pub mod systems;

pub use components::*;
pub use config::*;
pub use error::*;
pub use params::*;
pub use resources::*;
pub use systems::*;

use glam::Vec2;
use hecs::World;

/// Whether this client integrates the ball or only mirrors it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallMode {
    /// Move, bounce and bounds-check the ball locally
    Simulate,
    /// Ball position is written from outside; leave it alone
    Mirror,
}

/// Run the Pong simulation for one frame.
///
/// Stops early once the ball has left the world: `events.ball_out` is set and
/// the round controller decides what happens next.
pub fn step(
    world: &mut World,
    time: &mut Time,
    config: &Config,
    keys: &KeyState,
    events: &mut Events,
    mode: BallMode,
) {
    events.clear();

    // Clamp dt to prevent large jumps
    let clamped_dt = time.dt.min(Params::MAX_DT);

    // Fixed micro-steps for stable physics
    let mut remaining_dt = clamped_dt;
    while remaining_dt > 0.0 {
        let step_dt = remaining_dt.min(Params::FIXED_DT);
        remaining_dt -= step_dt;

        let step_time = Time {
            dt: step_dt,
            now: time.now + (clamped_dt - remaining_dt),
        };

        // 1. Keyboard / AI to paddle velocities
        resolve_paddles(world, keys, &step_time, config);

        // 2. Integrate paddles
        move_paddles(world, &step_time, config);

        if mode == BallMode::Simulate {
            // 3. Move ball
            move_ball(world, &step_time);

            // 4. Walls and paddles
            check_collisions(world, config, events);

            // 5. Left/right exits end the round
            check_bounds(world, config, events);
            if events.ball_out.is_some() {
                break;
            }
        }
    }

    time.now += clamped_dt;
}

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: Side, y: f32, controller: Controller) -> hecs::Entity {
    world.spawn((Paddle::new(side, y), controller, AiDwell::new()))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: Vec2, vel: Vec2) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel),))
}

/// Current ball state, if the world has one
pub fn ball_state(world: &World) -> Option<Ball> {
    world.query::<&Ball>().iter().next().map(|(_e, ball)| *ball)
}

/// Vertical centre of a side's paddle
pub fn paddle_y(world: &World, side: Side) -> Option<f32> {
    world
        .query::<&Paddle>()
        .iter()
        .find(|(_e, p)| p.side == side)
        .map(|(_e, p)| p.y)
}

/// Overwrite a paddle's position (remote sync); velocity is zeroed
pub fn set_paddle_y(world: &mut World, side: Side, y: f32, config: &Config) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.side == side {
            paddle.y = config.clamp_paddle_y(y);
            paddle.vy = 0.0;
        }
    }
}

/// Overwrite the ball position (guest mirroring)
pub fn set_ball_pos(world: &mut World, pos: Vec2) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.pos = pos;
    }
}

/// Stop the ball on the board centre
pub fn park_ball(world: &mut World, config: &Config) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.park(config.center());
    }
}

/// Change who drives a side's paddle
pub fn set_controller(world: &mut World, side: Side, controller: Controller) {
    for (_entity, (paddle, current)) in world.query_mut::<(&Paddle, &mut Controller)>() {
        if paddle.side == side {
            *current = controller;
        }
    }
}

/// Build the standard world: both paddles centred, ball parked on the centre
pub fn spawn_board(world: &mut World, config: &Config, local: Side) {
    let center = config.center();
    for side in Side::BOTH {
        let controller = if side == local {
            Controller::Human
        } else {
            Controller::Remote
        };
        create_paddle(world, side, center.y, controller);
    }
    create_ball(world, center, Vec2::ZERO);
}
