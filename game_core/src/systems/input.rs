use hecs::World;

use crate::components::*;
use crate::resources::*;
use crate::Config;

/// Digital paddle control: full speed while a key is held, no ramp
pub fn human_velocity(up: bool, down: bool, speed: f32) -> f32 {
    if up {
        -speed
    } else if down {
        speed
    } else {
        0.0
    }
}

/// "Dumb" AI: chase the ball's y, with a minimum dwell per direction.
///
/// Inside the deadband the paddle stops. Outside it, the wanted direction
/// refreshes its own commit window and is applied only once the opposite
/// direction's window has run out; until then the current velocity is held.
pub fn ai_velocity(
    paddle_y: f32,
    ball_y: f32,
    current_vy: f32,
    dwell: &mut AiDwell,
    now: f32,
    config: &Config,
) -> f32 {
    if (paddle_y - ball_y).abs() < config.ai_deadband {
        return 0.0;
    }

    if paddle_y > ball_y {
        dwell.up_until = now + config.ai_up_dwell;
        if now >= dwell.down_until {
            -config.paddle_speed
        } else {
            current_vy
        }
    } else {
        dwell.down_until = now + config.ai_down_dwell;
        if now >= dwell.up_until {
            config.paddle_speed
        } else {
            current_vy
        }
    }
}

/// Set every locally driven paddle's velocity for this step
pub fn resolve_paddles(world: &mut World, keys: &KeyState, time: &Time, config: &Config) {
    let ball_y = world
        .query::<&Ball>()
        .iter()
        .next()
        .map(|(_e, ball)| ball.pos.y);

    for (_entity, (paddle, controller, dwell)) in
        world.query_mut::<(&mut Paddle, &Controller, &mut AiDwell)>()
    {
        paddle.vy = match controller {
            Controller::Human => {
                let (up, down) = keys.held(paddle.side);
                human_velocity(up, down, config.paddle_speed)
            }
            Controller::Ai => match ball_y {
                Some(ball_y) => ai_velocity(paddle.y, ball_y, paddle.vy, dwell, time.now, config),
                None => 0.0,
            },
            // Position arrives over the wire
            Controller::Remote => 0.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_velocity() {
        assert_eq!(human_velocity(true, false, 500.0), -500.0);
        assert_eq!(human_velocity(false, true, 500.0), 500.0);
        assert_eq!(human_velocity(false, false, 500.0), 0.0);
        // Up wins when both are held
        assert_eq!(human_velocity(true, true, 500.0), -500.0);
    }

    #[test]
    fn test_ai_moves_down_toward_ball_below() {
        let config = Config::new();
        let mut dwell = AiDwell::new();
        // Paddle at 280 sits above a ball at 300 (y grows downwards)
        let vy = ai_velocity(280.0, 300.0, 0.0, &mut dwell, 0.0, &config);
        assert_eq!(vy, 500.0);
    }

    #[test]
    fn test_ai_moves_up_toward_ball_above() {
        let config = Config::new();
        let mut dwell = AiDwell::new();
        let vy = ai_velocity(320.0, 300.0, 0.0, &mut dwell, 0.0, &config);
        assert_eq!(vy, -500.0);
    }

    #[test]
    fn test_ai_stops_inside_deadband() {
        let config = Config::new();
        let mut dwell = AiDwell::new();
        let vy = ai_velocity(305.0, 300.0, 500.0, &mut dwell, 0.0, &config);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn test_ai_holds_direction_for_dwell_window() {
        let config = Config::new();
        let mut dwell = AiDwell::new();

        let vy = ai_velocity(280.0, 300.0, 0.0, &mut dwell, 1.0, &config);
        assert_eq!(vy, 500.0);

        // Ball jumps above the paddle 50 ms later: still committed downwards
        let vy = ai_velocity(330.0, 300.0, vy, &mut dwell, 1.05, &config);
        assert_eq!(vy, 500.0);

        // After the 150 ms down window expires the AI may reverse
        let vy = ai_velocity(330.0, 300.0, vy, &mut dwell, 1.2, &config);
        assert_eq!(vy, -500.0);
    }

    #[test]
    fn test_dwell_is_per_paddle() {
        let config = Config::new();
        let mut left = AiDwell::new();
        let mut right = AiDwell::new();

        // Left commits downwards; right must still be free to go up at once
        ai_velocity(280.0, 300.0, 0.0, &mut left, 2.0, &config);
        let vy = ai_velocity(330.0, 300.0, 0.0, &mut right, 2.0, &config);
        assert_eq!(vy, -500.0);
    }

    #[test]
    fn test_resolve_paddles_by_controller() {
        let config = Config::new();
        let mut world = World::new();
        let human = crate::create_paddle(&mut world, Side::Left, 300.0, Controller::Human);
        let robot = crate::create_paddle(&mut world, Side::Right, 280.0, Controller::Ai);
        crate::create_ball(&mut world, glam::Vec2::new(400.0, 300.0), glam::Vec2::ZERO);

        let keys = KeyState {
            left_up: true,
            ..KeyState::new()
        };
        resolve_paddles(&mut world, &keys, &Time::default(), &config);

        assert_eq!(world.get::<&Paddle>(human).unwrap().vy, -500.0);
        assert_eq!(world.get::<&Paddle>(robot).unwrap().vy, 500.0);
    }

    #[test]
    fn test_remote_paddle_never_moves_locally() {
        let config = Config::new();
        let mut world = World::new();
        let remote = crate::create_paddle(&mut world, Side::Right, 300.0, Controller::Remote);
        let keys = KeyState {
            right_down: true,
            ..KeyState::new()
        };
        resolve_paddles(&mut world, &keys, &Time::default(), &config);
        assert_eq!(world.get::<&Paddle>(remote).unwrap().vy, 0.0);
    }
}
