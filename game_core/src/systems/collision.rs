use std::f32::consts::PI;

use crate::{velocity_from_rotation, Ball, Config, Events, Paddle, Params, Side};
use hecs::World;

/// Which of the paddle's 20 segments the ball struck.
///
/// Measured from the paddle's vertical centre, so the result lies in
/// `-10..=9`: negative above the centre, positive below it.
pub fn hit_segment(ball_y: f32, paddle_y: f32, segment_height: f32) -> i32 {
    let half = i32::from(Params::PADDLE_SEGMENTS / 2);
    let segment = ((ball_y - paddle_y) / segment_height).floor() as i32;
    segment.clamp(-half, half - 1)
}

/// Outgoing direction (radians) for a hit on `segment`, wrapped into (-π, π]
pub fn bounce_angle(side: Side, segment: i32) -> f32 {
    let offset = segment as f32 * Params::SEGMENT_ANGLE;
    match side {
        Side::Left => offset,
        Side::Right => {
            let angle = PI - offset;
            if angle > PI {
                angle - 2.0 * PI
            } else {
                angle
            }
        }
    }
}

/// Check ball collisions with walls and paddles
pub fn check_collisions(world: &mut World, config: &Config, events: &mut Events) {
    // First, collect ball data without holding borrows
    let ball_data = {
        let mut ball_query = world.query::<&Ball>();
        ball_query
            .iter()
            .next()
            .map(|(_e, ball)| (ball.pos, ball.vel))
    };

    let (mut ball_pos, mut ball_vel) = match ball_data {
        Some(data) => data,
        None => return, // No ball in world
    };

    // Top/bottom edges reflect with full restitution; left/right are open
    let half_size = config.ball_size / 2.0;
    if ball_pos.y - half_size <= 0.0 && ball_vel.y < 0.0 {
        ball_vel.y = -ball_vel.y;
        ball_pos.y = half_size;
        events.ball_hit_wall = true;
    } else if ball_pos.y + half_size >= config.height && ball_vel.y > 0.0 {
        ball_vel.y = -ball_vel.y;
        ball_pos.y = config.height - half_size;
        events.ball_hit_wall = true;
    }

    let paddles: Vec<(Side, f32)> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, p)| (p.side, p.y))
        .collect();

    for (side, paddle_y) in paddles {
        let paddle_x = config.paddle_x(side);
        let dx = (ball_pos.x - paddle_x).abs();
        let dy = (ball_pos.y - paddle_y).abs();
        let overlapping = dx < (config.paddle_width + config.ball_size) / 2.0
            && dy < (config.paddle_height + config.ball_size) / 2.0;

        // One deflection per contact: only while heading into the paddle
        let approaching = match side {
            Side::Left => ball_vel.x < 0.0,
            Side::Right => ball_vel.x > 0.0,
        };

        if overlapping && approaching {
            let segment = hit_segment(ball_pos.y, paddle_y, config.segment_height());
            let angle = bounce_angle(side, segment);
            ball_vel = velocity_from_rotation(angle, config.ball_speed);
            events.ball_hit_paddle = Some(side);
            tracing::trace!(%side, segment, angle, "paddle hit");
            break;
        }
    }

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.pos = ball_pos;
        ball.vel = ball_vel;
    }
}
