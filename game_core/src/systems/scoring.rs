use crate::{Ball, Config, Events, Score, Side};
use hecs::World;

/// Side that earns the point for a ball at `x`, if it has left the world.
///
/// The two edges are checked as exclusive branches so a single exit can
/// never award both sides.
pub fn scorer_for(x: f32, width: f32) -> Option<Side> {
    if x <= 0.0 {
        Some(Side::Right)
    } else if x >= width {
        Some(Side::Left)
    } else {
        None
    }
}

/// Check if ball left the arena through the left or right edge
pub fn check_bounds(world: &World, config: &Config, events: &mut Events) {
    for (_entity, ball) in world.query::<&Ball>().iter() {
        if let Some(side) = scorer_for(ball.pos.x, config.width) {
            events.ball_out = Some(side);
        }
    }
}

/// What a single point did to the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointOutcome {
    pub scored_by: Side,
    /// Set when the point reached `max_score`; the score has been reset
    pub winner: Option<Side>,
}

/// Award one point and reset the match when it is won
pub fn award_point(score: &mut Score, side: Side, max_score: u8) -> PointOutcome {
    score.increment(side);
    let winner = score.has_winner(max_score);
    if winner.is_some() {
        score.reset();
    }
    PointOutcome {
        scored_by: side,
        winner,
    }
}
