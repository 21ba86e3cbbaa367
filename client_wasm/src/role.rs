//! Host and guest behaviour.
//!
//! The host owns ball physics and scoring and broadcasts the result. The
//! guest mirrors the host's ball and score and only drives its own paddle.

use game_core::{award_point, set_ball_pos, set_paddle_y, BallMode, Score, Side};
use glam::Vec2;
use proto::{PositionUpdate, ScoreUpdate, C2S};

use crate::fsm::RoundAction;
use crate::session::{MatchContext, SessionEvent};

pub trait Role {
    fn is_host(&self) -> bool;

    /// Transition taken when the seat is accepted
    fn seat_action(&self) -> RoundAction;

    /// How the ball is treated while a round is live
    fn ball_mode(&self) -> BallMode;

    /// The ball left the world; `scorer` earned the point
    fn on_ball_out(&self, ctx: &mut MatchContext, scorer: Side);

    fn apply_position(&self, ctx: &mut MatchContext, update: &PositionUpdate);

    fn apply_score(&self, ctx: &mut MatchContext, update: &ScoreUpdate);
}

pub fn role_for(is_host: bool) -> Box<dyn Role> {
    if is_host {
        Box::new(HostRole)
    } else {
        Box::new(GuestRole)
    }
}

/// Filter an incoming position update, logging why it was dropped
fn accepted(ctx: &mut MatchContext, update: &PositionUpdate) -> bool {
    match ctx.sync.accept(update, &ctx.roomname, ctx.side) {
        Ok(()) => true,
        Err(reason) => {
            tracing::trace!(?reason, player = %update.player, "position update dropped");
            false
        }
    }
}

pub struct HostRole;

impl Role for HostRole {
    fn is_host(&self) -> bool {
        true
    }

    fn seat_action(&self) -> RoundAction {
        RoundAction::SeatAsHost
    }

    fn ball_mode(&self) -> BallMode {
        BallMode::Simulate
    }

    fn on_ball_out(&self, ctx: &mut MatchContext, scorer: Side) {
        if let Err(err) = ctx.transition(RoundAction::BallOut) {
            tracing::warn!(%err, "ball out outside a round");
            return;
        }

        let outcome = award_point(&mut ctx.score, scorer, ctx.config.max_score);
        tracing::debug!(%scorer, left = ctx.score.left, right = ctx.score.right, "point");
        ctx.notify(SessionEvent::PointScored { side: scorer });
        ctx.send(C2S::Score(ScoreUpdate {
            roomname: ctx.roomname.clone(),
            left_score: ctx.score.left,
            right_score: ctx.score.right,
            winner: outcome.winner,
        }));
        ctx.notify_score();

        if let Some(winner) = outcome.winner {
            ctx.fsm.transition(RoundAction::MatchWon);
            tracing::info!(%winner, "match won");
            ctx.notify(SessionEvent::MatchEnded { winner });
        }

        ctx.fsm.transition(RoundAction::Relaunch);
        ctx.launch();
    }

    fn apply_position(&self, ctx: &mut MatchContext, update: &PositionUpdate) {
        // The robot's paddle is ours to drive
        if ctx.robot == Some(update.player) {
            return;
        }
        if accepted(ctx, update) {
            set_paddle_y(&mut ctx.world, update.player, update.paddle_y, &ctx.config);
        }
    }

    fn apply_score(&self, _ctx: &mut MatchContext, _update: &ScoreUpdate) {}
}

pub struct GuestRole;

impl Role for GuestRole {
    fn is_host(&self) -> bool {
        false
    }

    fn seat_action(&self) -> RoundAction {
        RoundAction::SeatAsGuest
    }

    fn ball_mode(&self) -> BallMode {
        BallMode::Mirror
    }

    fn on_ball_out(&self, _ctx: &mut MatchContext, _scorer: Side) {}

    fn apply_position(&self, ctx: &mut MatchContext, update: &PositionUpdate) {
        if accepted(ctx, update) {
            set_paddle_y(&mut ctx.world, update.player, update.paddle_y, &ctx.config);
            set_ball_pos(&mut ctx.world, Vec2::new(update.ball_x, update.ball_y));
        }
    }

    fn apply_score(&self, ctx: &mut MatchContext, update: &ScoreUpdate) {
        if update.roomname != ctx.roomname {
            return;
        }
        ctx.score = Score {
            left: update.left_score,
            right: update.right_score,
        };
        ctx.notify_score();
        if let Some(winner) = update.winner {
            ctx.notify(SessionEvent::MatchEnded { winner });
        }
    }
}
