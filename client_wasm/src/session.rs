//! One seat in one room, from invite acceptance until the player leaves.
//!
//! The session owns everything that used to be page-global: room and user
//! names, the robot flag, the score and the board. Role-specific behaviour
//! lives behind [`Role`], picked once when the invite is accepted.

use game_core::{
    launch_ball, park_ball, set_controller, spawn_board, step, Ball, BallMode, Config, Controller,
    Events, GameRng, KeyState, Score, Side, Time,
};
use hecs::World;
use proto::{C2S, S2C};
use serde::Serialize;

use crate::error::ClientError;
use crate::fsm::{RoundAction, RoundFsm, RoundState};
use crate::hud::{self, Opponents};
use crate::role::{role_for, Role};
use crate::sync::PositionSync;

/// What the invite handler hands over when a seat is accepted
#[derive(Debug, Clone)]
pub struct Invite {
    pub roomname: String,
    pub username: String,
    pub side: Side,
    pub is_host: bool,
    /// Players already known to sit in the room
    pub opponents: Opponents,
}

/// Things the page may want to react to (sound, shake, banners)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    RoundStarted,
    PaddleHit { side: Side },
    PointScored { side: Side },
    ScoreChanged { left: u8, right: u8 },
    MatchEnded { winner: Side },
    OpponentJoined { side: Side },
    OpponentLeft { side: Side },
    SeatRejected { side: Side },
}

/// Mutable match state shared by both roles
pub struct MatchContext {
    pub config: Config,
    pub roomname: String,
    pub username: String,
    pub side: Side,
    pub opponents: Opponents,
    /// Side driven by the robot, if the host added one
    pub robot: Option<Side>,
    pub score: Score,
    pub fsm: RoundFsm,
    pub world: World,
    pub time: Time,
    pub rng: GameRng,
    pub events: Events,
    pub sync: PositionSync,
    outbox: Vec<C2S>,
    notices: Vec<SessionEvent>,
}

impl MatchContext {
    pub fn send(&mut self, msg: C2S) {
        self.outbox.push(msg);
    }

    pub fn notify(&mut self, event: SessionEvent) {
        self.notices.push(event);
    }

    /// Apply a round transition, turning a rejected one into an error
    pub fn transition(&mut self, action: RoundAction) -> Result<RoundState, ClientError> {
        let result = self.fsm.transition(action);
        if result.success() {
            Ok(result.to_state())
        } else {
            Err(ClientError::InvalidTransition {
                action: format!("{:?}", result.action()),
                state: format!("{:?}", result.from_state()),
            })
        }
    }

    /// Serve a new ball from the centre (host physics only)
    pub fn launch(&mut self) {
        launch_ball(&mut self.world, &self.config, &mut self.rng);
    }

    pub fn park_ball(&mut self) {
        park_ball(&mut self.world, &self.config);
    }

    pub fn notify_score(&mut self) {
        let (left, right) = (self.score.left, self.score.right);
        self.notify(SessionEvent::ScoreChanged { left, right });
    }
}

pub struct Session {
    role: Box<dyn Role>,
    ctx: MatchContext,
}

impl Session {
    /// Take the seat described by `invite` and announce it to the room
    pub fn accept_invite(config: Config, invite: Invite, seed: u64) -> Result<Self, ClientError> {
        config.validate()?;

        let mut world = World::new();
        spawn_board(&mut world, &config, invite.side);

        let role = role_for(invite.is_host);
        let mut ctx = MatchContext {
            config,
            roomname: invite.roomname,
            username: invite.username,
            side: invite.side,
            opponents: invite.opponents,
            robot: None,
            score: Score::new(),
            fsm: RoundFsm::new(),
            world,
            time: Time::default(),
            rng: GameRng::new(seed),
            events: Events::new(),
            sync: PositionSync::new(),
            outbox: Vec::new(),
            notices: Vec::new(),
        };

        ctx.transition(role.seat_action())?;
        ctx.send(C2S::AcceptedInvite {
            username: ctx.username.clone(),
            roomname: ctx.roomname.clone(),
            side: ctx.side,
        });
        tracing::info!(
            room = %ctx.roomname,
            side = %ctx.side,
            host = role.is_host(),
            "seat accepted"
        );

        let mut session = Self { role, ctx };

        // Opponent may already be sitting there
        let other = session.ctx.side.opposite();
        if session.ctx.opponents.get(other).is_some() {
            session.start_round()?;
        }

        Ok(session)
    }

    /// Advance one animation frame
    pub fn tick(&mut self, dt: f32, keys: &KeyState) {
        let ctx = &mut self.ctx;
        let mode = if ctx.fsm.state() == RoundState::InRound {
            self.role.ball_mode()
        } else {
            BallMode::Mirror
        };

        ctx.time.dt = dt;
        step(
            &mut ctx.world,
            &mut ctx.time,
            &ctx.config,
            keys,
            &mut ctx.events,
            mode,
        );

        if let Some(side) = ctx.events.ball_hit_paddle {
            ctx.notify(SessionEvent::PaddleHit { side });
        }

        // Sent while waiting too: the relay treats silent seats as gone
        if ctx.fsm.is_seated() {
            let update = ctx.sync.snapshot(&ctx.roomname, ctx.side, &ctx.world);
            ctx.send(C2S::Position(update));
        }

        if let Some(scorer) = ctx.events.ball_out {
            self.role.on_ball_out(ctx, scorer);
        }
    }

    /// Dispatch a relay message
    pub fn handle(&mut self, msg: S2C) {
        if !self.ctx.fsm.is_seated() {
            tracing::debug!(?msg, "not seated, dropping relay frame");
            return;
        }
        match msg {
            S2C::OpponentJoined { username, side } => self.opponent_joined(side, username),
            S2C::OpponentLeft { side } => self.opponent_left(side),
            S2C::SideTaken { side } => {
                tracing::warn!(%side, room = %self.ctx.roomname, "seat already taken");
                self.ctx.notify(SessionEvent::SeatRejected { side });
            }
            S2C::Position(update) => self.role.apply_position(&mut self.ctx, &update),
            S2C::Score(update) => self.role.apply_score(&mut self.ctx, &update),
        }
    }

    /// A player took the seat on `side`
    pub fn opponent_joined(&mut self, side: Side, username: String) {
        if side == self.ctx.side {
            return;
        }
        tracing::info!(%side, "opponent joined");
        self.ctx.opponents.set(side, Some(username));
        self.ctx.sync.forget(side);
        self.ctx.notify(SessionEvent::OpponentJoined { side });

        if self.ctx.fsm.can_transition(RoundAction::OpponentJoined) {
            if let Err(err) = self.start_round() {
                tracing::warn!(%err, "could not start round");
            }
        }
    }

    /// The player on `side` disconnected: park the ball until they return
    pub fn opponent_left(&mut self, side: Side) {
        if side == self.ctx.side || self.ctx.robot == Some(side) {
            return;
        }
        tracing::info!(%side, "opponent left");
        self.ctx.opponents.set(side, None);
        self.ctx.sync.forget(side);
        if self.ctx.fsm.can_transition(RoundAction::OpponentLeft) {
            self.ctx.fsm.transition(RoundAction::OpponentLeft);
            self.ctx.park_ball();
        }
        self.ctx.notify(SessionEvent::OpponentLeft { side });
    }

    /// Host: put a robot on the empty side and start playing
    pub fn add_ai(&mut self) -> Result<(), ClientError> {
        if !self.role.is_host() {
            return Err(ClientError::NotHost);
        }
        let other = self.ctx.side.opposite();
        if self.ctx.opponents.get(other).is_some() {
            return Err(ClientError::SideOccupied(other));
        }
        self.ctx.transition(RoundAction::AddAi)?;
        self.ctx.robot = Some(other);
        set_controller(&mut self.ctx.world, other, Controller::Ai);
        tracing::info!(side = %other, "robot opponent added");
        self.begin_play();
        Ok(())
    }

    fn start_round(&mut self) -> Result<(), ClientError> {
        self.ctx.transition(RoundAction::OpponentJoined)?;
        self.begin_play();
        Ok(())
    }

    fn begin_play(&mut self) {
        self.ctx.notify(SessionEvent::RoundStarted);
        self.ctx.notify_score();
        if self.role.is_host() {
            self.ctx.launch();
        }
    }

    /// Give up the seat. The session stays around in `Lobby` so the page
    /// can show the join prompt; a new invite replaces it.
    pub fn leave(&mut self) {
        if let Err(err) = self.ctx.transition(RoundAction::Leave) {
            tracing::warn!(%err, "leave rejected");
            return;
        }
        tracing::info!(room = %self.ctx.roomname, "left room");
        if let Some(robot) = self.ctx.robot.take() {
            set_controller(&mut self.ctx.world, robot, Controller::Remote);
        }
        self.ctx.opponents = Opponents::default();
        self.ctx.score.reset();
        self.ctx.park_ball();
        self.ctx.outbox.clear();
    }

    pub fn drain_outbox(&mut self) -> Vec<C2S> {
        std::mem::take(&mut self.ctx.outbox)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.ctx.notices)
    }

    pub fn state(&self) -> RoundState {
        self.ctx.fsm.state()
    }

    pub fn is_host(&self) -> bool {
        self.role.is_host()
    }

    pub fn is_started(&self) -> bool {
        self.ctx.fsm.is_started()
    }

    pub fn is_seated(&self) -> bool {
        self.ctx.fsm.is_seated()
    }

    pub fn side(&self) -> Side {
        self.ctx.side
    }

    pub fn roomname(&self) -> &str {
        &self.ctx.roomname
    }

    pub fn score(&self) -> Score {
        self.ctx.score
    }

    pub fn robot(&self) -> Option<Side> {
        self.ctx.robot
    }

    pub fn ball(&self) -> Option<Ball> {
        game_core::ball_state(&self.ctx.world)
    }

    pub fn paddle_y(&self, side: Side) -> Option<f32> {
        game_core::paddle_y(&self.ctx.world, side)
    }

    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    /// Score label for one side, names escaped
    pub fn score_label(&self, side: Side) -> String {
        hud::score_label(
            side,
            &self.ctx.score,
            self.ctx.side,
            &self.ctx.opponents,
            self.ctx.robot,
        )
    }

    pub fn room_label(&self) -> String {
        format!("Room: {}", hud::sanitize(&self.ctx.roomname))
    }

    /// Prompts to show for the current state
    pub fn prompts(&self) -> Vec<&'static str> {
        match self.ctx.fsm.state() {
            RoundState::Lobby => vec![hud::JOIN_PROMPT],
            RoundState::AwaitingAiChoice => vec![hud::WAITING_PROMPT, hud::ADD_AI_PROMPT],
            RoundState::OpponentLeft => vec![hud::OPPONENT_LEFT_PROMPT],
            _ => Vec::new(),
        }
    }
}
