//! Relay channel protocol for Pong
//!
//! Uses postcard for efficient binary serialization. Peers never talk to each
//! other directly: clients send [`C2S`] to the room relay, which forwards
//! peer payloads and announces joins/leaves as [`S2C`].

use game_core::Side;
use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("codec error: {0}")]
    Codec(#[from] postcard::Error),
}

// ============================================================================
// Peer payloads (relayed verbatim)
// ============================================================================

/// Paddle and ball snapshot sent by every started client each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub roomname: String,
    pub player: Side,
    /// Per-sender counter; receivers drop anything not newer than the last seen
    pub seq: u32,
    pub paddle_y: f32,
    pub ball_x: f32,
    pub ball_y: f32,
}

/// Authoritative score, sent only by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub roomname: String,
    pub left_score: u8,
    pub right_score: u8,
    /// Set on the update that ended a match; the scores are already reset
    pub winner: Option<Side>,
}

// ============================================================================
// C2S Messages (Client to Relay)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum C2S {
    /// Client took its seat after the invite was accepted
    AcceptedInvite {
        username: String,
        roomname: String,
        side: Side,
    },

    Position(PositionUpdate),

    Score(ScoreUpdate),
}

// ============================================================================
// S2C Messages (Relay to Client)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum S2C {
    /// A player sits on `side` (sent for late joiners too)
    OpponentJoined { username: String, side: Side },

    /// The player on `side` closed their connection
    OpponentLeft { side: Side },

    /// The requested side is already occupied in this room
    SideTaken { side: Side },

    Position(PositionUpdate),

    Score(ScoreUpdate),
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl C2S {
    /// Serialize C2S message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(to_allocvec(self)?)
    }

    /// Deserialize C2S message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtoError> {
        Ok(from_bytes(bytes)?)
    }

    /// What the relay forwards to the other side for this message
    pub fn forwarded(self) -> S2C {
        match self {
            C2S::AcceptedInvite { username, side, .. } => S2C::OpponentJoined { username, side },
            C2S::Position(update) => S2C::Position(update),
            C2S::Score(update) => S2C::Score(update),
        }
    }
}

impl S2C {
    /// Serialize S2C message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(to_allocvec(self)?)
    }

    /// Deserialize S2C message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtoError> {
        Ok(from_bytes(bytes)?)
    }
}
