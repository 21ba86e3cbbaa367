use game_core::{ConfigError, Side};
use proto::ProtoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Proto(#[from] ProtoError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("not seated in a room")]
    NotInRoom,

    #[error("already seated in room {0}")]
    AlreadyInRoom(String),

    #[error("only the host can add a robot opponent")]
    NotHost,

    #[error("the {0} side already has a player")]
    SideOccupied(Side),

    #[error("invalid {action} while {state}")]
    InvalidTransition { action: String, state: String },
}
