//! Browser client for two-seat online Pong
//!
//! The board simulation comes from `game_core`; this crate adds the round
//! lifecycle, the host/guest split and position sync over the relay. The
//! wasm bindings in `web` are the only browser-specific part.

pub mod error;
pub mod fsm;
pub mod hud;
pub mod input;
pub mod network;
pub mod role;
pub mod session;
pub mod sync;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::ClientError;
pub use fsm::{RoundAction, RoundFsm, RoundState};
pub use session::{Invite, Session, SessionEvent};
