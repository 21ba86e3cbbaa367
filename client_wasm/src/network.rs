//! Network message handling

use proto::{C2S, S2C};

use crate::error::ClientError;
use crate::session::Session;

/// Decode an incoming relay frame and hand it to the session.
///
/// Malformed frames are logged and dropped; the session is untouched.
pub fn handle_bytes(session: &mut Session, bytes: &[u8]) {
    match S2C::from_bytes(bytes) {
        Ok(msg) => session.handle(msg),
        Err(err) => tracing::warn!(%err, len = bytes.len(), "dropping malformed frame"),
    }
}

/// Encode everything the session queued since the last call
pub fn drain_frames(session: &mut Session) -> Vec<Vec<u8>> {
    session
        .drain_outbox()
        .iter()
        .filter_map(|msg| encode(msg).ok())
        .collect()
}

fn encode(msg: &C2S) -> Result<Vec<u8>, ClientError> {
    msg.to_bytes().map_err(|err| {
        tracing::error!(%err, "failed to encode outgoing message");
        err.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::Opponents;
    use crate::session::Invite;
    use crate::fsm::RoundState;
    use game_core::{Config, Side};

    fn host() -> Session {
        let invite = Invite {
            roomname: "den".to_string(),
            username: "ada".to_string(),
            side: Side::Left,
            is_host: true,
            opponents: Opponents::default(),
        };
        Session::accept_invite(Config::new(), invite, 3).unwrap()
    }

    #[test]
    fn test_garbage_is_dropped() {
        let mut session = host();
        handle_bytes(&mut session, &[0xff, 0xff, 0xff]);
        assert_eq!(session.state(), RoundState::AwaitingAiChoice);
    }

    #[test]
    fn test_join_frame_starts_round() {
        let mut session = host();
        let frame = S2C::OpponentJoined {
            username: "bob".to_string(),
            side: Side::Right,
        }
        .to_bytes()
        .unwrap();
        handle_bytes(&mut session, &frame);
        assert_eq!(session.state(), RoundState::InRound);
    }

    #[test]
    fn test_drain_frames_decodes_back() {
        let mut session = host();
        let frames = drain_frames(&mut session);
        assert_eq!(frames.len(), 1);
        let msg = C2S::from_bytes(&frames[0]).unwrap();
        assert!(matches!(msg, C2S::AcceptedInvite { side: Side::Left, .. }));
        assert!(drain_frames(&mut session).is_empty());
    }
}
