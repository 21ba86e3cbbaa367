//! Position exchange between the two seats
//!
//! Every tick the local seat broadcasts its paddle and its view of the ball.
//! Incoming updates are filtered here; applying them is role specific.

use game_core::{ball_state, paddle_y, Side};
use hecs::World;
use proto::PositionUpdate;

/// Why an incoming update was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    OtherRoom,
    /// Our own broadcast bounced back
    Echo,
    /// Not newer than the last update applied from that side
    Stale { seq: u32, last: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct PositionSync {
    next_seq: u32,
    last_seen: [Option<u32>; 2],
}

fn slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

impl PositionSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build this tick's outgoing update
    pub fn snapshot(&mut self, roomname: &str, local: Side, world: &World) -> PositionUpdate {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        let paddle_y = paddle_y(world, local).unwrap_or_default();
        let (ball_x, ball_y) = ball_state(world)
            .map(|ball| (ball.pos.x, ball.pos.y))
            .unwrap_or_default();

        PositionUpdate {
            roomname: roomname.to_string(),
            player: local,
            seq,
            paddle_y,
            ball_x,
            ball_y,
        }
    }

    /// Decide whether an incoming update should be applied
    pub fn accept(
        &mut self,
        update: &PositionUpdate,
        roomname: &str,
        local: Side,
    ) -> Result<(), Discard> {
        if update.roomname != roomname {
            return Err(Discard::OtherRoom);
        }
        if update.player == local {
            return Err(Discard::Echo);
        }
        let last = &mut self.last_seen[slot(update.player)];
        if let Some(seen) = *last {
            if update.seq <= seen {
                return Err(Discard::Stale {
                    seq: update.seq,
                    last: seen,
                });
            }
        }
        *last = Some(update.seq);
        Ok(())
    }

    /// Forget a side's sequence, e.g. after that player reconnected
    pub fn forget(&mut self, side: Side) {
        self.last_seen[slot(side)] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{spawn_board, Config};

    fn update(player: Side, seq: u32) -> PositionUpdate {
        PositionUpdate {
            roomname: "den".to_string(),
            player,
            seq,
            paddle_y: 100.0,
            ball_x: 10.0,
            ball_y: 20.0,
        }
    }

    #[test]
    fn test_snapshot_counts_up() {
        let config = Config::new();
        let mut world = World::new();
        spawn_board(&mut world, &config, Side::Left);
        let mut sync = PositionSync::new();

        let first = sync.snapshot("den", Side::Left, &world);
        let second = sync.snapshot("den", Side::Left, &world);

        assert_eq!(first.seq + 1, second.seq);
        assert_eq!(first.player, Side::Left);
        assert_eq!(first.paddle_y, 300.0);
        assert_eq!((first.ball_x, first.ball_y), (400.0, 300.0));
    }

    #[test]
    fn test_accepts_newer_updates_from_peer() {
        let mut sync = PositionSync::new();
        assert_eq!(sync.accept(&update(Side::Right, 0), "den", Side::Left), Ok(()));
        assert_eq!(sync.accept(&update(Side::Right, 5), "den", Side::Left), Ok(()));
    }

    #[test]
    fn test_discards_other_room() {
        let mut sync = PositionSync::new();
        let mut msg = update(Side::Right, 1);
        msg.roomname = "elsewhere".to_string();
        assert_eq!(sync.accept(&msg, "den", Side::Left), Err(Discard::OtherRoom));
    }

    #[test]
    fn test_discards_echo() {
        let mut sync = PositionSync::new();
        assert_eq!(
            sync.accept(&update(Side::Left, 1), "den", Side::Left),
            Err(Discard::Echo)
        );
    }

    #[test]
    fn test_discards_stale_and_duplicate() {
        let mut sync = PositionSync::new();
        sync.accept(&update(Side::Right, 7), "den", Side::Left).unwrap();
        assert_eq!(
            sync.accept(&update(Side::Right, 7), "den", Side::Left),
            Err(Discard::Stale { seq: 7, last: 7 })
        );
        assert_eq!(
            sync.accept(&update(Side::Right, 3), "den", Side::Left),
            Err(Discard::Stale { seq: 3, last: 7 })
        );
    }

    #[test]
    fn test_forget_allows_restarted_sequence() {
        let mut sync = PositionSync::new();
        sync.accept(&update(Side::Right, 90), "den", Side::Left).unwrap();
        sync.forget(Side::Right);
        assert_eq!(sync.accept(&update(Side::Right, 0), "den", Side::Left), Ok(()));
    }
}
