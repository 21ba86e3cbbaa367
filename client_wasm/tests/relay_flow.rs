//! Host and guest sessions talking through an in-memory relay

use client_wasm::hud::Opponents;
use client_wasm::{Invite, RoundState, Session, SessionEvent};
use game_core::{Config, KeyState, Score, Side};
use proto::{C2S, S2C};

/// Deliver everything each side queued to the other, through the wire codec
fn pump(host: &mut Session, guest: &mut Session) {
    for _ in 0..4 {
        let to_guest: Vec<S2C> = host.drain_outbox().into_iter().map(wire).collect();
        let to_host: Vec<S2C> = guest.drain_outbox().into_iter().map(wire).collect();
        if to_guest.is_empty() && to_host.is_empty() {
            break;
        }
        to_guest.into_iter().for_each(|msg| guest.handle(msg));
        to_host.into_iter().for_each(|msg| host.handle(msg));
    }
}

fn wire(msg: C2S) -> S2C {
    let bytes = msg.to_bytes().unwrap();
    C2S::from_bytes(&bytes).unwrap().forwarded()
}

fn seat(side: Side, is_host: bool, name: &str) -> Session {
    let invite = Invite {
        roomname: "den".to_string(),
        username: name.to_string(),
        side,
        is_host,
        opponents: Opponents::default(),
    };
    Session::accept_invite(Config::new(), invite, 11).unwrap()
}

#[test]
fn test_join_starts_both_sides() {
    let mut host = seat(Side::Left, true, "ada");
    let mut guest = seat(Side::Right, false, "bob");
    assert_eq!(guest.state(), RoundState::WaitingForOpponent);

    pump(&mut host, &mut guest);

    assert_eq!(host.state(), RoundState::InRound);
    assert_eq!(guest.state(), RoundState::InRound);
    assert_eq!(host.score_label(Side::Right), "bob: 0");
    assert_eq!(guest.score_label(Side::Left), "ada: 0");
}

#[test]
fn test_guest_ball_follows_host() {
    let mut host = seat(Side::Left, true, "ada");
    let mut guest = seat(Side::Right, false, "bob");
    pump(&mut host, &mut guest);

    let keys = KeyState::new();
    for _ in 0..10 {
        host.tick(1.0 / 60.0, &keys);
        guest.tick(1.0 / 60.0, &keys);
        pump(&mut host, &mut guest);
    }

    let host_ball = host.ball().unwrap().pos;
    let guest_ball = guest.ball().unwrap().pos;
    assert_eq!(host_ball, guest_ball);
    assert_ne!(host_ball, Config::new().center());
}

#[test]
fn test_guest_paddle_reaches_host() {
    let mut host = seat(Side::Left, true, "ada");
    let mut guest = seat(Side::Right, false, "bob");
    pump(&mut host, &mut guest);

    let keys = KeyState {
        right_down: true,
        ..KeyState::new()
    };
    for _ in 0..6 {
        guest.tick(1.0 / 60.0, &keys);
    }
    pump(&mut host, &mut guest);

    let moved = guest.paddle_y(Side::Right).unwrap();
    assert!(moved > Config::new().center().y);
    assert_eq!(host.paddle_y(Side::Right), Some(moved));
}

#[test]
fn test_guest_sees_host_score() {
    let mut host = seat(Side::Left, true, "ada");
    let mut guest = seat(Side::Right, false, "bob");
    pump(&mut host, &mut guest);
    guest.drain_events();

    // Both paddles parked at the top so the serve is missed quickly
    let host_keys = KeyState {
        left_up: true,
        ..KeyState::new()
    };
    let guest_keys = KeyState {
        right_up: true,
        ..KeyState::new()
    };
    for _ in 0..1200 {
        host.tick(1.0 / 60.0, &host_keys);
        guest.tick(1.0 / 60.0, &guest_keys);
        pump(&mut host, &mut guest);
        if host.score() != Score::new() {
            break;
        }
    }

    assert_ne!(host.score(), Score::new());
    assert_eq!(guest.score(), host.score());
    assert!(guest
        .drain_events()
        .iter()
        .any(|e| matches!(e, SessionEvent::ScoreChanged { .. })));
}

#[test]
fn test_host_leaving_pauses_guest() {
    let mut host = seat(Side::Left, true, "ada");
    let mut guest = seat(Side::Right, false, "bob");
    pump(&mut host, &mut guest);

    guest.handle(S2C::OpponentLeft { side: Side::Left });

    assert_eq!(guest.state(), RoundState::OpponentLeft);
    assert_eq!(guest.score_label(Side::Left), "0");
}
