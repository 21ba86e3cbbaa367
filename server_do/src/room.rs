use game_core::Side;
use js_sys::Date;
use proto::{C2S, S2C};
use std::collections::HashMap;
use worker::*;

/// Peers that send nothing for this long are dropped
pub const IDLE_TIMEOUT_MS: u64 = 60_000;

// Abstract connection for testing
pub trait GameClient {
    fn send_bytes(&self, bytes: &[u8]) -> Result<()>;
    fn disconnect(&self, reason: &str) -> Result<()>;
}

impl GameClient for WebSocket {
    fn send_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.send_with_bytes(bytes)
    }

    fn disconnect(&self, reason: &str) -> Result<()> {
        WebSocket::close(self, Some(CLOSE_POLICY), Some(reason))
    }
}

/// Close code for sockets the room will not serve
pub const CLOSE_POLICY: u16 = 1008;

// Abstract environment (Time, Logging)
pub trait Environment {
    fn now(&self) -> u64; // ms
    fn log(&self, msg: String);
}

pub struct WasmEnv;

impl Environment for WasmEnv {
    fn now(&self) -> u64 {
        Date::now() as u64
    }

    fn log(&self, msg: String) {
        console_log!("{}", msg);
    }
}

/// One seated socket
pub struct Peer {
    /// Tag the socket was accepted with
    pub conn: String,
    pub client: Box<dyn GameClient>,
    pub username: String,
    pub last_activity: u64, // ms
}

/// Outcome of a seat request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Taken(Side),
    Rejected(Side),
}

/// What happened to an incoming frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Relayed(Side),
    Seated(Seat),
    /// Tagged socket without a seat (e.g. from before a restart); closed
    Orphan,
}

/// Relay state for one room: at most one peer per side
pub struct RelayRoom {
    pub env: Box<dyn Environment>,
    pub roomname: Option<String>,
    pub peers: HashMap<Side, Peer>,
}

impl RelayRoom {
    pub fn new(env: Box<dyn Environment>) -> Self {
        Self {
            env,
            roomname: None,
            peers: HashMap::new(),
        }
    }

    /// Seat a new socket on `side`.
    ///
    /// The newcomer hears about everyone already seated; everyone else hears
    /// about the newcomer. An occupied side is answered with `SideTaken`.
    pub fn seat(
        &mut self,
        conn: String,
        client: Box<dyn GameClient>,
        username: String,
        roomname: String,
        side: Side,
    ) -> Seat {
        if self.peers.contains_key(&side) {
            self.env
                .log(format!("Room: {side} already taken, rejecting {username}"));
            send(self.env.as_ref(), client.as_ref(), &S2C::SideTaken { side });
            return Seat::Rejected(side);
        }

        match &self.roomname {
            Some(current) if *current != roomname => {
                // Keep the name the room was opened with
                self.env.log(format!(
                    "Room: {username} asked for {roomname} inside {current}"
                ));
            }
            Some(_) => {}
            None => self.roomname = Some(roomname),
        }

        for (peer_side, peer) in &self.peers {
            send(
                self.env.as_ref(),
                client.as_ref(),
                &S2C::OpponentJoined {
                    username: peer.username.clone(),
                    side: *peer_side,
                },
            );
        }

        self.broadcast_except(
            side,
            &S2C::OpponentJoined {
                username: username.clone(),
                side,
            },
        );

        self.env.log(format!("Room: {username} seated on {side}"));
        let now = self.env.now();
        self.peers.insert(
            side,
            Peer {
                conn,
                client,
                username,
                last_activity: now,
            },
        );
        Seat::Taken(side)
    }

    /// Route a frame from the socket tagged `conn`.
    ///
    /// A seated socket is relayed; an unseated one may only ask for a seat.
    pub fn dispatch(&mut self, conn: String, client: Box<dyn GameClient>, msg: C2S) -> Dispatch {
        if let Some(side) = self.side_of(&conn) {
            self.relay(side, msg);
            return Dispatch::Relayed(side);
        }
        match msg {
            C2S::AcceptedInvite {
                username,
                roomname,
                side,
            } => Dispatch::Seated(self.seat(conn, client, username, roomname, side)),
            _ => {
                self.env
                    .log(format!("Room: frame from unseated socket {conn}, closing"));
                disconnect(self.env.as_ref(), client.as_ref(), "not seated");
                Dispatch::Orphan
            }
        }
    }

    /// Forward a peer payload from `from` to the other side
    pub fn relay(&mut self, from: Side, msg: C2S) {
        let now = self.env.now();
        match self.peers.get_mut(&from) {
            Some(peer) => peer.last_activity = now,
            None => {
                self.env.log(format!("Room: frame from empty seat {from}"));
                return;
            }
        }

        match &msg {
            C2S::AcceptedInvite { .. } => {
                self.env.log(format!("Room: {from} is already seated"));
                return;
            }
            C2S::Position(update) if update.player != from => {
                self.env.log(format!(
                    "Room: {from} sent a position for {}",
                    update.player
                ));
                return;
            }
            C2S::Position(_) | C2S::Score(_) => {}
        }

        self.broadcast_except(from, &msg.forwarded());
    }

    /// Drop the peer on `side` and tell whoever remains
    pub fn remove(&mut self, side: Side) -> bool {
        self.take(side).is_some()
    }

    fn take(&mut self, side: Side) -> Option<Peer> {
        let peer = self.peers.remove(&side)?;
        self.env
            .log(format!("Room: {} left the {side} seat", peer.username));
        self.broadcast_except(side, &S2C::OpponentLeft { side });
        Some(peer)
    }

    /// Remove and close peers idle longer than [`IDLE_TIMEOUT_MS`]; returns
    /// their sides
    pub fn expire_idle(&mut self) -> Vec<Side> {
        let now = self.env.now();
        let idle: Vec<Side> = self
            .peers
            .iter()
            .filter(|(_, peer)| now.saturating_sub(peer.last_activity) > IDLE_TIMEOUT_MS)
            .map(|(side, _)| *side)
            .collect();

        for side in &idle {
            self.env.log(format!("Room: {side} idle, disconnecting"));
            if let Some(peer) = self.take(*side) {
                disconnect(self.env.as_ref(), peer.client.as_ref(), "idle");
            }
        }
        idle
    }

    /// Seat held by the socket tagged `conn`
    pub fn side_of(&self, conn: &str) -> Option<Side> {
        self.peers
            .iter()
            .find(|(_, peer)| peer.conn == conn)
            .map(|(side, _)| *side)
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    fn broadcast_except(&self, skip: Side, msg: &S2C) {
        for (side, peer) in &self.peers {
            if *side != skip {
                send(self.env.as_ref(), peer.client.as_ref(), msg);
            }
        }
    }
}

fn send(env: &dyn Environment, client: &dyn GameClient, msg: &S2C) {
    match msg.to_bytes() {
        Ok(bytes) => {
            if let Err(e) = client.send_bytes(&bytes) {
                env.log(format!("Room: send failed: {e:?}"));
            }
        }
        Err(e) => env.log(format!("Room: failed to encode {msg:?}: {e}")),
    }
}

fn disconnect(env: &dyn Environment, client: &dyn GameClient, reason: &str) {
    if let Err(e) = client.disconnect(reason) {
        env.log(format!("Room: close failed: {e:?}"));
    }
}

/// Socket tag that stays unique across restarts of the room object
pub fn conn_tag(now_ms: u64, nonce: u32) -> String {
    format!("conn-{now_ms:x}-{nonce:08x}")
}
