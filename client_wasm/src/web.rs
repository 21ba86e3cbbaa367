//! Browser bindings.
//!
//! The page owns the canvas, the WebSocket and the animation loop. It feeds
//! keys, relay frames and frame times in, and reads positions, labels and
//! outgoing frames back out.

use std::collections::VecDeque;

use game_core::{Config, KeyState, Side};
use wasm_bindgen::prelude::*;

use crate::error::ClientError;
use crate::fsm::RoundState;
use crate::hud::{self, Opponents};
use crate::input;
use crate::network;
use crate::session::{Invite, Session, SessionEvent};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, Layer};

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(tracing_web::MakeWebConsoleWriter::new())
        .with_filter(EnvFilter::new("info"));

    // A second instantiation on the same page keeps the first subscriber
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

fn js_err(err: ClientError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_side(side: &str) -> Result<Side, JsValue> {
    match side {
        "left" => Ok(Side::Left),
        "right" => Ok(Side::Right),
        other => Err(JsValue::from_str(&format!("unknown side {other:?}"))),
    }
}

fn random_seed() -> u64 {
    let mut buf = [0u8; 8];
    if let Err(err) = getrandom::getrandom(&mut buf) {
        tracing::warn!(%err, "no entropy, using fixed seed");
    }
    u64::from_le_bytes(buf)
}

#[wasm_bindgen]
pub struct PongClient {
    config: Config,
    keys: KeyState,
    session: Option<Session>,
    outgoing: VecDeque<Vec<u8>>,
    events: VecDeque<SessionEvent>,
}

#[wasm_bindgen]
impl PongClient {
    /// `config_json` may override any subset of the board parameters
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PongClient, JsValue> {
        let config = match config_json {
            Some(json) => Config::from_json(&json).map_err(|e| js_err(e.into()))?,
            None => Config::new(),
        };
        Ok(Self {
            config,
            keys: KeyState::new(),
            session: None,
            outgoing: VecDeque::new(),
            events: VecDeque::new(),
        })
    }

    /// Take a seat in a room. Names are as reported by the lobby.
    pub fn accept_invite(
        &mut self,
        roomname: String,
        username: String,
        side: &str,
        is_host: bool,
        left_name: Option<String>,
        right_name: Option<String>,
    ) -> Result<(), JsValue> {
        if let Some(session) = self.session.as_ref().filter(|s| s.is_seated()) {
            return Err(js_err(ClientError::AlreadyInRoom(
                session.roomname().to_string(),
            )));
        }
        let invite = Invite {
            roomname,
            username,
            side: parse_side(side)?,
            is_host,
            opponents: Opponents {
                left: left_name,
                right: right_name,
            },
        };
        let session =
            Session::accept_invite(self.config.clone(), invite, random_seed()).map_err(js_err)?;
        self.session = Some(session);
        self.flush();
        Ok(())
    }

    /// Give up the seat; the page closes the socket
    pub fn leave(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.leave();
        }
        self.keys = KeyState::new();
        self.outgoing.clear();
        self.events.clear();
    }

    pub fn add_ai(&mut self) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(|| js_err(ClientError::NotInRoom))?;
        session.add_ai().map_err(js_err)?;
        self.flush();
        Ok(())
    }

    /// Returns true when the key is bound, so the page can prevent default
    pub fn key_down(&mut self, key: &str) -> bool {
        self.local_key(key) && input::handle_key_down(&mut self.keys, key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        input::handle_key_up(&mut self.keys, key)
    }

    /// Advance by one animation frame
    pub fn tick(&mut self, dt_ms: f64) {
        if let Some(session) = self.session.as_mut() {
            session.tick((dt_ms / 1000.0) as f32, &self.keys);
        }
        self.flush();
    }

    /// A binary frame from the relay socket
    pub fn handle_message(&mut self, bytes: &[u8]) {
        if let Some(session) = self.session.as_mut() {
            network::handle_bytes(session, bytes);
        }
        self.flush();
    }

    /// Next frame to send on the relay socket
    pub fn next_outgoing(&mut self) -> Option<Vec<u8>> {
        self.outgoing.pop_front()
    }

    /// Next session event as JSON, e.g. `{"type":"paddle_hit","side":"left"}`
    pub fn next_event(&mut self) -> Option<String> {
        let event = self.events.pop_front()?;
        serde_json::to_string(&event).ok()
    }

    pub fn state(&self) -> Option<RoundState> {
        self.session.as_ref().map(|s| s.state())
    }

    pub fn ball_x(&self) -> f32 {
        self.ball().0
    }

    pub fn ball_y(&self) -> f32 {
        self.ball().1
    }

    pub fn paddle_y(&self, side: &str) -> Result<f32, JsValue> {
        let side = parse_side(side)?;
        Ok(self
            .session
            .as_ref()
            .and_then(|s| s.paddle_y(side))
            .unwrap_or(self.config.center().y))
    }

    /// Score label, already HTML-escaped
    pub fn score_label(&self, side: &str) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        Ok(self
            .session
            .as_ref()
            .map(|s| s.score_label(side))
            .unwrap_or_default())
    }

    pub fn room_label(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.room_label())
            .unwrap_or_default()
    }

    /// Prompt lines for the overlay, newline separated
    pub fn prompt(&self) -> String {
        match &self.session {
            Some(session) => session.prompts().join("\n"),
            None => hud::JOIN_PROMPT.to_string(),
        }
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }

    pub fn height(&self) -> f32 {
        self.config.height
    }
}

impl PongClient {
    fn ball(&self) -> (f32, f32) {
        let center = self.config.center();
        self.session
            .as_ref()
            .and_then(|s| s.ball())
            .map(|b| (b.pos.x, b.pos.y))
            .unwrap_or((center.x, center.y))
    }

    /// Keys for the other paddle are ignored
    fn local_key(&self, key: &str) -> bool {
        match (&self.session, input::key_binding(key)) {
            (Some(session), Some((side, _))) => side == session.side(),
            _ => false,
        }
    }

    fn flush(&mut self) {
        if let Some(session) = self.session.as_mut() {
            self.outgoing.extend(network::drain_frames(session));
            self.events.extend(session.drain_events());
        }
    }
}
