pub mod room;


use js_sys::Date;
use proto::C2S;
use room::{conn_tag, Dispatch, RelayRoom, Seat, WasmEnv};
use std::cell::RefCell;
use std::time::Duration;
use worker::*;

/// How often the idle sweep runs while anyone is seated
const SWEEP_INTERVAL: Duration = Duration::from_secs(15);

#[durable_object]
pub struct RelayDO {
    state: State,
    #[allow(dead_code)]
    env: Env,
    room: RefCell<RelayRoom>,
}

impl DurableObject for RelayDO {
    fn new(state: State, env: Env) -> Self {
        Self {
            state,
            env,
            room: RefCell::new(RelayRoom::new(Box::new(WasmEnv))),
        }
    }

    async fn fetch(&self, req: Request) -> Result<Response> {
        let upgrade_header = req.headers().get("Upgrade");

        match upgrade_header {
            Ok(Some(header)) if header.to_lowercase() == "websocket" => {
                let pair = match WebSocketPair::new() {
                    Ok(pair) => pair,
                    Err(err) => {
                        console_error!("DO: Failed to create WebSocket pair: {:?}", err);
                        return Response::error("Failed to create WebSocket pair", 500);
                    }
                };

                let server = pair.server;
                let client = pair.client;

                // Sockets are told apart by tag; the seat is bound on AcceptedInvite
                let conn = new_conn_tag();
                self.state.accept_websocket_with_tags(&server, &[conn.as_str()]);
                console_log!("DO: WebSocket accepted as {}", conn);

                match Response::from_websocket(client) {
                    Ok(resp) => Ok(resp),
                    Err(err) => {
                        console_error!("DO: Failed to create WebSocket response: {:?}", err);
                        Response::error("Failed to create WebSocket response", 500)
                    }
                }
            }
            Ok(header_opt) => {
                console_error!("DO: Unexpected Upgrade header state: {:?}", header_opt);
                Response::error("Expected WebSocket upgrade request", 426)
            }
            Err(err) => {
                console_error!("DO: Failed to read Upgrade header: {:?}", err);
                Response::error("Failed to read request headers", 500)
            }
        }
    }

    async fn websocket_message(
        &self,
        ws: WebSocket,
        message: durable::WebSocketIncomingMessage,
    ) -> Result<()> {
        match message {
            durable::WebSocketIncomingMessage::String(_text) => {
                // Ignore text messages
            }
            durable::WebSocketIncomingMessage::Binary(bytes) => match C2S::from_bytes(&bytes) {
                Ok(msg) => self.handle_c2s_message(ws, msg).await?,
                Err(e) => {
                    console_error!("DO: Failed to parse C2S message: {e:?}");
                }
            },
        }
        Ok(())
    }

    async fn websocket_close(
        &self,
        ws: WebSocket,
        code: usize,
        reason: String,
        _was_clean: bool,
    ) -> Result<()> {
        console_log!("DO: WebSocket close event (code: {}, reason: {})", code, reason);

        let Some(conn) = self.conn_of(&ws) else {
            return Ok(());
        };
        let mut room = self.room.borrow_mut();
        if let Some(side) = room.side_of(&conn) {
            room.remove(side);
        }
        Ok(())
    }

    async fn websocket_error(&self, _ws: WebSocket, error: Error) -> Result<()> {
        console_error!("DO: WebSocket error: {:?}", error);
        Ok(())
    }

    #[allow(clippy::await_holding_refcell_ref)] // We drop the RefCell borrow before await
    async fn alarm(&self) -> Result<Response> {
        let mut room = self.room.borrow_mut();
        room.expire_idle();
        let empty = room.is_empty();
        drop(room);

        if empty {
            return Response::ok("Room empty, stopping idle sweep");
        }

        self.state.storage().set_alarm(SWEEP_INTERVAL).await?;
        Response::ok("Idle sweep done")
    }
}

/// Tags outlive this object when it is evicted, so they must not repeat
fn new_conn_tag() -> String {
    let mut nonce = [0u8; 4];
    if let Err(err) = getrandom::getrandom(&mut nonce) {
        console_error!("DO: no entropy for socket tag: {:?}", err);
    }
    conn_tag(Date::now() as u64, u32::from_le_bytes(nonce))
}

impl RelayDO {
    fn conn_of(&self, ws: &WebSocket) -> Option<String> {
        self.state.get_tags(ws).into_iter().next()
    }

    /// Handle incoming C2S message
    async fn handle_c2s_message(&self, ws: WebSocket, msg: C2S) -> Result<()> {
        let Some(conn) = self.conn_of(&ws) else {
            console_error!("DO: Message from untagged socket");
            return Ok(());
        };

        let start_sweep = {
            let mut room = self.room.borrow_mut();
            let was_empty = room.is_empty();
            let outcome = room.dispatch(conn, Box::new(ws), msg);
            was_empty && matches!(outcome, Dispatch::Seated(Seat::Taken(_)))
        };

        if start_sweep {
            self.state.storage().set_alarm(SWEEP_INTERVAL).await?;
        }

        Ok(())
    }
}
