use worker::*;

// Export the Durable Object from server_do
pub use server_do::RelayDO;

const MAX_ROOMNAME_LEN: usize = 32;

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: worker::Context) -> Result<Response> {
    let router = Router::new();

    router
        .get_async("/", handle_index)
        .get_async("/create", handle_create)
        .get_async("/room/:name", handle_room)
        .run(req, env)
        .await
}

async fn handle_index(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    // Static shell; the wasm package is served next to it
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pong</title>
    <style>
        body { margin: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; background: #1a1a1a; color: #fff; font-family: monospace; }
        #board { position: relative; }
        #canvas { border: 2px solid #444; background: #000; }
        #prompt { position: absolute; top: 45%; width: 100%; text-align: center; white-space: pre-line; cursor: pointer; }
        #scores { display: flex; justify-content: space-between; width: 800px; margin: 8px 0; }
        input, button { padding: 8px 16px; margin: 5px; font-family: monospace; font-size: 14px; }
        button { background: #4a9eff; color: white; border: none; border-radius: 4px; cursor: pointer; }
    </style>
</head>
<body>
    <div id="room"></div>
    <div id="scores"><span id="left"></span><span id="right"></span></div>
    <div id="board">
        <canvas id="canvas" width="800" height="600"></canvas>
        <div id="prompt"></div>
    </div>
    <div>
        <input type="text" id="username" placeholder="Your name" maxlength="24">
        <input type="text" id="roomname" placeholder="Room name" maxlength="32">
        <button onclick="createRoom()">Create room</button>
        <button onclick="joinRoom()">Join room</button>
    </div>
    <div style="font-size: 12px; color: #888;">Left paddle: F/V. Right paddle: J/N.</div>
    <script type="module">
        import init, { PongClient } from './pkg/client_wasm.js';

        await init();
        const client = new PongClient(null);
        const ctx = document.getElementById('canvas').getContext('2d');
        let ws = null;
        let last = performance.now();

        function connect(room, side, isHost) {
            const name = document.getElementById('username').value.trim() || 'anonymous';
            const proto = location.protocol === 'https:' ? 'wss' : 'ws';
            ws = new WebSocket(`${proto}://${location.host}/room/${encodeURIComponent(room)}`);
            ws.binaryType = 'arraybuffer';
            ws.onopen = () => { client.accept_invite(room, name, side, isHost, null, null); };
            ws.onmessage = (e) => client.handle_message(new Uint8Array(e.data));
        }

        window.createRoom = async function() {
            const res = await fetch('/create');
            const { room } = await res.json();
            document.getElementById('roomname').value = room;
            connect(room, 'left', true);
        };

        window.joinRoom = function() {
            const room = document.getElementById('roomname').value.trim();
            if (room) connect(room, 'right', false);
        };

        document.getElementById('prompt').onclick = () => { try { client.add_ai(); } catch (_) {} };
        window.addEventListener('keydown', (e) => { if (client.key_down(e.key)) e.preventDefault(); });
        window.addEventListener('keyup', (e) => client.key_up(e.key));

        function frame(now) {
            client.tick(now - last);
            last = now;
            let out;
            while ((out = client.next_outgoing()) !== undefined) {
                if (ws && ws.readyState === WebSocket.OPEN) ws.send(out);
            }
            let ev;
            while ((ev = client.next_event()) !== undefined) {
                if (JSON.parse(ev).type === 'match_ended') console.log('match ended', ev);
            }
            ctx.fillStyle = '#000';
            ctx.fillRect(0, 0, 800, 600);
            ctx.fillStyle = '#fff';
            ctx.fillRect(client.ball_x() - 8, client.ball_y() - 8, 16, 16);
            ctx.fillRect(800 / 60 - 5, client.paddle_y('left') - 30, 10, 60);
            ctx.fillRect(800 * 59 / 60 - 5, client.paddle_y('right') - 30, 10, 60);
            // Labels are escaped by the client
            document.getElementById('left').innerHTML = client.score_label('left');
            document.getElementById('right').innerHTML = client.score_label('right');
            document.getElementById('room').innerHTML = client.room_label();
            document.getElementById('prompt').textContent = client.prompt();
            requestAnimationFrame(frame);
        }
        requestAnimationFrame(frame);
    </script>
</body>
</html>"#;
    Response::from_html(html)
}

async fn handle_create(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    let room = generate_roomname();
    Response::from_json(&serde_json::json!({ "room": room }))
}

/// Hand the WebSocket upgrade to the room's relay object
async fn handle_room(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let name = ctx.param("name").map_or("", |v| v);

    if !is_valid_roomname(name) {
        return Response::error("Invalid room name", 400);
    }

    let relay = ctx.env.durable_object("RELAY")?;

    // Get DO stub by name (this creates the DO if it doesn't exist)
    let stub = relay.get_by_name(name)?;
    stub.fetch_with_request(req).await
}

fn is_valid_roomname(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_ROOMNAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Generate a random 6-character room name (a-z, 0-9)
fn generate_roomname() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    (0..6)
        .map(|_| {
            let idx = rng.gen_range(0..CHARS.len());
            CHARS[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roomname_validation() {
        assert!(is_valid_roomname("den"));
        assert!(is_valid_roomname("room_7-b"));
        assert!(!is_valid_roomname(""));
        assert!(!is_valid_roomname("a/b"));
        assert!(!is_valid_roomname("<script>"));
        assert!(!is_valid_roomname(&"x".repeat(MAX_ROOMNAME_LEN + 1)));
    }

    #[test]
    fn test_generated_roomname_is_valid() {
        for _ in 0..20 {
            let name = generate_roomname();
            assert_eq!(name.len(), 6);
            assert!(is_valid_roomname(&name));
        }
    }
}
