//! Wire-level tests: raw WebSocket clients speaking JSON to a live host.
//!
//! These bypass the facade's client side entirely, pinning down what
//! actually crosses the wire: frame order, field names, host
//! assignment, and tolerance for garbage.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use banter::prelude::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

// =========================================================================
// Helpers
// =========================================================================

/// Event sink for the hosting app; these tests watch the wire instead.
struct Quiet;

impl ChatEvents for Quiet {
    fn on_message_received(&self, _line: &str) {}
    fn on_roster_changed(&self, _roster: &[PlayerEntry]) {}
    fn on_joined(&self) {}
}

/// Starts a hosting app on an OS-assigned port, with discovery kept on
/// loopback so nothing leaks onto a real network.
async fn start_host(discovery_port: u16) -> (ChatApp<Quiet>, SocketAddr) {
    let config = ChatConfig {
        session_port: 0,
        discovery: DiscoveryConfig {
            port: discovery_port,
            broadcast_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            announce_interval: Duration::from_millis(200),
            timeout: Duration::from_secs(1),
        },
        ..ChatConfig::default()
    };
    let mut app = ChatApp::new(config, Quiet);
    let addr = app.start_as_host().await.expect("hosts");
    (app, SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port()))
}

async fn connect_raw(addr: SocketAddr) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("connects");
    ws
}

/// Receives the next data frame and parses it as JSON.
async fn next_json(ws: &mut ClientWs) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("frame within deadline")
            .expect("stream open")
            .expect("frame ok");
        match msg {
            Message::Binary(data) => return serde_json::from_slice(&data).expect("frame is JSON"),
            Message::Text(text) => return serde_json::from_str(&text).expect("frame is JSON"),
            _ => continue,
        }
    }
}

fn frame(value: Value) -> Message {
    Message::Binary(serde_json::to_vec(&value).expect("encode").into())
}

fn chat_send(text: &str) -> Message {
    frame(json!({ "type": "ChatSend", "text": text }))
}

/// Connects and consumes the Register frame, returning both.
async fn join_raw(addr: SocketAddr) -> (ClientWs, Value) {
    let mut ws = connect_raw(addr).await;
    let register = next_json(&mut ws).await;
    assert_eq!(register["type"], "Register");
    (ws, register)
}

// =========================================================================
// Registration
// =========================================================================

#[tokio::test]
async fn test_register_is_the_first_frame() {
    let (_app, addr) = start_host(49821).await;
    let (_ws, register) = join_raw(addr).await;

    // The hosting app's own loopback client claimed the host flag.
    assert_eq!(register["is_host"], json!(false));
    let name = register["name"].as_str().expect("name is a string");
    assert!(name.starts_with("Player_"));
    assert!(register["player_id"].as_u64().expect("id is numeric") > 0);
}

#[tokio::test]
async fn test_roster_update_follows_registration() {
    let (_app, addr) = start_host(49822).await;
    let (mut ws, register) = join_raw(addr).await;

    let roster = next_json(&mut ws).await;
    assert_eq!(roster["type"], "RosterUpdate");

    let players = roster["players"].as_array().expect("players array");
    assert_eq!(players.len(), 2);

    let me = players
        .iter()
        .find(|p| p["id"] == register["player_id"])
        .expect("own entry in roster");
    assert_eq!(me["name"], register["name"]);
    assert_eq!(me["is_host"], json!(false));
}

// =========================================================================
// Chat relay
// =========================================================================

#[tokio::test]
async fn test_chat_send_comes_back_as_broadcast() {
    let (_app, addr) = start_host(49823).await;
    let (mut ws, register) = join_raw(addr).await;
    let _roster = next_json(&mut ws).await;

    ws.send(chat_send("hi")).await.expect("sends");

    let broadcast = next_json(&mut ws).await;
    assert_eq!(broadcast["type"], "ChatBroadcast");
    assert_eq!(broadcast["sequence"], json!(1));
    assert_eq!(broadcast["text"], "hi");
    assert_eq!(broadcast["sender"], register["name"]);
}

#[tokio::test]
async fn test_garbage_frames_are_skipped() {
    let (_app, addr) = start_host(49824).await;
    let (mut ws, _register) = join_raw(addr).await;
    let _roster = next_json(&mut ws).await;

    ws.send(Message::Binary(b"not json".to_vec().into()))
        .await
        .expect("sends garbage");

    // The connection survives and chat still flows.
    ws.send(chat_send("still alive")).await.expect("sends");
    let broadcast = next_json(&mut ws).await;
    assert_eq!(broadcast["type"], "ChatBroadcast");
    assert_eq!(broadcast["text"], "still alive");
}

#[tokio::test]
async fn test_host_only_kinds_from_clients_are_ignored() {
    let (app, addr) = start_host(49825).await;
    let (mut ws, _register) = join_raw(addr).await;
    let _roster = next_json(&mut ws).await;

    // A client has no business sending these; the host must not apply
    // them.
    ws.send(frame(json!({ "type": "RosterUpdate", "players": [] })))
        .await
        .expect("sends");
    ws.send(frame(json!({
        "type": "ChatBroadcast", "sender": "fake", "text": "injected", "sequence": 99
    })))
    .await
    .expect("sends");

    ws.send(chat_send("legit")).await.expect("sends");
    let broadcast = next_json(&mut ws).await;
    assert_eq!(broadcast["type"], "ChatBroadcast");
    assert_eq!(broadcast["sequence"], json!(1));
    assert_eq!(broadcast["text"], "legit");

    // The authoritative roster never shrank.
    assert_eq!(app.roster().await.len(), 2);
}

// =========================================================================
// Host assignment
// =========================================================================

#[tokio::test]
async fn test_exactly_one_host_flag_under_concurrent_joins() {
    let (app, addr) = start_host(49826).await;

    let mut joins = Vec::new();
    for _ in 0..5 {
        joins.push(tokio::spawn(async move {
            let (ws, register) = join_raw(addr).await;
            (ws, register["is_host"] == json!(true))
        }));
    }

    let mut sockets = Vec::new();
    let mut host_flags = 0;
    for join in joins {
        let (ws, is_host) = join.await.expect("join task");
        sockets.push(ws);
        if is_host {
            host_flags += 1;
        }
    }
    // The hosting app itself was first; nobody racing in gets the flag.
    assert_eq!(host_flags, 0);

    // The authoritative roster settles at six entries, one host, all
    // names distinct.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let roster = app.roster().await;
        if roster.len() == 6 {
            assert_eq!(roster.iter().filter(|e| e.is_host).count(), 1);
            let names: HashSet<&str> = roster.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names.len(), 6);
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "roster never reached 6 entries"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

// =========================================================================
// Departures
// =========================================================================

#[tokio::test]
async fn test_disconnect_broadcasts_shrunken_roster() {
    let (_app, addr) = start_host(49827).await;

    let (mut ws1, _r1) = join_raw(addr).await;
    let roster2 = next_json(&mut ws1).await;
    assert_eq!(roster2["players"].as_array().expect("players").len(), 2);

    let (ws2, r2) = join_raw(addr).await;
    let roster3 = next_json(&mut ws1).await;
    assert_eq!(roster3["players"].as_array().expect("players").len(), 3);

    // ws2 vanishes without a goodbye.
    drop(ws2);

    let shrunk = next_json(&mut ws1).await;
    assert_eq!(shrunk["type"], "RosterUpdate");
    let players = shrunk["players"].as_array().expect("players");
    assert_eq!(players.len(), 2);
    assert!(players.iter().all(|p| p["id"] != r2["player_id"]));
}
