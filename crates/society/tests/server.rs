//! Integration tests for the HTTP routes and the full WebSocket flow.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use society::prelude::*;
use tokio_tungstenite::tungstenite::Message;
use tower::ServiceExt;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

const WAIT: Duration = Duration::from_secs(5);

fn app() -> (Router, Arc<RoomRegistry<WebSocketConnection>>) {
    let registry = Arc::new(RoomRegistry::new(RoomConfig::default()));
    (router(Arc::clone(&registry)), registry)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, bytes.to_vec())
}

async fn create(app: &Router) -> Value {
    let req = Request::builder()
        .method("POST")
        .uri("/create")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).expect("json body")
}

async fn join(app: &Router, code: &str, name: &str) -> String {
    let (status, body) = post_json(app, "/join", json!({"code": code, "name": name})).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).expect("json body");
    body["playerID"].as_str().expect("playerID").to_string()
}

/// Starts a server on a random port; returns its address and a router
/// sharing its registry.
async fn start_server(config: RoomConfig) -> (String, Router, SocietyServer) {
    let server = SocietyServer::builder()
        .bind("127.0.0.1:0")
        .room_config(config)
        .build()
        .await
        .expect("server should build");
    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();
    let app = router(server.registry());
    (addr, app, server)
}

async fn connect(addr: &str, code: &str, player_id: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/{code}/{player_id}"))
        .await
        .expect("should connect");
    ws
}

async fn next_json(ws: &mut ClientWs) -> Value {
    loop {
        let msg = tokio::time::timeout(WAIT, ws.next())
            .await
            .expect("timed out")
            .expect("stream ended")
            .expect("recv");
        match msg {
            Message::Text(text) => return serde_json::from_str(&text).expect("json frame"),
            Message::Binary(data) => return serde_json::from_slice(&data).expect("json frame"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame {other:?}"),
        }
    }
}

async fn send_json(ws: &mut ClientWs, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("send");
}

/// Waits until `count` players in the room have a bound connection.
async fn wait_connected(
    registry: &RoomRegistry<WebSocketConnection>,
    code: &str,
    count: usize,
) {
    let room = registry
        .room(&RoomCode::from(code))
        .await
        .expect("room exists");
    tokio::time::timeout(WAIT, async {
        while room.info().await.connected_count < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("players should connect");
}

// =========================================================================
// REST routes
// =========================================================================

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_create_returns_code_and_join_url() {
    let (app, registry) = app();
    let body = create(&app).await;

    let code = body["code"].as_str().expect("code");
    assert_eq!(code.len(), 4);
    assert_eq!(
        body["joinURL"],
        format!("https://society-game-web.onrender.com/?room={code}")
    );
    assert_eq!(registry.room_codes().await, vec![RoomCode::from(code)]);
}

#[tokio::test]
async fn test_create_rejects_get() {
    let (app, registry) = app();
    let req = Request::builder()
        .uri("/create")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(registry.room_count().await, 0);
}

#[tokio::test]
async fn test_join_adds_player() {
    let (app, registry) = app();
    let code = create(&app).await["code"].as_str().expect("code").to_string();

    let player_id = join(&app, &code, "Alice").await;

    let room = registry.room(&RoomCode::from(code.as_str())).await.unwrap();
    let player = room
        .player(&PlayerId::from(player_id.as_str()))
        .await
        .expect("player joined");
    assert_eq!(player.name, "Alice");
    assert_eq!(player.gold, 10);
    assert!(!player.connected);
}

#[tokio::test]
async fn test_join_unknown_room_is_404() {
    let (app, registry) = app();
    let (status, body) = post_json(&app, "/join", json!({"code": "NOPE", "name": "Alice"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Room not found");
    assert_eq!(registry.room_count().await, 0);
}

#[tokio::test]
async fn test_join_malformed_body_is_rejected() {
    let (app, _) = app();
    let req = Request::builder()
        .method("POST")
        .uri("/join")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, _) = send(&app, req).await;
    assert!(status.is_client_error(), "status {status}");
}

// =========================================================================
// WebSocket flow
// =========================================================================

#[tokio::test]
async fn test_ws_unknown_room_is_closed() {
    let (addr, _app, server) = start_server(RoomConfig::default()).await;
    tokio::spawn(server.run());

    let mut ws = connect(&addr, "NOPE", "AAAA").await;
    let outcome = tokio::time::timeout(WAIT, ws.next())
        .await
        .expect("server should close the channel");
    assert!(
        matches!(outcome, None | Some(Ok(Message::Close(_))) | Some(Err(_))),
        "unexpected {outcome:?}"
    );
}

#[tokio::test]
async fn test_ws_unknown_player_is_closed() {
    let (addr, app, server) = start_server(RoomConfig::default()).await;
    tokio::spawn(server.run());
    let code = create(&app).await["code"].as_str().expect("code").to_string();

    let mut ws = connect(&addr, &code, "AAAA").await;
    let outcome = tokio::time::timeout(WAIT, ws.next())
        .await
        .expect("server should close the channel");
    assert!(
        matches!(outcome, None | Some(Ok(Message::Close(_))) | Some(Err(_))),
        "unexpected {outcome:?}"
    );
}

#[tokio::test]
async fn test_full_round_over_websockets() {
    let (addr, app, server) = start_server(RoomConfig {
        countdown_secs: 3,
        tick_interval: Duration::from_millis(20),
        ..RoomConfig::default()
    })
    .await;
    let registry = server.registry();
    tokio::spawn(server.run());

    let code = create(&app).await["code"].as_str().expect("code").to_string();
    let alice = join(&app, &code, "Alice").await;
    let mut alice_ws = connect(&addr, &code, &alice).await;
    wait_connected(&registry, &code, 1).await;

    let bob = join(&app, &code, "Bob").await;
    assert_eq!(
        next_json(&mut alice_ws).await,
        json!({"type": "player_joined", "name": "Bob"})
    );
    let mut bob_ws = connect(&addr, &code, &bob).await;
    wait_connected(&registry, &code, 2).await;

    // Chat echoes to everyone, sender included.
    send_json(&mut bob_ws, json!({"type": "chat", "text": "hi all"})).await;
    let chat = json!({"type": "chat", "from": "Bob", "text": "hi all"});
    assert_eq!(next_json(&mut alice_ws).await, chat);
    assert_eq!(next_json(&mut bob_ws).await, chat);

    // Unknown types pass through untouched.
    let promise = json!({"type": "promise", "from": "Bob", "to": "Alice", "valueOffered": 5});
    send_json(&mut bob_ws, promise.clone()).await;
    assert_eq!(next_json(&mut alice_ws).await, promise);
    assert_eq!(next_json(&mut bob_ws).await, promise);

    send_json(&mut alice_ws, json!({"type": "nomination", "role": "President"})).await;
    let first = json!({"type": "nomination", "player": "Alice", "role": "President"});
    assert_eq!(next_json(&mut alice_ws).await, first);
    assert_eq!(next_json(&mut bob_ws).await, first);

    send_json(&mut bob_ws, json!({"type": "nomination", "role": "Chief Justice"})).await;
    let second = json!({"type": "nomination", "player": "Bob", "role": "Chief Justice"});

    for ws in [&mut alice_ws, &mut bob_ws] {
        assert_eq!(next_json(ws).await, second);
        assert_eq!(next_json(ws).await, json!({"type": "start_campaigning"}));
        for time in (0..=3).rev() {
            assert_eq!(
                next_json(ws).await,
                json!({"type": "campaign_timer", "time": time})
            );
        }
        assert_eq!(
            next_json(ws).await,
            json!({"type": "start_voting", "options": ROLE_OPTIONS})
        );
    }

    let room = registry.room(&RoomCode::from(code.as_str())).await.unwrap();
    tokio::time::timeout(WAIT, async {
        while room.info().await.countdown_running {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("countdown should finish");
    assert_eq!(room.info().await.phase, Phase::Voting);
}

#[tokio::test]
async fn test_disconnect_keeps_player_listed() {
    let (addr, app, server) = start_server(RoomConfig::default()).await;
    let registry = server.registry();
    tokio::spawn(server.run());

    let code = create(&app).await["code"].as_str().expect("code").to_string();
    let alice = join(&app, &code, "Alice").await;
    let mut ws = connect(&addr, &code, &alice).await;
    wait_connected(&registry, &code, 1).await;

    ws.close(None).await.expect("close");
    tokio::time::sleep(Duration::from_millis(50)).await;

    let room = registry.room(&RoomCode::from(code.as_str())).await.unwrap();
    assert_eq!(room.info().await.player_count, 1);
}
