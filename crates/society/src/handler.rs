//! HTTP and WebSocket handlers.
//!
//! The REST routes only touch the registry. The WebSocket route upgrades
//! first and then binds: if the room or player is unknown the channel is
//! closed straight away.

use std::sync::Arc;

use axum::Json;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use society_protocol::{PlayerId, RoomCode};
use society_transport::{Connection, WebSocketConnection};

use crate::SocietyError;
use crate::server::SharedRegistry;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CreateRoomResponse {
    pub(crate) code: RoomCode,
    #[serde(rename = "joinURL")]
    pub(crate) join_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JoinRequest {
    code: RoomCode,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct JoinResponse {
    #[serde(rename = "playerID")]
    pub(crate) player_id: PlayerId,
}

/// `POST /create`
pub(crate) async fn create_room(
    State(registry): State<SharedRegistry>,
) -> Json<CreateRoomResponse> {
    let created = registry.create_room().await;
    Json(CreateRoomResponse {
        code: created.code,
        join_url: created.join_url,
    })
}

/// `POST /join`
pub(crate) async fn join_room(
    State(registry): State<SharedRegistry>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, SocietyError> {
    let player_id = registry.join_room(&req.code, req.name).await?;
    Ok(Json(JoinResponse { player_id }))
}

/// `GET /ws/{code}/{playerID}`
pub(crate) async fn ws_upgrade(
    State(registry): State<SharedRegistry>,
    Path((code, player_id)): Path<(RoomCode, PlayerId)>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_failed_upgrade(|e| {
        tracing::warn!(error = %e, "websocket upgrade failed");
    })
    .on_upgrade(move |socket| handle_socket(socket, registry, code, player_id))
}

/// `GET /health`
pub(crate) async fn health() -> &'static str {
    "OK"
}

/// Runs one player's channel from bind to close.
async fn handle_socket(
    socket: WebSocket,
    registry: SharedRegistry,
    code: RoomCode,
    player_id: PlayerId,
) {
    let conn = Arc::new(WebSocketConnection::new(socket));
    let conn_id = conn.id();
    tracing::debug!(%conn_id, room = %code, player = %player_id, "websocket upgraded");

    match registry.connect(&code, player_id, Arc::clone(&conn)).await {
        Ok(()) => tracing::debug!(%conn_id, room = %code, "websocket session ended"),
        Err(e) => {
            tracing::warn!(%conn_id, error = %e, "rejecting websocket");
            if let Err(e) = conn.close().await {
                tracing::debug!(%conn_id, error = %e, "close failed");
            }
        }
    }
}
