//! Unified error type for the Society server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use society_protocol::ProtocolError;
use society_room::RoomError;
use society_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// HTTP handlers return it directly; [`IntoResponse`] turns it into the
/// status and body a client sees.
#[derive(Debug, thiserror::Error)]
pub enum SocietyError {
    /// A transport-level error (send, recv, closed).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A malformed or unencodable message.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Unknown room or player.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server loop stopped.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl IntoResponse for SocietyError {
    fn into_response(self) -> Response {
        match self {
            SocietyError::Room(RoomError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Room not found").into_response()
            }
            SocietyError::Room(RoomError::PlayerNotFound(_, _)) => {
                (StatusCode::NOT_FOUND, "Player not found").into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response()
            }
        }
    }
}
