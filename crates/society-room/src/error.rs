//! Error types for the room layer.

use society_protocol::{PlayerId, RoomCode};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room is registered under this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The room exists but has no player with this id.
    #[error("player {0} not found in room {1}")]
    PlayerNotFound(PlayerId, RoomCode),
}
