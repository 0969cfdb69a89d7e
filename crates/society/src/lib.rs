//! # Society
//!
//! Game server for Society, a social-deduction party game played in a
//! browser.
//!
//! A host creates a room over HTTP, players join with the room code, then
//! each opens a WebSocket to `/ws/{code}/{playerID}`. From there the room
//! relays chat, nominations, and phase changes to everyone in it, and runs
//! the campaign countdown that leads into voting.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use society::prelude::*;
//!
//! # async fn run() -> Result<(), SocietyError> {
//! let server = SocietyServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::SocietyError;
pub use server::{SocietyServer, SocietyServerBuilder, router};

/// Convenience re-exports for building and embedding the server.
pub mod prelude {
    pub use crate::{SocietyError, SocietyServer, SocietyServerBuilder, router};
    pub use society_protocol::{
        ClientMessage, PlayerId, ProtocolError, ROLE_OPTIONS, RoomCode, ServerMessage,
    };
    pub use society_room::{
        BroadcastReport, CreatedRoom, Phase, Room, RoomConfig, RoomError, RoomInfo,
        RoomRegistry,
    };
    pub use society_transport::{
        Connection, ConnectionId, TransportError, WebSocketConnection,
    };
}
