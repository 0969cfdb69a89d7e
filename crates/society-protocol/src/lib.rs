//! Wire protocol for the Society game server.
//!
//! This crate defines what travels over a player's channel:
//!
//! - **Identifiers** ([`RoomCode`], [`PlayerId`]) — short human-typeable codes.
//! - **Inbound** ([`ClientMessage`]) — decoded by reading the `type`
//!   discriminator first, then the payload for that variant. Unknown types
//!   decode to [`ClientMessage::Raw`] and are relayed verbatim.
//! - **Outbound** ([`ServerMessage`]) — everything the server fans out.
//! - **Catalogue** ([`RallyMessage`], [`PromiseMessage`], ...) — payloads
//!   clients exchange through the relay. The server never interprets them.
//!
//! The protocol layer knows nothing about rooms or sockets.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage) → Room (dispatch)
//! ```

mod catalogue;
mod error;
mod message;
mod types;

pub use catalogue::{ChatMessage, PromiseMessage, RallyMessage, VoteMessage};
pub use error::ProtocolError;
pub use message::{ClientMessage, ROLE_OPTIONS, ServerMessage};
pub use types::{PlayerId, RoomCode};
