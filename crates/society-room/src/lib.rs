//! Room registry and broadcast engine for the Society game server.
//!
//! Rooms are plain shared state: each one guards its players, phase, and
//! countdown flag with a single lock. Work happens on the tasks that need
//! it: one read loop per connection, plus at most one countdown task per
//! room.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates rooms, joins players, binds connections
//! - [`Room`] — one session: dispatch, broadcast, countdown
//! - [`Phase`] — where a room is in its turn structure
//! - [`RoomConfig`] — countdown length and cadence, starting gold, join URL

mod codes;
mod config;
mod countdown;
mod dispatch;
mod error;
mod player;
mod registry;
mod room;

pub use codes::{CODE_ALPHABET, CODE_LEN, generate_code};
pub use config::{Phase, RoomConfig};
pub use error::RoomError;
pub use player::PlayerInfo;
pub use registry::{CreatedRoom, RoomRegistry};
pub use room::{BroadcastReport, Room, RoomInfo};
