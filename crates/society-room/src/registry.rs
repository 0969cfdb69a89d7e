//! The room registry: creates rooms, joins players, and hands connections
//! to the right room.

use std::collections::HashMap;
use std::sync::Arc;

use society_protocol::{PlayerId, RoomCode, ServerMessage};
use society_transport::Connection;
use tokio::sync::Mutex;

use crate::codes::unique_code;
use crate::{BroadcastReport, Room, RoomConfig, RoomError};

/// What [`RoomRegistry::create_room`] hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRoom {
    pub code: RoomCode,
    /// Link a player can open to land in this room.
    pub join_url: String,
}

/// Every live room, keyed by code.
///
/// Construct one at startup and share it (behind an `Arc`) with the
/// transport layer. The registry lock only guards the map: it is released
/// before any room lock is taken, so rooms proceed independently.
///
/// Rooms are never removed; they live until the process exits.
pub struct RoomRegistry<C: Connection> {
    rooms: Mutex<HashMap<RoomCode, Arc<Room<C>>>>,
    config: Arc<RoomConfig>,
}

impl<C: Connection> RoomRegistry<C> {
    /// Creates an empty registry whose rooms use `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            config: Arc::new(config),
        }
    }

    /// The configuration shared by this registry's rooms.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Allocates an empty room under a fresh code.
    ///
    /// Codes are redrawn until they don't collide with a live room.
    pub async fn create_room(&self) -> CreatedRoom {
        let mut rooms = self.rooms.lock().await;
        let code = RoomCode::new(unique_code(|candidate| {
            rooms.contains_key(&RoomCode::from(candidate))
        }));
        rooms.insert(
            code.clone(),
            Arc::new(Room::new(code.clone(), Arc::clone(&self.config))),
        );
        tracing::info!(room = %code, rooms = rooms.len(), "room created");

        CreatedRoom {
            join_url: self.config.join_url(code.as_str()),
            code,
        }
    }

    /// Looks up a room.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no room has this code.
    pub async fn room(&self, code: &RoomCode) -> Result<Arc<Room<C>>, RoomError> {
        self.rooms
            .lock()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    /// Adds a player named `name` to the room and tells the room's bound
    /// connections with `player_joined`.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no room has this code; nothing changes.
    pub async fn join_room(
        &self,
        code: &RoomCode,
        name: impl Into<String>,
    ) -> Result<PlayerId, RoomError> {
        let room = self.room(code).await?;
        let name = name.into();
        let player_id = room.add_player(name.clone()).await;
        room.broadcast(&ServerMessage::PlayerJoined { name }).await;
        Ok(player_id)
    }

    /// Attaches `conn` to a joined player without starting its read loop.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] or [`RoomError::PlayerNotFound`].
    pub async fn bind_connection(
        &self,
        code: &RoomCode,
        player_id: &PlayerId,
        conn: Arc<C>,
    ) -> Result<Arc<Room<C>>, RoomError> {
        let room = self.room(code).await?;
        room.bind(player_id, conn).await?;
        Ok(room)
    }

    /// Binds `conn` and runs its read loop to completion.
    ///
    /// This is what a freshly upgraded channel calls. It returns once the
    /// peer disconnects.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] or [`RoomError::PlayerNotFound`]; the
    /// connection is left untouched for the caller to close.
    pub async fn connect(
        &self,
        code: &RoomCode,
        player_id: PlayerId,
        conn: Arc<C>,
    ) -> Result<(), RoomError> {
        let room = self.room(code).await?;
        room.serve_connection(player_id, conn).await
    }

    /// Broadcasts `msg` to every bound connection in one room.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no room has this code.
    pub async fn broadcast(
        &self,
        code: &RoomCode,
        msg: &ServerMessage,
    ) -> Result<BroadcastReport, RoomError> {
        let room = self.room(code).await?;
        Ok(room.broadcast(msg).await)
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Codes of all live rooms.
    pub async fn room_codes(&self) -> Vec<RoomCode> {
        self.rooms.lock().await.keys().cloned().collect()
    }
}

impl<C: Connection> Default for RoomRegistry<C> {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
