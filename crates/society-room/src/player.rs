//! Player records owned by a room.

use std::sync::Arc;

use society_protocol::PlayerId;
use society_transport::Connection;

/// One player in a room.
///
/// Created by a join with no connection. The connection is attached when
/// the player's channel opens and replaced if they reconnect; it is never
/// cleared, so a player whose socket died keeps a dead handle that
/// broadcasts will fail against.
pub(crate) struct Player<C: Connection> {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) role: Option<String>,
    pub(crate) gold: u32,
    pub(crate) conn: Option<Arc<C>>,
}

impl<C: Connection> Player<C> {
    pub(crate) fn new(id: PlayerId, name: String, gold: u32) -> Self {
        Self {
            id,
            name,
            role: None,
            gold,
            conn: None,
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Whether the player has asked for a (non-empty) role.
    pub(crate) fn has_role(&self) -> bool {
        self.role.as_deref().is_some_and(|r| !r.is_empty())
    }

    pub(crate) fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            gold: self.gold,
            connected: self.is_connected(),
        }
    }
}

/// A snapshot of one player, detached from the room lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    /// The role the player nominated themselves for, if any.
    pub role: Option<String>,
    pub gold: u32,
    /// `true` once a connection has been bound, even if it has since died.
    pub connected: bool,
}
