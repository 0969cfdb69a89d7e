//! A single room: its players, their connections, and the broadcast path.
//!
//! All mutable room state lives behind one `tokio::sync::Mutex`. Every read
//! or write of the player map, the phase, or the countdown flag goes
//! through it, so two dispatches in the same room never interleave their
//! visible changes. Different rooms never share a lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use society_protocol::{ClientMessage, PlayerId, RoomCode, ServerMessage};
use society_transport::Connection;
use tokio::sync::Mutex;

use crate::codes::unique_code;
use crate::player::{Player, PlayerInfo};
use crate::{Phase, RoomConfig, RoomError};

/// Outcome of one fan-out.
///
/// Delivery is best-effort: a failed write is counted here and logged, and
/// never stops delivery to the remaining connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the payload was written to.
    pub delivered: usize,
    /// Connections whose write failed.
    pub failed: usize,
}

/// A snapshot of room metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub phase: Phase,
    /// Every player that joined, bound or not.
    pub player_count: usize,
    /// Players with a bound connection.
    pub connected_count: usize,
    pub countdown_running: bool,
}

pub(crate) struct RoomInner<C: Connection> {
    pub(crate) players: HashMap<PlayerId, Player<C>>,
    pub(crate) phase: Phase,
    /// At most one countdown task runs while this is set.
    pub(crate) countdown_running: bool,
}

/// An isolated game session.
///
/// Methods that may start the countdown take `self: &Arc<Self>` so the
/// spawned timer task can hold the room.
pub struct Room<C: Connection> {
    code: RoomCode,
    config: Arc<RoomConfig>,
    pub(crate) inner: Mutex<RoomInner<C>>,
}

impl<C: Connection> fmt::Debug for Room<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

impl<C: Connection> Room<C> {
    pub(crate) fn new(code: RoomCode, config: Arc<RoomConfig>) -> Self {
        Self {
            code,
            config,
            inner: Mutex::new(RoomInner {
                players: HashMap::new(),
                phase: Phase::Lobby,
                countdown_running: false,
            }),
        }
    }

    /// The room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub(crate) fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Registers a new, unconnected player and returns their id.
    ///
    /// Ids are unique within the room. Nothing is broadcast here; see
    /// [`RoomRegistry::join_room`](crate::RoomRegistry::join_room).
    pub async fn add_player(&self, name: impl Into<String>) -> PlayerId {
        let name = name.into();
        let mut inner = self.inner.lock().await;
        let id = PlayerId::new(unique_code(|candidate| {
            inner.players.contains_key(&PlayerId::from(candidate))
        }));
        inner.players.insert(
            id.clone(),
            Player::new(id.clone(), name, self.config.starting_gold),
        );
        tracing::info!(
            room = %self.code,
            player = %id,
            players = inner.players.len(),
            "player joined"
        );
        id
    }

    /// Attaches `conn` to an existing player, replacing any earlier one.
    ///
    /// # Errors
    /// [`RoomError::PlayerNotFound`] if no such player joined this room.
    pub async fn bind(
        &self,
        player_id: &PlayerId,
        conn: Arc<C>,
    ) -> Result<(), RoomError> {
        let mut inner = self.inner.lock().await;
        let player = inner.players.get_mut(player_id).ok_or_else(|| {
            RoomError::PlayerNotFound(player_id.clone(), self.code.clone())
        })?;
        let conn_id = conn.id();
        if let Some(previous) = player.conn.replace(conn) {
            tracing::info!(
                room = %self.code,
                player = %player_id,
                conn = %conn_id,
                previous = %previous.id(),
                "player reconnected"
            );
        } else {
            tracing::info!(
                room = %self.code,
                player = %player_id,
                conn = %conn_id,
                "player connected"
            );
        }
        Ok(())
    }

    /// Binds `conn` and then runs its read loop until the peer goes away.
    ///
    /// # Errors
    /// [`RoomError::PlayerNotFound`] if the bind fails; the loop never
    /// starts in that case.
    pub async fn serve_connection(
        self: &Arc<Self>,
        player_id: PlayerId,
        conn: Arc<C>,
    ) -> Result<(), RoomError> {
        self.bind(&player_id, Arc::clone(&conn)).await?;
        self.read_loop(player_id, conn).await;
        Ok(())
    }

    /// Reads frames from `conn` and dispatches each one as `player_id`.
    ///
    /// Malformed frames are logged and skipped. The loop ends on a clean
    /// close or a receive error; the player stays in the room either way.
    pub async fn read_loop(self: &Arc<Self>, player_id: PlayerId, conn: Arc<C>) {
        let conn_id = conn.id();
        loop {
            let data = match conn.recv().await {
                Ok(Some(data)) => data,
                Ok(None) => {
                    tracing::info!(
                        room = %self.code,
                        player = %player_id,
                        conn = %conn_id,
                        "connection closed cleanly"
                    );
                    break;
                }
                Err(e) => {
                    tracing::debug!(
                        room = %self.code,
                        player = %player_id,
                        conn = %conn_id,
                        error = %e,
                        "recv error"
                    );
                    break;
                }
            };

            match ClientMessage::decode(&data) {
                Ok(msg) => self.dispatch(&player_id, msg).await,
                Err(e) => {
                    tracing::debug!(
                        room = %self.code,
                        player = %player_id,
                        error = %e,
                        "dropping malformed message"
                    );
                }
            }
        }
    }

    /// Encodes `msg` once and writes it to every bound connection.
    pub async fn broadcast(&self, msg: &ServerMessage) -> BroadcastReport {
        match msg.encode() {
            Ok(bytes) => self.broadcast_raw(&bytes).await,
            Err(e) => {
                tracing::error!(
                    room = %self.code,
                    error = %e,
                    "failed to encode broadcast"
                );
                BroadcastReport::default()
            }
        }
    }

    /// Writes `data` as-is to every bound connection.
    ///
    /// Holds the room lock for the whole fan-out, so broadcasts are
    /// serialized against joins and dispatch effects in this room.
    /// Unbound players are skipped.
    pub async fn broadcast_raw(&self, data: &[u8]) -> BroadcastReport {
        let inner = self.inner.lock().await;
        let mut report = BroadcastReport::default();

        for player in inner.players.values() {
            let Some(conn) = &player.conn else {
                continue;
            };
            match conn.send(data).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::debug!(
                        room = %self.code,
                        player = %player.id,
                        conn = %conn.id(),
                        error = %e,
                        "broadcast write failed"
                    );
                }
            }
        }

        if report.failed > 0 {
            tracing::warn!(
                room = %self.code,
                delivered = report.delivered,
                failed = report.failed,
                "broadcast partially failed"
            );
        }
        report
    }

    /// Returns a snapshot of the room's metadata.
    pub async fn info(&self) -> RoomInfo {
        let inner = self.inner.lock().await;
        RoomInfo {
            code: self.code.clone(),
            phase: inner.phase,
            player_count: inner.players.len(),
            connected_count: inner
                .players
                .values()
                .filter(|p| p.is_connected())
                .count(),
            countdown_running: inner.countdown_running,
        }
    }

    /// Returns a snapshot of one player.
    pub async fn player(&self, player_id: &PlayerId) -> Option<PlayerInfo> {
        let inner = self.inner.lock().await;
        inner.players.get(player_id).map(Player::info)
    }

    /// Returns a snapshot of every player, in no particular order.
    pub async fn players(&self) -> Vec<PlayerInfo> {
        let inner = self.inner.lock().await;
        inner.players.values().map(Player::info).collect()
    }
}
