//! Shared helpers: an in-memory `Connection` and a client handle for it.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use society_protocol::{PlayerId, RoomCode, ServerMessage};
use society_room::{Room, RoomConfig, RoomRegistry};
use society_transport::{Connection, ConnectionId, TransportError};
use tokio::sync::{Mutex, mpsc};

/// A connection backed by two unbounded channels.
pub struct MockConnection {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    inbound: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
    fail_sends: bool,
    /// Stall applied to the next send only.
    send_delay: Mutex<Option<Duration>>,
}

impl Connection for MockConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        if let Some(delay) = self.send_delay.lock().await.take() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_sends {
            return Err(TransportError::SendFailed(std::io::Error::other(
                "peer is gone",
            )));
        }
        self.outbound
            .send(data.to_vec())
            .map_err(|_| TransportError::ConnectionClosed("client dropped".into()))
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.inbound.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// The test's end of a [`MockConnection`].
pub struct Client {
    to_server: mpsc::UnboundedSender<Vec<u8>>,
    from_server: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl Client {
    /// Sends a JSON frame as if from the browser.
    pub fn send(&self, json: &str) {
        self.to_server
            .send(json.as_bytes().to_vec())
            .expect("read loop should be alive");
    }

    /// Next raw frame from the server.
    pub async fn next_raw(&mut self) -> Vec<u8> {
        tokio::time::timeout(Duration::from_secs(600), self.from_server.recv())
            .await
            .expect("timed out waiting for a broadcast")
            .expect("connection dropped")
    }

    /// Next frame from the server, decoded.
    pub async fn next(&mut self) -> ServerMessage {
        let raw = self.next_raw().await;
        serde_json::from_slice(&raw).expect("server sent an unknown message")
    }

    /// Asserts nothing arrives within `wait`.
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(raw)) =
            tokio::time::timeout(wait, self.from_server.recv()).await
        {
            panic!(
                "expected no broadcast, got {}",
                String::from_utf8_lossy(&raw)
            );
        }
    }

    /// Closes the client side; the server's read loop sees a clean close.
    pub fn hang_up(self) -> mpsc::UnboundedReceiver<Vec<u8>> {
        self.from_server
    }
}

fn pair(fail_sends: bool, send_delay: Option<Duration>) -> (Arc<MockConnection>, Client) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let conn = Arc::new(MockConnection {
        id: ConnectionId::next(),
        outbound: out_tx,
        inbound: Mutex::new(in_rx),
        fail_sends,
        send_delay: Mutex::new(send_delay),
    });
    (
        conn,
        Client {
            to_server: in_tx,
            from_server: out_rx,
        },
    )
}

/// A healthy connection and its client end.
pub fn mock_connection() -> (Arc<MockConnection>, Client) {
    pair(false, None)
}

/// A healthy connection whose first send stalls for `delay`.
pub fn slow_connection(delay: Duration) -> (Arc<MockConnection>, Client) {
    pair(false, Some(delay))
}

/// A connection whose every write fails.
pub fn broken_connection() -> Arc<MockConnection> {
    pair(true, None).0
}

pub type Registry = RoomRegistry<MockConnection>;

pub fn registry() -> Arc<Registry> {
    Arc::new(RoomRegistry::new(RoomConfig::default()))
}

pub fn registry_with(config: RoomConfig) -> Arc<Registry> {
    Arc::new(RoomRegistry::new(config))
}

/// Binds a fresh mock connection for `player_id` and spawns its read loop.
///
/// The bind completes before this returns, so the client sees every
/// broadcast issued afterwards.
pub async fn connect(
    registry: &Registry,
    code: &RoomCode,
    player_id: &PlayerId,
) -> (Arc<Room<MockConnection>>, Client) {
    let (conn, client) = mock_connection();
    let room = registry
        .bind_connection(code, player_id, Arc::clone(&conn))
        .await
        .expect("bind should succeed");
    let task_room = Arc::clone(&room);
    let task_player = player_id.clone();
    tokio::spawn(async move { task_room.read_loop(task_player, conn).await });
    (room, client)
}
