//! `SocietyServer` builder and server loop.
//!
//! This is the entry point for running a Society server. It owns the TCP
//! listener and the room registry, and hands both to axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use society_room::{RoomConfig, RoomRegistry};
use society_transport::WebSocketConnection;
use tokio::net::TcpListener;

use crate::SocietyError;
use crate::handler;

/// The registry as the HTTP layer shares it.
pub(crate) type SharedRegistry = Arc<RoomRegistry<WebSocketConnection>>;

/// Builds the HTTP router over an existing registry.
///
/// | route                         | handler                          |
/// |-------------------------------|----------------------------------|
/// | `POST /create`                | new room: `{code, joinURL}`      |
/// | `POST /join`                  | `{code, name}` → `{playerID}`    |
/// | `GET /ws/{code}/{playerID}`   | WebSocket upgrade, then relay    |
/// | `GET /health`                 | `OK`                             |
pub fn router(registry: SharedRegistry) -> Router {
    Router::new()
        .route("/create", post(handler::create_room))
        .route("/join", post(handler::join_room))
        .route("/ws/{code}/{player_id}", get(handler::ws_upgrade))
        .route("/health", get(handler::health))
        .with_state(registry)
}

/// Builder for configuring and starting a Society server.
///
/// # Example
///
/// ```rust,ignore
/// use society::prelude::*;
///
/// let server = SocietyServer::builder()
///     .bind("0.0.0.0:8080")
///     .room_config(RoomConfig { countdown_secs: 60, ..Default::default() })
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct SocietyServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl SocietyServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and creates an empty registry.
    ///
    /// # Errors
    /// [`SocietyError::Bind`] if the address is unavailable.
    pub async fn build(self) -> Result<SocietyServer, SocietyError> {
        let listener = TcpListener::bind(&self.bind_addr).await.map_err(|source| {
            SocietyError::Bind {
                addr: self.bind_addr.clone(),
                source,
            }
        })?;

        Ok(SocietyServer {
            listener,
            registry: Arc::new(RoomRegistry::new(self.room_config)),
        })
    }
}

impl Default for SocietyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Society server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct SocietyServer {
    listener: TcpListener,
    registry: SharedRegistry,
}

impl SocietyServer {
    /// Creates a new builder.
    pub fn builder() -> SocietyServerBuilder {
        SocietyServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The registry this server routes into.
    pub fn registry(&self) -> SharedRegistry {
        Arc::clone(&self.registry)
    }

    /// Serves requests until the process is terminated.
    pub async fn run(self) -> Result<(), SocietyError> {
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(%addr, "Society server running");
        }
        axum::serve(self.listener, router(self.registry))
            .await
            .map_err(SocietyError::Serve)
    }
}
