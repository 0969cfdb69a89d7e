//! `society-server`: runs the Society game server.
//!
//! Environment:
//!
//! - `RUST_LOG` log filter, default `info`
//! - `SOCIETY_BIND_ADDR` listen address, default `0.0.0.0:8080`
//! - `SOCIETY_JOIN_URL_BASE` prefix of the join link handed to hosts
//! - `SOCIETY_COUNTDOWN_SECS` campaign countdown length

use std::str::FromStr;

use society::prelude::*;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), SocietyError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let bind_addr =
        std::env::var("SOCIETY_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let mut config = RoomConfig::default();
    if let Ok(base) = std::env::var("SOCIETY_JOIN_URL_BASE") {
        config.join_url_base = base;
    }
    if let Some(secs) = parse_env("SOCIETY_COUNTDOWN_SECS") {
        config.countdown_secs = secs;
    }

    let server = SocietyServer::builder()
        .bind(&bind_addr)
        .room_config(config)
        .build()
        .await?;
    server.run().await
}

/// Reads and parses an environment variable; unparsable values are logged
/// and ignored.
fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
