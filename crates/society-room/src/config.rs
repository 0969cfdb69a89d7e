//! Room configuration and game phase.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Settings shared by every room in a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Length of the campaign countdown, in ticks. The timer broadcasts
    /// every value from this down to 0 inclusive.
    pub countdown_secs: u32,

    /// Wall-clock time between countdown ticks.
    pub tick_interval: Duration,

    /// Gold every player starts with.
    pub starting_gold: u32,

    /// Prefix of the join link handed out on room creation; the room code
    /// is appended to it.
    pub join_url_base: String,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 120,
            tick_interval: Duration::from_secs(1),
            starting_gold: 10,
            join_url_base: "https://society-game-web.onrender.com/?room="
                .to_string(),
        }
    }
}

impl RoomConfig {
    /// Builds the client-facing join link for `code`.
    pub fn join_url(&self, code: &str) -> String {
        format!("{}{}", self.join_url_base, code)
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The stage of a room's turn structure.
///
/// ```text
/// Lobby → Nominating → Campaigning → Voting
///              ↑                        │
///              └──────(nomination)──────┘
/// ```
///
/// Phase is bookkeeping: it records where the room is so snapshots and
/// logs can report it, and it makes the unanimous-nomination trigger fire
/// once per round. It does not reject any message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Players are joining; nobody has nominated yet.
    #[default]
    Lobby,
    /// At least one nomination is in, not everyone has chosen.
    Nominating,
    /// Campaign countdown is (or was just) running.
    Campaigning,
    /// Ballots are open.
    Voting,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Nominating => write!(f, "Nominating"),
            Self::Campaigning => write!(f, "Campaigning"),
            Self::Voting => write!(f, "Voting"),
        }
    }
}
