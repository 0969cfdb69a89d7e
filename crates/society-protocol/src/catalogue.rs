//! Payloads clients exchange through the relay.
//!
//! The server forwards these byte-for-byte (they decode as
//! [`ClientMessage::Raw`](crate::ClientMessage::Raw)); the types exist so
//! clients and tests agree on field names.

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// A chat line. `to` is set for a private message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub text: String,
}

/// A campaign rally, paid for with gold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RallyMessage {
    pub from: String,
    pub text: String,
    pub gold: u32,
}

/// A campaign promise from one player to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromiseMessage {
    pub from: String,
    pub to: String,
    pub value_offered: u32,
}

/// A ballot for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteMessage {
    #[serde(rename = "playerID")]
    pub player_id: PlayerId,
    pub role: String,
}
