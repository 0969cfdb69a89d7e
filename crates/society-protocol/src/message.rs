//! Inbound and outbound channel messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ProtocolError;

/// The roles a player can stand for, in the order voting presents them.
pub const ROLE_OPTIONS: [&str; 5] = [
    "President",
    "Chief Justice",
    "Department of Education",
    "Department of Labor",
    "Department of Construction",
];

// ---------------------------------------------------------------------------
// ClientMessage
// ---------------------------------------------------------------------------

/// A message a player sends over their channel.
///
/// Decoding is two-step: the `type` discriminator is read first, then the
/// rest of the object is decoded into the payload for that variant. Any
/// type the server does not interpret becomes [`ClientMessage::Raw`], which
/// carries the original bytes so they can be relayed untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// `{"type":"start_countdown"}`
    StartCountdown,

    /// `{"type":"nomination","role":"President"}`
    Nomination { role: String },

    /// `{"type":"start_campaigning"}`
    StartCampaigning,

    /// `{"type":"chat","text":"..."}`
    Chat { text: String },

    /// `{"type":"start_voting"}`
    StartVoting,

    /// Any other `type`, kept byte-for-byte.
    Raw(Vec<u8>),
}

#[derive(Deserialize)]
struct NominationPayload {
    role: String,
}

#[derive(Deserialize)]
struct ChatPayload {
    text: String,
}

impl ClientMessage {
    /// Decodes one inbound frame.
    ///
    /// # Errors
    /// - [`ProtocolError::Decode`] if the bytes are not JSON, or a known
    ///   type is missing its field (`role`, `text`) or has it as a non-string.
    /// - [`ProtocolError::InvalidMessage`] if there is no string `type`.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let value: Value =
            serde_json::from_slice(data).map_err(ProtocolError::Decode)?;

        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.as_str(),
            Some(_) => {
                return Err(ProtocolError::InvalidMessage(
                    "`type` must be a string".into(),
                ));
            }
            None => {
                return Err(ProtocolError::InvalidMessage(
                    "missing `type` discriminator".into(),
                ));
            }
        };

        match kind {
            "start_countdown" => Ok(Self::StartCountdown),
            "nomination" => {
                let payload = NominationPayload::deserialize(&value)
                    .map_err(ProtocolError::Decode)?;
                Ok(Self::Nomination { role: payload.role })
            }
            "start_campaigning" => Ok(Self::StartCampaigning),
            "chat" => {
                let payload = ChatPayload::deserialize(&value)
                    .map_err(ProtocolError::Decode)?;
                Ok(Self::Chat { text: payload.text })
            }
            "start_voting" => Ok(Self::StartVoting),
            _ => Ok(Self::Raw(data.to_vec())),
        }
    }

    /// Short name of the variant, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StartCountdown => "start_countdown",
            Self::Nomination { .. } => "nomination",
            Self::StartCampaigning => "start_campaigning",
            Self::Chat { .. } => "chat",
            Self::StartVoting => "start_voting",
            Self::Raw(_) => "raw",
        }
    }
}

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// A message the server fans out to every bound connection in a room.
///
/// Internally tagged, so `CampaignTimer { time: 5 }` is
/// `{"type":"campaign_timer","time":5}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A client asked for the pre-game countdown.
    StartCountdown,

    /// `player` (display name) wants `role`.
    Nomination { player: String, role: String },

    /// The campaigning phase has begun.
    StartCampaigning,

    /// Seconds left in the campaign.
    CampaignTimer { time: u32 },

    /// Voting is open over `options`.
    StartVoting { options: Vec<String> },

    /// A chat line, attributed to the sender's display name.
    Chat { from: String, text: String },

    /// Someone joined the room.
    PlayerJoined { name: String },
}

impl ServerMessage {
    /// `start_voting` carrying the full [`ROLE_OPTIONS`] catalogue.
    pub fn start_voting() -> Self {
        Self::StartVoting {
            options: ROLE_OPTIONS.iter().map(|r| (*r).to_string()).collect(),
        }
    }

    /// Serializes the message to JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }
}
