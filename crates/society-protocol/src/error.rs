//! Error types for the protocol layer.

/// Errors that can occur while decoding or encoding channel messages.
///
/// Every variant here is a "malformed message" from the room's point of
/// view: the message is logged and dropped, and the read loop continues.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outbound message failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The bytes were not valid JSON, or a known message type was missing
    /// a field or carried one with the wrong type.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but breaks a protocol rule, such as having no
    /// string `type` discriminator.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
