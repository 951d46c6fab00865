//! Error taxonomy of the signaling client.

use thiserror::Error;
use viewport_core::WireError;

/// Result type alias using the client's error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The signaling channel could not be opened or dropped with a transport error.
    #[error("connection error: {0}")]
    Connection(String),

    /// A send was attempted after the channel shut down.
    #[error("signaling channel closed")]
    ChannelClosed,

    /// The peer connection could not be allocated.
    #[error("failed to create peer connection: {0}")]
    PeerCreation(String),

    /// The peer connection rejected a remote or local description.
    #[error("description error: {0}")]
    Description(String),

    /// A single remote ICE candidate could not be added.
    #[error("candidate error: {0}")]
    Candidate(String),

    /// No peer-connection implementation is available.
    #[error("peer connection capability missing: {0}")]
    CapabilityMissing(String),

    /// A command arrived that the session cannot accept in its current state.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Wire(#[from] WireError),
}

impl Error {
    pub fn connection(msg: impl std::fmt::Display) -> Self {
        Self::Connection(msg.to_string())
    }

    pub fn peer_creation(msg: impl std::fmt::Display) -> Self {
        Self::PeerCreation(msg.to_string())
    }

    pub fn description(msg: impl std::fmt::Display) -> Self {
        Self::Description(msg.to_string())
    }

    pub fn candidate(msg: impl std::fmt::Display) -> Self {
        Self::Candidate(msg.to_string())
    }

    pub fn capability_missing(msg: impl std::fmt::Display) -> Self {
        Self::CapabilityMissing(msg.to_string())
    }

    pub fn protocol(msg: impl std::fmt::Display) -> Self {
        Self::Protocol(msg.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Connection(e.to_string())
    }
}
