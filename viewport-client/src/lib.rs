//! Client side of the `/stream/webrtc` signaling protocol.
//!
//! A [`Viewer`] opens a [`SignalChannel`], and a [`SignalingCoordinator`]
//! drives one [`PeerSession`] through offer, answer and ICE trickling until
//! the remote video stream reaches the [`MediaSink`].

mod backend;
mod channel;
mod config;
mod coordinator;
mod error;
mod session;
mod sink;

#[cfg(feature = "webrtc")]
pub use backend::WebRtcProvider;
pub use backend::default_provider;
pub use channel::{ChannelEvent, ChannelEvents, SignalChannel, SignalingOutput};
pub use config::{ClientConfig, SessionConfig};
pub use coordinator::{CoordinatorControl, SignalingCoordinator, Viewer};
pub use error::{Error, Result};
pub use session::{
    PeerConnection, PeerConnectionProvider, PeerEvents, PeerSession, SessionEvent,
    SessionEventKind, SessionState,
};
pub use sink::{ChannelSink, MediaSink, SinkEvent, StreamHandle};
pub use viewport_core::{
    Command, CommandKind, IceCandidate, IceServerConfig, SdpType, SessionDescription, SessionId,
};
