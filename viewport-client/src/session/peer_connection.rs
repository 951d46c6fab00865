use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::PeerEvents;
use async_trait::async_trait;
use std::sync::Arc;
use viewport_core::{IceCandidate, SessionDescription};

/// The operations the signaling flow needs from a WebRTC peer connection.
///
/// Implementations report local candidates and remote stream changes through
/// the [`PeerEvents`] handed to [`PeerConnectionProvider::create`].
#[async_trait]
pub trait PeerConnection: Send + Sync + 'static {
    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Source of peer connections, resolved once at startup.
#[async_trait]
pub trait PeerConnectionProvider: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn create(
        &self,
        config: &SessionConfig,
        events: PeerEvents,
    ) -> Result<Arc<dyn PeerConnection>>;
}
