#[cfg(feature = "webrtc")]
mod webrtc_backend;

#[cfg(feature = "webrtc")]
pub use webrtc_backend::WebRtcProvider;

use crate::error::Result;
use crate::session::PeerConnectionProvider;
use std::sync::Arc;

/// Resolve the peer-connection capability once at startup.
///
/// Fails with [`Error::CapabilityMissing`](crate::Error::CapabilityMissing)
/// when the crate was built without a backend; callers must not enter the
/// signaling flow in that case.
pub fn default_provider() -> Result<Arc<dyn PeerConnectionProvider>> {
    #[cfg(feature = "webrtc")]
    {
        Ok(Arc::new(WebRtcProvider::new()))
    }

    #[cfg(not(feature = "webrtc"))]
    {
        Err(crate::error::Error::capability_missing(
            "built without a peer-connection backend; enable the `webrtc` feature",
        ))
    }
}
