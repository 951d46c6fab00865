use std::fmt;

#[cfg(feature = "webrtc")]
use std::sync::Arc;
#[cfg(feature = "webrtc")]
use webrtc::track::track_remote::TrackRemote;

/// The negotiated remote media stream, as handed to a [`MediaSink`](crate::MediaSink).
#[derive(Clone)]
pub struct StreamHandle {
    stream_id: String,
    #[cfg(feature = "webrtc")]
    track: Option<Arc<TrackRemote>>,
}

impl StreamHandle {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            #[cfg(feature = "webrtc")]
            track: None,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    #[cfg(feature = "webrtc")]
    pub fn with_track(mut self, track: Arc<TrackRemote>) -> Self {
        self.track = Some(track);
        self
    }

    /// The remote video track, readable with `read_rtp`.
    #[cfg(feature = "webrtc")]
    pub fn track(&self) -> Option<Arc<TrackRemote>> {
        self.track.clone()
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("StreamHandle");
        s.field("stream_id", &self.stream_id);
        #[cfg(feature = "webrtc")]
        s.field("has_track", &self.track.is_some());
        s.finish()
    }
}
