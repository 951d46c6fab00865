use anyhow::{Context, Result};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use viewport_client::{Command, CommandKind, IceCandidate, SessionDescription};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::media::Sample;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

use super::mock_media_server::MockMediaServer;

pub const TEST_STREAM_ID: &str = "viewport-test";

/// Media source side of a negotiation: a webrtc-rs offerer sending a VP8
/// track, driven by the requests arriving at a [`MockMediaServer`].
pub struct TestSource {
    peer_connection: Arc<RTCPeerConnection>,
    track: Arc<TrackLocalStaticSample>,
    local_candidates: Arc<Mutex<Vec<IceCandidate>>>,
    requests_seen: Arc<Mutex<Vec<CommandKind>>>,
}

impl TestSource {
    pub async fn new() -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let peer_connection = Arc::new(
            api.new_peer_connection(RTCConfiguration::default())
                .await
                .context("Failed to create source peer connection")?,
        );

        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                ..Default::default()
            },
            "video".to_owned(),
            TEST_STREAM_ID.to_owned(),
        ));
        peer_connection
            .add_track(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>)
            .await
            .context("Failed to add video track")?;

        let local_candidates = Arc::new(Mutex::new(Vec::new()));
        let candidates_clone = Arc::clone(&local_candidates);
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let candidates = Arc::clone(&candidates_clone);
            Box::pin(async move {
                if let Some(c) = c {
                    if let Ok(init) = c.to_json() {
                        tracing::debug!("[TestSource] ICE candidate generated");
                        candidates.lock().await.push(IceCandidate::new(
                            init.sdp_mline_index.unwrap_or_default(),
                            init.sdp_mid,
                            init.candidate,
                        ));
                    }
                }
            })
        }));

        peer_connection.on_peer_connection_state_change(Box::new(move |state| {
            Box::pin(async move {
                tracing::debug!("[TestSource] Connection state: {:?}", state);
            })
        }));

        Ok(Self {
            peer_connection,
            track,
            local_candidates,
            requests_seen: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Kinds of every request received from the viewer, in arrival order.
    pub async fn requests_seen(&self) -> Vec<CommandKind> {
        self.requests_seen.lock().await.clone()
    }

    async fn create_offer(&self) -> Result<String> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;

        let mut gathering_complete = self.peer_connection.gathering_complete_promise().await;
        self.peer_connection
            .set_local_description(offer)
            .await
            .context("Failed to set local description")?;
        let _ = tokio::time::timeout(Duration::from_secs(3), gathering_complete.recv()).await;

        let local = self
            .peer_connection
            .local_description()
            .await
            .context("No local description")?;
        Ok(local.sdp)
    }

    async fn handle_request(&self, server: &MockMediaServer, request: Command) -> Result<()> {
        self.requests_seen.lock().await.push(request.id);

        match request.id {
            CommandKind::Offer => {
                let sdp = self.create_offer().await?;
                server
                    .push
                    .command(&Command::offer(&SessionDescription::offer(sdp))?)?;
            }
            CommandKind::Answer => {
                let answer = request.session_description()?;
                self.peer_connection
                    .set_remote_description(RTCSessionDescription::answer(answer.sdp)?)
                    .await
                    .context("Failed to set remote answer")?;
            }
            CommandKind::AddIceCandidate => {
                let candidate = request.ice_candidate()?;
                let init = RTCIceCandidateInit {
                    candidate: candidate.candidate,
                    sdp_mid: candidate.sdp_mid,
                    sdp_mline_index: Some(candidate.sdp_m_line_index),
                    ..Default::default()
                };
                if let Err(e) = self.peer_connection.add_ice_candidate(init).await {
                    tracing::warn!("[TestSource] Failed to add ICE candidate: {}", e);
                }
            }
            CommandKind::GetIceCandidate => {
                let candidates = self.local_candidates.lock().await.clone();
                server.push.command(&Command::candidate_list(&candidates)?)?;
            }
            CommandKind::Message => {}
        }
        Ok(())
    }

    /// Answer viewer requests and stream samples until the task is aborted.
    pub fn serve(self: Arc<Self>, mut server: MockMediaServer) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(33));

            loop {
                tokio::select! {
                    request = server.requests.recv() => {
                        let Some(request) = request else { break };
                        if let Err(e) = self.handle_request(&server, request).await {
                            tracing::warn!("[TestSource] request failed: {:#}", e);
                        }
                    }

                    _ = ticker.tick() => {
                        let sample = Sample {
                            data: Bytes::from_static(&[0x10, 0x02, 0x00, 0x9d, 0x01, 0x2a]),
                            duration: Duration::from_millis(33),
                            ..Default::default()
                        };
                        if let Err(e) = self.track.write_sample(&sample).await {
                            tracing::debug!("[TestSource] write_sample: {}", e);
                        }
                    }
                }
            }
        })
    }

    pub async fn close(&self) -> Result<()> {
        self.peer_connection
            .close()
            .await
            .context("Failed to close source peer connection")?;
        Ok(())
    }
}
