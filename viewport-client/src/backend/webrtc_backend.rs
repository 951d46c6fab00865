use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::session::{PeerConnection, PeerConnectionProvider, PeerEvents};
use crate::sink::StreamHandle;
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use viewport_core::{IceCandidate, SdpType, SessionDescription};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_H264, MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::{
    RTCRtpCodecCapability, RTCRtpCodecParameters, RTPCodecType,
};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::{RTCPFeedback, RTCRtpTransceiver, RTCRtpTransceiverInit};
use webrtc::track::track_remote::TrackRemote;

const H264_FMTP: &str =
    "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f";

/// Peer connections backed by webrtc-rs.
#[derive(Debug, Default, Clone)]
pub struct WebRtcProvider;

impl WebRtcProvider {
    pub fn new() -> Self {
        Self
    }
}

fn video_feedback() -> Vec<RTCPFeedback> {
    [("goog-remb", ""), ("ccm", "fir"), ("nack", ""), ("nack", "pli")]
        .into_iter()
        .map(|(typ, parameter)| RTCPFeedback {
            typ: typ.to_owned(),
            parameter: parameter.to_owned(),
        })
        .collect()
}

/// Only the kinds the viewer wants to receive get codecs, so the answer
/// rejects every other m-line of the offer.
fn build_media_engine(config: &SessionConfig) -> anyhow::Result<MediaEngine> {
    let mut m = MediaEngine::default();

    if config.receive_video {
        for (mime_type, payload_type, fmtp) in [(MIME_TYPE_VP8, 96, ""), (MIME_TYPE_H264, 102, H264_FMTP)] {
            m.register_codec(
                RTCRtpCodecParameters {
                    capability: RTCRtpCodecCapability {
                        mime_type: mime_type.to_owned(),
                        clock_rate: 90000,
                        channels: 0,
                        sdp_fmtp_line: fmtp.to_owned(),
                        rtcp_feedback: video_feedback(),
                    },
                    payload_type,
                    ..Default::default()
                },
                RTPCodecType::Video,
            )
            .with_context(|| format!("Failed to register {}", mime_type))?;
        }
    }

    if config.receive_audio {
        m.register_codec(
            RTCRtpCodecParameters {
                capability: RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    clock_rate: 48000,
                    channels: 2,
                    sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
                    rtcp_feedback: vec![],
                },
                payload_type: 111,
                ..Default::default()
            },
            RTPCodecType::Audio,
        )
        .context("Failed to register opus")?;
    }

    Ok(m)
}

fn recvonly() -> RTCRtpTransceiverInit {
    RTCRtpTransceiverInit {
        direction: RTCRtpTransceiverDirection::Recvonly,
        send_encodings: vec![],
    }
}

async fn new_peer_connection(
    config: &SessionConfig,
    events: PeerEvents,
) -> anyhow::Result<Arc<RTCPeerConnection>> {
    let mut m = build_media_engine(config)?;
    let registry = register_default_interceptors(Registry::new(), &mut m)?;

    let api = APIBuilder::new()
        .with_media_engine(m)
        .with_interceptor_registry(registry)
        .build();

    let rtc_config = RTCConfiguration {
        ice_servers: config
            .ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
            })
            .collect(),
        ..Default::default()
    };

    let peer_connection = Arc::new(
        api.new_peer_connection(rtc_config)
            .await
            .context("Failed to create peer connection")?,
    );

    if config.receive_video {
        peer_connection
            .add_transceiver_from_kind(RTPCodecType::Video, Some(recvonly()))
            .await?;
    }
    if config.receive_audio {
        peer_connection
            .add_transceiver_from_kind(RTPCodecType::Audio, Some(recvonly()))
            .await?;
    }

    let session = events.session();

    let ice_events = events.clone();
    peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
        let events = ice_events.clone();

        Box::pin(async move {
            let Some(candidate) = c else {
                events.local_candidate(None);
                return;
            };
            match candidate.to_json() {
                Ok(init) => events.local_candidate(Some(from_candidate_init(init))),
                Err(e) => warn!("Failed to serialize local candidate: {}", e),
            }
        })
    }));

    let track_events = events.clone();
    peer_connection.on_track(Box::new(
        move |track: Arc<TrackRemote>,
              _receiver: Arc<RTCRtpReceiver>,
              _transceiver: Arc<RTCRtpTransceiver>| {
            let events = track_events.clone();

            Box::pin(async move {
                info!(
                    "Session {}: remote {} track on stream {}",
                    events.session(),
                    track.kind(),
                    track.stream_id()
                );
                let stream = StreamHandle::new(track.stream_id()).with_track(track);
                events.remote_stream_added(stream);
            })
        },
    ));

    let state_events = events;
    peer_connection.on_peer_connection_state_change(Box::new(
        move |s: RTCPeerConnectionState| {
            let events = state_events.clone();

            Box::pin(async move {
                info!("Session {}: peer connection state {}", events.session(), s);
                if ends_remote_stream(s) {
                    events.remote_stream_removed();
                }
            })
        },
    ));

    debug!("Session {}: peer connection ready", session);
    Ok(peer_connection)
}

/// `Disconnected` is left out: ICE consent checks can bring the connection
/// back to `Connected`, and `on_track` does not fire again when they do.
fn ends_remote_stream(state: RTCPeerConnectionState) -> bool {
    matches!(
        state,
        RTCPeerConnectionState::Failed | RTCPeerConnectionState::Closed
    )
}

fn from_candidate_init(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        sdp_m_line_index: init.sdp_mline_index.unwrap_or_default(),
        sdp_mid: init.sdp_mid,
        candidate: init.candidate,
    }
}

fn to_candidate_init(candidate: IceCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.candidate,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: Some(candidate.sdp_m_line_index),
        ..Default::default()
    }
}

fn to_rtc_description(desc: SessionDescription) -> webrtc::error::Result<RTCSessionDescription> {
    match desc.sdp_type {
        SdpType::Offer => RTCSessionDescription::offer(desc.sdp),
        SdpType::Answer => RTCSessionDescription::answer(desc.sdp),
    }
}

fn from_rtc_description(desc: RTCSessionDescription) -> Result<SessionDescription> {
    match desc.sdp_type {
        RTCSdpType::Offer => Ok(SessionDescription::offer(desc.sdp)),
        RTCSdpType::Answer => Ok(SessionDescription::answer(desc.sdp)),
        other => Err(Error::description(format!(
            "unsupported description type {}",
            other
        ))),
    }
}

struct WebRtcPeer {
    peer_connection: Arc<RTCPeerConnection>,
}

#[async_trait]
impl PeerConnection for WebRtcPeer {
    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        let desc = to_rtc_description(desc).map_err(Error::description)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .map_err(Error::description)
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(Error::description)?;
        from_rtc_description(answer)
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        let desc = to_rtc_description(desc).map_err(Error::description)?;
        self.peer_connection
            .set_local_description(desc)
            .await
            .map_err(Error::description)
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(to_candidate_init(candidate))
            .await
            .map_err(Error::candidate)
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection
            .close()
            .await
            .map_err(|e| Error::connection(format!("failed to close peer connection: {}", e)))
    }
}

#[async_trait]
impl PeerConnectionProvider for WebRtcProvider {
    fn name(&self) -> &'static str {
        "webrtc-rs"
    }

    async fn create(
        &self,
        config: &SessionConfig,
        events: PeerEvents,
    ) -> Result<Arc<dyn PeerConnection>> {
        let peer_connection = new_peer_connection(config, events)
            .await
            .map_err(|e| Error::peer_creation(format!("{:#}", e)))?;

        Ok(Arc::new(WebRtcPeer { peer_connection }))
    }
}
