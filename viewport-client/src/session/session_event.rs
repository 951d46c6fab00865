use crate::error::Result;
use crate::sink::StreamHandle;
use tokio::sync::mpsc;
use tracing::debug;
use viewport_core::{IceCandidate, SessionDescription, SessionId};

#[derive(Debug)]
pub enum SessionEventKind {
    /// A local candidate was gathered; `None` marks the end of gathering.
    LocalCandidate(Option<IceCandidate>),
    RemoteStreamAdded(StreamHandle),
    RemoteStreamRemoved,
    RemoteDescriptionSet(Result<()>),
    /// The answer was created and installed as the local description.
    AnswerReady(Result<SessionDescription>),
}

impl SessionEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEventKind::LocalCandidate(_) => "local-candidate",
            SessionEventKind::RemoteStreamAdded(_) => "remote-stream-added",
            SessionEventKind::RemoteStreamRemoved => "remote-stream-removed",
            SessionEventKind::RemoteDescriptionSet(_) => "remote-description-set",
            SessionEventKind::AnswerReady(_) => "answer-ready",
        }
    }
}

/// Peer callback or operation completion, tagged with the session it
/// belongs to.
#[derive(Debug)]
pub struct SessionEvent {
    pub session: SessionId,
    pub kind: SessionEventKind,
}

/// Handle through which a peer connection and its pending operations post
/// events back to the coordinator.
#[derive(Clone)]
pub struct PeerEvents {
    session: SessionId,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl PeerEvents {
    pub(crate) fn new(session: SessionId, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    fn emit(&self, kind: SessionEventKind) {
        let name = kind.name();
        let event = SessionEvent {
            session: self.session,
            kind,
        };
        if self.tx.send(event).is_err() {
            debug!("Dropped {} for session {}: coordinator gone", name, self.session);
        }
    }

    pub fn local_candidate(&self, candidate: Option<IceCandidate>) {
        self.emit(SessionEventKind::LocalCandidate(candidate));
    }

    pub fn remote_stream_added(&self, stream: StreamHandle) {
        self.emit(SessionEventKind::RemoteStreamAdded(stream));
    }

    pub fn remote_stream_removed(&self) {
        self.emit(SessionEventKind::RemoteStreamRemoved);
    }

    pub(crate) fn remote_description_set(&self, result: Result<()>) {
        self.emit(SessionEventKind::RemoteDescriptionSet(result));
    }

    pub(crate) fn answer_ready(&self, result: Result<SessionDescription>) {
        self.emit(SessionEventKind::AnswerReady(result));
    }
}
