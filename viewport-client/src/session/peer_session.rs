use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::session::{PeerConnection, PeerConnectionProvider, PeerEvents, SessionEvent, SessionState};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use viewport_core::{IceCandidate, SessionDescription, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp {
    RemoteDescription,
    Answer,
}

/// One peer-connection lifecycle.
///
/// The session is owned by a single task. Operations that suspend
/// (installing the remote offer, creating the answer) are spawned, and their
/// results come back as [`SessionEvent`]s that the owner feeds into
/// [`on_remote_description_set`](Self::on_remote_description_set) and
/// [`on_answer_ready`](Self::on_answer_ready).
pub struct PeerSession {
    id: SessionId,
    state: SessionState,
    pending: Option<PendingOp>,
    connection: Arc<dyn PeerConnection>,
    events: PeerEvents,
}

impl PeerSession {
    pub async fn create(
        provider: &dyn PeerConnectionProvider,
        config: &SessionConfig,
        events_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Result<Self> {
        let id = SessionId::new();
        let events = PeerEvents::new(id, events_tx);
        let connection = provider.create(config, events.clone()).await?;

        info!("Peer session {} created ({})", id, provider.name());

        Ok(Self {
            id,
            state: SessionState::Created,
            pending: None,
            connection,
            events,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Whether an event tagged with `session` should still be acted upon.
    pub fn accepts(&self, session: SessionId) -> bool {
        self.id == session && !self.is_closed()
    }

    /// Start installing the server's offer. Only valid from `Created` with no
    /// other description operation in flight.
    pub fn set_remote_description(&mut self, offer: SessionDescription) -> Result<()> {
        if self.state != SessionState::Created || self.pending.is_some() {
            return Err(Error::protocol(format!(
                "offer received while session {} is {}",
                self.id, self.state
            )));
        }
        if !offer.is_offer() {
            self.state = SessionState::Failed;
            return Err(Error::description("remote description is not an offer"));
        }

        self.pending = Some(PendingOp::RemoteDescription);

        let connection = self.connection.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = connection.set_remote_description(offer).await;
            events.remote_description_set(result);
        });

        Ok(())
    }

    /// Completion of [`set_remote_description`](Self::set_remote_description).
    /// On success the answer is started right away.
    pub fn on_remote_description_set(&mut self, result: Result<()>) -> Result<()> {
        self.take_pending(PendingOp::RemoteDescription)?;

        match result {
            Ok(()) => {
                self.state = SessionState::RemoteDescSet;
                debug!("Session {}: remote description set", self.id);
                self.create_answer();
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    fn create_answer(&mut self) {
        self.pending = Some(PendingOp::Answer);

        let connection = self.connection.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = async {
                let answer = connection.create_answer().await?;
                connection.set_local_description(answer.clone()).await?;
                Ok::<_, Error>(answer)
            }
            .await;
            events.answer_ready(result);
        });
    }

    /// Completion of answer creation. Returns the answer to transmit; it has
    /// already been installed as the local description.
    pub fn on_answer_ready(
        &mut self,
        result: Result<SessionDescription>,
    ) -> Result<SessionDescription> {
        self.take_pending(PendingOp::Answer)?;

        match result {
            Ok(answer) => {
                self.state = SessionState::LocalDescSet;
                debug!("Session {}: local description set", self.id);
                Ok(answer)
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    fn take_pending(&mut self, expected: PendingOp) -> Result<()> {
        match self.pending {
            Some(op) if op == expected => {
                self.pending = None;
                Ok(())
            }
            other => Err(Error::protocol(format!(
                "unexpected {:?} completion (pending: {:?})",
                expected, other
            ))),
        }
    }

    pub async fn add_remote_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        if !self.state.accepts_candidates() {
            return Err(Error::candidate(format!(
                "session {} is {}",
                self.id, self.state
            )));
        }
        self.connection.add_ice_candidate(candidate).await
    }

    /// Returns true when the session moved to `Connected`.
    pub fn on_remote_stream_added(&mut self) -> bool {
        match self.state {
            SessionState::Created | SessionState::RemoteDescSet | SessionState::LocalDescSet => {
                self.state = SessionState::Connected;
                true
            }
            _ => false,
        }
    }

    /// Returns true when the session left `Connected`.
    pub fn on_remote_stream_removed(&mut self) -> bool {
        if self.state == SessionState::Connected {
            self.state = SessionState::LocalDescSet;
            true
        } else {
            false
        }
    }

    /// Release the peer connection. Safe to call any number of times; only
    /// the first call reaches the connection.
    pub async fn close(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.state = SessionState::Closed;
        self.pending = None;
        self.connection.close().await
    }
}
