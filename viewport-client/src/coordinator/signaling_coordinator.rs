use crate::channel::{ChannelEvent, ChannelEvents, SignalingOutput};
use crate::config::SessionConfig;
use crate::error::Error;
use crate::session::{PeerConnectionProvider, PeerSession, SessionEvent, SessionEventKind, SessionState};
use crate::sink::MediaSink;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use viewport_core::{Command, CommandKind, SessionId};

#[derive(Debug)]
enum ControlRequest {
    Stop,
}

/// Cloneable handle for steering a running coordinator from outside.
#[derive(Clone)]
pub struct CoordinatorControl {
    tx: mpsc::Sender<ControlRequest>,
}

impl CoordinatorControl {
    /// Ask the coordinator to close the session and the channel. Returns once
    /// the request is queued; a coordinator that already stopped ignores it.
    pub async fn stop(&self) {
        if self.tx.send(ControlRequest::Stop).await.is_err() {
            debug!("Coordinator already stopped");
        }
    }
}

/// Drives the signaling protocol for one channel connection.
///
/// The coordinator is the sole owner of the [`PeerSession`]: channel events,
/// peer callbacks, operation completions and control requests are all
/// handled one at a time inside [`run`](Self::run).
pub struct SignalingCoordinator {
    provider: Arc<dyn PeerConnectionProvider>,
    config: SessionConfig,
    output: Arc<dyn SignalingOutput>,
    sink: Arc<dyn MediaSink>,
    session: Option<PeerSession>,
    session_tx: mpsc::UnboundedSender<SessionEvent>,
    session_rx: mpsc::UnboundedReceiver<SessionEvent>,
    control_tx: mpsc::Sender<ControlRequest>,
    control_rx: mpsc::Receiver<ControlRequest>,
}

impl SignalingCoordinator {
    pub fn new(
        provider: Arc<dyn PeerConnectionProvider>,
        config: SessionConfig,
        output: Arc<dyn SignalingOutput>,
        sink: Arc<dyn MediaSink>,
    ) -> Self {
        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let (control_tx, control_rx) = mpsc::channel(8);

        Self {
            provider,
            config,
            output,
            sink,
            session: None,
            session_tx,
            session_rx,
            control_tx,
            control_rx,
        }
    }

    pub fn control(&self) -> CoordinatorControl {
        CoordinatorControl {
            tx: self.control_tx.clone(),
        }
    }

    /// State of the current session, `Idle` when there is none.
    pub fn session_state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(PeerSession::state)
            .unwrap_or(SessionState::Idle)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(PeerSession::id)
    }

    /// Process events until the channel closes or a stop is requested.
    pub async fn run(mut self, mut channel: ChannelEvents) {
        info!("Signaling coordinator started");

        loop {
            tokio::select! {
                evt = channel.recv() => {
                    let evt = evt.unwrap_or(ChannelEvent::Closed { error: None });
                    if self.handle_channel_event(evt).await.is_break() {
                        break;
                    }
                }

                Some(evt) = self.session_rx.recv() => {
                    self.handle_session_event(evt).await;
                }

                Some(req) = self.control_rx.recv() => {
                    match req {
                        ControlRequest::Stop => {
                            info!("Stop requested");
                            let _ = self.teardown().await;
                            self.output.close().await;
                            break;
                        }
                    }
                }
            }
        }

        info!("Signaling coordinator finished");
    }

    async fn handle_channel_event(&mut self, event: ChannelEvent) -> ControlFlow<()> {
        match event {
            ChannelEvent::Opened => self.on_channel_open().await,

            ChannelEvent::Command(command) => self.handle_command(command).await,

            ChannelEvent::Closed { error } => {
                if let Some(e) = error {
                    error!("Signaling channel dropped: {}", e);
                    self.sink.on_notification(&e.to_string()).await;
                }
                if !self.teardown().await {
                    self.sink.on_disconnected().await;
                }
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    async fn on_channel_open(&mut self) {
        if self.session.is_some() {
            warn!("Channel reported open twice; keeping the current session");
            return;
        }

        match PeerSession::create(&*self.provider, &self.config, self.session_tx.clone()).await {
            Ok(session) => {
                self.session = Some(session);
                send(&self.output, Command::request_offer()).await;
            }
            Err(e) => {
                error!("Failed to create peer connection: {}", e);
                self.sink
                    .on_notification(&format!("Failed to create peer connection: {}", e))
                    .await;
            }
        }
    }

    async fn handle_command(&mut self, command: Command) {
        debug!("Handling {} push", command.id);

        match command.id {
            CommandKind::Offer => self.on_remote_offer(command).await,
            CommandKind::Answer => {}
            CommandKind::Message => self.sink.on_notification(command.text()).await,
            CommandKind::GetIceCandidate => self.on_remote_candidates(command).await,
            CommandKind::AddIceCandidate => {}
        }
    }

    async fn on_remote_offer(&mut self, command: Command) {
        let offer = match command.session_description() {
            Ok(offer) => offer,
            Err(e) => {
                debug!("Ignoring offer push: {}", e);
                return;
            }
        };

        let Some(session) = self.session.as_mut() else {
            warn!("Offer received without a live session");
            return;
        };

        match session.set_remote_description(offer) {
            Ok(()) => {}
            Err(Error::Protocol(msg)) => warn!("Ignoring offer: {}", msg),
            Err(e) => {
                error!("Failed to set remote description: {}", e);
                self.sink
                    .on_notification(&format!("Failed to setRemoteDescription: {}", e))
                    .await;
            }
        }
    }

    async fn on_remote_candidates(&mut self, command: Command) {
        let entries = match command.ice_candidate_entries() {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Ignoring candidate list: {}", e);
                return;
            }
        };

        let Some(session) = self.session.as_ref() else {
            warn!("Dropping {} remote candidates: no session", entries.len());
            return;
        };

        info!("Adding {} remote ICE candidates", entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let candidate = match entry {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!("Skipping remote candidate #{}: {}", index, e);
                    continue;
                }
            };
            let line = candidate.candidate.clone();
            match session.add_remote_ice_candidate(candidate).await {
                Ok(()) => debug!("IceCandidate added: {}", line),
                Err(e) => warn!("addIceCandidate error: {}", e),
            }
        }
    }

    async fn handle_session_event(&mut self, event: SessionEvent) {
        let SessionEvent { session: id, kind } = event;

        let Some(session) = self.session.as_mut().filter(|s| s.accepts(id)) else {
            debug!("Dropping {} for stale session {}", kind.name(), id);
            return;
        };

        match kind {
            SessionEventKind::LocalCandidate(Some(candidate)) => {
                match Command::add_ice_candidate(&candidate) {
                    Ok(command) => send(&self.output, command).await,
                    Err(e) => warn!("Failed to encode local candidate: {}", e),
                }
            }

            SessionEventKind::LocalCandidate(None) => {
                debug!("End of candidates for session {}", id);
            }

            SessionEventKind::RemoteDescriptionSet(result) => {
                if let Err(e) = session.on_remote_description_set(result) {
                    self.report_negotiation_error("Failed to setRemoteDescription", e)
                        .await;
                }
            }

            SessionEventKind::AnswerReady(result) => match session.on_answer_ready(result) {
                Ok(answer) => match Command::answer(&answer) {
                    Ok(command) => {
                        info!("Sending answer for session {}", id);
                        send(&self.output, command).await;
                        send(&self.output, Command::request_ice_candidates()).await;
                    }
                    Err(e) => error!("Failed to encode answer: {}", e),
                },
                Err(e) => {
                    self.report_negotiation_error("Failed to createAnswer", e)
                        .await;
                }
            },

            SessionEventKind::RemoteStreamAdded(stream) => {
                if session.on_remote_stream_added() {
                    info!("Remote stream added: {}", stream.stream_id());
                    self.sink.on_connected(stream).await;
                }
            }

            SessionEventKind::RemoteStreamRemoved => {
                if session.on_remote_stream_removed() {
                    info!("Remote stream removed");
                    self.sink.on_disconnected().await;
                }
            }
        }
    }

    async fn report_negotiation_error(&self, context: &str, e: Error) {
        if let Error::Protocol(msg) = &e {
            debug!("{}: {}", context, msg);
            return;
        }
        error!("{}: {}", context, e);
        self.sink.on_notification(&format!("{}: {}", context, e)).await;
    }

    /// Close and drop the session. Returns true when the sink was told the
    /// stream went away.
    async fn teardown(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };

        let was_connected = session.state() == SessionState::Connected;
        if let Err(e) = session.close().await {
            warn!("Error closing peer session {}: {}", session.id(), e);
        }
        info!("Peer session {} closed", session.id());

        if was_connected {
            self.sink.on_disconnected().await;
        }
        was_connected
    }
}

async fn send(output: &Arc<dyn SignalingOutput>, command: Command) {
    let id = command.id;
    if let Err(e) = output.send(command).await {
        warn!("Failed to send {} command: {}", id, e);
    }
}
