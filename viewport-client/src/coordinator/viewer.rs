use crate::channel::SignalChannel;
use crate::config::ClientConfig;
use crate::coordinator::{CoordinatorControl, SignalingCoordinator};
use crate::error::Result;
use crate::session::PeerConnectionProvider;
use crate::sink::MediaSink;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// A running viewer: one signaling channel plus the coordinator task that
/// owns its peer session.
pub struct Viewer {
    control: CoordinatorControl,
    task: JoinHandle<()>,
}

impl Viewer {
    /// Connect to the configured endpoint and start negotiating. Fails with
    /// a connection error when the channel cannot be opened; nothing is
    /// retried.
    pub async fn start(
        config: ClientConfig,
        provider: Arc<dyn PeerConnectionProvider>,
        sink: Arc<dyn MediaSink>,
    ) -> Result<Self> {
        let endpoint = config.endpoint();
        info!("Connecting to {}", endpoint);

        let (channel, events) = SignalChannel::connect(&endpoint).await?;
        let coordinator =
            SignalingCoordinator::new(provider, config.session_config(), Arc::new(channel), sink);
        let control = coordinator.control();
        let task = tokio::spawn(coordinator.run(events));

        Ok(Self { control, task })
    }

    pub fn control(&self) -> CoordinatorControl {
        self.control.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Close the peer session and the channel, then wait for the
    /// coordinator to exit.
    pub async fn stop(self) {
        self.control.stop().await;
        self.wait().await;
    }

    /// Wait until the coordinator exits on its own (channel closed).
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            warn!("Coordinator task ended abnormally: {}", e);
        }
    }
}
