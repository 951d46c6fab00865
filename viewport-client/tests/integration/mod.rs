pub mod channel_tests;
pub mod coordinator_tests;

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Level;

use viewport_client::{
    ChannelEvent, ChannelSink, Command, CoordinatorControl, SessionConfig, SignalingCoordinator,
    SinkEvent,
};

use crate::utils::{FakePeerProvider, MockSignalingOutput};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A coordinator running on its own task, fed by a hand-driven channel.
pub struct TestCoordinator {
    pub channel_tx: mpsc::UnboundedSender<ChannelEvent>,
    pub sent_rx: mpsc::UnboundedReceiver<Command>,
    pub sink_rx: mpsc::UnboundedReceiver<SinkEvent>,
    pub output: MockSignalingOutput,
    pub control: CoordinatorControl,
    pub task: JoinHandle<()>,
}

pub fn create_test_coordinator(provider: &FakePeerProvider) -> TestCoordinator {
    let (channel_tx, channel_rx) = mpsc::unbounded_channel();
    let (output, sent_rx) = MockSignalingOutput::new();
    let (sink, sink_rx) = ChannelSink::new();

    let coordinator = SignalingCoordinator::new(
        Arc::new(provider.clone()),
        SessionConfig::default(),
        Arc::new(output.clone()),
        Arc::new(sink),
    );
    let control = coordinator.control();

    let task = tokio::spawn(async move {
        coordinator.run(channel_rx).await;
    });

    TestCoordinator {
        channel_tx,
        sent_rx,
        sink_rx,
        output,
        control,
        task,
    }
}
