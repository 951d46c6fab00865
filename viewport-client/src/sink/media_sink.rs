use crate::sink::StreamHandle;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

/// Outward event surface of the coordinator.
#[async_trait]
pub trait MediaSink: Send + Sync + 'static {
    /// The remote stream is live and can be rendered.
    async fn on_connected(&self, stream: StreamHandle);

    /// The remote stream went away.
    async fn on_disconnected(&self);

    /// Text meant for the user: server messages and surfaced errors.
    async fn on_notification(&self, text: &str);
}

#[derive(Debug)]
pub enum SinkEvent {
    Connected(StreamHandle),
    Disconnected,
    Notification(String),
}

/// A [`MediaSink`] that forwards every event into an mpsc channel.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            debug!("Sink receiver dropped");
        }
    }
}

#[async_trait]
impl MediaSink for ChannelSink {
    async fn on_connected(&self, stream: StreamHandle) {
        self.forward(SinkEvent::Connected(stream));
    }

    async fn on_disconnected(&self) {
        self.forward(SinkEvent::Disconnected);
    }

    async fn on_notification(&self, text: &str) {
        self.forward(SinkEvent::Notification(text.to_owned()));
    }
}
