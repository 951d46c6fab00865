use crate::error::Result;
use async_trait::async_trait;
use viewport_core::Command;

/// Outgoing half of the signaling channel, as seen by the coordinator.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Queue a command for the server. Commands leave in call order.
    async fn send(&self, command: Command) -> Result<()>;

    /// Close the channel. Calling it again is a no-op.
    async fn close(&self);
}
