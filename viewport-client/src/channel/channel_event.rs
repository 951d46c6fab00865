use crate::error::Error;
use tokio::sync::mpsc;
use viewport_core::Command;

/// What the signaling channel reports to its consumer.
#[derive(Debug)]
pub enum ChannelEvent {
    /// The socket is open. Always the first event.
    Opened,

    /// A push from the server that decoded to a known command.
    Command(Command),

    /// Terminal. Sent exactly once; `error` is set when the transport failed.
    Closed { error: Option<Error> },
}

/// Incoming side of a signaling channel. Unbounded; ends after `Closed`.
pub type ChannelEvents = mpsc::UnboundedReceiver<ChannelEvent>;
