mod channel_event;
mod signal_channel;
mod signaling_output;

pub use channel_event::{ChannelEvent, ChannelEvents};
pub use signal_channel::SignalChannel;
pub use signaling_output::SignalingOutput;
