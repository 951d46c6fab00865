mod media_sink;
mod stream_handle;

pub use media_sink::{ChannelSink, MediaSink, SinkEvent};
pub use stream_handle::StreamHandle;
