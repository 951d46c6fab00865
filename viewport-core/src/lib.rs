//! Wire model shared by the viewport signaling client and any media server
//! that wants to speak the `/stream/webrtc` command protocol.

pub mod model;
pub mod utils;

mod error;

pub use error::WireError;
pub use model::*;
