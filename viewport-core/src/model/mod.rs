mod command;
mod ice_candidate;
mod session;
mod session_description;
mod signaling;

pub use command::{Command, CommandKind};
pub use ice_candidate::IceCandidate;
pub use session::SessionId;
pub use session_description::{SdpType, SessionDescription};
pub use signaling::IceServerConfig;
