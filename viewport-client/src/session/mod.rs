mod peer_connection;
mod peer_session;
mod session_event;
mod session_state;


pub use peer_connection::{PeerConnection, PeerConnectionProvider};
pub use peer_session::PeerSession;
pub use session_event::{PeerEvents, SessionEvent, SessionEventKind};
pub use session_state::SessionState;
