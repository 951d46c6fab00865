use std::fmt;

/// Lifecycle of a [`PeerSession`](crate::PeerSession).
///
/// `Created → RemoteDescSet → LocalDescSet → Connected → Closed`, with
/// `Connected` falling back to `LocalDescSet` when the remote stream goes
/// away. `Failed` is entered when a description is rejected; the session is
/// then unusable but still has to be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Created,
    RemoteDescSet,
    LocalDescSet,
    Connected,
    Failed,
    Closed,
}

impl SessionState {
    /// States in which remote ICE candidates may be handed to the connection.
    pub fn accepts_candidates(&self) -> bool {
        !matches!(self, SessionState::Idle | SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Created => "created",
            SessionState::RemoteDescSet => "remote-desc-set",
            SessionState::LocalDescSet => "answered",
            SessionState::Connected => "connected",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
