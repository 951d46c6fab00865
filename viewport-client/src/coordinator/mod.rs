mod signaling_coordinator;
mod viewer;

pub use signaling_coordinator::{CoordinatorControl, SignalingCoordinator};
pub use viewer::Viewer;
