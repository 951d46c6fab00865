pub use viewport_core::model::SessionId;

pub mod model {
    pub use viewport_core::model::*;
    pub use viewport_core::utils::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use viewport_client::*;
}
