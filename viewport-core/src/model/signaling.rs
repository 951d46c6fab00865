use crate::utils::{DEFAULT_STUN_ADDR, HOST_STUN_PORT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: None,
            credential: None,
        }
    }

    /// The bundled public STUN server plus the one running next to the
    /// signaling host, grouped in a single server entry.
    pub fn for_signaling_host(host: &str) -> Self {
        Self::stun(vec![
            DEFAULT_STUN_ADDR.to_owned(),
            format!("stun:{}:{}", host, HOST_STUN_PORT),
        ])
    }
}
