use viewport_core::IceServerConfig;
use viewport_core::utils::{DEFAULT_SIGNALING_PORT, DEFAULT_STUN_ADDR, SIGNALING_PATH};

/// Where to find the signaling endpoint and which ICE servers the peer
/// connection should use.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `host:port` of the signaling server.
    pub server_address: String,
    pub path: String,
    pub ice_servers: Vec<IceServerConfig>,
}

impl ClientConfig {
    /// Defaults for a media source reachable at `host`: signaling on port
    /// 8080 and a STUN server expected next to it on 3478.
    pub fn for_host(host: &str) -> Self {
        Self {
            server_address: format!("{}:{}", host, DEFAULT_SIGNALING_PORT),
            path: SIGNALING_PATH.to_owned(),
            ice_servers: vec![IceServerConfig::for_signaling_host(host)],
        }
    }

    pub fn endpoint(&self) -> String {
        format!("ws://{}{}", self.server_address, self.path)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            ice_servers: self.ice_servers.clone(),
            ..SessionConfig::default()
        }
    }
}

/// Negotiation policy handed to the peer-connection provider.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub receive_video: bool,
    pub receive_audio: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun(vec![DEFAULT_STUN_ADDR.to_owned()])],
            receive_video: true,
            receive_audio: false,
        }
    }
}
