/// STUN server shipped with the viewer.
pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

/// Port of the STUN server colocated with the signaling host.
pub const HOST_STUN_PORT: u16 = 3478;

/// Port the signaling host listens on.
pub const DEFAULT_SIGNALING_PORT: u16 = 8080;

/// Path of the WebSocket signaling endpoint.
pub const SIGNALING_PATH: &str = "/stream/webrtc";
