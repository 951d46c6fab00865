use serde::{Deserialize, Deserializer, Serialize};

/// One ICE candidate as exchanged on the wire:
/// `{"sdpMLineIndex":0,"sdpMid":"0","candidate":"candidate:..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    /// Browsers send `null` when only `sdpMid` identifies the m-line.
    #[serde(rename = "sdpMLineIndex", default, deserialize_with = "null_as_zero")]
    pub sdp_m_line_index: u16,
    #[serde(rename = "sdpMid", default)]
    pub sdp_mid: Option<String>,
    pub candidate: String,
}

impl IceCandidate {
    pub fn new(sdp_m_line_index: u16, sdp_mid: Option<String>, candidate: impl Into<String>) -> Self {
        Self {
            sdp_m_line_index,
            sdp_mid,
            candidate: candidate.into(),
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u16>::deserialize(deserializer)?.unwrap_or_default())
}
