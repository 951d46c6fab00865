use crate::error::WireError;
use crate::model::{IceCandidate, SessionDescription};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Offer,
    Answer,
    Message,
    AddIceCandidate,
    GetIceCandidate,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Offer => "offer",
            CommandKind::Answer => "answer",
            CommandKind::Message => "message",
            CommandKind::AddIceCandidate => "addicecandidate",
            CommandKind::GetIceCandidate => "geticecandidate",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "offer" => Some(CommandKind::Offer),
            "answer" => Some(CommandKind::Answer),
            "message" => Some(CommandKind::Message),
            "addicecandidate" => Some(CommandKind::AddIceCandidate),
            "geticecandidate" => Some(CommandKind::GetIceCandidate),
            _ => None,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client to server: `{"command_id":"answer","data":"..."}`.
#[derive(Serialize, Deserialize)]
struct RequestFrame {
    command_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

/// Server to client: `{"type":"geticecandidate","data":"..."}`. Offers put
/// the SDP at the top level instead of inside `data`.
#[derive(Serialize, Deserialize)]
struct PushFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sdp: Option<String>,
}

/// The single unit carried by the signaling channel. `payload` is an opaque
/// string, itself JSON for every kind except `Message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: CommandKind,
    pub payload: Option<String>,
}

impl Command {
    pub fn new(id: CommandKind) -> Self {
        Self { id, payload: None }
    }

    pub fn with_payload(id: CommandKind, payload: impl Into<String>) -> Self {
        Self {
            id,
            payload: Some(payload.into()),
        }
    }

    pub fn request_offer() -> Self {
        Self::new(CommandKind::Offer)
    }

    pub fn request_ice_candidates() -> Self {
        Self::new(CommandKind::GetIceCandidate)
    }

    pub fn answer(desc: &SessionDescription) -> Result<Self, WireError> {
        Ok(Self::with_payload(
            CommandKind::Answer,
            serde_json::to_string(desc)?,
        ))
    }

    pub fn add_ice_candidate(candidate: &IceCandidate) -> Result<Self, WireError> {
        Ok(Self::with_payload(
            CommandKind::AddIceCandidate,
            serde_json::to_string(candidate)?,
        ))
    }

    pub fn offer(desc: &SessionDescription) -> Result<Self, WireError> {
        Ok(Self::with_payload(
            CommandKind::Offer,
            serde_json::to_string(desc)?,
        ))
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::with_payload(CommandKind::Message, text)
    }

    pub fn candidate_list(candidates: &[IceCandidate]) -> Result<Self, WireError> {
        Ok(Self::with_payload(
            CommandKind::GetIceCandidate,
            serde_json::to_string(candidates)?,
        ))
    }

    fn require_payload(&self) -> Result<&str, WireError> {
        self.payload
            .as_deref()
            .ok_or(WireError::MissingPayload(self.id.as_str()))
    }

    pub fn session_description(&self) -> Result<SessionDescription, WireError> {
        Ok(serde_json::from_str(self.require_payload()?)?)
    }

    pub fn ice_candidate(&self) -> Result<IceCandidate, WireError> {
        Ok(serde_json::from_str(self.require_payload()?)?)
    }

    pub fn ice_candidates(&self) -> Result<Vec<IceCandidate>, WireError> {
        Ok(serde_json::from_str(self.require_payload()?)?)
    }

    /// Like [`ice_candidates`](Self::ice_candidates), but decodes each list
    /// element on its own so one bad entry does not hide the others. Fails
    /// only when the payload is not a JSON array.
    pub fn ice_candidate_entries(
        &self,
    ) -> Result<Vec<Result<IceCandidate, WireError>>, WireError> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(self.require_payload()?)?;
        Ok(entries
            .into_iter()
            .map(|entry| serde_json::from_value(entry).map_err(WireError::from))
            .collect())
    }

    pub fn text(&self) -> &str {
        self.payload.as_deref().unwrap_or_default()
    }

    pub fn to_request_json(&self) -> Result<String, WireError> {
        let frame = RequestFrame {
            command_id: self.id.as_str().to_owned(),
            data: self.payload.clone(),
        };
        Ok(serde_json::to_string(&frame)?)
    }

    pub fn from_request_json(text: &str) -> Result<Self, WireError> {
        let frame: RequestFrame = serde_json::from_str(text)?;
        let id = CommandKind::from_wire(&frame.command_id)
            .ok_or(WireError::UnknownCommand(frame.command_id))?;
        Ok(Self {
            id,
            payload: frame.data,
        })
    }

    pub fn to_push_json(&self) -> Result<String, WireError> {
        let frame = match self.id {
            CommandKind::Offer => PushFrame {
                kind: self.id.as_str().to_owned(),
                data: None,
                sdp: Some(self.session_description()?.sdp),
            },
            _ => PushFrame {
                kind: self.id.as_str().to_owned(),
                data: self.payload.clone(),
                sdp: None,
            },
        };
        Ok(serde_json::to_string(&frame)?)
    }

    pub fn from_push_json(text: &str) -> Result<Self, WireError> {
        let frame: PushFrame = serde_json::from_str(text)?;
        let id =
            CommandKind::from_wire(&frame.kind).ok_or(WireError::UnknownCommand(frame.kind))?;

        let payload = match (id, frame.sdp) {
            (CommandKind::Offer, Some(sdp)) => {
                Some(serde_json::to_string(&SessionDescription::offer(sdp))?)
            }
            _ => frame.data,
        };

        Ok(Self { id, payload })
    }
}
