use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors raised while decoding frames from the session authority
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Invalid frame: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unknown frame type: {0}")]
    UnknownType(String),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Malformed {kind} payload: {reason}")]
    MalformedPayload { kind: String, reason: String },
}

/// Raw envelope as it travels on the wire
#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Full session snapshot, the only frame that drives reconciliation
    SessionState(SessionSnapshot),
    WaitingRoom {
        session_id: Option<SessionId>,
        message: String,
    },
    StartSession {
        message: String,
    },
    UserJoined(UserRecord),
    UserLeft {
        user_id: UserId,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoticePayload {
    #[serde(default)]
    session_id: Option<SessionId>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserLeftPayload {
    user_id: UserId,
}

impl ServerMessage {
    /// Decode a text frame received from the session authority
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let frame: Frame = serde_json::from_str(text)?;
        let data = frame.data.unwrap_or(Value::Null);

        match frame.kind.as_str() {
            "session_state" => {
                let mut snapshot: SessionSnapshot = serde_json::from_value(data)
                    .map_err(|e| ProtocolError::MalformedSnapshot(e.to_string()))?;
                snapshot.fill_ids_from_keys();
                Ok(ServerMessage::SessionState(snapshot))
            }
            "waiting_room" => {
                let notice: NoticePayload = payload(&frame.kind, data)?;
                Ok(ServerMessage::WaitingRoom {
                    session_id: notice.session_id,
                    message: notice.message,
                })
            }
            "start_session" => {
                let notice: NoticePayload = payload(&frame.kind, data)?;
                Ok(ServerMessage::StartSession {
                    message: notice.message,
                })
            }
            "user_joined" => payload(&frame.kind, data).map(ServerMessage::UserJoined),
            "user_left" => {
                let left: UserLeftPayload = payload(&frame.kind, data)?;
                Ok(ServerMessage::UserLeft {
                    user_id: left.user_id,
                })
            }
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }
}

fn payload<T: serde::de::DeserializeOwned>(kind: &str, data: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(|e| ProtocolError::MalformedPayload {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

/// Commands sent toward the session authority
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    Vote { vote: VoteValue },
    Reveal,
    NewRound,
    SetStory { story: String },
    StartSession,
}

/// First frame on a fresh connection, before any command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub session_id: SessionId,
    pub user_name: String,
    #[serde(default)]
    pub creator: bool,
}
