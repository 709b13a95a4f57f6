//! Reconciliation engine
//!
//! Pure state machine that folds authoritative session snapshots and local
//! intents into the client's `LocalState`, describing every visible change
//! as an `Effect`. Nothing in here performs I/O.

mod intent;
mod sync;

pub use intent::{
    apply_intent, cast_vote, request_new_round, request_reveal, request_set_story,
    request_start_session, Action, Intent,
};
pub use sync::reconcile;

use crate::types::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Waiting,
    Active,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Moderator,
    Participant,
}

impl Role {
    pub fn from_flag(is_moderator: bool) -> Self {
        if is_moderator {
            Role::Moderator
        } else {
            Role::Participant
        }
    }

    pub fn is_moderator(&self) -> bool {
        *self == Role::Moderator
    }
}

/// Who the local user is. The name is known up front, the id is learned
/// from the first snapshot listing that name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub id: Option<UserId>,
}

/// Client-side state for one session membership
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LocalState {
    pub identity: Identity,
    pub role: Role,
    pub local_vote: Option<VoteValue>,
    pub phase: Phase,
    pub current_story: String,
}

impl LocalState {
    /// State of a client that just attached and has seen no snapshot yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            identity: Identity {
                name: name.into(),
                id: None,
            },
            role: Role::Participant,
            local_vote: None,
            phase: Phase::Waiting,
            current_story: String::new(),
        }
    }
}

/// Intended visible change, interpreted by the presentation layer
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "effect", content = "value")]
pub enum Effect {
    LeaveWaitingRoom,
    EnterWaitingRoom,
    ShowStory { story: String, editable: bool },
    /// Reveal, new-round, set-story and share controls
    SetModeratorControlsVisibility(bool),
    ClearAllVoteSelections,
    SelectVote(VoteValue),
    RevealAllVotes(Vec<UserRecord>),
    Denied(String),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = LocalState::new("Bob");
        assert_eq!(state.identity.name, "Bob");
        assert_eq!(state.identity.id, None);
        assert_eq!(state.role, Role::Participant);
        assert_eq!(state.local_vote, None);
        assert_eq!(state.phase, Phase::Waiting);
    }

    #[test]
    fn test_effect_serializes_for_presentation() {
        let json = serde_json::to_value(Effect::SelectVote("5".to_string())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"effect": "SelectVote", "value": "5"})
        );
    }
}
