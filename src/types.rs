use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque ID types for type safety
pub type SessionId = String;
pub type UserId = String;
pub type VoteValue = String;

/// Placeholder the authority sends for a cast vote while votes are hidden
pub const HIDDEN_VOTE: &str = "?";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Waiting,
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Filled from the `users` map key when the record omits it
    #[serde(default)]
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub is_moderator: bool,
    #[serde(default)]
    pub vote: Option<VoteValue>,
    #[serde(default = "default_online")]
    pub is_online: bool,
}

fn default_online() -> bool {
    true
}

impl UserRecord {
    /// True when this record carries a vote whose value is visible
    pub fn visible_vote(&self) -> Option<&VoteValue> {
        self.vote.as_ref().filter(|v| v.as_str() != HIDDEN_VOTE)
    }
}

/// One full view of a session as broadcast by the session authority.
///
/// Snapshots are value objects: each one replaces the previous outright.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SessionId>,
    pub status: SessionStatus,
    #[serde(default)]
    pub current_story: String,
    #[serde(default)]
    pub votes_revealed: bool,
    pub users: BTreeMap<UserId, UserRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// Non-empty user set where nobody holds a vote: the authority's reset signal
    pub fn all_votes_null(&self) -> bool {
        !self.users.is_empty() && self.users.values().all(|u| u.vote.is_none())
    }

    pub fn moderators(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values().filter(|u| u.is_moderator)
    }

    /// Give records without an inner id the id they are keyed under
    pub fn fill_ids_from_keys(&mut self) {
        for (key, user) in self.users.iter_mut() {
            if user.id.is_empty() {
                user.id = key.clone();
            }
        }
    }
}
