//! Local intents
//!
//! Only `cast_vote` touches local state, optimistically. Every other intent
//! asks the session authority for a change and waits for the resulting
//! snapshot; none of them assume the outcome locally.

use super::{Effect, LocalState};
use crate::protocol::ClientMessage;
use crate::types::VoteValue;

/// Input-side request from the local user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Vote(VoteValue),
    NewRound,
    Reveal,
    SetStory(String),
    StartSession,
}

/// Result of a local intent: next state, UI effects and an optional command
/// for the session authority
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub state: LocalState,
    pub effects: Vec<Effect>,
    pub command: Option<ClientMessage>,
}

impl Action {
    fn forward(state: LocalState, command: ClientMessage) -> Self {
        Self {
            state,
            effects: Vec::new(),
            command: Some(command),
        }
    }
}

/// Deny the intent unless the local user currently holds the moderator role
macro_rules! require_moderator {
    ($state:expr, $action:expr) => {
        if !$state.role.is_moderator() {
            return Action {
                state: $state,
                effects: vec![Effect::Denied(format!("Only the moderator can {}", $action))],
                command: None,
            };
        }
    };
}

/// Route an intent to its operation
pub fn apply_intent(state: LocalState, intent: Intent) -> Action {
    match intent {
        Intent::Vote(value) => cast_vote(state, value),
        Intent::NewRound => request_new_round(state),
        Intent::Reveal => request_reveal(state),
        Intent::SetStory(story) => request_set_story(state, story),
        Intent::StartSession => request_start_session(state),
    }
}

/// Select a vote optimistically and send it to the authority. Open to every role.
pub fn cast_vote(mut state: LocalState, value: VoteValue) -> Action {
    state.local_vote = Some(value.clone());
    Action {
        state,
        effects: vec![
            Effect::ClearAllVoteSelections,
            Effect::SelectVote(value.clone()),
        ],
        command: Some(ClientMessage::Vote { vote: value }),
    }
}

pub fn request_new_round(state: LocalState) -> Action {
    require_moderator!(state, "start a new round");
    Action::forward(state, ClientMessage::NewRound)
}

pub fn request_reveal(state: LocalState) -> Action {
    require_moderator!(state, "reveal votes");
    Action::forward(state, ClientMessage::Reveal)
}

pub fn request_set_story(state: LocalState, story: String) -> Action {
    require_moderator!(state, "set the story");
    Action::forward(state, ClientMessage::SetStory { story })
}

/// The authority decides whether this client created the session
pub fn request_start_session(state: LocalState) -> Action {
    Action::forward(state, ClientMessage::StartSession)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::*;
    use crate::engine::{reconcile, Role};

    #[test]
    fn test_cast_vote_effects_in_order() {
        let action = cast_vote(active("Bob", Role::Participant), "5".to_string());

        assert_eq!(
            action.effects,
            vec![
                Effect::ClearAllVoteSelections,
                Effect::SelectVote("5".to_string())
            ]
        );
        assert_eq!(action.state.local_vote.as_deref(), Some("5"));
        assert_eq!(
            action.command,
            Some(ClientMessage::Vote {
                vote: "5".to_string()
            })
        );
    }

    #[test]
    fn test_moderator_may_vote() {
        let action = cast_vote(active("Alice", Role::Moderator), "1".to_string());
        assert_eq!(action.state.local_vote.as_deref(), Some("1"));
        assert!(action.command.is_some());
    }

    #[test]
    fn test_new_round_denied_for_participant() {
        let mut state = active("Bob", Role::Participant);
        state.local_vote = Some("5".to_string());

        let action = request_new_round(state.clone());

        assert_eq!(
            action.effects,
            vec![Effect::Denied(
                "Only the moderator can start a new round".to_string()
            )]
        );
        assert_eq!(action.command, None);
        assert_eq!(action.state, state);
    }

    #[test]
    fn test_new_round_forwarded_without_local_clearing() {
        let mut state = active("Alice", Role::Moderator);
        state.local_vote = Some("5".to_string());

        let action = request_new_round(state);

        assert!(action.effects.is_empty());
        assert_eq!(action.command, Some(ClientMessage::NewRound));
        // Clearing waits for the authority's all-null snapshot
        assert_eq!(action.state.local_vote.as_deref(), Some("5"));

        let (next, effects) = reconcile(action.state, &alice_and_bob(None, None));
        assert_eq!(next.local_vote, None);
        assert!(effects.contains(&Effect::ClearAllVoteSelections));
    }

    #[test]
    fn test_other_moderator_intents_gated() {
        let participant = active("Bob", Role::Participant);

        let reveal = request_reveal(participant.clone());
        assert_eq!(
            reveal.effects,
            vec![Effect::Denied("Only the moderator can reveal votes".to_string())]
        );
        assert_eq!(reveal.command, None);

        let story = request_set_story(participant, "Checkout".to_string());
        assert_eq!(
            story.effects,
            vec![Effect::Denied("Only the moderator can set the story".to_string())]
        );

        let moderator = active("Alice", Role::Moderator);
        assert_eq!(request_reveal(moderator.clone()).command, Some(ClientMessage::Reveal));
        assert_eq!(
            request_set_story(moderator, "Checkout".to_string()).command,
            Some(ClientMessage::SetStory {
                story: "Checkout".to_string()
            })
        );
    }

    #[test]
    fn test_apply_intent_dispatch() {
        let state = LocalState::new("Alice");

        let start = apply_intent(state.clone(), Intent::StartSession);
        assert_eq!(start.command, Some(ClientMessage::StartSession));
        assert!(start.effects.is_empty());

        let vote = apply_intent(state, Intent::Vote("8".to_string()));
        assert_eq!(vote.state.local_vote.as_deref(), Some("8"));
    }
}
