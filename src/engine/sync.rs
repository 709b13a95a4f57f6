use super::{Effect, LocalState, Phase, Role};
use crate::types::*;

/// Fold one authoritative snapshot into the local state.
///
/// Total over every `(state, snapshot)` pair: the result is always a valid
/// next state and a possibly empty list of effects. Which client caused the
/// change is irrelevant; everything is derived from the snapshot alone.
pub fn reconcile(mut state: LocalState, incoming: &SessionSnapshot) -> (LocalState, Vec<Effect>) {
    let mut effects = Vec::new();

    match (state.phase, incoming.status) {
        (Phase::Waiting, SessionStatus::Waiting) => return (state, effects),
        (Phase::Active, SessionStatus::Waiting) => {
            state.phase = Phase::Waiting;
            effects.push(Effect::EnterWaitingRoom);
            return (state, effects);
        }
        (Phase::Waiting, SessionStatus::Active) => {
            // Same snapshot continues into a full sync
            state.phase = Phase::Active;
            effects.push(Effect::LeaveWaitingRoom);
        }
        (Phase::Active, SessionStatus::Active) => {}
    }

    full_sync(&mut state, incoming, &mut effects);
    (state, effects)
}

fn full_sync(state: &mut LocalState, incoming: &SessionSnapshot, effects: &mut Vec<Effect>) {
    state.current_story = incoming.current_story.clone();

    let own = own_record(state, incoming);
    if let Some(record) = own {
        state.identity.id = Some(record.id.clone());
        state.role = Role::from_flag(record.is_moderator);
    }

    let is_moderator = state.role.is_moderator();
    effects.push(Effect::ShowStory {
        story: state.current_story.clone(),
        editable: is_moderator,
    });
    effects.push(Effect::SetModeratorControlsVisibility(is_moderator));

    if incoming.all_votes_null() {
        state.local_vote = None;
        effects.push(Effect::ClearAllVoteSelections);
    } else if let Some(vote) = own.and_then(UserRecord::visible_vote) {
        if state.local_vote.as_ref() != Some(vote) {
            state.local_vote = Some(vote.clone());
            effects.push(Effect::ClearAllVoteSelections);
            effects.push(Effect::SelectVote(vote.clone()));
        }
    }

    if incoming.votes_revealed {
        effects.push(Effect::RevealAllVotes(
            incoming.users.values().cloned().collect(),
        ));
    }
}

/// The local user's record: the known id first, then the first name match in id order
fn own_record<'a>(state: &LocalState, incoming: &'a SessionSnapshot) -> Option<&'a UserRecord> {
    let name = &state.identity.name;
    state
        .identity
        .id
        .as_ref()
        .and_then(|id| incoming.users.get(id))
        .filter(|u| &u.name == name)
        .or_else(|| incoming.users.values().find(|u| &u.name == name))
}
