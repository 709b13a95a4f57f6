//! Inbound frame dispatch
//!
//! Snapshots go through the reconciliation engine; the remaining frames are
//! notices that carry no state of their own and are only logged.

use crate::engine::{reconcile, Effect, LocalState};
use crate::protocol::ServerMessage;

pub fn handle_message(msg: ServerMessage, state: LocalState) -> (LocalState, Vec<Effect>) {
    match msg {
        ServerMessage::SessionState(snapshot) => {
            tracing::debug!(
                status = ?snapshot.status,
                users = snapshot.users.len(),
                votes_revealed = snapshot.votes_revealed,
                "Reconciling snapshot"
            );
            let moderators = snapshot.moderators().count();
            if moderators > 1 {
                tracing::debug!(moderators, "Snapshot lists more than one moderator");
            }
            reconcile(state, &snapshot)
        }

        ServerMessage::WaitingRoom {
            session_id,
            message,
        } => {
            tracing::info!(?session_id, "Waiting room: {}", message);
            (state, Vec::new())
        }

        ServerMessage::StartSession { message } => {
            tracing::info!("Session started: {}", message);
            (state, Vec::new())
        }

        ServerMessage::UserJoined(user) => {
            tracing::info!(user_id = %user.id, moderator = user.is_moderator, "{} joined", user.name);
            (state, Vec::new())
        }

        ServerMessage::UserLeft { user_id } => {
            tracing::info!(%user_id, "User left");
            (state, Vec::new())
        }
    }
}
