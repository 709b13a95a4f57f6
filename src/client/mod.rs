pub mod handlers;

use crate::config::ClientConfig;
use crate::engine::{apply_intent, Effect, Intent, LocalState};
use crate::protocol::{JoinRequest, ServerMessage};
use crate::transport::{Transport, TransportError, TransportResult};
use crate::types::SessionId;

/// A local intent whose command never reached the authority.
///
/// The state change has already been applied, so the effects describing it
/// travel with the error and must still be rendered.
#[derive(Debug, thiserror::Error)]
#[error("Command not delivered: {source}")]
pub struct UndeliveredIntent {
    pub effects: Vec<Effect>,
    #[source]
    pub source: TransportError,
}

/// One session membership: the local state plus the link to the authority.
///
/// Both entry points (`handle_frame`, `handle_intent`) run to completion before
/// the next event is taken, so no locking is needed around `state`.
pub struct SessionClient<T> {
    session_id: SessionId,
    creator: bool,
    state: LocalState,
    transport: T,
}

impl<T: Transport> SessionClient<T> {
    pub fn new(
        session_id: impl Into<SessionId>,
        user_name: impl Into<String>,
        creator: bool,
        transport: T,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            creator,
            state: LocalState::new(user_name),
            transport,
        }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self::new(
            config.session_id.clone(),
            config.user_name.clone(),
            config.creator,
            transport,
        )
    }

    pub fn state(&self) -> &LocalState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Announce this client to the authority
    pub async fn join(&self) -> TransportResult<()> {
        tracing::info!(
            session_id = %self.session_id,
            user = %self.state.identity.name,
            creator = self.creator,
            "Joining session"
        );
        self.transport
            .join(&JoinRequest {
                session_id: self.session_id.clone(),
                user_name: self.state.identity.name.clone(),
                creator: self.creator,
            })
            .await
    }

    /// Process one text frame from the authority.
    ///
    /// Undecodable frames are dropped with a warning; the state is left as it was.
    pub fn handle_frame(&mut self, text: &str) -> Vec<Effect> {
        let msg = match ServerMessage::parse(text) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("Ignoring frame: {}", e);
                return Vec::new();
            }
        };

        let (next, effects) = handlers::handle_message(msg, self.state.clone());
        self.state = next;
        effects
    }

    /// Process one local intent, forwarding its command to the authority
    pub async fn handle_intent(
        &mut self,
        intent: Intent,
    ) -> Result<Vec<Effect>, UndeliveredIntent> {
        tracing::debug!(?intent, "Local intent");
        let action = apply_intent(self.state.clone(), intent);
        self.state = action.state;

        for effect in &action.effects {
            if let Effect::Denied(reason) = effect {
                tracing::warn!("{}", reason);
            }
        }

        if let Some(command) = &action.command {
            if let Err(source) = self.transport.send(command).await {
                return Err(UndeliveredIntent {
                    effects: action.effects,
                    source,
                });
            }
        }
        Ok(action.effects)
    }
}
