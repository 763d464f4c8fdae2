//! Live session keyed by pet context
//!
//! The AI hub owns one conversation per visit and per pet. Asking for a
//! session with a different key throws the old one away and starts over; no
//! transcript carries across. Each new session gets a fresh generation, so a
//! reply that resolves after its session was replaced no longer matches.

use super::{AdviceTicket, ChatSession};
use crate::data::Pet;

/// Context a session is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    General,
    Pet(String),
}

impl SessionKey {
    pub fn for_pet(pet: Option<&Pet>) -> Self {
        match pet {
            Some(pet) => Self::Pet(pet.id.clone()),
            None => Self::General,
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionCache {
    live: Option<(SessionKey, ChatSession)>,
    generation: u64,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session bound to `pet`, created (and any other one discarded) on demand
    pub fn session_for(&mut self, pet: Option<&Pet>) -> &mut ChatSession {
        let key = SessionKey::for_pet(pet);
        if !matches!(&self.live, Some((live_key, _)) if *live_key == key) {
            self.discard();
        }

        let generation = &mut self.generation;
        let (_, session) = self.live.get_or_insert_with(|| {
            *generation += 1;
            tracing::debug!(?key, generation = *generation, "Starting chat session");
            let session = ChatSession::with_generation(pet.cloned(), *generation);
            (key, session)
        });
        session
    }

    pub fn current(&self) -> Option<&ChatSession> {
        self.live.as_ref().map(|(_, session)| session)
    }

    pub fn current_key(&self) -> Option<&SessionKey> {
        self.live.as_ref().map(|(key, _)| key)
    }

    /// Drop the live session (screen left)
    pub fn discard(&mut self) {
        if let Some((key, session)) = self.live.take() {
            tracing::debug!(
                ?key,
                generation = session.generation(),
                pending = session.is_pending(),
                "Discarding chat session"
            );
        }
    }

    /// Deliver a reply. Returns false when the session it belonged to is gone.
    pub fn apply_reply(&mut self, ticket: AdviceTicket, reply: String) -> bool {
        match &mut self.live {
            Some((_, session)) if session.generation() == ticket.generation => {
                session.complete(ticket, reply)
            }
            _ => {
                tracing::debug!(?ticket, "Dropping reply for a discarded chat session");
                false
            }
        }
    }
}
