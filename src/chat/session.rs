//! One conversation with the advice assistant
//!
//! A session starts idle with a single greeting. Sending moves it to pending
//! until the reply for that exact request arrives; while pending, further sends
//! are refused so at most one request is ever outstanding. The transcript only
//! grows by append.

use super::{AdviceTicket, ChatMessage, HistoryEntry, MessageIds, Role};
use crate::advice::{AdviceGenerator, FALLBACK_REPLY};
use crate::data::Pet;
use chrono::Utc;
use std::fmt;

/// Why a send was refused. The session is untouched in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Text was empty or whitespace
    EmptyText,
    /// A reply is still outstanding
    Pending,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "message is empty"),
            Self::Pending => write!(f, "waiting for the previous reply"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Everything the advice collaborator needs, captured at send time
#[derive(Debug, Clone)]
pub struct AdviceRequest {
    pub ticket: AdviceTicket,
    pub text: String,
    pub pet: Option<Pet>,
    /// Transcript including the user message that triggered the request
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    generation: u64,
    pet: Option<Pet>,
    messages: Vec<ChatMessage>,
    /// Request id of the outstanding call
    in_flight: Option<u64>,
    ids: MessageIds,
}

impl ChatSession {
    /// Fresh session seeded with the greeting for `pet`
    pub fn new(pet: Option<Pet>) -> Self {
        Self::with_generation(pet, 0)
    }

    pub(crate) fn with_generation(pet: Option<Pet>, generation: u64) -> Self {
        let mut session = Self {
            generation,
            pet,
            messages: Vec::new(),
            in_flight: None,
            ids: MessageIds::default(),
        };
        let greeting = Self::greeting(session.pet.as_ref());
        session.push(Role::Assistant, greeting);
        session
    }

    /// Opening line, personalised when a pet is bound
    pub fn greeting(pet: Option<&Pet>) -> String {
        match pet {
            Some(pet) => format!(
                "Hi! I'm here to help with {}. Ask me about their diet, behavior, or health.",
                pet.name
            ),
            None => "Hi! I'm your veterinary assistant. Select a pet or ask general animal care questions!".to_string(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pet(&self) -> Option<&Pet> {
        self.pet.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// First half of a send: validate, append the user message, go pending and
    /// snapshot the history. The caller runs the advice call and hands the
    /// reply to `complete`.
    pub fn begin_send(&mut self, text: &str) -> Result<AdviceRequest, Rejection> {
        if text.trim().is_empty() {
            return Err(Rejection::EmptyText);
        }
        if self.is_pending() {
            return Err(Rejection::Pending);
        }

        let request_id = self.push(Role::User, text.to_string());
        self.in_flight = Some(request_id);

        let history = self.messages.iter().map(HistoryEntry::from).collect();
        tracing::debug!(
            generation = self.generation,
            request_id,
            messages = self.messages.len(),
            "Advice request started"
        );

        Ok(AdviceRequest {
            ticket: AdviceTicket {
                generation: self.generation,
                request_id,
            },
            text: text.to_string(),
            pet: self.pet.clone(),
            history,
        })
    }

    /// Second half of a send: append the reply and go idle. Returns false (and
    /// changes nothing) when the ticket does not match the outstanding request.
    pub fn complete(&mut self, ticket: AdviceTicket, reply: String) -> bool {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.request_id) {
            tracing::debug!(?ticket, "Ignoring reply for a request this session is not waiting on");
            return false;
        }

        let reply = if reply.trim().is_empty() {
            FALLBACK_REPLY.to_string()
        } else {
            reply
        };
        self.push(Role::Assistant, reply);
        self.in_flight = None;
        true
    }

    /// Full round trip against `advisor`
    pub async fn send_message(
        &mut self,
        text: &str,
        advisor: &dyn AdviceGenerator,
    ) -> Result<(), Rejection> {
        let request = self.begin_send(text)?;
        let reply = advisor
            .generate_advice(&request.text, request.pet.as_ref(), &request.history)
            .await;
        self.complete(request.ticket, reply);
        Ok(())
    }

    fn push(&mut self, role: Role, text: String) -> u64 {
        let now = Utc::now();
        let id = self.ids.next(now);
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            created_at: now,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed string and records what it was asked
    struct ScriptedAdvisor {
        reply: String,
        calls: Mutex<Vec<(String, Option<String>, Vec<HistoryEntry>)>>,
    }

    impl ScriptedAdvisor {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AdviceGenerator for ScriptedAdvisor {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn is_ready(&self) -> bool {
            true
        }

        async fn generate_advice(
            &self,
            user_text: &str,
            pet: Option<&Pet>,
            history: &[HistoryEntry],
        ) -> String {
            self.calls.lock().unwrap().push((
                user_text.to_string(),
                pet.map(|p| p.name.clone()),
                history.to_vec(),
            ));
            self.reply.clone()
        }
    }

    fn buddy() -> Pet {
        Dataset::mock().pet("p1").cloned().unwrap()
    }

    #[test]
    fn test_new_session_has_single_greeting() {
        let session = ChatSession::new(None);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::Assistant);
        assert!(!session.is_pending());
    }

    #[test]
    fn test_greeting_depends_on_pet() {
        let with_pet = ChatSession::new(Some(buddy()));
        let generic = ChatSession::new(None);
        assert!(with_pet.messages()[0].text.contains("Buddy"));
        assert!(!generic.messages()[0].text.contains("Buddy"));
        assert_ne!(with_pet.messages()[0].text, generic.messages()[0].text);
    }

    #[test]
    fn test_begin_and_complete_toggle_pending() {
        let mut session = ChatSession::new(None);
        let greeting = session.messages()[0].clone();

        let request = session.begin_send("hello").unwrap();
        assert!(session.is_pending());
        assert_eq!(session.messages().len(), 2);
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history.last().unwrap().role, Role::User);
        assert_eq!(request.history.last().unwrap().text, "hello");

        assert!(session.complete(request.ticket, "Hi there".to_string()));
        assert!(!session.is_pending());
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[2].role, Role::Assistant);
        assert_eq!(session.messages()[0], greeting);
    }

    #[test]
    fn test_blank_text_rejected() {
        let mut session = ChatSession::new(None);
        assert_eq!(session.begin_send("").unwrap_err(), Rejection::EmptyText);
        assert_eq!(session.begin_send("   \n\t").unwrap_err(), Rejection::EmptyText);
        assert_eq!(session.messages().len(), 1);
        assert!(!session.is_pending());
    }

    #[test]
    fn test_second_send_while_pending_rejected() {
        let mut session = ChatSession::new(None);
        let first = session.begin_send("one").unwrap();
        assert_eq!(session.begin_send("two").unwrap_err(), Rejection::Pending);
        assert_eq!(session.messages().len(), 2);
        assert!(session.is_pending());

        assert!(session.complete(first.ticket, "reply".to_string()));
        assert!(session.begin_send("two").is_ok());
    }

    #[test]
    fn test_mismatched_ticket_ignored() {
        let mut session = ChatSession::new(None);
        let request = session.begin_send("hello").unwrap();

        let stale = AdviceTicket {
            generation: request.ticket.generation + 1,
            request_id: request.ticket.request_id,
        };
        assert!(!session.complete(stale, "late".to_string()));
        assert!(session.is_pending());
        assert_eq!(session.messages().len(), 2);

        // Completing twice appends once
        assert!(session.complete(request.ticket, "ok".to_string()));
        assert!(!session.complete(request.ticket, "again".to_string()));
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn test_blank_reply_replaced_with_fallback() {
        let mut session = ChatSession::new(None);
        let request = session.begin_send("hello").unwrap();
        session.complete(request.ticket, "  ".to_string());
        assert_eq!(session.messages()[2].text, FALLBACK_REPLY);
    }

    #[test]
    fn test_message_ids_strictly_increase() {
        let mut session = ChatSession::new(None);
        for i in 0..3 {
            let request = session.begin_send(&format!("q{i}")).unwrap();
            session.complete(request.ticket, format!("a{i}"));
        }
        let ids: Vec<u64> = session.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_send_message_round_trip() {
        let advisor = ScriptedAdvisor::new("Feed twice a day.");
        let mut session = ChatSession::new(Some(buddy()));
        let before: Vec<ChatMessage> = session.messages().to_vec();

        session
            .send_message("How often should I feed him?", &advisor)
            .await
            .unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), before.len() + 2);
        assert_eq!(&messages[..before.len()], &before[..]);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].text, "Feed twice a day.");
        assert!(!session.is_pending());

        let calls = advisor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (text, pet, history) = &calls[0];
        assert_eq!(text, "How often should I feed him?");
        assert_eq!(pet.as_deref(), Some("Buddy"));
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text, "How often should I feed him?");
    }

    #[tokio::test]
    async fn test_send_message_rejects_blank_without_calling_advisor() {
        let advisor = ScriptedAdvisor::new("unused");
        let mut session = ChatSession::new(None);
        assert_eq!(
            session.send_message("  ", &advisor).await,
            Err(Rejection::EmptyText)
        );
        assert!(advisor.calls.lock().unwrap().is_empty());
        assert_eq!(session.messages().len(), 1);
    }
}
