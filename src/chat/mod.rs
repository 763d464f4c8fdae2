// Chat module - conversation state for the AI hub
//
// - session: one conversation's transcript and busy flag
// - cache: keeps at most one live session, keyed by the bound pet context
//
// Replies come back asynchronously, so every request carries an `AdviceTicket`
// that is checked against the live session before anything is appended.

mod cache;
mod session;

pub use cache::SessionCache;
pub use session::{ChatSession, Rejection};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// The slice of a message forwarded to the advice collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
}

impl From<&ChatMessage> for HistoryEntry {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

/// Identifies one in-flight advice request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdviceTicket {
    /// Session generation the request was issued from
    pub generation: u64,
    /// Id of the user message that triggered it
    pub request_id: u64,
}

/// Timestamp-derived ids that never repeat or go backwards, even when two
/// messages land in the same millisecond.
#[derive(Debug, Clone, Default)]
pub(crate) struct MessageIds {
    last: u64,
}

impl MessageIds {
    pub(crate) fn next(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last = millis.max(self.last + 1);
        self.last
    }
}
