//! Advice collaborator for the AI hub
//!
//! Turns a user question, the optional pet in context and the conversation so
//! far into reply text. Callers never see an error: every implementation
//! resolves to something displayable, falling back to an apology when the
//! backend fails.
//!
//! ```text
//! AdviceGenerator trait
//! ├── GeminiAdvisor  (generateContent REST API)
//! └── OfflineAdvisor (no API key configured)
//! ```

mod gemini;

pub use gemini::GeminiAdvisor;

use crate::chat::HistoryEntry;
use crate::config::AdviceConfig;
use crate::data::Pet;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Shown when the backend fails or returns nothing usable
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process that right now. Please try again.";

/// Shown by the offline advisor
pub const OFFLINE_REPLY: &str = "AI advice is unavailable: no Gemini API key is configured.";

/// Source of assistant replies
///
/// Implementations must be cheap to share across spawned tasks.
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Whether replies come from a real backend
    fn is_ready(&self) -> bool;

    /// Produce reply text. Never fails; failures become fallback text.
    ///
    /// `history` is the transcript at send time and already ends with the
    /// user message carrying `user_text`.
    async fn generate_advice(
        &self,
        user_text: &str,
        pet: Option<&Pet>,
        history: &[HistoryEntry],
    ) -> String;
}

/// Internal failure modes of a backend call
#[derive(Debug)]
pub enum AdviceError {
    /// Transport failure (DNS, connect, timeout)
    Network(String),
    /// Non-success HTTP status
    Api { status: u16, message: String },
    /// Response had no text candidate
    EmptyResponse,
    /// Response body did not parse
    Decode(String),
}

impl fmt::Display for AdviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Api { status, message } => write!(f, "API error ({}): {}", status, message),
            Self::EmptyResponse => write!(f, "Response contained no text"),
            Self::Decode(msg) => write!(f, "Failed to decode response: {}", msg),
        }
    }
}

impl std::error::Error for AdviceError {}

/// Stand-in when no API key is available
#[derive(Debug, Default)]
pub struct OfflineAdvisor;

#[async_trait]
impl AdviceGenerator for OfflineAdvisor {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn is_ready(&self) -> bool {
        false
    }

    async fn generate_advice(
        &self,
        _user_text: &str,
        _pet: Option<&Pet>,
        _history: &[HistoryEntry],
    ) -> String {
        OFFLINE_REPLY.to_string()
    }
}

/// System instruction sent with every request
pub fn system_instruction(pet: Option<&Pet>) -> String {
    let mut prompt = String::from(
        "You are PetPal, a friendly and knowledgeable veterinary assistant. \
         Give concise, practical advice about pet care, diet, behavior, training and health. \
         If something sounds urgent or serious, recommend seeing a veterinarian.",
    );

    if let Some(pet) = pet {
        prompt.push_str(&format!(
            "\n\nThe user is asking about {name}, a {age}-year-old {breed} ({kind}) weighing {weight} kg. \
             {name}'s next vet visit is on {visit}.",
            name = pet.name,
            age = pet.age,
            breed = pet.breed,
            kind = pet.kind,
            weight = pet.weight_kg,
            visit = pet.next_vet_visit,
        ));
    }

    prompt
}

/// Build the advisor described by `config`
pub fn create_advisor(config: &AdviceConfig) -> Arc<dyn AdviceGenerator> {
    match config.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => match GeminiAdvisor::new(config) {
            Ok(advisor) => Arc::new(advisor),
            Err(e) => {
                tracing::error!("Failed to create Gemini advisor: {}", e);
                Arc::new(OfflineAdvisor)
            }
        },
        _ => {
            tracing::warn!("No Gemini API key configured; AI hub runs offline");
            Arc::new(OfflineAdvisor)
        }
    }
}
