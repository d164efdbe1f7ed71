pub mod ai;
pub mod config;
pub mod conversation;
pub mod error;
pub mod mood;
pub mod persona;
pub mod provider;
pub mod reveal;
pub mod sentences;
pub mod state;
pub mod suggestions;
pub mod surface;

// Re-export main types for convenience
pub use ai::{ClaudeClient, GeminiClient, ModelClient, OllamaClient, OpenAIClient};
pub use config::Config;
pub use conversation::{Conversation, Turn, TurnOutcome, TurnReport, FALLBACK_REPLY};
pub use error::ServiceError;
pub use mood::{avatar_for_tag, classify, Avatar, Mood};
pub use persona::{PersonaConfig, PERSONA_NAME};
pub use provider::{connect, Provider};
pub use reveal::{reveal, RevealOutcome, DEFAULT_REVEAL_SPEED};
pub use sentences::{split_sentences, split_with_separators};
pub use state::{ChatMessage, ChatRole, SessionState, TurnStatus};
pub use surface::{plain_text, ChatSurface};
