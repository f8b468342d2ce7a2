//! Conversation engine for the radiograph chat assistant.
//!
//! Holds the transcript and follow-up state of each session, routes image
//! and text submissions to the predictor or dialogue service, and records
//! the resulting exchange.

pub mod error;
pub mod orchestrator;
pub mod session;
pub mod state;
pub mod transcript;

pub use error::ChatError;
pub use orchestrator::ChatOrchestrator;
pub use session::{SessionRegistry, SessionSummary};
pub use state::{ConversationSnapshot, ConversationState, DialoguePhase, Reply, Route};
pub use transcript::Transcript;
