//! Conversation core — stage controller for the symptom questionnaire.
//!
//! The user chats freely at first, then answers a fixed 15-question yes/no
//! questionnaire, gets a prediction, and continues in open conversation.
//! Which stage the conversation is in, which question is current, and what
//! has been answered are all decided by the remote service; this module
//! mirrors that state, routes each utterance to the right remote operation,
//! and keeps the message log the renderer draws.

pub mod controller;
pub mod ledger;
pub mod merge;
pub mod message;
pub mod ordinal;
pub mod stage;
pub mod state;

pub use controller::{ConversationController, TurnOutcome};
pub use ledger::{AnswerLedger, SYMPTOM_CATALOG, SYMPTOM_COUNT};
pub use message::{Message, MessageLog, Role};
pub use stage::Stage;
pub use state::AssessmentState;
