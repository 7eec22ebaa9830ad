//! Parses raw input lines into submissions.
//!
//! Slash commands control the client itself; anything else is an utterance
//! for the conversation.

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Text for the conversation.
    UserInput { content: String },
    /// Re-submit a failed prediction.
    RetryPrediction,
    /// Probe the remote service.
    Health,
    /// Show available commands.
    Help,
    /// Leave the session.
    Quit,
}

/// Parses user input into Submission types.
pub struct SubmissionParser;

impl SubmissionParser {
    pub fn parse(content: &str) -> Submission {
        let trimmed = content.trim();

        match trimmed.to_lowercase().as_str() {
            "/retry" => Submission::RetryPrediction,
            "/health" | "/ping" => Submission::Health,
            "/help" | "/?" => Submission::Help,
            "/quit" | "/exit" => Submission::Quit,
            _ => Submission::UserInput {
                content: trimmed.to_string(),
            },
        }
    }
}

/// Help text for the CLI.
pub const HELP_TEXT: &str = "\
Commands:
  /retry   retry a failed prediction
  /health  check the assessment service
  /help    show this help
  /quit    leave";
