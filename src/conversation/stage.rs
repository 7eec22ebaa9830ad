//! Conversation stages, as named on the wire.

use serde::{Deserialize, Serialize};

/// One discrete phase of the conversation.
///
/// Transitions are never computed locally: the controller adopts whatever
/// stage the remote service reports. Normal progression is
/// Qa → Precheck → SymptomQa → Done → OpenConversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Initial,
    Qa,
    Precheck,
    SymptomQa,
    Done,
    OpenConversation,
}

impl Stage {
    /// Free-chat stages talk to the open conversation endpoint with no
    /// structured payload.
    pub fn is_free_chat(&self) -> bool {
        matches!(self, Self::OpenConversation)
    }

    /// Whether the user may type while in this stage.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Qa => "qa",
            Self::Precheck => "precheck",
            Self::SymptomQa => "symptom_qa",
            Self::Done => "done",
            Self::OpenConversation => "open_conversation",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Qa
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
