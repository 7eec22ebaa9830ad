//! Assessment progress state, mirrored from the remote service.

use serde::{Deserialize, Serialize};

use super::ledger::{AnswerLedger, SYMPTOM_COUNT};
use super::stage::Stage;

/// Where the conversation is, and what the service has recorded so far.
///
/// `current_symptom_index` and `answers` are server-owned: they only ever
/// change by wholesale replacement with the values in a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentState {
    pub stage: Stage,
    /// Zero-based index of the symptom currently being asked about.
    pub current_symptom_index: usize,
    pub answers: AnswerLedger,
}

impl AssessmentState {
    /// 1-based ordinal of the current question, for display.
    pub fn question_ordinal(&self) -> usize {
        self.current_symptom_index + 1
    }

    /// "answered/total" progress, e.g. `4/15`.
    pub fn progress(&self) -> String {
        format!("{}/{SYMPTOM_COUNT}", self.answers.len())
    }
}
