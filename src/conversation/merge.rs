//! Request building and response merging.
//!
//! Both directions are pure functions of their inputs so every stage rule
//! lives in one place: `build_advance_request` picks the dispatch mode from
//! the stage, and `merge_advance` / `merge_prediction` compute the next state
//! plus the messages to append. The controller applies each outcome exactly
//! once per response.

use tracing::warn;

use super::message::{Message, MessageLog};
use super::ordinal::number_question;
use super::stage::Stage;
use super::state::AssessmentState;
use crate::gateway::types::{AdvanceRequest, AdvanceResponse, PredictRequest, PredictResponse};

/// Appended when an assessment round trip fails for any reason.
pub const SERVER_ERROR_TEXT: &str = "⚠️ Server error.";
/// Appended when the prediction round trip fails for any reason.
pub const PREDICTION_FAILED_TEXT: &str = "⚠️ Prediction failed.";
/// Appended as soon as the questionnaire is reported complete.
pub const PREPARING_RESULT_TEXT: &str = "📊 Prediction Result is being prepared...";

/// Build the `advanceAssessment` request for the current stage.
///
/// `log` must already contain the new user utterance. The answers are
/// cloned into the request so later local changes cannot reach it.
pub fn build_advance_request(
    state: &AssessmentState,
    log: &MessageLog,
    session_id: &str,
) -> AdvanceRequest {
    let conversation = log.as_slice().to_vec();
    if state.stage.is_free_chat() {
        AdvanceRequest::FreeChat {
            conversation,
            session_id: session_id.to_string(),
        }
    } else {
        AdvanceRequest::Structured {
            conversation,
            assessment_stage: state.stage,
            current_symptom_index: state.current_symptom_index,
            answered: state.answers.clone(),
        }
    }
}

/// Build the predictor request: positive answers only.
pub fn build_predict_request(state: &AssessmentState) -> PredictRequest {
    PredictRequest {
        symptoms: state.answers.positives(),
    }
}

/// Result of merging one `advanceAssessment` response.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceOutcome {
    pub state: AssessmentState,
    pub messages: Vec<Message>,
    /// Set when the questionnaire is complete and the predictor must run.
    pub prediction: Option<PredictRequest>,
    pub succeeded: bool,
}

impl AdvanceOutcome {
    /// The failure path: one error message, state untouched.
    pub fn failed(state: &AssessmentState) -> Self {
        Self {
            state: state.clone(),
            messages: vec![Message::assistant(SERVER_ERROR_TEXT)],
            prediction: None,
            succeeded: false,
        }
    }
}

/// Merge an `advanceAssessment` response into `state`.
pub fn merge_advance(state: &AssessmentState, response: &AdvanceResponse) -> AdvanceOutcome {
    if !response.success {
        return AdvanceOutcome::failed(state);
    }

    let mut next = state.clone();
    let mut messages = Vec::new();

    let texts = [&response.answer, &response.confirmation, &response.next_question];
    messages.extend(
        texts
            .into_iter()
            .flatten()
            .filter(|t| !t.trim().is_empty())
            .map(Message::assistant),
    );

    let reported = response.assessment_stage.unwrap_or(state.stage);
    if reported == Stage::SymptomQa {
        if let Some(question) = &response.question {
            let index = response
                .current_symptom_index
                .unwrap_or(state.current_symptom_index);
            messages.push(Message::assistant(number_question(question, index)));
        }
    }

    if let Some(index) = response.current_symptom_index {
        if state.stage == Stage::SymptomQa && index < state.current_symptom_index {
            warn!(
                from = state.current_symptom_index,
                to = index,
                "Service moved the symptom index backwards"
            );
        }
        next.current_symptom_index = index;
    }
    if let Some(answers) = &response.answered {
        let unknown = answers.unknown_keys();
        if !unknown.is_empty() {
            warn!(keys = ?unknown, "Service returned answers outside the symptom catalog");
        }
        next.answers = answers.clone();
    }

    let resolved = response.next_stage.or(response.assessment_stage);
    let complete =
        response.assessment_stage == Some(Stage::Done) || resolved == Some(Stage::Done);

    let prediction = if complete {
        messages.push(Message::assistant(PREPARING_RESULT_TEXT));
        next.stage = Stage::Done;
        Some(build_predict_request(&next))
    } else {
        if let Some(stage) = resolved {
            next.stage = stage;
        }
        None
    };

    AdvanceOutcome {
        state: next,
        messages,
        prediction,
        succeeded: true,
    }
}

/// Result of merging one `predict` response.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub state: AssessmentState,
    pub message: Message,
    pub succeeded: bool,
}

impl PredictionOutcome {
    /// The failure path: stage stays `done`, one error message.
    pub fn failed(state: &AssessmentState) -> Self {
        Self {
            state: state.clone(),
            message: Message::assistant(PREDICTION_FAILED_TEXT),
            succeeded: false,
        }
    }
}

/// Merge a `predict` response into `state`.
///
/// Success without an explicit `next_stage` falls through to open
/// conversation so the user is never parked in `done`.
pub fn merge_prediction(state: &AssessmentState, response: &PredictResponse) -> PredictionOutcome {
    let Some(prediction) = response.prediction.as_ref().filter(|_| response.success) else {
        return PredictionOutcome::failed(state);
    };

    let mut next = state.clone();
    next.stage = response.next_stage.unwrap_or(Stage::OpenConversation);

    PredictionOutcome {
        state: next,
        message: Message::assistant(prediction.render()),
        succeeded: true,
    }
}
