//! ConversationController — owns the message log and assessment state,
//! dispatches each utterance to the gateway, and applies the merged result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::merge::{
    AdvanceOutcome, PredictionOutcome, build_advance_request, merge_advance, merge_prediction,
};
use super::message::{Message, MessageLog};
use super::stage::Stage;
use super::state::AssessmentState;
use crate::config::AssistantConfig;
use crate::error::ControllerError;
use crate::gateway::{AssessmentGateway, HealthStatus, PredictRequest};

/// What happened to one user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input or nothing to retry. No round trip was made.
    Ignored,
    /// All round trips succeeded and were applied.
    Applied,
    /// A round trip failed; one error message was appended.
    Failed,
}

struct Session {
    state: AssessmentState,
    log: MessageLog,
    /// Predictor request kept after a failure so it can be retried.
    pending_prediction: Option<PredictRequest>,
}

/// Clears the in-flight flag when the round trip ends, on every path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one conversation against an [`AssessmentGateway`].
///
/// At most one round trip is in flight at a time; a second action while one
/// is outstanding is rejected with [`ControllerError::Busy`]. State is only
/// mutated after a response resolves, never while a request is pending.
pub struct ConversationController {
    gateway: Arc<dyn AssessmentGateway>,
    session_id: String,
    session: RwLock<Session>,
    in_flight: AtomicBool,
}

impl ConversationController {
    pub fn new(gateway: Arc<dyn AssessmentGateway>, config: &AssistantConfig) -> Self {
        Self::with_state(gateway, config, AssessmentState::default())
    }

    /// Start from an explicit state instead of the initial `qa` stage.
    pub fn with_state(
        gateway: Arc<dyn AssessmentGateway>,
        config: &AssistantConfig,
        state: AssessmentState,
    ) -> Self {
        Self {
            gateway,
            session_id: Uuid::new_v4().to_string(),
            session: RwLock::new(Session {
                state,
                log: MessageLog::with_greeting(&config.greeting),
                pending_prediction: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Identifier sent with free-chat requests.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether a round trip is outstanding. Renderers show a typing
    /// indicator and hold input while this is true.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn stage(&self) -> Stage {
        self.session.read().await.state.stage
    }

    pub async fn state(&self) -> AssessmentState {
        self.session.read().await.state.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.session.read().await.log.as_slice().to_vec()
    }

    /// Messages appended at or after `index`.
    pub async fn messages_since(&self, index: usize) -> Vec<Message> {
        self.session.read().await.log.since(index).to_vec()
    }

    /// Whether a failed prediction is waiting to be retried.
    pub async fn prediction_pending(&self) -> bool {
        self.session.read().await.pending_prediction.is_some()
    }

    fn begin_flight(&self) -> Result<FlightGuard<'_>, ControllerError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ControllerError::Busy)?;
        Ok(FlightGuard(&self.in_flight))
    }

    /// Handle one user utterance.
    ///
    /// Blank text is ignored. Otherwise the user message is appended, one
    /// `advanceAssessment` round trip is made, and its response is merged.
    /// If the service reports the questionnaire complete, the prediction
    /// round trip follows before this returns.
    pub async fn submit_utterance(&self, text: &str) -> Result<TurnOutcome, ControllerError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }

        let _flight = self.begin_flight()?;

        let (request, before) = {
            let mut session = self.session.write().await;
            if !session.state.stage.accepts_input() {
                return Err(ControllerError::InputClosed);
            }
            session.log.push(Message::user(text));
            let request = build_advance_request(&session.state, &session.log, &self.session_id);
            (request, session.state.clone())
        };

        debug!(
            stage = %before.stage,
            index = before.current_symptom_index,
            free_chat = request.is_free_chat(),
            "Dispatching utterance"
        );

        let outcome = match self.gateway.advance_assessment(&request).await {
            Ok(response) => merge_advance(&before, &response),
            Err(e) => {
                warn!(gateway = self.gateway.name(), "advanceAssessment failed: {}", e);
                AdvanceOutcome::failed(&before)
            }
        };
        if !outcome.succeeded {
            warn!(stage = %before.stage, "Assessment round trip unsuccessful");
        }

        let succeeded = outcome.succeeded;
        match self.apply_advance(outcome).await {
            Some(request) => self.run_prediction(request).await,
            None if succeeded => Ok(TurnOutcome::Applied),
            None => Ok(TurnOutcome::Failed),
        }
    }

    /// Re-submit a prediction that previously failed.
    ///
    /// Quietly does nothing when no prediction is waiting.
    pub async fn retry_prediction(&self) -> Result<TurnOutcome, ControllerError> {
        let _flight = self.begin_flight()?;

        let request = self.session.read().await.pending_prediction.clone();
        match request {
            Some(request) => {
                info!(symptoms = request.symptoms.len(), "Retrying prediction");
                self.run_prediction(request).await
            }
            None => Ok(TurnOutcome::Ignored),
        }
    }

    /// Probe the service. Does not touch the conversation.
    pub async fn health(&self) -> Result<HealthStatus, ControllerError> {
        Ok(self.gateway.health().await?)
    }

    async fn apply_advance(&self, outcome: AdvanceOutcome) -> Option<PredictRequest> {
        let mut session = self.session.write().await;
        let from = session.state.stage;
        session.log.extend(outcome.messages);
        session.state = outcome.state;
        if from != session.state.stage {
            info!(from = %from, to = %session.state.stage, "Stage transition");
        }
        session.pending_prediction.clone_from(&outcome.prediction);
        outcome.prediction
    }

    /// Call the predictor and apply its result. Must run inside a flight.
    async fn run_prediction(&self, request: PredictRequest) -> Result<TurnOutcome, ControllerError> {
        debug!(symptoms = ?request.symptoms, "Submitting for prediction");
        let before = self.session.read().await.state.clone();

        let outcome = match self.gateway.predict(&request).await {
            Ok(response) => merge_prediction(&before, &response),
            Err(e) => {
                warn!(gateway = self.gateway.name(), "predict failed: {}", e);
                PredictionOutcome::failed(&before)
            }
        };

        let mut session = self.session.write().await;
        session.log.push(outcome.message);
        session.state = outcome.state;
        if outcome.succeeded {
            session.pending_prediction = None;
            info!(to = %session.state.stage, "Prediction complete");
            Ok(TurnOutcome::Applied)
        } else {
            warn!("Prediction unsuccessful; stage held at {}", session.state.stage);
            Ok(TurnOutcome::Failed)
        }
    }
}
