//! Request and response bodies exchanged with the assessment service.

use serde::{Deserialize, Serialize};

use crate::conversation::ledger::AnswerLedger;
use crate::conversation::message::Message;
use crate::conversation::stage::Stage;

/// Body of an `advanceAssessment` round trip.
///
/// The variant decides which endpoint serves the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdvanceRequest {
    /// Intake and questionnaire stages.
    Structured {
        conversation: Vec<Message>,
        assessment_stage: Stage,
        current_symptom_index: usize,
        answered: AnswerLedger,
    },
    /// Open conversation after the assessment.
    FreeChat {
        conversation: Vec<Message>,
        session_id: String,
    },
}

impl AdvanceRequest {
    pub fn conversation(&self) -> &[Message] {
        match self {
            Self::Structured { conversation, .. } | Self::FreeChat { conversation, .. } => {
                conversation
            }
        }
    }

    pub fn is_free_chat(&self) -> bool {
        matches!(self, Self::FreeChat { .. })
    }
}

/// Response to `advanceAssessment`. Everything but `success` is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_symptom_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered: Option<AnswerLedger>,
    /// Failure reason some endpoints attach when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a `predict` round trip: positive symptom ids only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub symptoms: Vec<String>,
}

/// Scores returned by the predictor. Percentages are in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub likelihood: f64,
    pub message: String,
    pub adni1_confidence: f64,
    pub adnigo_confidence: f64,
}

impl PredictionResult {
    /// Text shown to the user once the prediction arrives.
    pub fn render(&self) -> String {
        format!(
            "📊 Prediction Result:\nLikelihood: {}%\nMessage: {}\nADNI1 Confidence: {}%\nADNIGO Confidence: {}%",
            self.likelihood, self.message, self.adni1_confidence, self.adnigo_confidence
        )
    }
}

/// Response to `predict`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Service liveness report from `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub gemini: bool,
    #[serde(default)]
    pub symptoms_count: usize,
    #[serde(default)]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_chat_request_omits_structured_fields() {
        let request = AdvanceRequest::FreeChat {
            conversation: vec![Message::user("hello")],
            session_id: "s-1".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "conversation": [{"role": "user", "text": "hello"}],
                "session_id": "s-1"
            })
        );
    }

    #[test]
    fn structured_request_carries_stage_index_and_answers() {
        let request = AdvanceRequest::Structured {
            conversation: vec![Message::user("yes")],
            assessment_stage: Stage::SymptomQa,
            current_symptom_index: 3,
            answered: [("Dizziness".to_string(), true)].into_iter().collect(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["assessment_stage"], "symptom_qa");
        assert_eq!(json["current_symptom_index"], 3);
        assert_eq!(json["answered"]["Dizziness"], true);
    }

    #[test]
    fn advance_response_tolerates_nulls_and_extra_fields() {
        let raw = r#"{
            "success": true,
            "assessment_stage": "symptom_qa",
            "question": "Headaches? (yes/no) 5/15",
            "symptom": "Headache",
            "current_symptom_index": 4,
            "answered": {"Dizziness": false},
            "confirmation": null
        }"#;
        let parsed: AdvanceResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.assessment_stage, Some(Stage::SymptomQa));
        assert_eq!(parsed.current_symptom_index, Some(4));
        assert!(parsed.confirmation.is_none());
        assert_eq!(parsed.answered.unwrap().get("Dizziness"), Some(false));
    }

    #[test]
    fn advance_response_requires_success() {
        assert!(serde_json::from_str::<AdvanceResponse>(r#"{"answer": "hi"}"#).is_err());
    }

    #[test]
    fn prediction_render_lists_all_scores() {
        let result = PredictionResult {
            likelihood: 42.5,
            message: "MODERATE likelihood of Alzheimer's disease".to_string(),
            adni1_confidence: 57.5,
            adnigo_confidence: 42.5,
        };
        let text = result.render();
        assert!(text.contains("Likelihood: 42.5%"));
        assert!(text.contains("MODERATE"));
        assert!(text.contains("ADNI1 Confidence: 57.5%"));
        assert!(text.contains("ADNIGO Confidence: 42.5%"));
    }
}
