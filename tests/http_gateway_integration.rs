//! Integration tests for the HTTP gateway and the controller on top of it.
//!
//! Each test spins up an Axum stub of the assessment service on a random
//! port and talks to it over real HTTP.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use care_assist::config::{AssistantConfig, GatewayConfig};
use care_assist::conversation::{ConversationController, SYMPTOM_CATALOG, Stage, TurnOutcome};
use care_assist::error::GatewayError;
use care_assist::gateway::{AssessmentGateway, HttpGateway, PredictRequest};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the stub service received, per endpoint.
#[derive(Default)]
struct Received {
    extract: Vec<Value>,
    open: Vec<Value>,
    predict: Vec<Value>,
}

type Shared = Arc<Mutex<Received>>;

fn last_user_text(body: &Value) -> String {
    body["conversation"]
        .as_array()
        .and_then(|c| c.iter().rev().find(|m| m["role"] == "user"))
        .and_then(|m| m["text"].as_str())
        .unwrap_or_default()
        .to_string()
}

fn question(index: usize) -> String {
    // Deliberately wrong ordinal: the client must renumber it.
    format!(
        "Have you noticed {}? (yes/no) 9/15",
        SYMPTOM_CATALOG[index].replace('_', " ").to_lowercase()
    )
}

async fn extract_symptoms(State(seen): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().extract.push(body.clone());
    let text = last_user_text(&body);

    let reply = match body["assessment_stage"].as_str().unwrap_or("initial") {
        "qa" => json!({
            "success": true,
            "assessment_stage": "precheck",
            "answer": "Forgetfulness is common and has many causes.",
            "next_question": "Are you worried about your health? (yes/no)"
        }),
        "precheck" => json!({
            "success": true,
            "assessment_stage": "symptom_qa",
            "question": question(0),
            "current_symptom_index": 0,
            "answered": body["answered"]
        }),
        "symptom_qa" => {
            let index = body["current_symptom_index"].as_u64().unwrap_or(0) as usize;
            let mut answered = body["answered"].as_object().cloned().unwrap_or_default();
            answered.insert(
                SYMPTOM_CATALOG[index].to_string(),
                Value::Bool(text.starts_with("yes")),
            );
            match SYMPTOM_CATALOG
                .iter()
                .position(|s| !answered.contains_key(*s))
            {
                Some(next) => json!({
                    "success": true,
                    "assessment_stage": "symptom_qa",
                    "question": question(next),
                    "symptom": SYMPTOM_CATALOG[next],
                    "current_symptom_index": next,
                    "answered": answered,
                    "confirmation": null
                }),
                None => json!({
                    "success": true,
                    "assessment_stage": "done",
                    "answer": "Thanks for answering all questions. Analyzing your responses…",
                    "answered": answered,
                    "next_stage": "open_conversation"
                }),
            }
        }
        other => json!({ "success": true, "assessment_stage": other, "answer": "⚠️ Not a diagnosis." }),
    };
    Json(reply)
}

async fn open_conversation(State(seen): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().open.push(body.clone());
    Json(json!({
        "success": true,
        "assessment_stage": "open_conversation",
        "answer": format!("I hear you: {}", last_user_text(&body)),
        "memory_length": 2
    }))
}

async fn predict(State(seen): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().predict.push(body);
    Json(json!({
        "success": true,
        "prediction": {
            "likelihood": 64.3,
            "message": "MODERATE likelihood of Alzheimer's disease",
            "adni1_confidence": 35.7,
            "adnigo_confidence": 64.3
        },
        "next_stage": "open_conversation"
    }))
}

async fn predict_broken() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": "Prediction failed ⚠️" })),
    )
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "gemini": true,
        "symptoms_count": 15,
        "timestamp": "2026-01-01 00:00:00"
    }))
}

/// Start the stub service on a random port, return (gateway, received).
async fn start_server(broken_predict: bool) -> (HttpGateway, Shared) {
    let seen: Shared = Arc::default();
    let app = Router::new()
        .route("/api/extract-symptoms", post(extract_symptoms))
        .route("/api/open-conversation", post(open_conversation))
        .route("/api/health", get(health));
    let app = if broken_predict {
        app.route("/api/predict", post(predict_broken))
    } else {
        app.route("/api/predict", post(predict))
    };
    let app = app.with_state(Arc::clone(&seen));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let gateway = HttpGateway::new(GatewayConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    (gateway, seen)
}

#[tokio::test]
async fn health_reports_service_status() {
    timeout(TEST_TIMEOUT, async {
        let (gateway, _seen) = start_server(false).await;
        let status = gateway.health().await.unwrap();
        assert_eq!(status.status, "healthy");
        assert!(status.gemini);
        assert_eq!(status.symptoms_count, 15);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn server_side_failure_surfaces_service_reason() {
    timeout(TEST_TIMEOUT, async {
        let (gateway, _seen) = start_server(true).await;
        let err = gateway
            .predict(&PredictRequest {
                symptoms: vec!["Falls".to_string()],
            })
            .await
            .unwrap_err();
        assert!(
            matches!(&err, GatewayError::Rejected { reason, .. } if reason == "Prediction failed ⚠️"),
            "unexpected error: {err:?}"
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn full_assessment_over_http() {
    timeout(TEST_TIMEOUT, async {
        let (gateway, seen) = start_server(false).await;
        let ctl = ConversationController::new(Arc::new(gateway), &AssistantConfig::default());

        // Intake.
        ctl.submit_utterance("I keep forgetting where I put things").await.unwrap();
        assert_eq!(ctl.stage().await, Stage::Precheck);

        // Gate into the questionnaire.
        ctl.submit_utterance("yes").await.unwrap();
        assert_eq!(ctl.stage().await, Stage::SymptomQa);
        let first_question = ctl.messages().await.last().unwrap().text.clone();
        assert!(first_question.ends_with("1/15"), "got {first_question:?}");

        // Answer yes to even-numbered symptoms, no to the rest.
        for i in 0..SYMPTOM_CATALOG.len() {
            let answer = if i % 2 == 0 { "yes" } else { "no" };
            let outcome = ctl.submit_utterance(answer).await.unwrap();
            assert_eq!(outcome, TurnOutcome::Applied);

            if i + 1 < SYMPTOM_CATALOG.len() {
                let state = ctl.state().await;
                assert_eq!(state.stage, Stage::SymptomQa);
                assert_eq!(state.current_symptom_index, i + 1);
                assert_eq!(state.answers.len(), i + 1);
                let shown = ctl.messages().await.last().unwrap().text.clone();
                assert!(shown.ends_with(&format!("{}/15", i + 2)), "got {shown:?}");
            }
        }

        assert_eq!(ctl.stage().await, Stage::OpenConversation);
        let last = ctl.messages().await.last().unwrap().text.clone();
        assert!(last.contains("Likelihood: 64.3%"));

        {
            let seen = seen.lock().unwrap();
            assert_eq!(seen.predict.len(), 1);
            let mut sent: Vec<String> = seen.predict[0]["symptoms"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap().to_string())
                .collect();
            sent.sort();
            let mut expected: Vec<String> = SYMPTOM_CATALOG
                .iter()
                .step_by(2)
                .map(|s| (*s).to_string())
                .collect();
            expected.sort();
            assert_eq!(sent, expected);

            // Every structured request carried the full log so far.
            assert_eq!(seen.extract.len(), 2 + SYMPTOM_CATALOG.len());
            assert!(seen.open.is_empty());
        }

        // Free chat after the prediction.
        ctl.submit_utterance("Thank you").await.unwrap();
        assert_eq!(
            ctl.messages().await.last().unwrap().text,
            "I hear you: Thank you"
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.open.len(), 1);
        assert_eq!(seen.open[0]["session_id"], ctl.session_id());
        assert!(seen.open[0].get("assessment_stage").is_none());
        assert!(seen.open[0].get("answered").is_none());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn failed_prediction_over_http_holds_done() {
    timeout(TEST_TIMEOUT, async {
        let (gateway, _seen) = start_server(true).await;
        let ctl = ConversationController::with_state(
            Arc::new(gateway),
            &AssistantConfig::default(),
            care_assist::conversation::AssessmentState {
                stage: Stage::SymptomQa,
                current_symptom_index: 14,
                answers: SYMPTOM_CATALOG[..14]
                    .iter()
                    .map(|s| ((*s).to_string(), false))
                    .collect(),
            },
        );

        let outcome = ctl.submit_utterance("yes").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Failed);
        assert_eq!(ctl.stage().await, Stage::Done);
        assert!(ctl.prediction_pending().await);
    })
    .await
    .expect("test timed out");
}
