//! HTTP gateway — JSON over reqwest against the assessment service.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::AssessmentGateway;
use crate::gateway::types::{
    AdvanceRequest, AdvanceResponse, HealthStatus, PredictRequest, PredictResponse,
};

const EXTRACT_SYMPTOMS_PATH: &str = "/api/extract-symptoms";
const OPEN_CONVERSATION_PATH: &str = "/api/open-conversation";
const PREDICT_PATH: &str = "/api/predict";
const HEALTH_PATH: &str = "/api/health";

/// Gateway backed by the service's REST endpoints.
pub struct HttpGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Http {
                endpoint: config.base_url.clone(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        tracing::debug!(endpoint = path, "POST");
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Http {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })?;
        decode(path, resp).await
    }
}

/// Turn a raw response into `R`, surfacing the service's `error` field on
/// non-2xx replies when it sent one.
async fn decode<R: DeserializeOwned>(path: &str, resp: reqwest::Response) -> Result<R, GatewayError> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| GatewayError::Http {
        endpoint: path.to_string(),
        reason: e.to_string(),
    })?;

    if !status.is_success() {
        let reason = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from));
        return Err(match reason {
            Some(reason) => GatewayError::Rejected {
                endpoint: path.to_string(),
                reason,
            },
            None => GatewayError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            },
        });
    }

    serde_json::from_str(&body).map_err(|e| GatewayError::Decode {
        endpoint: path.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl AssessmentGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn advance_assessment(
        &self,
        request: &AdvanceRequest,
    ) -> Result<AdvanceResponse, GatewayError> {
        let path = if request.is_free_chat() {
            OPEN_CONVERSATION_PATH
        } else {
            EXTRACT_SYMPTOMS_PATH
        };
        self.post_json(path, request).await
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, GatewayError> {
        self.post_json(PREDICT_PATH, request).await
    }

    async fn health(&self) -> Result<HealthStatus, GatewayError> {
        let resp = self
            .client
            .get(self.config.endpoint(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| GatewayError::Http {
                endpoint: HEALTH_PATH.to_string(),
                reason: e.to_string(),
            })?;
        decode(HEALTH_PATH, resp).await
    }
}
