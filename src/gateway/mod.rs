//! Remote gateway — the transport seam between the controller and the
//! assessment service.
//!
//! The controller only sees the [`AssessmentGateway`] trait. [`HttpGateway`]
//! speaks JSON over HTTP to the real service; tests plug in scripted
//! implementations.

pub mod http;
pub mod types;

pub use http::HttpGateway;
pub use types::{
    AdvanceRequest, AdvanceResponse, HealthStatus, PredictRequest, PredictResponse,
    PredictionResult,
};

use async_trait::async_trait;

use crate::error::GatewayError;

/// Request/response operations offered by the assessment service.
#[async_trait]
pub trait AssessmentGateway: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Send the conversation (and, in structured mode, the mirrored progress
    /// state) and get the service's next move.
    async fn advance_assessment(
        &self,
        request: &AdvanceRequest,
    ) -> Result<AdvanceResponse, GatewayError>;

    /// Submit positive symptoms to the predictor.
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, GatewayError>;

    /// Liveness probe. Never touches conversation state.
    async fn health(&self) -> Result<HealthStatus, GatewayError>;
}
