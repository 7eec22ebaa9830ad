use std::sync::Arc;

use care_assist::channels::CliChannel;
use care_assist::config::{AssistantConfig, GatewayConfig};
use care_assist::conversation::ConversationController;
use care_assist::gateway::{AssessmentGateway, HttpGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the conversation on stdout stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let gateway_config = GatewayConfig::from_env()?;
    let assistant_config = AssistantConfig::from_env();

    eprintln!("🩺 Care Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Service: {}", gateway_config.base_url);
    eprintln!("   Timeout: {}s", gateway_config.timeout.as_secs());

    let gateway = HttpGateway::new(gateway_config)?;
    match gateway.health().await {
        Ok(health) => {
            tracing::info!(
                status = %health.status,
                llm = health.gemini,
                symptoms = health.symptoms_count,
                "Assessment service reachable"
            );
            if health.symptoms_count != 0
                && health.symptoms_count != care_assist::conversation::SYMPTOM_COUNT
            {
                tracing::warn!(
                    expected = care_assist::conversation::SYMPTOM_COUNT,
                    reported = health.symptoms_count,
                    "Service symptom catalog size differs from this client"
                );
            }
        }
        Err(e) => tracing::warn!("Assessment service health check failed: {}", e),
    }

    let controller = ConversationController::new(Arc::new(gateway), &assistant_config);
    tracing::debug!(session = controller.session_id(), "Session started");

    eprintln!("   Type a message and press Enter. /help for commands, /quit to exit.\n");

    CliChannel::new().run(&controller).await?;

    Ok(())
}
