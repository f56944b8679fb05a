use arango_gateway::config::GatewayConfig;
use arango_gateway::services::init_metrics;
use arango_gateway::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "arango-gateway",
        &config.server.log_level,
        config.server.otlp_endpoint.as_deref(),
    );
    init_metrics();

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
