// [apps/windi-gateway/src/main.rs]
use dotenvy::dotenv;
use windi_common::telemetry::init_tracing;
use windi_gateway::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing("windi_gateway");

    let config = GatewayConfig::from_env();
    windi_gateway::run(config).await
}
