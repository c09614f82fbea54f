use agora_api::{apps::PlanExecuteApp, config::Config, init_logging, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting plan/execute server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let app = PlanExecuteApp::new(&config.chat)?;

    serve(config, app).await
}
