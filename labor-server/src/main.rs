use labor_server::{init_logger_with_file, Config, Server, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env is optional, real env vars win)
    dotenv::dotenv().ok();

    // 2. Configuration — fails fast on a missing or short JWT_SECRET
    let config = Config::from_env()?;

    // 3. Logging (file output when LOG_DIR is set)
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Labor server starting..."
    );

    // 4. State: database, migrations, JWT service, admin bootstrap
    let state = ServerState::initialize(config.clone()).await?;

    // 5. HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
