use anyhow::{Context, Result};
use api::{handler::AppRouter, state::AppState};
use dotenv::dotenv;
use shared::{
    config::{Config, ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let mut telemetry = Telemetry::new("storefront-api", config.otel_endpoint.clone());

    let logger_provider = telemetry.init_logger()?;
    let _meter_provider = telemetry.init_meter()?;
    let _tracer_provider = telemetry.init_tracer()?;

    let _log_guard = init_logger(
        &logger_provider,
        "storefront-api",
        config.is_dev,
        config.enable_file_log,
    );

    info!("Starting storefront api initialization...");

    let pool = ConnectionManager::new_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let state = AppState::new(pool, &config)
        .await
        .context("Failed to create AppState")?;

    if let Some(admin) = &config.admin {
        state.bootstrap_admin(admin).await?;
    }

    info!("🚀 Server started successfully");

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    info!("Shutting down servers...");

    telemetry.shutdown()?;

    Ok(())
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("✅ Database migrations applied");

    Ok(())
}
