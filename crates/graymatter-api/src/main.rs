use std::sync::Arc;

use graymatter_api::config::{Config, LogFormat};
use graymatter_api::state::AppState;
use graymatter_auth::delivery::LogDelivery;
use graymatter_auth::jwt::TokenIssuer;
use graymatter_storage::pool::{self, PoolSettings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Plain => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let settings = PoolSettings {
        max_connections: config.db_max_connections,
        acquire_timeout: config.db_acquire_timeout,
    };
    let db = pool::connect(&config.database_url, &settings).await?;
    if config.run_migrations {
        pool::migrate(&db).await?;
    }

    let state = AppState::new(
        db,
        TokenIssuer::new(&config.jwt_secret, config.token_ttl),
        Arc::new(LogDelivery),
        config.temp_passcode_ttl,
    )
    .with_display_time_zone(config.display_time_zone.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "graymatter listening");

    axum::serve(listener, graymatter_api::router(state)).await?;
    Ok(())
}
