use anyhow::Context;

mod app;
mod config;
mod connection_string;
mod db;
mod error;
mod queue;
mod state;
mod storage;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "user_intake=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::load(config::CONFIG_PATH).map_err(|e| {
        tracing::error!(error = %error::error_chain(&e), "cannot load configuration");
        e
    })?;

    let db = db::connect(&config.database.connection_string)
        .await
        .map_err(|e| {
            tracing::error!(error = %error::error_chain(&e), "cannot reach the database");
            e
        })
        .context("database startup check")?;
    tracing::info!("connected to the database");

    let app = app::build_app(AppState::from_config(&config, db.clone()));
    let served = app::serve(app).await;

    db.close().await;
    served
}
