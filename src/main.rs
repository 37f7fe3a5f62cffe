use std::sync::{Arc, Mutex};

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use appointment_bot::config::AppConfig;
use appointment_bot::db;
use appointment_bot::handlers;
use appointment_bot::services::messaging::telegram::TelegramClient;
use appointment_bot::services::reminders::TokioJobScheduler;
use appointment_bot::services::sessions::SessionStore;
use appointment_bot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(!config.bot_token.is_empty(), "BOT_TOKEN must be set");
    anyhow::ensure!(config.admin_id != 0, "ADMIN_ID must be set to a numeric user id");

    let conn = db::init_db(&config.database_url)?;

    let telegram = Arc::new(TelegramClient::new(
        config.bot_token.clone(),
        config.api_url.clone(),
    ));
    let scheduler = TokioJobScheduler::new(telegram.clone());

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        messaging: telegram.clone(),
        scheduler: Box::new(scheduler),
        sessions: SessionStore::new(),
    });

    match &config.webhook_url {
        Some(base) => {
            let url = format!("{}/webhook/telegram", base.trim_end_matches('/'));
            telegram.set_webhook(&url, &config.webhook_secret).await?;
            tracing::info!("receiving updates via webhook at {url}");
        }
        None => {
            telegram.delete_webhook().await?;
            tokio::spawn(handlers::polling::run_polling(state.clone(), telegram.clone()));
        }
    }

    let app = handlers::router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
