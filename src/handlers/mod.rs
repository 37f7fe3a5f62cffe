pub mod health;
pub mod polling;
pub mod updates;
pub mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/webhook/telegram", post(webhook::telegram_webhook))
        .with_state(state)
}
