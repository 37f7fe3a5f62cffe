use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::errors::AppError;
use crate::models::Update;
use crate::state::AppState;

use super::updates::handle_update;

const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> Result<StatusCode, AppError> {
    // Empty secret = not checked (dev mode)
    if !state.config.webhook_secret.is_empty() {
        let provided = headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if provided != state.config.webhook_secret {
            tracing::warn!(update_id = update.update_id, "invalid webhook secret");
            return Err(AppError::Unauthorized);
        }
    }

    handle_update(&state, update).await;

    Ok(StatusCode::OK)
}
