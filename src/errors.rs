use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Failures the booking step reports back to the requester.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("slot {time} on {date} is already taken")]
    SlotTaken { date: String, time: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unauthorized_response() {
        let res = AppError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "unauthorized");
    }

    #[test]
    fn test_slot_taken_message() {
        let err = BookingError::SlotTaken {
            date: "2025-06-16".to_string(),
            time: "10:00".to_string(),
        };
        assert_eq!(err.to_string(), "slot 10:00 on 2025-06-16 is already taken");
    }
}
