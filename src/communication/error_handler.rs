use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatApiError {
    #[error("Session {0} not found or expired")]
    SessionNotFound(String),
    #[error("Message text is empty")]
    EmptyMessage,
}

impl ChatApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ChatApiError::EmptyMessage => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let response = ChatApiError::SessionNotFound("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ChatApiError::EmptyMessage.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
