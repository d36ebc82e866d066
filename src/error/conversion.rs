/**
 * Error Conversion
 *
 * `IntoResponse` for relay errors. Response bodies are exactly
 * `{"error": "<message>"}`. This is the wire contract the stateless API
 * tier and the web client already check against (403 Forbidden, 400
 * Missing event or chatId), so no extra fields are added.
 */

use crate::error::types::RelayError;
use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        let body = serde_json::json!({ "error": message });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .unwrap()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_response_body() {
        let response = RelayError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_field_response_status() {
        let response = RelayError::MissingField.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
