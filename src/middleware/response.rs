use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Success envelope: `{"success": true, ...named fields}`
#[derive(Debug)]
pub struct ApiResponse {
    body: Map<String, Value>,
    serialization_error: Option<String>,
}

impl ApiResponse {
    /// A bare `{"success": true}` with 200 status
    pub fn success() -> Self {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(true));
        Self {
            body,
            serialization_error: None,
        }
    }

    /// Add a named field next to the success flag
    pub fn with<T: Serialize>(mut self, key: &str, value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.body.insert(key.to_string(), value);
            }
            Err(e) => self.serialization_error = Some(format!("{}: {}", key, e)),
        }
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        if let Some(e) = self.serialization_error {
            tracing::error!("Failed to serialize response data: {}", e);
            return ApiError::InternalServerError.into_response();
        }

        (StatusCode::OK, Json(Value::Object(self.body))).into_response()
    }
}

/// Replace the framework's bodiless 405 with the standard error envelope
pub async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        let allow = response.headers().get(axum::http::header::ALLOW).cloned();
        let mut replaced = ApiError::MethodNotAllowed.into_response();
        if let Some(allow) = allow {
            replaced.headers_mut().insert(axum::http::header::ALLOW, allow);
        }
        return replaced;
    }
    response
}

// Convenience type alias
pub type ApiResult = Result<ApiResponse, ApiError>;
