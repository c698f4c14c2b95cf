use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::auth::Claims;
use crate::error::ApiError;

/// Resolve the `:id` path segment. Ids that are not integers match no row.
pub fn record_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

/// Parse a write request's body; it must be a JSON object
pub fn json_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::BadRequest),
        Err(e) => {
            tracing::debug!("Unparsable request body: {}", e);
            Err(ApiError::BadRequest)
        }
    }
}

/// Map the body onto an entity's writable fields; wrong types are a 422
pub fn fields_from<T: DeserializeOwned>(payload: Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(payload)).map_err(|e| {
        tracing::debug!("Rejected field values: {}", e);
        ApiError::Unprocessable
    })
}

/// Caller identity for audit logging
pub fn subject(claims: &Claims) -> &str {
    claims.sub.as_deref().unwrap_or("<no subject>")
}
