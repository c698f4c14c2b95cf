pub mod jwks;
pub mod token;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use jwks::{KeySource, RemoteKeySet, StaticKeySet, VerifyingKey};
pub use token::{extract_bearer_token, TokenValidator};

/// Claim set carried by an access token issued for this API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Either a single audience string or a list of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Granted scopes, e.g. `get:actors`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Check that `scope` was granted.
    pub fn require_permission(&self, scope: &str) -> Result<(), AuthError> {
        let permissions = self
            .permissions
            .as_ref()
            .ok_or(AuthError::PermissionsMissing)?;

        if permissions.iter().any(|p| p == scope) {
            Ok(())
        } else {
            Err(AuthError::PermissionNotFound(scope.to_string()))
        }
    }
}

/// Failures while authenticating or authorizing a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    #[error("Authorization header must start with \"Bearer\".")]
    NotBearer,

    #[error("Token not found.")]
    TokenMissing,

    #[error("Authorization header must be bearer token.")]
    HeaderMalformed,

    #[error("Unable to parse authentication token.")]
    Unparsable,

    #[error("Authorization malformed.")]
    KeyIdMissing,

    #[error("Unable to find the appropriate key.")]
    UnknownKey(String),

    #[error("Unable to parse the signing key.")]
    InvalidKey(String),

    #[error("Token signature could not be verified.")]
    InvalidSignature,

    #[error("Token expired.")]
    Expired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    IncorrectClaims,

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found in JWT")]
    PermissionNotFound(String),

    #[error("Unable to fetch signing keys.")]
    KeySetUnavailable(String),
}

impl AuthError {
    /// Machine-readable code returned to clients alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::NotBearer
            | AuthError::TokenMissing
            | AuthError::HeaderMalformed
            | AuthError::Unparsable
            | AuthError::KeyIdMissing
            | AuthError::UnknownKey(_) => "invalid_header",
            AuthError::InvalidKey(_) => "invalid_key",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "token_expired",
            AuthError::IncorrectClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::PermissionNotFound(_) => "unauthorized",
            AuthError::KeySetUnavailable(_) => "jwks_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::PermissionsMissing => StatusCode::BAD_REQUEST,
            AuthError::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}
