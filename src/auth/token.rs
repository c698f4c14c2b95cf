use std::{sync::Arc, time::Duration};

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, Validation};

use super::{AuthError, Claims, KeySource, RemoteKeySet};
use crate::config::{AuthConfig, ConfigError};

/// Pull the raw token out of an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthError::HeaderMissing)?;
    let auth_str = auth_header.to_str().map_err(|_| AuthError::HeaderMalformed)?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::NotBearer),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::NotBearer),
        [_] => Err(AuthError::TokenMissing),
        [_, token] => Ok(*token),
        _ => Err(AuthError::HeaderMalformed),
    }
}

/// Verifies access tokens against the provider's key set
pub struct TokenValidator {
    keys: Arc<dyn KeySource>,
    audience: String,
    issuer: String,
    algorithms: Vec<Algorithm>,
}

impl TokenValidator {
    pub fn new(
        keys: Arc<dyn KeySource>,
        audience: impl Into<String>,
        issuer: impl Into<String>,
        algorithms: Vec<Algorithm>,
    ) -> Self {
        Self {
            keys,
            audience: audience.into(),
            issuer: issuer.into(),
            algorithms,
        }
    }

    /// Validator backed by the provider's published key set
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let keys = RemoteKeySet::new(
            config.jwks_url()?,
            Duration::from_secs(config.jwks_cache_secs),
            Duration::from_secs(config.jwks_refetch_secs),
        );
        Ok(Self::new(
            Arc::new(keys),
            config.audience.clone(),
            config.issuer(),
            config.signing_algorithms()?,
        ))
    }

    /// Decode `token`, check its signature, expiry, audience and issuer
    pub async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::Unparsable)?;
        let kid = header.kid.ok_or(AuthError::KeyIdMissing)?;

        if !self.algorithms.contains(&header.alg) {
            tracing::warn!("Rejected token signed with {:?}", header.alg);
            return Err(AuthError::Unparsable);
        }

        let key = self.keys.key(&kid).await?;

        let mut validation = Validation::new(key.algorithm);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        let token_data = decode::<Claims>(token, &key.key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::MissingRequiredClaim(_) => AuthError::IncorrectClaims,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidEcdsaKey | ErrorKind::InvalidKeyFormat => {
                AuthError::InvalidKey(e.to_string())
            }
            _ => AuthError::Unparsable,
        })?;

        Ok(token_data.claims)
    }
}
