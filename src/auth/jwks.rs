//! Verification key sources for access tokens

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, EllipticCurve, Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey};
use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use super::AuthError;

/// A public key together with the algorithm it verifies
#[derive(Clone)]
pub struct VerifyingKey {
    pub key: DecodingKey,
    pub algorithm: Algorithm,
}

/// Anything that can resolve a token's `kid` to a verification key
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn key(&self, kid: &str) -> Result<VerifyingKey, AuthError>;
}

/// Map a JWK's algorithm parameters to a `jsonwebtoken::Algorithm`
pub fn jwk_algorithm(jwk: &Jwk) -> Result<Algorithm, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => Ok(Algorithm::RS256),
        AlgorithmParameters::EllipticCurve(params) => match &params.curve {
            EllipticCurve::P256 => Ok(Algorithm::ES256),
            EllipticCurve::P384 => Ok(Algorithm::ES384),
            other => Err(AuthError::InvalidKey(format!("unsupported curve {:?}", other))),
        },
        AlgorithmParameters::OctetKey(_) => {
            Err(AuthError::InvalidKey("symmetric keys are not published".to_string()))
        }
        AlgorithmParameters::OctetKeyPair(_) => Ok(Algorithm::EdDSA),
    }
}

/// Turn a published JWK into something `jsonwebtoken` can verify with
pub fn verifying_key_from_jwk(jwk: &Jwk) -> Result<VerifyingKey, AuthError> {
    let algorithm = jwk_algorithm(jwk)?;
    let key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::InvalidKey(e.to_string()))?;
    Ok(VerifyingKey { key, algorithm })
}

struct CachedKeys {
    keys: HashMap<String, Jwk>,
    fetched_at: Instant,
}

enum Lookup {
    Hit(Jwk),
    /// The kid is absent from a set fetched too recently to refetch
    Unknown,
    Refetch,
}

/// Key set published by the identity provider, fetched over HTTPS and cached
pub struct RemoteKeySet {
    http_client: Client,
    jwks_url: Url,
    cache_duration: Duration,
    refetch_interval: Duration,
    cache: RwLock<Option<CachedKeys>>,
    refresh: Mutex<()>,
}

impl RemoteKeySet {
    /// `cache_duration` bounds how long a fetched set is trusted;
    /// `refetch_interval` is the minimum gap between fetches caused by unknown kids
    pub fn new(jwks_url: Url, cache_duration: Duration, refetch_interval: Duration) -> Self {
        Self {
            http_client: Client::new(),
            jwks_url,
            cache_duration,
            refetch_interval,
            cache: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    async fn fetch(&self) -> Result<HashMap<String, Jwk>, AuthError> {
        tracing::debug!("Fetching JWKS from: {}", self.jwks_url);

        let response = self
            .http_client
            .get(self.jwks_url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!(
                "JWKS fetch failed with status: {}",
                response.status()
            )));
        }

        let jwk_set: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("unparsable JWKS: {}", e)))?;

        let mut keys = HashMap::new();
        for jwk in jwk_set.keys {
            match jwk.common.key_id.clone() {
                Some(kid) => {
                    keys.insert(kid, jwk);
                }
                None => tracing::warn!("JWK missing kid field, skipping"),
            }
        }

        tracing::debug!("Loaded {} signing keys from {}", keys.len(), self.jwks_url);
        Ok(keys)
    }

    async fn lookup(&self, kid: &str) -> Lookup {
        let cache = self.cache.read().await;
        let Some(cached) = cache.as_ref() else {
            return Lookup::Refetch;
        };

        let age = cached.fetched_at.elapsed();
        if age >= self.cache_duration {
            return Lookup::Refetch;
        }
        match cached.keys.get(kid) {
            Some(jwk) => Lookup::Hit(jwk.clone()),
            None if age < self.refetch_interval => Lookup::Unknown,
            None => Lookup::Refetch,
        }
    }

    fn resolve(lookup: Lookup, kid: &str) -> Option<Result<VerifyingKey, AuthError>> {
        match lookup {
            Lookup::Hit(jwk) => Some(verifying_key_from_jwk(&jwk)),
            Lookup::Unknown => Some(Err(AuthError::UnknownKey(kid.to_string()))),
            Lookup::Refetch => None,
        }
    }
}

#[async_trait]
impl KeySource for RemoteKeySet {
    async fn key(&self, kid: &str) -> Result<VerifyingKey, AuthError> {
        if let Some(result) = Self::resolve(self.lookup(kid).await, kid) {
            return result;
        }

        // One fetch at a time; callers that queued behind it reuse its result
        let _refresh = self.refresh.lock().await;
        if let Some(result) = Self::resolve(self.lookup(kid).await, kid) {
            return result;
        }

        let keys = self.fetch().await?;
        let jwk = keys.get(kid).cloned();
        {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            });
        }

        match jwk {
            Some(jwk) => verifying_key_from_jwk(&jwk),
            None => Err(AuthError::UnknownKey(kid.to_string())),
        }
    }
}

/// Fixed keys registered in-process
#[derive(Clone, Default)]
pub struct StaticKeySet {
    keys: HashMap<String, VerifyingKey>,
}

impl StaticKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, kid: impl Into<String>, key: DecodingKey, algorithm: Algorithm) -> Self {
        self.keys.insert(kid.into(), VerifyingKey { key, algorithm });
        self
    }

    /// Load every usable key from a JWK set; keys without a kid are ignored
    pub fn from_jwk_set(jwk_set: &JwkSet) -> Result<Self, AuthError> {
        let mut keys = HashMap::new();
        for jwk in &jwk_set.keys {
            if let Some(kid) = &jwk.common.key_id {
                keys.insert(kid.clone(), verifying_key_from_jwk(jwk)?);
            }
        }
        Ok(Self { keys })
    }
}

#[async_trait]
impl KeySource for StaticKeySet {
    async fn key(&self, kid: &str) -> Result<VerifyingKey, AuthError> {
        self.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }
}
