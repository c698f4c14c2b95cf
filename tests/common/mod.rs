#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::{json, Value};

use casting_agency::auth::{StaticKeySet, TokenValidator};
use casting_agency::config::SecurityConfig;
use casting_agency::{router, AppState};

pub const AUDIENCE: &str = "casting-agency";
pub const ISSUER: &str = "https://casting-test.example.com/";
pub const KEY_ID: &str = "test-key";
const SECRET: &[u8] = b"casting-agency-integration-secret";

pub const ASSISTANT: &[&str] = &["get:actors", "get:movies"];
pub const DIRECTOR: &[&str] = &[
    "get:actors",
    "get:movies",
    "post:actors",
    "patch:actors",
    "delete:actors",
    "patch:movies",
];
pub const EXECUTIVE_PRODUCER: &[&str] = &[
    "get:actors",
    "get:movies",
    "post:actors",
    "patch:actors",
    "delete:actors",
    "post:movies",
    "patch:movies",
    "delete:movies",
];

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `method path` with an optional bearer token and raw JSON body
    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(reqwest::StatusCode, Value)> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.context("response body is not JSON")?;
        Ok((status, body))
    }
}

/// Start the real router on an ephemeral port, backed by the in-memory store
/// and a fixed HMAC key so tests can mint their own tokens.
pub async fn spawn_server() -> Result<TestServer> {
    let keys = StaticKeySet::new().with_key(KEY_ID, DecodingKey::from_secret(SECRET), Algorithm::HS256);
    let validator = TokenValidator::new(Arc::new(keys), AUDIENCE, ISSUER, vec![Algorithm::HS256]);
    let app = router(
        AppState::in_memory(validator),
        &SecurityConfig {
            cors_origins: Vec::new(),
        },
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let base_url = format!("http://{}", listener.local_addr()?);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    Ok(TestServer { base_url, client })
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "sub": "auth0|integration",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

/// Sign arbitrary claims with the test key
pub fn sign(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(KEY_ID.to_string());
    encode(&header, claims, &EncodingKey::from_secret(SECRET)).expect("sign test token")
}

/// A valid token granting `permissions`
pub fn token(permissions: &[&str]) -> String {
    sign(&claims(permissions))
}
