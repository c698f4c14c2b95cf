use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string, or `memory://` for the in-process store
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token issuer domain, e.g. `casting.eu.auth0.com`
    pub domain: String,
    pub audience: String,
    pub algorithms: Vec<String>,
    pub jwks_cache_secs: u64,
    /// Minimum gap between key set fetches triggered by unknown key ids
    pub jwks_refetch_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl AuthConfig {
    /// Issuer claim expected on every token: `https://<domain>/`
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain.trim_end_matches('/'))
    }

    /// Location of the published key set for the configured domain
    pub fn jwks_url(&self) -> Result<url::Url, ConfigError> {
        let invalid = || ConfigError::Invalid {
            name: "AUTH0_DOMAIN",
            value: self.domain.clone(),
        };
        url::Url::parse(&self.issuer())
            .and_then(|base| base.join(".well-known/jwks.json"))
            .map_err(|_| invalid())
    }

    /// Accepted token signing algorithms, parsed from their JOSE names
    pub fn signing_algorithms(&self) -> Result<Vec<jsonwebtoken::Algorithm>, ConfigError> {
        self.algorithms
            .iter()
            .map(|name| {
                name.parse().map_err(|_| ConfigError::Invalid {
                    name: "AUTH_ALGORITHMS",
                    value: name.clone(),
                })
            })
            .collect()
    }
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with("memory:")
    }
}

impl AppConfig {
    /// Build the configuration from environment presets and overrides.
    /// Call `validate` once any command-line overrides have been applied.
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH0_DOMAIN") {
            self.auth.domain = v;
        }
        if let Ok(v) = env::var("API_AUDIENCE") {
            self.auth.audience = v;
        }
        if let Ok(v) = env::var("AUTH_ALGORITHMS") {
            self.auth.algorithms = split_list(&v);
        }
        if let Ok(v) = env::var("AUTH_JWKS_CACHE_SECS") {
            self.auth.jwks_cache_secs = v.parse().unwrap_or(self.auth.jwks_cache_secs);
        }
        if let Ok(v) = env::var("AUTH_JWKS_REFETCH_SECS") {
            self.auth.jwks_refetch_secs = v.parse().unwrap_or(self.auth.jwks_refetch_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v)
                .into_iter()
                .filter(|origin| origin != "*")
                .collect();
        }

        self
    }

    /// Check that the values without a sensible default were provided
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.auth.domain.is_empty() {
            return Err(ConfigError::Missing("AUTH0_DOMAIN"));
        }
        if self.auth.audience.is_empty() {
            return Err(ConfigError::Missing("API_AUDIENCE"));
        }
        if self.auth.algorithms.is_empty() {
            return Err(ConfigError::Missing("AUTH_ALGORITHMS"));
        }
        self.auth.jwks_url()?;
        self.auth.signing_algorithms()?;
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
            },
            auth: AuthConfig::default(),
            security: SecurityConfig {
                cors_origins: Vec::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
            },
            ..Self::development()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            audience: String::new(),
            algorithms: vec!["RS256".to_string()],
            jwks_cache_secs: 3600,
            jwks_refetch_secs: 30,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
