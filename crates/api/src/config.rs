//! Relay configuration loaded from environment variables.
//!
//! The configuration is built once at start-up and handed to
//! [`AppState`](crate::state::AppState); nothing below the route layer reads
//! process state.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STORE_NAME` - Shopify store sub-domain (`{STORE_NAME}.myshopify.com`)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `API_VERSION` - Admin API version (default: 2024-01)
//! - `SHOPIFY_API_BASE_URL` - Full Admin API base URL, overrides the derived one
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `CORS_ORIGINS` - Comma-separated list of allowed browser origins
//! - `SPA_METAOBJECT_TYPE` - Metaobject type listed by `/spas` (default: spa)
//! - `SERIALIZE_FIELD_WRITES` - Serialize read-modify-write per customer (default: true)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_API_VERSION: &str = "2024-01";
const DEFAULT_SPA_METAOBJECT_TYPE: &str = "spa";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Relay application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration
    pub shopify: ShopifyAdminConfig,
    /// Allowed CORS origins (empty allows none)
    pub cors_origins: Vec<String>,
    /// Metaobject type served by the spa listing routes
    pub spa_metaobject_type: String,
    /// Hold a per-customer lock across read-modify-write field updates
    pub serialize_field_writes: bool,
    /// Tracing output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE access token.
#[derive(Clone)]
pub struct ShopifyAdminConfig {
    /// Admin API base URL, e.g. `https://store.myshopify.com/admin/api/2024-01`
    pub base_url: Url,
    /// Admin API access token (`X-Shopify-Access-Token`)
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminConfig")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyAdminConfig {
    /// Build the config for a store sub-domain and API version.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the store name does not form a
    /// valid host.
    pub fn for_store(
        store_name: &str,
        api_version: &str,
        access_token: SecretString,
    ) -> Result<Self, ConfigError> {
        let raw = format!("https://{store_name}.myshopify.com/admin/api/{api_version}");
        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_NAME".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            access_token,
        })
    }

    fn from_source(env: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let access_token = env.validated_secret("SHOPIFY_ACCESS_TOKEN")?;

        if let Some(raw) = env.optional("SHOPIFY_API_BASE_URL") {
            let base_url = Url::parse(raw.trim_end_matches('/')).map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_API_BASE_URL".to_string(), e.to_string())
            })?;
            return Ok(Self {
                base_url,
                access_token,
            });
        }

        let store_name = env.required("STORE_NAME")?;
        let api_version = env.or_default("API_VERSION", DEFAULT_API_VERSION);
        Self::for_store(&store_name, &api_version, access_token)
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let lookup = |key: &str| std::env::var(key).ok();
        Self::from_source(&EnvSource(&lookup))
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| vars.get(key).cloned();
        Self::from_source(&EnvSource(&lookup))
    }

    fn from_source(env: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let host = env
            .or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let shopify = ShopifyAdminConfig::from_source(env)?;
        let cors_origins = env
            .optional("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();
        let spa_metaobject_type = env.or_default("SPA_METAOBJECT_TYPE", DEFAULT_SPA_METAOBJECT_TYPE);
        let serialize_field_writes = parse_bool(
            "SERIALIZE_FIELD_WRITES",
            &env.or_default("SERIALIZE_FIELD_WRITES", "true"),
        )?;
        let log_format = match env.or_default("LOG_FORMAT", "text").as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected \"text\" or \"json\", got {other:?}"),
                ));
            }
        };

        Ok(Self {
            host,
            port,
            shopify,
            cors_origins,
            spa_metaobject_type,
            serialize_field_writes,
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup used while building the config.
struct EnvSource<'a>(&'a dyn Fn(&str) -> Option<String>);

impl EnvSource<'_> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let secret = SecretString::from(self.required(key)?);
        validate_secret_strength(secret.expose_secret(), key)?;
        Ok(secret)
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS
        .iter()
        .find(|pattern| lower.contains(**pattern))
    {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
