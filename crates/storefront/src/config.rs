//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults point at the production catalog.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `CATALOG_API_URL` - Content API base (default: <https://zapatos-shoes-lulu.onrender.com/api>)
//! - `CATALOG_MEDIA_URL` - Base for relative image paths (default: <https://zapatos-shoes-lulu.onrender.com>)
//! - `CATALOG_API_TOKEN` - Content API bearer token
//! - `CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 60)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `WHATSAPP_PHONE` - WhatsApp number for inquiries and checkout, digits only
//! - `CONTACT_EMAIL` - Contact email shown in the footer
//! - `CONTACT_ADDRESS` - Store address shown in the footer
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `STOREFRONT_STATIC_DIR` - Directory served under `/static` (default: the crate's `static/`)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://zapatos-shoes-lulu.onrender.com/api";
const DEFAULT_MEDIA_URL: &str = "https://zapatos-shoes-lulu.onrender.com";
const DEFAULT_WHATSAPP_PHONE: &str = "573232312340";
const DEFAULT_CONTACT_EMAIL: &str = "info@shoeslulu.com";
const DEFAULT_CONTACT_ADDRESS: &str = "Calle Principal #123";

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
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Content API configuration
    pub catalog: CatalogConfig,
    /// Contact details and WhatsApp handoff number
    pub contact: ContactConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Directory of CSS/JS assets
    pub static_dir: PathBuf,
}

/// Content API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// API base, e.g. `https://host/api`
    pub api_url: Url,
    /// Base for image paths the API returns as relative
    pub media_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Wait before an in-flight request is abandoned
    pub timeout: Duration,
    /// How long fetched catalog data is reused
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("api_url", &self.api_url.as_str())
            .field("media_url", &self.media_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Store contact details.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// WhatsApp number in international format, digits only
    pub whatsapp_phone: String,
    pub email: String,
    pub address: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the API token fails
    /// validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        let catalog = CatalogConfig::from_env()?;
        let contact = ContactConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog,
            contact,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            static_dir: get_optional_env("STOREFRONT_STATIC_DIR")
                .map_or_else(|| PathBuf::from(crate::STATIC_DIR), PathBuf::from),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CatalogConfig {
    /// Configuration for an API base with default timeout and cache lifetime.
    ///
    /// Relative image paths resolve against the API's origin.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        let mut media_url = api_url.clone();
        media_url.set_path("/");
        media_url.set_query(None);

        Self {
            api_url,
            media_url,
            api_token: None,
            timeout: Duration::from_secs(60),
            cache_ttl: Duration::from_secs(300),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let api_url = get_url("CATALOG_API_URL", DEFAULT_API_URL)?;
        let media_url = get_url("CATALOG_MEDIA_URL", DEFAULT_MEDIA_URL)?;
        let api_token = get_optional_env("CATALOG_API_TOKEN")
            .map(|token| {
                validate_secret_strength(&token, "CATALOG_API_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        Ok(Self {
            api_url,
            media_url,
            api_token,
            timeout: Duration::from_secs(get_secs("CATALOG_TIMEOUT_SECS", 60)?),
            cache_ttl: Duration::from_secs(get_secs("CATALOG_CACHE_TTL_SECS", 300)?),
        })
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            whatsapp_phone: DEFAULT_WHATSAPP_PHONE.to_string(),
            email: DEFAULT_CONTACT_EMAIL.to_string(),
            address: DEFAULT_CONTACT_ADDRESS.to_string(),
        }
    }
}

impl ContactConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let whatsapp_phone = get_env_or_default("WHATSAPP_PHONE", DEFAULT_WHATSAPP_PHONE);
        validate_phone(&whatsapp_phone, "WHATSAPP_PHONE")?;

        Ok(Self {
            whatsapp_phone,
            email: get_env_or_default("CONTACT_EMAIL", DEFAULT_CONTACT_EMAIL),
            address: get_env_or_default("CONTACT_ADDRESS", DEFAULT_CONTACT_ADDRESS),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get an absolute http(s) URL.
fn get_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    let value = get_env_or_default(key, default);
    let url = Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Get a positive number of seconds.
fn get_secs(key: &str, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

/// Validate a WhatsApp number: international format, digits only.
fn validate_phone(phone: &str, var_name: &str) -> Result<(), ConfigError> {
    if phone.len() < 8 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be an international number with digits only (e.g. 573001234567)".to_string(),
        ));
    }
    Ok(())
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

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token generated by the content API."
            ),
        ));
    }

    Ok(())
}
