//! Configuration types for insta-bridge
//!
//! Configuration is grouped into sub-configs, each with serde defaults and a
//! `Default` impl so the service works out of the box:
//! - [`ServerConfig`] — bind address, runtime environment, CORS, Swagger UI
//! - [`InstagramConfig`] — default account, retry policy, cache, timeouts
//! - [`SummarizerConfig`] — language model credentials and parameters
//! - [`PostingConfig`] — X.com credentials and endpoints
//!
//! [`Config::from_env`] reads the same variables the service has always used
//! (`INSTAGRAM_USERNAME`, `LLM_API_KEY`, `TWITTER_API_KEY`, ...) and rejects
//! out-of-range values.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};
use utoipa::ToSchema;

/// Inclusive bounds for `INSTAGRAM_SCRAPING_RETRIES`
pub const RETRIES_RANGE: (u32, u32) = (1, 10);
/// Inclusive bounds for `INSTAGRAM_RETRY_DELAY` in milliseconds
pub const RETRY_DELAY_RANGE_MS: (u64, u64) = (500, 5000);
/// Inclusive bounds for `INSTAGRAM_REQUEST_TIMEOUT_MS`
pub const REQUEST_TIMEOUT_RANGE_MS: (u64, u64) = (1000, 60_000);
/// Maximum length of a post on X.com
pub const MAX_TWEET_LENGTH: usize = 280;

/// Runtime environment, read from `APP_ENV` (or `NODE_ENV`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Local development: verbose errors, human-readable logs (default)
    #[default]
    Development,
    /// Deployed service: redacted errors, JSON logs, response cache on
    Production,
    /// Test runs
    Test,
}

impl Environment {
    /// Whether this is the production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Whether internal error details may be shown to callers
    pub fn exposes_internal_errors(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Lowercase name as used in the environment variable
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!(
                "unknown environment '{other}' (expected development, production or test)"
            )),
        }
    }
}

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Runtime environment (default: development)
    #[serde(default)]
    pub environment: Environment,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            environment: Environment::default(),
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Instagram retrieval configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstagramConfig {
    /// Account used when a request does not name one (default: "bbcnews")
    #[serde(default = "default_account")]
    pub default_account: String,

    /// Number of strategy rounds before falling back to canned data (default: 3, range 1-10)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause between strategy rounds (default: 1500ms, range 500-5000ms)
    #[serde(default = "default_retry_delay", with = "duration_millis_serde")]
    pub retry_delay: Duration,

    /// Timeout of a single outbound request (default: 10s)
    #[serde(default = "default_request_timeout", with = "duration_millis_serde")]
    pub request_timeout: Duration,

    /// Serve recent successful retrievals from memory (default: false)
    #[serde(default)]
    pub cache_enabled: bool,

    /// Age after which a cached post is discarded (default: 1 hour)
    #[serde(default = "default_cache_ttl", with = "duration_secs_serde")]
    pub cache_ttl: Duration,

    /// Base URL of the Instagram website (default: https://www.instagram.com)
    #[serde(default = "default_instagram_base_url")]
    pub base_url: String,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            default_account: default_account(),
            max_retries: default_max_retries(),
            retry_delay: default_retry_delay(),
            request_timeout: default_request_timeout(),
            cache_enabled: false,
            cache_ttl: default_cache_ttl(),
            base_url: default_instagram_base_url(),
        }
    }
}

/// Language model configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// API key; when absent only the local summarizer is used
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name (default: "gpt-3.5-turbo")
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature (default: 0.7, range 0-1)
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    /// Base URL of the OpenAI-compatible API (default: https://api.openai.com/v1)
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Summary length used by the workflow (default: 280)
    #[serde(default = "default_max_tweet_length")]
    pub max_length: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            base_url: default_llm_base_url(),
            max_length: MAX_TWEET_LENGTH,
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("max_length", &self.max_length)
            .finish()
    }
}

/// OAuth 1.0a user-context credentials for X.com
#[derive(Clone, Serialize, Deserialize)]
pub struct TwitterCredentials {
    /// Consumer (API) key
    pub api_key: String,
    /// Consumer (API) secret
    pub api_secret: String,
    /// User access token
    pub access_token: String,
    /// User access token secret
    pub access_secret: String,
}

impl fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("api_key", &"***REDACTED***")
            .field("api_secret", &"***REDACTED***")
            .field("access_token", &"***REDACTED***")
            .field("access_secret", &"***REDACTED***")
            .finish()
    }
}

/// X.com posting configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PostingConfig {
    /// Credentials; when absent posts are simulated
    #[serde(default)]
    pub credentials: Option<TwitterCredentials>,

    /// Base URL of the v2 API (default: https://api.twitter.com)
    #[serde(default = "default_twitter_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the media upload API (default: https://upload.twitter.com)
    #[serde(default = "default_twitter_upload_base_url")]
    pub upload_base_url: String,

    /// Media types accepted for upload
    #[serde(default = "default_allowed_media_types")]
    pub allowed_media_types: Vec<String>,

    /// Maximum media size in bytes (default: 5 MiB)
    #[serde(default = "default_max_media_bytes")]
    pub max_media_bytes: usize,

    /// Timeout for each X.com call (default: 10s)
    #[serde(default = "default_request_timeout", with = "duration_millis_serde")]
    pub request_timeout: Duration,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            api_base_url: default_twitter_api_base_url(),
            upload_base_url: default_twitter_upload_base_url(),
            allowed_media_types: default_allowed_media_types(),
            max_media_bytes: default_max_media_bytes(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Main configuration for the bridge
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Instagram retrieval settings
    #[serde(default)]
    pub instagram: InstagramConfig,

    /// Summarization settings
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Posting settings
    #[serde(default)]
    pub posting: PostingConfig,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Result<Self> {
        // Missing .env is the normal case outside development
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// Unset and empty variables take their defaults. Values outside their
    /// documented bounds produce [`Error::Config`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get("APP_ENV").or_else(|| get("NODE_ENV")) {
            Some(raw) => raw
                .parse::<Environment>()
                .map_err(|e| Error::config("APP_ENV", e))?,
            None => Environment::default(),
        };

        let host: std::net::IpAddr = parse_or(&get, "HOST", default_bind_address().ip())?;
        let port: u16 = parse_or(&get, "PORT", default_bind_address().port())?;

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(default_cors_origins);

        let server = ServerConfig {
            bind_address: SocketAddr::new(host, port),
            environment,
            cors_origins,
            swagger_ui: parse_or(&get, "SWAGGER_UI", !environment.is_production())?,
        };

        let default_timeout_ms = if environment.is_production() {
            PRODUCTION_REQUEST_TIMEOUT_MS
        } else {
            DEFAULT_REQUEST_TIMEOUT_MS
        };

        let instagram = InstagramConfig {
            default_account: get("INSTAGRAM_USERNAME").unwrap_or_else(default_account),
            max_retries: parse_or(&get, "INSTAGRAM_SCRAPING_RETRIES", default_max_retries())?,
            retry_delay: Duration::from_millis(parse_or(
                &get,
                "INSTAGRAM_RETRY_DELAY",
                DEFAULT_RETRY_DELAY_MS,
            )?),
            request_timeout: Duration::from_millis(parse_or(
                &get,
                "INSTAGRAM_REQUEST_TIMEOUT_MS",
                default_timeout_ms,
            )?),
            cache_enabled: parse_or(&get, "INSTAGRAM_CACHE_ENABLED", environment.is_production())?,
            cache_ttl: Duration::from_secs(parse_or(
                &get,
                "INSTAGRAM_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )?),
            base_url: get("INSTAGRAM_BASE_URL").unwrap_or_else(default_instagram_base_url),
        };

        let summarizer = SummarizerConfig {
            api_key: get("LLM_API_KEY"),
            model: get("LLM_MODEL").unwrap_or_else(default_llm_model),
            temperature: parse_or(&get, "LLM_TEMPERATURE", default_llm_temperature())?,
            base_url: get("LLM_BASE_URL").unwrap_or_else(default_llm_base_url),
            max_length: MAX_TWEET_LENGTH,
        };

        // Live posting needs all four secrets; a partial set means mock mode
        let credentials = match (
            get("TWITTER_API_KEY"),
            get("TWITTER_API_SECRET"),
            get("TWITTER_ACCESS_TOKEN"),
            get("TWITTER_ACCESS_SECRET"),
        ) {
            (Some(api_key), Some(api_secret), Some(access_token), Some(access_secret)) => {
                Some(TwitterCredentials {
                    api_key,
                    api_secret,
                    access_token,
                    access_secret,
                })
            }
            _ => None,
        };

        let posting = PostingConfig {
            credentials,
            api_base_url: get("TWITTER_API_BASE_URL").unwrap_or_else(default_twitter_api_base_url),
            upload_base_url: get("TWITTER_UPLOAD_BASE_URL")
                .unwrap_or_else(default_twitter_upload_base_url),
            ..PostingConfig::default()
        };

        let config = Config {
            server,
            instagram,
            summarizer,
            posting,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every bounded setting
    pub fn validate(&self) -> Result<()> {
        let ig = &self.instagram;

        if ig.default_account.trim().is_empty() {
            return Err(Error::config(
                "INSTAGRAM_USERNAME",
                "default account must not be empty",
            ));
        }

        let (min, max) = RETRIES_RANGE;
        if !(min..=max).contains(&ig.max_retries) {
            return Err(Error::config(
                "INSTAGRAM_SCRAPING_RETRIES",
                format!("must be between {min} and {max}, got {}", ig.max_retries),
            ));
        }

        let (min, max) = RETRY_DELAY_RANGE_MS;
        let delay_ms = ig.retry_delay.as_millis() as u64;
        if !(min..=max).contains(&delay_ms) {
            return Err(Error::config(
                "INSTAGRAM_RETRY_DELAY",
                format!("must be between {min} and {max} ms, got {delay_ms}"),
            ));
        }

        let (min, max) = REQUEST_TIMEOUT_RANGE_MS;
        let timeout_ms = ig.request_timeout.as_millis() as u64;
        if !(min..=max).contains(&timeout_ms) {
            return Err(Error::config(
                "INSTAGRAM_REQUEST_TIMEOUT_MS",
                format!("must be between {min} and {max} ms, got {timeout_ms}"),
            ));
        }

        if ig.cache_ttl.is_zero() {
            return Err(Error::config(
                "INSTAGRAM_CACHE_TTL_SECS",
                "must be at least 1 second",
            ));
        }

        check_url("INSTAGRAM_BASE_URL", &ig.base_url)?;
        check_url("LLM_BASE_URL", &self.summarizer.base_url)?;
        check_url("TWITTER_API_BASE_URL", &self.posting.api_base_url)?;
        check_url("TWITTER_UPLOAD_BASE_URL", &self.posting.upload_base_url)?;

        let temperature = self.summarizer.temperature;
        if !(0.0..=1.0).contains(&temperature) {
            return Err(Error::config(
                "LLM_TEMPERATURE",
                format!("must be between 0 and 1, got {temperature}"),
            ));
        }

        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| Error::config(key, format!("invalid value '{raw}': {e}"))),
        None => Ok(default),
    }
}

fn check_url(key: &str, value: &str) -> Result<()> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(url) => Err(Error::config(
            key,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => Err(Error::config(key, format!("invalid URL '{value}': {e}"))),
    }
}

const DEFAULT_RETRY_DELAY_MS: u64 = 1500;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const PRODUCTION_REQUEST_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_account() -> String {
    "bbcnews".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(DEFAULT_RETRY_DELAY_MS)
}

fn default_request_timeout() -> Duration {
    Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(DEFAULT_CACHE_TTL_SECS)
}

fn default_instagram_base_url() -> String {
    "https://www.instagram.com".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_llm_temperature() -> f32 {
    0.7
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tweet_length() -> usize {
    MAX_TWEET_LENGTH
}

fn default_twitter_api_base_url() -> String {
    "https://api.twitter.com".to_string()
}

fn default_twitter_upload_base_url() -> String {
    "https://upload.twitter.com".to_string()
}

fn default_allowed_media_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
    ]
}

fn default_max_media_bytes() -> usize {
    5 * 1024 * 1024
}

mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

mod duration_secs_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_any_variables() {
        let config = load(&[]).unwrap();

        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.server.bind_address.port(), 3000);
        assert_eq!(config.instagram.default_account, "bbcnews");
        assert_eq!(config.instagram.max_retries, 3);
        assert_eq!(config.instagram.retry_delay, Duration::from_millis(1500));
        assert_eq!(config.instagram.request_timeout, Duration::from_secs(10));
        assert!(!config.instagram.cache_enabled);
        assert_eq!(config.instagram.cache_ttl, Duration::from_secs(3600));
        assert!(config.summarizer.api_key.is_none());
        assert_eq!(config.summarizer.model, "gpt-3.5-turbo");
        assert!(config.posting.credentials.is_none());
    }

    #[test]
    fn test_production_turns_cache_on_and_lengthens_timeout() {
        let config = load(&[("NODE_ENV", "production")]).unwrap();

        assert!(config.server.environment.is_production());
        assert!(config.instagram.cache_enabled);
        assert_eq!(config.instagram.request_timeout, Duration::from_secs(15));
        assert!(!config.server.swagger_ui);
    }

    #[test]
    fn test_explicit_cache_setting_wins_over_environment() {
        let config = load(&[("APP_ENV", "production"), ("INSTAGRAM_CACHE_ENABLED", "false")]).unwrap();
        assert!(!config.instagram.cache_enabled);
    }

    #[test]
    fn test_retry_bounds_are_enforced() {
        for bad in ["0", "11"] {
            let err = load(&[("INSTAGRAM_SCRAPING_RETRIES", bad)]).unwrap_err();
            match err {
                Error::Config { key, .. } => {
                    assert_eq!(key.as_deref(), Some("INSTAGRAM_SCRAPING_RETRIES"))
                }
                other => panic!("expected config error, got {other:?}"),
            }
        }

        let config = load(&[("INSTAGRAM_SCRAPING_RETRIES", "10")]).unwrap();
        assert_eq!(config.instagram.max_retries, 10);
    }

    #[test]
    fn test_retry_delay_bounds_are_enforced() {
        assert!(load(&[("INSTAGRAM_RETRY_DELAY", "499")]).is_err());
        assert!(load(&[("INSTAGRAM_RETRY_DELAY", "5001")]).is_err());

        let config = load(&[("INSTAGRAM_RETRY_DELAY", "500")]).unwrap();
        assert_eq!(config.instagram.retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_unparsable_number_names_the_variable() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("eighty"));
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == "PORT"));
    }

    #[test]
    fn test_partial_twitter_credentials_mean_mock_mode() {
        let config = load(&[
            ("TWITTER_API_KEY", "key"),
            ("TWITTER_API_SECRET", "secret"),
            ("TWITTER_ACCESS_TOKEN", "token"),
        ])
        .unwrap();
        assert!(config.posting.credentials.is_none());

        let config = load(&[
            ("TWITTER_API_KEY", "key"),
            ("TWITTER_API_SECRET", "secret"),
            ("TWITTER_ACCESS_TOKEN", "token"),
            ("TWITTER_ACCESS_SECRET", "token-secret"),
        ])
        .unwrap();
        assert!(config.posting.credentials.is_some());
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(load(&[("LLM_TEMPERATURE", "1.5")]).is_err());
        let config = load(&[("LLM_TEMPERATURE", "0.2")]).unwrap();
        assert!((config.summarizer.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_secrets_are_not_printed_by_debug() {
        let config = load(&[
            ("LLM_API_KEY", "sk-very-secret"),
            ("TWITTER_API_KEY", "key"),
            ("TWITTER_API_SECRET", "twitter-secret"),
            ("TWITTER_ACCESS_TOKEN", "token"),
            ("TWITTER_ACCESS_SECRET", "token-secret"),
        ])
        .unwrap();

        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(!printed.contains("twitter-secret"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_cors_origins_are_split_on_commas() {
        let config = load(&[("CORS_ORIGINS", "https://a.test, https://b.test,")]).unwrap();
        assert_eq!(
            config.server.cors_origins,
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = load(&[("INSTAGRAM_BASE_URL", "ftp://instagram.com")]).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }
}
