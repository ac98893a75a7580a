use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000/legacy";
pub const DEFAULT_TIMEOUT: &str = "10s";
pub const DEFAULT_KNOWN_BRAND: &str = "annamartin";
pub const DEFAULT_NEW_BRAND: &str = "testbrand123";
pub const DEFAULT_BRAND_PREFIX: &str = "testbrand";

#[derive(Clone, Debug)]
pub struct Config {
    /// Settings API root, e.g. `http://127.0.0.1:3000/legacy`
    pub base_url: String,
    pub timeout: Duration,

    // Check inputs
    pub known_brand: String,
    pub new_brand: String,
    pub brand_prefix: String,

    pub report_json: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            known_brand: DEFAULT_KNOWN_BRAND.to_string(),
            new_brand: DEFAULT_NEW_BRAND.to_string(),
            brand_prefix: DEFAULT_BRAND_PREFIX.to_string(),
            report_json: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let timeout_raw = env("REQUEST_TIMEOUT", DEFAULT_TIMEOUT);
        let timeout = parse_timeout("REQUEST_TIMEOUT", &timeout_raw)?;
        let report_json = std::env::var("REPORT_JSON")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            base_url: env("SETTINGS_API_URL", DEFAULT_BASE_URL),
            timeout,
            known_brand: env("KNOWN_BRAND_SLUG", DEFAULT_KNOWN_BRAND),
            new_brand: env("NEW_BRAND_SLUG", DEFAULT_NEW_BRAND),
            brand_prefix: env("TEST_BRAND_PREFIX", DEFAULT_BRAND_PREFIX),
            report_json,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(invalid("SETTINGS_API_URL", "cannot be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(invalid(
                "SETTINGS_API_URL",
                &format!("expected an http(s) URL, got {}", base),
            ));
        }
        if self.timeout.is_zero() {
            return Err(invalid("REQUEST_TIMEOUT", "must be greater than zero"));
        }
        let slugs = [
            ("KNOWN_BRAND_SLUG", &self.known_brand),
            ("NEW_BRAND_SLUG", &self.new_brand),
            ("TEST_BRAND_PREFIX", &self.brand_prefix),
        ];
        for (key, value) in slugs {
            if value.trim().is_empty() {
                return Err(invalid(key, "cannot be empty"));
            }
        }
        Ok(())
    }
}

pub fn parse_timeout(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw.trim())
        .map_err(|e| ConfigError::Invalid(key.to_string(), e.to_string()))
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid(key.to_string(), reason.to_string())
}

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value {0}: {1}")]
    Invalid(String, String),
}
