use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound for every duration setting, one year
const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub news_api_key: Option<String>,
    pub news_api_url: String,
    pub cors_origins: Vec<String>,
    pub refresh_interval: Duration,
    pub refresh_timeout: Duration,
    pub request_timeout: Duration,
    pub refresh_concurrency: usize,
    pub sweep_interval: Duration,
    pub news_ttl: Duration,
    pub search_ttl: Duration,
    /// Start the refresh scheduler at boot
    pub background_refresh: bool,
}

impl Config {
    /// Parse configuration from environment variables
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |name: &str, default| parse_or(lookup(name), default);
        let secs = |name: &str, default: u64| {
            Duration::from_secs(parse_or(lookup(name), default).clamp(1, MAX_DURATION_SECS))
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]);

        Self {
            port: parsed("PORT", 3000),
            news_api_key: lookup("NEWS_API_KEY").filter(|k| !k.trim().is_empty()),
            news_api_url: lookup("NEWS_API_URL")
                .unwrap_or_else(|| newsapi_client::DEFAULT_BASE_URL.to_string()),
            cors_origins,
            refresh_interval: secs("REFRESH_INTERVAL_SECS", 30 * 60),
            refresh_timeout: secs("REFRESH_TIMEOUT_SECS", 15),
            request_timeout: secs("REQUEST_TIMEOUT_SECS", 10),
            refresh_concurrency: parse_or(lookup("REFRESH_CONCURRENCY"), 8usize).max(1),
            sweep_interval: secs("CACHE_SWEEP_INTERVAL_SECS", 10 * 60),
            news_ttl: secs("NEWS_TTL_SECS", 30 * 60),
            search_ttl: secs("SEARCH_TTL_SECS", 15 * 60),
            background_refresh: lookup("BACKGROUND_REFRESH")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
