use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{AccountError, Result};

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.shopware.com";

/// Environment variable overriding the API endpoint
pub const ENV_BASE_URL: &str = "SHOPWARE_ACCOUNT_API_URL";
/// Environment variable overriding the session cache directory
pub const ENV_CACHE_DIR: &str = "SHOPWARE_ACCOUNT_CACHE_DIR";

/// Configuration for the account API client
#[derive(Debug, Clone)]
pub struct Config {
    /// API endpoint, e.g. `https://api.shopware.com`
    pub base_url: String,
    /// User-Agent header value
    pub user_agent: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout for JSON calls
    pub timeout: Duration,
    /// Whole-request timeout for multipart uploads
    pub upload_timeout: Duration,
    /// Maximum number of redirects followed
    pub max_redirects: usize,
    /// Session cache directory; `None` uses the home directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("shopware-account-api-rs/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(300),
            max_redirects: 5,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Create a configuration pointing at the given endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Config {
            base_url: base_url.into(),
            ..Config::default()
        }
    }

    /// Defaults overlaid with `SHOPWARE_ACCOUNT_API_URL` and
    /// `SHOPWARE_ACCOUNT_CACHE_DIR` when set
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(url) = env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(dir) = env::var(ENV_CACHE_DIR) {
            if !dir.trim().is_empty() {
                config.cache_dir = Some(PathBuf::from(dir));
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Resolve an API path (which may carry a query string) against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| AccountError::validation(format!("invalid base URL {}: {}", self.base_url, e)))?;
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| AccountError::validation(format!("invalid API path {}: {}", path, e)))
    }
}

fn builder(config: &Config) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    ClientBuilder::new()
        .default_headers(headers)
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout)
        .redirect(Policy::limited(config.max_redirects))
}

/// Create the HTTP client for JSON requests
pub fn create_http_client(config: &Config) -> Result<Client> {
    builder(config)
        .timeout(config.timeout)
        .build()
        .map_err(|e| AccountError::Api {
            message: format!("cannot build HTTP client: {}", e),
            status: None,
            body: None,
            source: Some(Box::new(e)),
        })
}

/// Create the HTTP client for uploads with a longer timeout
pub fn create_upload_client(config: &Config) -> Result<Client> {
    builder(config)
        .timeout(config.upload_timeout)
        .build()
        .map_err(|e| AccountError::Upload {
            message: format!("cannot build upload HTTP client: {}", e),
            status: None,
            body: None,
            source: Some(Box::new(e)),
        })
}
