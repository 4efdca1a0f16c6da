use serde::Deserialize;

/// Main configuration structure for bookscout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub http: HttpConfig,
    pub jobs: JobsConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            http: HttpConfig::default(),
            jobs: JobsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Base URL of the catalog origin
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Delay enforced after each successful fetch (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Default number of listing pages per crawl
    #[serde(rename = "default-pages")]
    pub default_pages: u32,

    /// Upper bound on pages accepted by a trigger request
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "http://books.toscrape.com".to_string(),
            delay_ms: 1000,
            default_pages: 2,
            max_pages: 50,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

/// Job subsystem configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Maximum number of crawl workers running at once
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: u32,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory where persisted record files are written
    pub directory: String,

    /// Default filename stem when a trigger request omits one
    #[serde(rename = "default-name")]
    pub default_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "data/output".to_string(),
            default_name: "books".to_string(),
        }
    }
}
