use serde::Deserialize;

/// Main configuration structure for Crawl-Deck
///
/// Every section and key is optional; missing values fall back to the
/// defaults of a local development backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

/// Remote API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base address every endpoint path is appended to
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Overall request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Poll intervals used while crawl jobs are queued or running
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Delay between list refreshes (milliseconds)
    #[serde(rename = "list-interval-ms", default = "default_list_interval_ms")]
    pub list_interval_ms: u64,

    /// Delay between detail refreshes (milliseconds)
    #[serde(rename = "detail-interval-ms", default = "default_detail_interval_ms")]
    pub detail_interval_ms: u64,
}

/// List presentation settings
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// Rows per page in the record list
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: usize,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("crawl-deck/{}", env!("CARGO_PKG_VERSION"))
}

fn default_list_interval_ms() -> u64 {
    5000
}

fn default_detail_interval_ms() -> u64 {
    2000
}

fn default_page_size() -> usize {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            list_interval_ms: default_list_interval_ms(),
            detail_interval_ms: default_detail_interval_ms(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl PollingConfig {
    pub fn list_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.list_interval_ms)
    }

    pub fn detail_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.detail_interval_ms)
    }
}
