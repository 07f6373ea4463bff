// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8886;
pub const DEFAULT_ROOT_DIR: &str = ".";
pub const DEFAULT_ACCESS_LOG_FORMAT: &str = "common";
pub const DEFAULT_KEEP_ALIVE_TIMEOUT: u32 = 5;
pub const DEFAULT_SERVER_NAME: &str = "devserve/0.1";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as `/`, relative paths resolve against the working directory
    pub root_dir: String,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root_dir: DEFAULT_ROOT_DIR.to_string(),
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stderr if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    DEFAULT_ACCESS_LOG_FORMAT.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Idle time allowed between requests on a kept-alive connection, 0 disables keep-alive
    pub keep_alive_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: u64::from(DEFAULT_KEEP_ALIVE_TIMEOUT),
            max_connections: None,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    /// Content-Type forced onto responses whose request target ends with `suffix`
    #[serde(default = "default_content_type_overrides")]
    pub content_type_overrides: Vec<ContentTypeRule>,
}

/// One content type override rule
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ContentTypeRule {
    pub suffix: String,
    pub content_type: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

fn default_content_type_overrides() -> Vec<ContentTypeRule> {
    vec![ContentTypeRule {
        suffix: ".js".to_string(),
        content_type: "application/javascript".to_string(),
    }]
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            index_files: default_index_files(),
            content_type_overrides: default_content_type_overrides(),
        }
    }
}
