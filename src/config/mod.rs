// Configuration module entry point
// Loads the optional config file and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, ContentTypeRule, HttpConfig};

use types::{
    DEFAULT_ACCESS_LOG_FORMAT, DEFAULT_HOST, DEFAULT_KEEP_ALIVE_TIMEOUT, DEFAULT_PORT,
    DEFAULT_ROOT_DIR, DEFAULT_SERVER_NAME,
};

/// Config file looked up in the working directory, any extension the `config` crate knows
pub const CONFIG_FILE: &str = "devserve";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error, every key falls back to its default
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with(config::File::with_name(config_path).required(false))
    }

    fn load_with<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(source)
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root_dir", DEFAULT_ROOT_DIR)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", DEFAULT_ACCESS_LOG_FORMAT)?
            .set_default(
                "performance.keep_alive_timeout",
                i64::from(DEFAULT_KEEP_ALIVE_TIMEOUT),
            )?
            .set_default("http.server_name", DEFAULT_SERVER_NAME)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = Config::load_from("definitely/not/here/devserve").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8886);
        assert_eq!(cfg.server.root_dir, ".");
        assert!(cfg.server.workers.is_none());
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert_eq!(cfg.performance.keep_alive_timeout, 5);
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
        assert_eq!(
            cfg.http.content_type_overrides,
            vec![ContentTypeRule {
                suffix: ".js".to_string(),
                content_type: "application/javascript".to_string(),
            }]
        );
    }

    #[test]
    fn test_loaded_defaults_match_default_impl() {
        let loaded = Config::load_from("definitely/not/here/devserve").unwrap();
        let built = Config::default();
        assert_eq!(loaded.server.port, built.server.port);
        assert_eq!(loaded.server.host, built.server.host);
        assert_eq!(loaded.http.server_name, built.http.server_name);
        assert_eq!(
            loaded.performance.keep_alive_timeout,
            built.performance.keep_alive_timeout
        );
    }

    #[test]
    fn test_file_overrides() {
        let toml = r#"
            [server]
            port = 9000
            root_dir = "public"

            [performance]
            max_connections = 8

            [[http.content_type_overrides]]
            suffix = ".mjs"
            content_type = "text/javascript"
        "#;
        let cfg = Config::load_with(File::from_str(toml, FileFormat::Toml)).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.root_dir, "public");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.performance.max_connections, Some(8));
        assert_eq!(cfg.http.content_type_overrides.len(), 1);
        assert_eq!(cfg.http.content_type_overrides[0].suffix, ".mjs");
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "0.0.0.0:8886");

        let mut bad = Config::default();
        bad.server.host = "not a host".to_string();
        assert!(bad.get_socket_addr().is_err());
    }
}
