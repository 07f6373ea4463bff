// Application state module
// Immutable per-process state shared by every connection

use std::path::PathBuf;

use super::types::Config;
use crate::handler::hooks::HeaderHooks;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical directory served as `/`
    pub root: PathBuf,
    /// Header mutations applied to every response before it is finalized
    pub hooks: HeaderHooks,
}

impl AppState {
    /// Resolve the root directory and build the header hooks
    ///
    /// Fails when the root directory does not exist or an override
    /// carries a value that is not a valid header value.
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let root = std::fs::canonicalize(&config.server.root_dir).map_err(|e| {
            format!(
                "Root directory '{}' is not accessible: {e}",
                config.server.root_dir
            )
        })?;
        if !root.is_dir() {
            return Err(format!("Root path '{}' is not a directory", root.display()).into());
        }

        let hooks = HeaderHooks::from_config(&config.http)?;

        Ok(Self {
            config,
            root,
            hooks,
        })
    }

    #[inline]
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_canonicalized() {
        let mut config = Config::default();
        config.server.root_dir = std::env::temp_dir().display().to_string();
        let state = AppState::new(config).unwrap();
        assert!(state.root.is_absolute());
        assert_eq!(state.root, std::fs::canonicalize(std::env::temp_dir()).unwrap());
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let mut config = Config::default();
        config.server.root_dir = "/definitely/not/a/real/root".to_string();
        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut config = Config::default();
        config.server.root_dir = std::env::temp_dir().display().to_string();
        config.http.content_type_overrides[0].content_type = "bad\nvalue".to_string();
        assert!(AppState::new(config).is_err());
    }
}
