use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Log filter used when nothing else is configured
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings read from a JSON config file
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base64 master key
    pub master_key: Option<String>,
    /// `tracing` filter directive, e.g. `"info"` or `"stegcrypt=debug"`
    pub log_level: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Apply overrides; any value set in `overrides` wins
    pub fn merge(self, overrides: Config) -> Self {
        Self {
            master_key: overrides.master_key.or(self.master_key),
            log_level: overrides.log_level.or(self.log_level),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("master_key", &self.master_key.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StegError;
    use tempfile::tempdir;

    #[test]
    fn test_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stegcrypt.json");
        std::fs::write(
            &path,
            r#"{"master_key": "AAECAwQFBgcICQoLDA0ODw==", "log_level": "debug"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.master_key.as_deref(), Some("AAECAwQFBgcICQoLDA0ODw=="));
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_malformed_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ master_key: ").unwrap();
        assert!(matches!(Config::load(&path), Err(StegError::Json(_))));
        assert!(matches!(
            Config::load(&dir.path().join("absent.json")),
            Err(StegError::Io(_))
        ));
    }

    #[test]
    fn test_merge_precedence() {
        let file = Config {
            master_key: Some("file-key".into()),
            log_level: Some("info".into()),
        };
        let cli = Config {
            master_key: Some("cli-key".into()),
            log_level: None,
        };
        let merged = file.merge(cli);
        assert_eq!(merged.master_key.as_deref(), Some("cli-key"));
        assert_eq!(merged.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config {
            master_key: Some("AAECAwQFBgcICQoLDA0ODw==".into()),
            log_level: None,
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("AAEC"));
    }
}
