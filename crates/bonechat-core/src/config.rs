use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BonechatError, Result};

/// Top-level configuration for the bonechat application.
///
/// Loaded from `~/.bonechat/config.toml` by default. Each section
/// corresponds to one collaborator of the chat engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BonechatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl BonechatConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BonechatConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load configuration, first writing the defaults to `path` when no file
    /// exists there yet. An unreadable or invalid file is left untouched and
    /// defaults are used.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::load_or_default(path);
        }
        let config = Self::default();
        match config.save(path) {
            Ok(()) => info!("Wrote default configuration to {}", path.display()),
            Err(e) => warn!(
                "Failed to write default config to {}: {}",
                path.display(),
                e
            ),
        }
        config
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| BonechatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Address the API server binds to.
    pub host: String,
    /// API server port.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3040,
        }
    }
}

/// Radiograph predictor service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Base URL; requests go to `{base_url}/predict`.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Conversational (language model) service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Base URL; requests go to `{base_url}/chat`.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Chat engine limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Upper bound on one image classification, enforced by the orchestrator.
    pub analysis_timeout_secs: u64,
    /// Upper bound on one dialogue turn, enforced by the orchestrator.
    pub dialogue_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            analysis_timeout_secs: 90,
            dialogue_timeout_secs: 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = BonechatConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.host, "127.0.0.1");
        assert_eq!(config.general.port, 3040);
        assert_eq!(config.predictor.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.predictor.timeout_secs, 60);
        assert_eq!(config.dialogue.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.chat.analysis_timeout_secs, 90);
        assert_eq!(config.chat.dialogue_timeout_secs, 90);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"
port = 8080

[predictor]
base_url = "http://predictor.local:5000"
timeout_secs = 10

[dialogue]
base_url = "http://llm.local:5000"

[chat]
dialogue_timeout_secs = 30
"#;
        let file = create_temp_config(content);
        let config = BonechatConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.port, 8080);
        assert_eq!(config.general.host, "127.0.0.1");
        assert_eq!(config.predictor.base_url, "http://predictor.local:5000");
        assert_eq!(config.predictor.timeout_secs, 10);
        assert_eq!(config.dialogue.base_url, "http://llm.local:5000");
        assert_eq!(config.dialogue.timeout_secs, 60);
        assert_eq!(config.chat.dialogue_timeout_secs, 30);
        assert_eq!(config.chat.analysis_timeout_secs, 90);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = BonechatConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.predictor.timeout_secs, 60);
        assert_eq!(config.chat.analysis_timeout_secs, 90);
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[general\nport = ");
        let err = BonechatConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, BonechatError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = BonechatConfig::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, BonechatError::Io(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = BonechatConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.port, 3040);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = BonechatConfig::default();
        config.predictor.base_url = "http://10.0.0.2:5000".to_string();
        config.save(&path).unwrap();

        let reloaded = BonechatConfig::load(&path).unwrap();
        assert_eq!(reloaded.predictor.base_url, "http://10.0.0.2:5000");
        assert_eq!(reloaded.general.port, config.general.port);
    }

    #[test]
    fn test_load_or_init_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bonechat").join("config.toml");

        let config = BonechatConfig::load_or_init(&path);

        assert_eq!(config.general.port, 3040);
        assert!(path.exists());
        let written = BonechatConfig::load(&path).unwrap();
        assert_eq!(written.predictor.base_url, config.predictor.base_url);
    }

    #[test]
    fn test_load_or_init_keeps_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[general]\nport = 4100").unwrap();

        let config = BonechatConfig::load_or_init(file.path());
        assert_eq!(config.general.port, 4100);

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.trim(), "[general]\nport = 4100");
    }

    #[test]
    fn test_load_or_init_leaves_invalid_file_untouched() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = = 1").unwrap();

        let config = BonechatConfig::load_or_init(file.path());
        assert_eq!(config.general.port, 3040);

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.trim(), "port = = 1");
    }
}
