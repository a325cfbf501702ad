use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ReconError, Result};

/// Top-level configuration for the Recon chat assistant.
///
/// Loaded from `~/.recon/config.toml` by default. Every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ReconConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ReconConfig = toml::from_str(&content)?;
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

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ReconError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Chat widget timing and presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Pause between the first open and the greeting's typing indicator.
    pub greeting_delay_ms: u64,
    /// How long the typing indicator shows before the greeting lands.
    pub greeting_typing_ms: u64,
    /// Shortest simulated reply latency.
    pub reply_delay_min_ms: u64,
    /// Random extra latency added on top of `reply_delay_min_ms`.
    pub reply_delay_jitter_ms: u64,
    /// Escape markup-significant characters before rendering markdown.
    pub escape_html: bool,
    /// Optional knowledge base file replacing the built-in content.
    pub knowledge_path: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting_delay_ms: 300,
            greeting_typing_ms: 900,
            reply_delay_min_ms: 800,
            reply_delay_jitter_ms: 600,
            escape_html: true,
            knowledge_path: None,
        }
    }
}

impl ChatConfig {
    /// Configuration with every delay set to zero.
    pub fn instant() -> Self {
        Self {
            greeting_delay_ms: 0,
            greeting_typing_ms: 0,
            reply_delay_min_ms: 0,
            reply_delay_jitter_ms: 0,
            ..Self::default()
        }
    }

    pub fn greeting_delay(&self) -> Duration {
        Duration::from_millis(self.greeting_delay_ms)
    }

    pub fn greeting_typing(&self) -> Duration {
        Duration::from_millis(self.greeting_typing_ms)
    }

    pub fn reply_delay_min(&self) -> Duration {
        Duration::from_millis(self.reply_delay_min_ms)
    }

    pub fn reply_delay_jitter(&self) -> Duration {
        Duration::from_millis(self.reply_delay_jitter_ms)
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
        let config = ReconConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.greeting_delay_ms, 300);
        assert_eq!(config.chat.greeting_typing_ms, 900);
        assert_eq!(config.chat.reply_delay_min_ms, 800);
        assert_eq!(config.chat.reply_delay_jitter_ms, 600);
        assert!(config.chat.escape_html);
        assert!(config.chat.knowledge_path.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[chat]
greeting_delay_ms = 100
reply_delay_min_ms = 50
reply_delay_jitter_ms = 0
escape_html = false
knowledge_path = "/etc/recon/knowledge.toml"
"#;
        let file = create_temp_config(content);
        let config = ReconConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.chat.greeting_delay_ms, 100);
        // Unset keys keep their defaults.
        assert_eq!(config.chat.greeting_typing_ms, 900);
        assert_eq!(config.chat.reply_delay_min_ms, 50);
        assert_eq!(config.chat.reply_delay_jitter_ms, 0);
        assert!(!config.chat.escape_html);
        assert_eq!(
            config.chat.knowledge_path,
            Some(PathBuf::from("/etc/recon/knowledge.toml"))
        );
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let file = create_temp_config("");
        let config = ReconConfig::load(file.path()).unwrap();
        assert_eq!(config, ReconConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[chat\ngreeting_delay_ms = ");
        let err = ReconConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ReconError::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ReconConfig::load_or_default(Path::new("/nonexistent/recon/config.toml"));
        assert_eq!(config, ReconConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ReconConfig::default();
        config.general.log_level = "trace".to_string();
        config.chat.reply_delay_jitter_ms = 250;
        config.chat.knowledge_path = Some(PathBuf::from("kb.toml"));
        config.save(&path).unwrap();

        let reloaded = ReconConfig::load(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_instant_config_zeroes_delays() {
        let chat = ChatConfig::instant();
        assert_eq!(chat.greeting_delay(), Duration::ZERO);
        assert_eq!(chat.greeting_typing(), Duration::ZERO);
        assert_eq!(chat.reply_delay_min(), Duration::ZERO);
        assert_eq!(chat.reply_delay_jitter(), Duration::ZERO);
        assert!(chat.escape_html);
    }

    #[test]
    fn test_duration_accessors() {
        let chat = ChatConfig::default();
        assert_eq!(chat.greeting_delay(), Duration::from_millis(300));
        assert_eq!(chat.greeting_typing(), Duration::from_millis(900));
        assert_eq!(chat.reply_delay_min(), Duration::from_millis(800));
        assert_eq!(chat.reply_delay_jitter(), Duration::from_millis(600));
    }
}
