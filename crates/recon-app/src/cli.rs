//! CLI argument definitions for the Recon terminal chat.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use recon_core::config::ChatConfig;
use std::path::PathBuf;

/// Recon, the Recontinuum site assistant, in a terminal.
#[derive(Parser, Debug)]
#[command(name = "recon", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Knowledge base TOML replacing the built-in content.
    #[arg(short = 'k', long = "knowledge")]
    pub knowledge: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Reply immediately instead of simulating typing.
    #[arg(long = "instant")]
    pub instant: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > RECON_CONFIG env var > ~/.recon/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("RECON_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the knowledge file.
    ///
    /// Priority: --knowledge flag > config file value. `None` means built-in.
    pub fn resolve_knowledge_path(&self, chat: &ChatConfig) -> Option<PathBuf> {
        self.knowledge
            .clone()
            .or_else(|| chat.knowledge_path.clone())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// Apply `--instant` to the configured chat settings.
    pub fn resolve_chat_config(&self, chat: ChatConfig) -> ChatConfig {
        if !self.instant {
            return chat;
        }
        ChatConfig {
            escape_html: chat.escape_html,
            knowledge_path: chat.knowledge_path,
            ..ChatConfig::instant()
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".recon").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".recon").join("config.toml");
    }
    PathBuf::from("config.toml")
}
