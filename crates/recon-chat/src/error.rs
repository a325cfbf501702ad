//! Error types for the chat widget.
//!
//! Only construction can fail: loading or validating a knowledge base and
//! acquiring a timer runtime. Session operations themselves never error.

use recon_core::error::ReconError;

use crate::knowledge::KnowledgeCategory;

/// Errors from building the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("fallback list cannot be empty")]
    EmptyFallbacks,
    #[error("category {0} has an empty trigger phrase")]
    EmptyTrigger(KnowledgeCategory),
    #[error("category {0} is defined more than once")]
    DuplicateCategory(KnowledgeCategory),
    #[error("greeting cannot be empty")]
    EmptyGreeting,
    #[error("unknown knowledge category: {0}")]
    UnknownCategory(String),
    #[error("no async runtime available for timers")]
    NoRuntime,
    #[error("config error: {0}")]
    Config(String),
}

impl From<ReconError> for ChatError {
    fn from(err: ReconError) -> Self {
        ChatError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        ChatError::Config(err.to_string())
    }
}
