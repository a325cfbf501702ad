//! Knowledge base matcher.
//!
//! Lowercases and trims the visitor's text, then scans categories in
//! priority order for the first trigger phrase contained in it. Containment
//! is plain substring search: "cinema" matches the trigger "cin".

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::error::ChatError;
use crate::knowledge::{KnowledgeBase, KnowledgeCategory, KnowledgeConfig};

// =============================================================================
// Random sources
// =============================================================================

/// Source of uniformly distributed values in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    fn pick(&self, len: usize) -> usize {
        // `as usize` saturates, so NaN and negatives land on 0.
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed list of values.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    /// Panics if `values` is empty.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceRandom needs at least one value");
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}

// =============================================================================
// Matcher
// =============================================================================

/// Selects a canned response for free-text input.
#[derive(Clone)]
pub struct Matcher {
    knowledge: Arc<KnowledgeBase>,
    fallbacks: Arc<[String]>,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("categories", &self.knowledge.len())
            .field("fallbacks", &self.fallbacks.len())
            .finish()
    }
}

impl Matcher {
    /// Create a matcher. Fails if `fallbacks` is empty.
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        fallbacks: Vec<String>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, ChatError> {
        if fallbacks.is_empty() {
            return Err(ChatError::EmptyFallbacks);
        }
        Ok(Self {
            knowledge,
            fallbacks: fallbacks.into(),
            random,
        })
    }

    /// Create a matcher over a validated knowledge configuration.
    pub fn from_config(config: &KnowledgeConfig, random: Arc<dyn RandomSource>) -> Self {
        Self {
            knowledge: Arc::clone(config.knowledge()),
            fallbacks: Arc::clone(config.fallbacks()),
            random,
        }
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    /// Category selected by `input`, if any. Blank input selects nothing.
    pub fn classify(&self, input: &str) -> Option<KnowledgeCategory> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return None;
        }
        self.knowledge.find(&normalized).map(|(c, _)| c)
    }

    /// Response for `input`: the first matching category's answer, or a
    /// randomly chosen fallback. Total over all strings.
    pub fn respond(&self, input: &str) -> String {
        let normalized = normalize(input);
        if !normalized.is_empty() {
            if let Some((category, entry)) = self.knowledge.find(&normalized) {
                debug!(%category, "Knowledge base match");
                return entry.answer().generate();
            }
        }

        let index = self.random.pick(self.fallbacks.len());
        debug!(index, "No trigger matched, using fallback");
        self.fallbacks[index].clone()
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}
