//! Knowledge base: ordered trigger tables mapping visitor phrasing to canned
//! answers, plus the surrounding conversational content (greeting, fallbacks,
//! quick questions).
//!
//! Category order is match priority. It is kept explicitly in a `Vec` and is
//! never derived from a hash map.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use recon_core::error::ReconError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::builtin;
use crate::error::ChatError;

// =============================================================================
// KnowledgeCategory
// =============================================================================

/// The closed set of topics the assistant can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeCategory {
    Greetings,
    About,
    Founder,
    Rajmeric,
    Services,
    Contact,
    Portfolio,
    Vision,
    Cin,
    Website,
    Thanks,
    Bye,
}

impl KnowledgeCategory {
    /// Every category in default priority order.
    pub const ALL: [KnowledgeCategory; 12] = [
        KnowledgeCategory::Greetings,
        KnowledgeCategory::About,
        KnowledgeCategory::Founder,
        KnowledgeCategory::Rajmeric,
        KnowledgeCategory::Services,
        KnowledgeCategory::Contact,
        KnowledgeCategory::Portfolio,
        KnowledgeCategory::Vision,
        KnowledgeCategory::Cin,
        KnowledgeCategory::Website,
        KnowledgeCategory::Thanks,
        KnowledgeCategory::Bye,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeCategory::Greetings => "greetings",
            KnowledgeCategory::About => "about",
            KnowledgeCategory::Founder => "founder",
            KnowledgeCategory::Rajmeric => "rajmeric",
            KnowledgeCategory::Services => "services",
            KnowledgeCategory::Contact => "contact",
            KnowledgeCategory::Portfolio => "portfolio",
            KnowledgeCategory::Vision => "vision",
            KnowledgeCategory::Cin => "cin",
            KnowledgeCategory::Website => "website",
            KnowledgeCategory::Thanks => "thanks",
            KnowledgeCategory::Bye => "bye",
        }
    }
}

impl fmt::Display for KnowledgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KnowledgeCategory {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        KnowledgeCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ChatError::UnknownCategory(s.to_string()))
    }
}

// =============================================================================
// Answer / KnowledgeEntry
// =============================================================================

/// Zero-argument generator producing a response.
#[derive(Clone)]
pub enum Answer {
    /// Fixed text.
    Static(Cow<'static, str>),
    /// Computed on every match, e.g. for content that embeds the current time.
    Dynamic(Arc<dyn Fn() -> String + Send + Sync>),
}

impl Answer {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Answer::Dynamic(Arc::new(f))
    }

    pub fn generate(&self) -> String {
        match self {
            Answer::Static(text) => text.to_string(),
            Answer::Dynamic(f) => f(),
        }
    }
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Answer::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&'static str> for Answer {
    fn from(text: &'static str) -> Self {
        Answer::Static(Cow::Borrowed(text))
    }
}

impl From<String> for Answer {
    fn from(text: String) -> Self {
        Answer::Static(Cow::Owned(text))
    }
}

/// Trigger phrases for one category and the answer they select.
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    triggers: Vec<String>,
    answer: Answer,
}

impl KnowledgeEntry {
    /// Build an entry. Triggers are lowercased; surrounding whitespace is
    /// kept because it is part of the phrase being searched for.
    pub fn new<I, S>(triggers: I, answer: impl Into<Answer>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            triggers: triggers
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
            answer: answer.into(),
        }
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    /// Whether any trigger occurs in `normalized` (already lowercased).
    pub fn is_triggered_by(&self, normalized: &str) -> bool {
        self.triggers.iter().any(|t| normalized.contains(t.as_str()))
    }
}

// =============================================================================
// KnowledgeBase
// =============================================================================

/// Ordered category table. Earlier categories win when several match.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<(KnowledgeCategory, KnowledgeEntry)>,
}

impl KnowledgeBase {
    /// Build a knowledge base, rejecting empty triggers (they would match
    /// every input) and repeated categories.
    pub fn new(entries: Vec<(KnowledgeCategory, KnowledgeEntry)>) -> Result<Self, ChatError> {
        let mut seen = HashSet::new();
        for (category, entry) in &entries {
            if !seen.insert(*category) {
                return Err(ChatError::DuplicateCategory(*category));
            }
            if entry.triggers.iter().any(String::is_empty) {
                return Err(ChatError::EmptyTrigger(*category));
            }
        }
        Ok(Self { entries })
    }

    /// The Recontinuum site content.
    pub fn builtin() -> Self {
        let entries = builtin::CATEGORIES
            .iter()
            .map(|(category, triggers, answer)| {
                (*category, KnowledgeEntry::new(triggers.iter(), *answer))
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = KnowledgeCategory> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn get(&self, category: KnowledgeCategory) -> Option<&KnowledgeEntry> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, e)| e)
    }

    /// First category, in priority order, with a trigger contained in
    /// `normalized`.
    pub fn find(&self, normalized: &str) -> Option<(KnowledgeCategory, &KnowledgeEntry)> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.is_triggered_by(normalized))
            .map(|(c, e)| (*c, e))
    }
}

// =============================================================================
// KnowledgeConfig
// =============================================================================

/// Everything the assistant says that is not computed: the knowledge base,
/// fallback replies, quick questions and the first-open greeting.
///
/// Swapping this value changes the assistant's content without touching the
/// matcher or session logic.
#[derive(Debug, Clone)]
pub struct KnowledgeConfig {
    knowledge: Arc<KnowledgeBase>,
    fallbacks: Arc<[String]>,
    quick_questions: Vec<String>,
    greeting: String,
}

#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    greeting: String,
    fallbacks: Vec<String>,
    #[serde(default)]
    quick_questions: Vec<String>,
    #[serde(default)]
    categories: Vec<CategoryFile>,
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    name: String,
    triggers: Vec<String>,
    answer: String,
}

impl KnowledgeConfig {
    pub fn new(
        knowledge: KnowledgeBase,
        fallbacks: Vec<String>,
        quick_questions: Vec<String>,
        greeting: impl Into<String>,
    ) -> Result<Self, ChatError> {
        if fallbacks.is_empty() {
            return Err(ChatError::EmptyFallbacks);
        }
        let greeting = greeting.into();
        if greeting.trim().is_empty() {
            return Err(ChatError::EmptyGreeting);
        }
        Ok(Self {
            knowledge: Arc::new(knowledge),
            fallbacks: fallbacks.into(),
            quick_questions,
            greeting,
        })
    }

    /// The built-in Recontinuum content.
    pub fn builtin() -> Self {
        Self {
            knowledge: Arc::new(KnowledgeBase::builtin()),
            fallbacks: builtin::FALLBACKS.iter().map(|s| s.to_string()).collect(),
            quick_questions: builtin::QUICK_QUESTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            greeting: builtin::GREETING.to_string(),
        }
    }

    /// Parse a knowledge file.
    ///
    /// ```toml
    /// greeting = "Hello!"
    /// fallbacks = ["Sorry, I don't know that yet."]
    /// quick_questions = ["Who are you?"]
    ///
    /// [[categories]]
    /// name = "about"
    /// triggers = ["who are you"]
    /// answer = "I'm **Recon**."
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ChatError> {
        let file: KnowledgeFile = toml::from_str(content)?;
        let entries = file
            .categories
            .into_iter()
            .map(|c| -> Result<_, ChatError> {
                let category: KnowledgeCategory = c.name.parse()?;
                Ok((category, KnowledgeEntry::new(c.triggers, c.answer)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let knowledge = KnowledgeBase::new(entries)?;
        Self::new(knowledge, file.fallbacks, file.quick_questions, file.greeting)
    }

    /// Load a knowledge file from disk.
    pub fn load(path: &Path) -> Result<Self, ChatError> {
        let content = std::fs::read_to_string(path).map_err(ReconError::from)?;
        let config = Self::from_toml_str(&content)?;
        info!(
            categories = config.knowledge.len(),
            fallbacks = config.fallbacks.len(),
            "Knowledge base loaded from {}",
            path.display()
        );
        Ok(config)
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }

    /// Never empty.
    pub fn fallbacks(&self) -> &Arc<[String]> {
        &self.fallbacks
    }

    pub fn quick_questions(&self) -> &[String] {
        &self.quick_questions
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
greeting = "Hi there!"
fallbacks = ["No idea.", "Ask again later."]
quick_questions = ["Who are you?"]

[[categories]]
name = "greetings"
triggers = ["Hello", "hey"]
answer = "Hello yourself."

[[categories]]
name = "contact"
triggers = ["email"]
answer = "Write to **us@example.com**."
"#;

    #[test]
    fn test_category_parse_and_display() {
        for category in KnowledgeCategory::ALL {
            let parsed: KnowledgeCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!(
            " Founder ".parse::<KnowledgeCategory>().unwrap(),
            KnowledgeCategory::Founder
        );
        assert!(matches!(
            "pricing".parse::<KnowledgeCategory>(),
            Err(ChatError::UnknownCategory(name)) if name == "pricing"
        ));
    }

    #[test]
    fn test_entry_lowercases_triggers() {
        let entry = KnowledgeEntry::new(["Good Morning", "HI"], "hello");
        assert_eq!(entry.triggers(), ["good morning", "hi"]);
        assert!(entry.is_triggered_by("well, good morning to you"));
        assert!(!entry.is_triggered_by("good evening"));
    }

    #[test]
    fn test_dynamic_answer_runs_each_time() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let answer = Answer::dynamic(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("call {n}")
        });
        assert_eq!(answer.generate(), "call 1");
        assert_eq!(answer.generate(), "call 2");
        assert_eq!(format!("{answer:?}"), "Dynamic(..)");
    }

    #[test]
    fn test_knowledge_base_rejects_empty_trigger() {
        let result = KnowledgeBase::new(vec![(
            KnowledgeCategory::Cin,
            KnowledgeEntry::new(["cin", ""], "CIN"),
        )]);
        assert!(matches!(result, Err(ChatError::EmptyTrigger(KnowledgeCategory::Cin))));
    }

    #[test]
    fn test_knowledge_base_rejects_duplicate_category() {
        let result = KnowledgeBase::new(vec![
            (KnowledgeCategory::Bye, KnowledgeEntry::new(["bye"], "Bye")),
            (KnowledgeCategory::Bye, KnowledgeEntry::new(["ciao"], "Ciao")),
        ]);
        assert!(matches!(
            result,
            Err(ChatError::DuplicateCategory(KnowledgeCategory::Bye))
        ));
    }

    #[test]
    fn test_find_respects_declaration_order() {
        let kb = KnowledgeBase::new(vec![
            (KnowledgeCategory::Contact, KnowledgeEntry::new(["contact"], "C")),
            (KnowledgeCategory::Greetings, KnowledgeEntry::new(["hello"], "G")),
        ])
        .unwrap();
        let (category, _) = kb.find("hello, how do i contact you").unwrap();
        assert_eq!(category, KnowledgeCategory::Contact);
        assert!(kb.find("nothing relevant").is_none());
    }

    #[test]
    fn test_builtin_is_complete_and_valid() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.len(), 12);
        assert_eq!(kb.categories().collect::<Vec<_>>(), KnowledgeCategory::ALL);

        // Rebuilding through the validating constructor must succeed.
        let rebuilt: Vec<_> = kb
            .categories()
            .map(|c| (c, kb.get(c).unwrap().clone()))
            .collect();
        assert!(KnowledgeBase::new(rebuilt).is_ok());

        for category in KnowledgeCategory::ALL {
            let entry = kb.get(category).unwrap();
            assert!(!entry.triggers().is_empty(), "{category} has no triggers");
            for trigger in entry.triggers() {
                assert_eq!(trigger, &trigger.to_lowercase());
            }
        }
    }

    #[test]
    fn test_builtin_answers_keep_site_punctuation() {
        let kb = KnowledgeBase::builtin();
        let answer = |c| kb.get(c).unwrap().answer().generate();

        assert!(answer(KnowledgeCategory::Bye).ends_with("\n\n*— Recon, AI Assistant*"));
        assert!(answer(KnowledgeCategory::Founder)
            .contains("commitment to excellence — building institutions"));
        assert!(answer(KnowledgeCategory::Portfolio)
            .contains("🌿 **Rajmeric Lifesciences** — Nutraceutical & Wellness\n"));
        assert!(answer(KnowledgeCategory::Vision).contains("◈ **Integrity** — Uncompromising ethics\n"));
        assert!(answer(KnowledgeCategory::Vision)
            .contains("◈ **Long-Term Responsibility** — Built for generations\n"));
    }

    #[test]
    fn test_builtin_config() {
        let config = KnowledgeConfig::builtin();
        assert_eq!(config.fallbacks().len(), 3);
        assert_eq!(config.quick_questions().len(), 4);
        assert!(config.greeting().contains("**Recon**"));
        assert_eq!(config.knowledge().len(), 12);
    }

    #[test]
    fn test_config_rejects_empty_fallbacks() {
        let result = KnowledgeConfig::new(KnowledgeBase::default(), vec![], vec![], "Hi");
        assert!(matches!(result, Err(ChatError::EmptyFallbacks)));
    }

    #[test]
    fn test_config_rejects_blank_greeting() {
        let result =
            KnowledgeConfig::new(KnowledgeBase::default(), vec!["x".into()], vec![], "  ");
        assert!(matches!(result, Err(ChatError::EmptyGreeting)));
    }

    #[test]
    fn test_from_toml_str() {
        let config = KnowledgeConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.greeting(), "Hi there!");
        assert_eq!(config.fallbacks().len(), 2);
        assert_eq!(config.quick_questions(), ["Who are you?"]);
        let kb = config.knowledge();
        assert_eq!(
            kb.categories().collect::<Vec<_>>(),
            vec![KnowledgeCategory::Greetings, KnowledgeCategory::Contact]
        );
        assert_eq!(
            kb.get(KnowledgeCategory::Greetings).unwrap().triggers(),
            ["hello", "hey"]
        );
    }

    #[test]
    fn test_from_toml_unknown_category() {
        let content = r#"
greeting = "Hi"
fallbacks = ["?"]

[[categories]]
name = "pricing"
triggers = ["price"]
answer = "Free."
"#;
        let result = KnowledgeConfig::from_toml_str(content);
        assert!(matches!(result, Err(ChatError::UnknownCategory(_))));
    }

    #[test]
    fn test_from_toml_missing_fallbacks_field() {
        let result = KnowledgeConfig::from_toml_str("greeting = \"Hi\"");
        assert!(matches!(result, Err(ChatError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = KnowledgeConfig::load(file.path()).unwrap();
        assert_eq!(config.knowledge().len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = KnowledgeConfig::load(Path::new("/nonexistent/knowledge.toml"));
        assert!(matches!(result, Err(ChatError::Config(_))));
    }
}
