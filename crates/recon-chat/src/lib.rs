//! Site chat assistant for Recon.
//!
//! Provides the keyword knowledge base and matcher, the chat session
//! controller with its simulated typing delays, and the markdown renderer
//! used to display transcripts.

pub mod builtin;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod types;

pub use error::ChatError;
pub use knowledge::{Answer, KnowledgeBase, KnowledgeCategory, KnowledgeConfig, KnowledgeEntry};
pub use matcher::{FixedRandom, Matcher, RandomSource, SequenceRandom, ThreadRandom};
pub use render::{render_markdown, render_plain, RenderedMessage};
pub use scheduler::{ManualScheduler, Scheduler, Task, TimerHandle, TokioScheduler};
pub use session::{ChatSession, SessionTimings};
pub use types::{ChatEvent, ChatMessage, Role, SessionPhase, SessionSnapshot, SubmitOutcome};
