//! Shared types for the chat widget: transcript messages, session phases,
//! submission outcomes and the events published to presentation layers.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Messages
// =============================================================================

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Bot,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Bot => write!(f, "bot"),
            Role::User => write!(f, "user"),
        }
    }
}

/// A single transcript entry. Immutable once appended.
///
/// `content` may carry the markdown subset understood by
/// [`render_markdown`](crate::render::render_markdown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Local wall-clock time of the message, e.g. "09:41 am".
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%I:%M %P")
            .to_string()
    }
}

// =============================================================================
// Session state
// =============================================================================

/// Conversational phase of a chat session, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Panel hidden. The transcript is kept.
    Closed,
    /// Panel visible, nothing in flight.
    OpenIdle,
    /// Panel visible, first-open greeting scheduled but not typing yet.
    OpenAwaitingGreeting,
    /// Panel visible, typing indicator shown.
    OpenTyping,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Closed => write!(f, "Closed"),
            SessionPhase::OpenIdle => write!(f, "OpenIdle"),
            SessionPhase::OpenAwaitingGreeting => write!(f, "OpenAwaitingGreeting"),
            SessionPhase::OpenTyping => write!(f, "OpenTyping"),
        }
    }
}

/// Result of a submission attempt. Rejections are silent no-ops, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// A user message was appended and a reply scheduled.
    Accepted,
    /// The trimmed text was empty.
    IgnoredEmpty,
    /// A response is already in flight.
    IgnoredBusy,
    /// The requested quick reply is hidden or does not exist.
    IgnoredUnavailable,
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

/// Point-in-time view of a session for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub is_open: bool,
    pub is_typing: bool,
    pub unread_badge_visible: bool,
    pub input: String,
    pub messages: Vec<ChatMessage>,
    pub quick_replies: Vec<String>,
}

// =============================================================================
// Events
// =============================================================================

/// State changes published by a [`ChatSession`](crate::session::ChatSession).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatEvent {
    OpenChanged { is_open: bool },
    BadgeCleared,
    TypingChanged { is_typing: bool },
    MessageAppended { message: ChatMessage },
}
