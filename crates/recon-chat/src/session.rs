//! Chat session controller.
//!
//! Owns one widget's state (open flag, transcript, typing indicator, unread
//! badge, greeting bookkeeping, input buffer), feeds submissions to the
//! [`Matcher`] after a simulated typing delay, and publishes every change as
//! a [`ChatEvent`].
//!
//! Phases, derived from the flags:
//! - Closed -> OpenAwaitingGreeting (first open)
//! - OpenAwaitingGreeting -> OpenTyping -> OpenIdle (greeting delivered)
//! - Closed -> OpenIdle (later opens)
//! - OpenIdle -> OpenTyping -> OpenIdle (submit, reply delivered)
//! - any open phase -> Closed (toggle; transcript kept)
//!
//! The typing indicator is the OR of a greeting flag and a reply flag, so a
//! reply landing while the greeting still types leaves the indicator on.
//!
//! Timer callbacks hold only a weak reference to the session. Dropping the
//! [`ChatSession`] cancels every outstanding timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use recon_core::config::ChatConfig;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::knowledge::KnowledgeConfig;
use crate::matcher::{Matcher, RandomSource};
use crate::render::RenderedMessage;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::types::{ChatEvent, ChatMessage, Role, SessionPhase, SessionSnapshot, SubmitOutcome};

const EVENT_CAPACITY: usize = 64;
const ID_SUFFIX_LEN: usize = 5;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Simulated latencies for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    /// First open until the greeting's typing indicator appears.
    pub greeting_delay: Duration,
    /// Typing indicator until the greeting is appended.
    pub greeting_typing: Duration,
    /// Shortest reply latency.
    pub reply_delay_min: Duration,
    /// Reply latency is drawn from `[min, min + jitter)`.
    pub reply_delay_jitter: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

impl SessionTimings {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            greeting_delay: config.greeting_delay(),
            greeting_typing: config.greeting_typing(),
            reply_delay_min: config.reply_delay_min(),
            reply_delay_jitter: config.reply_delay_jitter(),
        }
    }

    fn reply_delay(&self, unit: f64) -> Duration {
        // NaN would panic in `mul_f64`.
        let unit = if unit.is_nan() { 0.0 } else { unit.clamp(0.0, 1.0) };
        self.reply_delay_min + self.reply_delay_jitter.mul_f64(unit)
    }
}

#[derive(Debug)]
struct SessionState {
    is_open: bool,
    messages: Vec<ChatMessage>,
    pending_input: String,
    unread_badge_visible: bool,
    has_greeted: bool,
    /// Greeting scheduled but not yet typing.
    greeting_pending: bool,
    /// Greeting's typing indicator is showing.
    greeting_typing: bool,
    /// A reply to a submission is in flight.
    reply_pending: bool,
    timers: Vec<TimerHandle>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            is_open: false,
            messages: Vec::new(),
            pending_input: String::new(),
            unread_badge_visible: true,
            has_greeted: false,
            greeting_pending: false,
            greeting_typing: false,
            reply_pending: false,
            timers: Vec::new(),
        }
    }

    fn is_typing(&self) -> bool {
        self.greeting_typing || self.reply_pending
    }

    fn phase(&self) -> SessionPhase {
        if !self.is_open {
            SessionPhase::Closed
        } else if self.is_typing() {
            SessionPhase::OpenTyping
        } else if self.greeting_pending {
            SessionPhase::OpenAwaitingGreeting
        } else {
            SessionPhase::OpenIdle
        }
    }
}

struct Shared {
    id: Uuid,
    /// Handed to timer callbacks so they never keep the session alive.
    this: Weak<Shared>,
    state: Mutex<SessionState>,
    matcher: Matcher,
    scheduler: Arc<dyn Scheduler>,
    random: Arc<dyn RandomSource>,
    events: broadcast::Sender<ChatEvent>,
    timings: SessionTimings,
    greeting: String,
    quick_questions: Vec<String>,
    escape_html: bool,
}

/// One mounted chat widget.
pub struct ChatSession {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.shared.id)
            .field("phase", &self.phase())
            .finish()
    }
}

impl ChatSession {
    /// Mount a session over `knowledge`, timing and escaping per `config`.
    pub fn new(
        knowledge: &KnowledgeConfig,
        config: &ChatConfig,
        scheduler: Arc<dyn Scheduler>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self::with_timings(
            knowledge,
            SessionTimings::from_config(config),
            config.escape_html,
            scheduler,
            random,
        )
    }

    pub fn with_timings(
        knowledge: &KnowledgeConfig,
        timings: SessionTimings,
        escape_html: bool,
        scheduler: Arc<dyn Scheduler>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let id = Uuid::new_v4();
        info!(session_id = %id, "Chat session mounted");
        Self {
            shared: Arc::new_cyclic(|this| Shared {
                id,
                this: this.clone(),
                state: Mutex::new(SessionState::new()),
                matcher: Matcher::from_config(knowledge, Arc::clone(&random)),
                scheduler,
                random,
                events,
                timings,
                greeting: knowledge.greeting().to_string(),
                quick_questions: knowledge.quick_questions().to_vec(),
                escape_html,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Receive state change events from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.shared.events.subscribe()
    }

    // -----------------------------------------------------------------
    // Open / close
    // -----------------------------------------------------------------

    /// Flip the panel's visibility and clear the unread badge. The first
    /// open also schedules the greeting.
    pub fn toggle(&self) {
        let shared = &self.shared;
        let mut state = shared.lock();
        let before = state.phase();

        state.is_open = !state.is_open;
        shared.emit(ChatEvent::OpenChanged {
            is_open: state.is_open,
        });
        if state.unread_badge_visible {
            state.unread_badge_visible = false;
            shared.emit(ChatEvent::BadgeCleared);
        }

        if !state.has_greeted {
            state.has_greeted = true;
            state.greeting_pending = true;
            let weak = shared.this.clone();
            shared.schedule(&mut state, shared.timings.greeting_delay, move || {
                Shared::with_live(&weak, |s| s.begin_greeting_typing());
            });
        }

        debug!(session_id = %shared.id, "Chat state: {} -> {}", before, state.phase());
    }

    /// Open the panel if it is closed.
    pub fn open(&self) {
        if !self.is_open() {
            self.toggle();
        }
    }

    /// Close the panel if it is open.
    pub fn close(&self) {
        if self.is_open() {
            self.toggle();
        }
    }

    // -----------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------

    pub fn set_input(&self, text: impl Into<String>) {
        self.shared.lock().pending_input = text.into();
    }

    pub fn input(&self) -> String {
        self.shared.lock().pending_input.clone()
    }

    /// Submit whatever is in the input buffer.
    pub fn submit_input(&self) -> SubmitOutcome {
        let text = self.input();
        self.submit(&text)
    }

    /// Append a user message and schedule the reply.
    ///
    /// Blank text and submissions while a response is in flight are ignored.
    pub fn submit(&self, text: &str) -> SubmitOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::IgnoredEmpty;
        }

        let shared = &self.shared;
        let mut state = shared.lock();
        if state.is_typing() {
            debug!(session_id = %shared.id, "Submission ignored while typing");
            return SubmitOutcome::IgnoredBusy;
        }
        let before = state.phase();

        state.pending_input.clear();
        shared.append(&mut state, Role::User, trimmed.to_string());
        shared.set_reply_pending(&mut state, true);

        let delay = shared.timings.reply_delay(shared.random.next_unit());
        let weak = shared.this.clone();
        let question = trimmed.to_string();
        shared.schedule(&mut state, delay, move || {
            Shared::with_live(&weak, |s| s.deliver_reply(&question));
        });

        debug!(
            session_id = %shared.id,
            delay_ms = delay.as_millis() as u64,
            "Chat state: {} -> {}",
            before,
            state.phase()
        );
        SubmitOutcome::Accepted
    }

    /// Canned questions, offered only until the conversation moves past the
    /// greeting.
    pub fn quick_replies(&self) -> Vec<String> {
        let state = self.shared.lock();
        self.shared.visible_quick_replies(&state)
    }

    /// Submit the quick reply at `index` exactly as if it had been typed.
    pub fn submit_quick_reply(&self, index: usize) -> SubmitOutcome {
        match self.quick_replies().get(index) {
            Some(question) => self.submit(question),
            None => SubmitOutcome::IgnoredUnavailable,
        }
    }

    // -----------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.shared.lock().is_open
    }

    pub fn is_typing(&self) -> bool {
        self.shared.lock().is_typing()
    }

    pub fn unread_badge_visible(&self) -> bool {
        self.shared.lock().unread_badge_visible
    }

    pub fn has_greeted(&self) -> bool {
        self.shared.lock().has_greeted
    }

    pub fn phase(&self) -> SessionPhase {
        self.shared.lock().phase()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.shared.lock().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.shared.lock().messages.len()
    }

    /// Transcript converted to display HTML.
    pub fn render_transcript(&self) -> Vec<RenderedMessage> {
        let state = self.shared.lock();
        state
            .messages
            .iter()
            .map(|m| RenderedMessage::from_message(m, self.shared.escape_html))
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.shared.lock();
        SessionSnapshot {
            session_id: self.shared.id,
            phase: state.phase(),
            is_open: state.is_open,
            is_typing: state.is_typing(),
            unread_badge_visible: state.unread_badge_visible,
            input: state.pending_input.clone(),
            messages: state.messages.clone(),
            quick_replies: self.shared.visible_quick_replies(&state),
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        let timers = std::mem::take(&mut self.shared.lock().timers);
        let cancelled = timers
            .into_iter()
            .filter(|h| self.shared.scheduler.cancel(*h))
            .count();
        debug!(session_id = %self.shared.id, cancelled, "Chat session unmounted");
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ChatEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Run `f` if the session is still mounted.
    fn with_live(weak: &Weak<Shared>, f: impl FnOnce(&Shared)) {
        match weak.upgrade() {
            Some(shared) => f(shared.as_ref()),
            None => debug!("Timer fired after chat session unmounted; ignoring"),
        }
    }

    fn schedule(
        &self,
        state: &mut SessionState,
        delay: Duration,
        task: impl FnOnce() + Send + 'static,
    ) {
        let scheduler = &self.scheduler;
        state.timers.retain(|h| scheduler.is_pending(*h));
        let handle = scheduler.schedule(delay, Box::new(task));
        state.timers.push(handle);
    }

    fn visible_quick_replies(&self, state: &SessionState) -> Vec<String> {
        if state.messages.len() <= 1 {
            self.quick_questions.clone()
        } else {
            Vec::new()
        }
    }

    fn set_reply_pending(&self, state: &mut SessionState, pending: bool) {
        let was_typing = state.is_typing();
        state.reply_pending = pending;
        self.emit_typing_change(state, was_typing);
    }

    fn set_greeting_typing(&self, state: &mut SessionState, typing: bool) {
        let was_typing = state.is_typing();
        state.greeting_typing = typing;
        self.emit_typing_change(state, was_typing);
    }

    fn emit_typing_change(&self, state: &SessionState, was_typing: bool) {
        let is_typing = state.is_typing();
        if is_typing != was_typing {
            self.emit(ChatEvent::TypingChanged { is_typing });
        }
    }

    fn append(&self, state: &mut SessionState, role: Role, content: String) {
        let id = self.next_message_id(state);
        let message = ChatMessage {
            id,
            role,
            content,
            timestamp: Utc::now(),
        };
        state.messages.push(message.clone());
        self.emit(ChatEvent::MessageAppended { message });
    }

    /// `<epoch-millis>-<5 base36 chars>`, unique within the transcript.
    fn next_message_id(&self, state: &SessionState) -> String {
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[self.random.pick(BASE36.len())] as char)
            .collect();
        let id = format!("{}-{}", Utc::now().timestamp_millis(), suffix);
        if state.messages.iter().any(|m| m.id == id) {
            format!("{}-{}", id, state.messages.len())
        } else {
            id
        }
    }

    fn begin_greeting_typing(&self) {
        let mut state = self.lock();
        let before = state.phase();
        state.greeting_pending = false;
        self.set_greeting_typing(&mut state, true);

        let weak = self.this.clone();
        self.schedule(&mut state, self.timings.greeting_typing, move || {
            Shared::with_live(&weak, |s| s.deliver_greeting());
        });
        debug!(session_id = %self.id, "Chat state: {} -> {}", before, state.phase());
    }

    fn deliver_greeting(&self) {
        let mut state = self.lock();
        let before = state.phase();
        self.set_greeting_typing(&mut state, false);
        self.append(&mut state, Role::Bot, self.greeting.clone());
        debug!(session_id = %self.id, "Chat state: {} -> {}", before, state.phase());
    }

    fn deliver_reply(&self, question: &str) {
        // Answer generators are arbitrary code; run them outside the lock.
        let answer = self.matcher.respond(question);
        let mut state = self.lock();
        let before = state.phase();
        self.set_reply_pending(&mut state, false);
        self.append(&mut state, Role::Bot, answer);
        debug!(session_id = %self.id, "Chat state: {} -> {}", before, state.phase());
    }
}
