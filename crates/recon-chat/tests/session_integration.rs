//! End-to-end chat sessions against the built-in knowledge base and a
//! knowledge file loaded from disk.
//!
//! Each test mounts its own session. Deterministic tests drive a
//! `ManualScheduler`; the tokio tests run the real scheduler on a paused
//! clock and observe the session through its event stream.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use recon_chat::{
    ChatEvent, ChatSession, FixedRandom, KnowledgeCategory, KnowledgeConfig, ManualScheduler,
    Role, SessionPhase, SubmitOutcome, ThreadRandom, TokioScheduler,
};
use recon_core::config::ChatConfig;

// =============================================================================
// Helpers
// =============================================================================

fn manual_session(knowledge: &KnowledgeConfig) -> (ChatSession, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let session = ChatSession::new(
        knowledge,
        &ChatConfig::default(),
        Arc::new(scheduler.clone()),
        Arc::new(FixedRandom(0.0)),
    );
    (session, scheduler)
}

fn builtin_answer(category: KnowledgeCategory) -> String {
    KnowledgeConfig::builtin()
        .knowledge()
        .get(category)
        .unwrap()
        .answer()
        .generate()
}

/// Wait for the next appended message, skipping other events.
async fn next_message(
    rx: &mut tokio::sync::broadcast::Receiver<ChatEvent>,
) -> recon_chat::ChatMessage {
    loop {
        match rx.recv().await.unwrap() {
            ChatEvent::MessageAppended { message } => return message,
            _ => continue,
        }
    }
}

const KNOWLEDGE_FILE: &str = r#"
greeting = "Hi, I'm the **test** bot."
fallbacks = ["No idea."]
quick_questions = ["Where are you?"]

[[categories]]
name = "contact"
triggers = ["where", "email"]
answer = "We are in *Sangli*."

[[categories]]
name = "bye"
triggers = ["bye"]
answer = "Later!"
"#;

// =============================================================================
// Built-in knowledge base
// =============================================================================

#[test]
fn test_full_conversation() {
    let (session, scheduler) = manual_session(&KnowledgeConfig::builtin());
    assert!(session.unread_badge_visible());

    session.open();
    scheduler.run_until_idle();
    assert_eq!(session.phase(), SessionPhase::OpenIdle);
    assert_eq!(session.quick_replies().len(), 4);

    assert_eq!(session.submit_quick_reply(1), SubmitOutcome::Accepted);
    scheduler.run_until_idle();

    session.set_input("What is Rajmeric's focus on stress?");
    assert_eq!(session.submit_input(), SubmitOutcome::Accepted);
    scheduler.run_until_idle();

    assert_eq!(session.submit("asdkjasd random gibberish"), SubmitOutcome::Accepted);
    scheduler.run_until_idle();

    assert_eq!(session.submit("thanks, bye"), SubmitOutcome::Accepted);
    scheduler.run_until_idle();

    let messages = session.messages();
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::Bot,
            Role::User,
            Role::Bot,
            Role::User,
            Role::Bot,
            Role::User,
            Role::Bot,
            Role::User,
            Role::Bot,
        ]
    );
    assert_eq!(messages[1].content, "Tell me about Rajmeric");
    // "tell me about" is an about trigger and about outranks rajmeric.
    assert_eq!(messages[2].content, builtin_answer(KnowledgeCategory::About));
    assert_eq!(messages[4].content, builtin_answer(KnowledgeCategory::Rajmeric));
    assert!(KnowledgeConfig::builtin()
        .fallbacks()
        .contains(&messages[6].content));
    assert_eq!(messages[8].content, builtin_answer(KnowledgeCategory::Thanks));

    // Closing keeps everything.
    session.close();
    assert_eq!(session.messages(), messages);
    assert_eq!(session.phase(), SessionPhase::Closed);
}

#[test]
fn test_snapshot_serializes_for_presentation() {
    let (session, scheduler) = manual_session(&KnowledgeConfig::builtin());
    session.toggle();
    scheduler.run_until_idle();

    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["phase"], "open_idle");
    assert_eq!(json["is_open"], true);
    assert_eq!(json["unread_badge_visible"], false);
    assert_eq!(json["messages"][0]["role"], "bot");
    assert_eq!(json["quick_replies"].as_array().unwrap().len(), 4);
}

#[test]
fn test_transcript_renders_markdown() {
    let (session, scheduler) = manual_session(&KnowledgeConfig::builtin());
    session.toggle();
    scheduler.run_until_idle();
    session.submit("what's your email?");
    scheduler.run_until_idle();

    let rendered = session.render_transcript();
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[1].html, "what&#39;s your email?");
    assert!(rendered[2]
        .html
        .contains("📧 <strong>recontinuum.hq@gmail.com</strong><br />"));
}

// =============================================================================
// Knowledge file
// =============================================================================

#[test]
fn test_session_over_loaded_knowledge_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(KNOWLEDGE_FILE.as_bytes()).unwrap();
    let knowledge = KnowledgeConfig::load(file.path()).unwrap();

    let (session, scheduler) = manual_session(&knowledge);
    session.toggle();
    scheduler.run_until_idle();
    assert_eq!(session.messages()[0].content, "Hi, I'm the **test** bot.");
    assert_eq!(session.quick_replies(), vec!["Where are you?".to_string()]);

    session.submit_quick_reply(0);
    scheduler.run_until_idle();
    assert_eq!(session.messages()[2].content, "We are in *Sangli*.");

    session.submit("hello");
    scheduler.run_until_idle();
    assert_eq!(session.messages()[4].content, "No idea.");

    assert_eq!(
        session.render_transcript()[2].html,
        "We are in <em>Sangli</em>."
    );
}

// =============================================================================
// Tokio scheduler
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_tokio_session_greeting_and_reply() {
    let scheduler = Arc::new(TokioScheduler::new().unwrap());
    let session = ChatSession::new(
        &KnowledgeConfig::builtin(),
        &ChatConfig::default(),
        scheduler.clone(),
        Arc::new(ThreadRandom),
    );
    let mut rx = session.subscribe();

    session.toggle();
    let greeting = next_message(&mut rx).await;
    assert_eq!(greeting.role, Role::Bot);
    assert!(greeting.content.starts_with("Namaste!"));
    assert!(!session.is_typing());

    assert_eq!(session.submit("who founded the firm?"), SubmitOutcome::Accepted);
    let question = next_message(&mut rx).await;
    assert_eq!(question.role, Role::User);

    let reply = tokio::time::timeout(Duration::from_secs(5), next_message(&mut rx))
        .await
        .expect("reply should arrive");
    assert_eq!(reply.content, builtin_answer(KnowledgeCategory::Founder));
    assert_eq!(scheduler.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_tokio_session_drop_cancels_timers() {
    let scheduler = Arc::new(TokioScheduler::new().unwrap());
    let session = ChatSession::new(
        &KnowledgeConfig::builtin(),
        &ChatConfig::default(),
        scheduler.clone(),
        Arc::new(ThreadRandom),
    );
    session.toggle();
    assert_eq!(scheduler.pending(), 1);

    drop(session);
    assert_eq!(scheduler.pending(), 0);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(scheduler.pending(), 0);
}
