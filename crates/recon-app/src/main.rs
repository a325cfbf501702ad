//! Recon terminal chat - composition root.
//!
//! 1. Load configuration from TOML
//! 2. Load the knowledge base (file or built-in)
//! 3. Mount a chat session on the tokio scheduler
//! 4. Print bot messages to stdout and feed stdin lines to the session
//!
//! Logs go to stderr so the transcript on stdout stays clean.

mod cli;
mod repl;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};

use recon_chat::{
    render_plain, ChatEvent, ChatSession, KnowledgeConfig, Role, SessionPhase, SubmitOutcome,
    ThreadRandom, TokioScheduler,
};
use recon_core::config::ReconConfig;

use cli::CliArgs;
use repl::Command;

/// Print bot messages and the typing indicator until the session goes away.
async fn print_events(mut events: broadcast::Receiver<ChatEvent>) {
    loop {
        match events.recv().await {
            Ok(ChatEvent::MessageAppended { message }) if message.role == Role::Bot => {
                println!(
                    "\nRecon [{}]\n{}\n",
                    message.display_time(),
                    render_plain(&message.content)
                );
            }
            Ok(ChatEvent::TypingChanged { is_typing: true }) => println!("Recon is typing..."),
            Ok(ChatEvent::OpenChanged { is_open }) => {
                println!("{}", if is_open { "[chat opened]" } else { "[chat closed]" });
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Wait until no greeting or reply is in flight, so piped input reads as a
/// conversation rather than a burst of ignored submissions.
async fn wait_until_idle(session: &ChatSession, events: &mut broadcast::Receiver<ChatEvent>) {
    while matches!(
        session.phase(),
        SessionPhase::OpenTyping | SessionPhase::OpenAwaitingGreeting
    ) || session.is_typing()
    {
        match events.recv().await {
            Ok(_) | Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

fn report(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Accepted | SubmitOutcome::IgnoredEmpty => {}
        SubmitOutcome::IgnoredBusy => println!("(Recon is still typing, please wait)"),
        SubmitOutcome::IgnoredUnavailable => println!("(no such quick question)"),
    }
}

fn init_tracing(cli_level: Option<&str>, config_level: &str) {
    let filter = match cli_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config_level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Loaded before tracing so its log level can apply; a load
    // failure is reported once the subscriber is up.
    let config_file = args.resolve_config_path();
    let loaded = ReconConfig::load(&config_file);
    let config_level = loaded
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(args.resolve_log_level().as_deref(), &config_level);

    tracing::info!("Starting Recon v{}", env!("CARGO_PKG_VERSION"));
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "Failed to load config from {}: {}. Using defaults.",
                config_file.display(),
                e
            );
            ReconConfig::default()
        }
    };
    let chat_config = args.resolve_chat_config(config.chat);

    // Knowledge.
    let knowledge = match args.resolve_knowledge_path(&chat_config) {
        Some(path) => KnowledgeConfig::load(&path)?,
        None => KnowledgeConfig::builtin(),
    };

    // Session.
    let scheduler = Arc::new(TokioScheduler::new()?);
    let session = ChatSession::new(
        &knowledge,
        &chat_config,
        scheduler.clone(),
        Arc::new(ThreadRandom),
    );
    let printer = tokio::spawn(print_events(session.subscribe()));
    let mut idle = session.subscribe();

    println!("{}", repl::help_text(&session.quick_replies()));
    session.open();
    wait_until_idle(&session, &mut idle).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                None
            }
        };
        let Some(line) = line else { break };

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Empty => continue,
            Command::Toggle => session.toggle(),
            Command::Help => println!("{}", repl::help_text(&session.quick_replies())),
            Command::QuickReply(index) => report(session.submit_quick_reply(index)),
            Command::Say(text) => report(session.submit(&text)),
        }
        wait_until_idle(&session, &mut idle).await;
    }

    // Unmount: cancels the session's timers and closes the event stream.
    tracing::debug!(messages = session.message_count(), "Chat finished");
    drop(idle);
    drop(session);
    scheduler.shutdown();
    printer.await?;
    Ok(())
}
