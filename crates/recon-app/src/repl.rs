//! Line commands for the terminal chat.

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the chat.
    Quit,
    /// Open or close the panel.
    Toggle,
    /// Show the commands and any quick questions on offer.
    Help,
    /// Send the quick question at this zero-based index.
    QuickReply(usize),
    /// Send free text.
    Say(String),
    Empty,
}

impl Command {
    /// Parse a line. Slash commands are case-insensitive; `/2` picks the
    /// second quick question. Unknown slash commands are sent as text.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        let Some(command) = trimmed.strip_prefix('/') else {
            return Command::Say(trimmed.to_string());
        };
        match command.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Command::Quit,
            "toggle" | "t" => Command::Toggle,
            "help" | "h" | "?" => Command::Help,
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 => Command::QuickReply(n - 1),
                _ => Command::Say(trimmed.to_string()),
            },
        }
    }
}

pub fn help_text(quick_replies: &[String]) -> String {
    let mut out = String::from(
        "Type a question and press enter.\n  /toggle  open or close the chat\n  /help    show this help\n  /quit    leave\n",
    );
    if !quick_replies.is_empty() {
        out.push_str("Quick questions:\n");
        for (i, question) in quick_replies.iter().enumerate() {
            out.push_str(&format!("  /{}  {}\n", i + 1, question));
        }
    }
    out
}
