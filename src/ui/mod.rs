//! Terminal UI: progress spinner, coloured outcomes and ranked listings.

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::{BufRead, IsTerminal, Write};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::download::NotificationSink;
use crate::models::{BookEntry, FailureKind, FollowUpAction, Notification};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Cancelled => "○",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Cancelled,
}

/// Render a status line with a coloured icon.
pub fn status_line(status: Status, msg: &str) -> String {
    let icon = status_icon(status);
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
        Status::Cancelled => format!("{} {}", icon.white().dimmed(), msg),
    }
}

/// Notification sink for interactive terminal sessions
///
/// Shows a spinner while a fetch runs, lets Ctrl-C cancel it, and asks which
/// follow-up to run after a success when stdin is a terminal.
#[derive(Debug)]
pub struct TerminalNotifier {
    spinner: Mutex<Option<ProgressBar>>,
    finished: Mutex<Option<CancellationToken>>,
    interactive: bool,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            finished: Mutex::new(None),
            interactive: std::io::stdin().is_terminal(),
        }
    }

    /// Never prompt for a follow-up action
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            ..Self::new()
        }
    }

    fn prompt_follow_up(actions: &[FollowUpAction]) -> FollowUpAction {
        let choices = actions
            .iter()
            .map(|a| format!("[{}]{}", &a.label()[..1].to_lowercase(), &a.label()[1..]))
            .collect::<Vec<_>>()
            .join(", ");
        eprint!("{} (Enter to skip, Ctrl-C to quit): ", choices);
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(_) => parse_follow_up(&line, actions),
            Err(_) => FollowUpAction::None,
        }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for TerminalNotifier {
    fn task_started(&self, title: &str, cancel: CancellationToken) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.magenta} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(title.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(spinner);
        }

        let finished = CancellationToken::new();
        if let Ok(mut guard) = self.finished.lock() {
            *guard = Some(finished.clone());
        }
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => cancel.cancel(),
                _ = finished.cancelled() => {}
            }
        });
    }

    fn task_finished(&self) {
        if let Some(spinner) = self.spinner.lock().ok().and_then(|mut g| g.take()) {
            spinner.finish_and_clear();
        }
        if let Some(finished) = self.finished.lock().ok().and_then(|mut g| g.take()) {
            finished.cancel();
        }
    }

    async fn notify(&self, notification: Notification) -> FollowUpAction {
        match notification {
            Notification::Success {
                message, actions, ..
            } => {
                println!("{}", status_line(Status::Success, &message));
                if !self.interactive || actions.is_empty() {
                    return FollowUpAction::None;
                }
                let prompt = tokio::task::spawn_blocking(move || Self::prompt_follow_up(&actions));
                let answer = async { prompt.await.unwrap_or(FollowUpAction::None) };
                let interrupt = async {
                    let _ = tokio::signal::ctrl_c().await;
                };
                match answer_or_interrupt(answer, interrupt).await {
                    Some(choice) => choice,
                    None => {
                        // A blocked stdin read keeps the runtime alive; exit as SIGINT would.
                        eprintln!();
                        std::process::exit(130);
                    }
                }
            }
            Notification::Failure { message, kind } => {
                let status = match kind {
                    FailureKind::Cancelled => Status::Cancelled,
                    FailureKind::CertificateExpired => Status::Warning,
                    FailureKind::Other => Status::Error,
                };
                eprintln!("{}", status_line(status, &message));
                FollowUpAction::None
            }
        }
    }
}

/// Wait for the follow-up answer unless `interrupt` fires first
///
/// The Ctrl-C handler installed for the fetch stays active for the rest of
/// the process, so the prompt has to watch for it as well.
pub async fn answer_or_interrupt<A, I>(answer: A, interrupt: I) -> Option<FollowUpAction>
where
    A: std::future::Future<Output = FollowUpAction>,
    I: std::future::Future<Output = ()>,
{
    tokio::select! {
        choice = answer => Some(choice),
        _ = interrupt => None,
    }
}

/// Map a typed answer to one of the offered actions
///
/// Accepts the full label or its first letter, case-insensitively.
pub fn parse_follow_up(answer: &str, actions: &[FollowUpAction]) -> FollowUpAction {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return FollowUpAction::None;
    }
    actions
        .iter()
        .copied()
        .find(|action| {
            let label = action.label().to_lowercase();
            label == answer
                || label.split_whitespace().next() == Some(answer.as_str())
                || (answer.chars().count() == 1 && label.starts_with(&answer))
        })
        .unwrap_or(FollowUpAction::None)
}

/// Print a ranked list of books as an aligned table.
pub fn print_ranked_books(books: &[BookEntry]) {
    let index_width = books.len().max(1).to_string().len();
    println!(
        "{}",
        format!(
            "{:>iw$}  {:<40}  {:<24}  {:<6}  {:<18}  {}",
            "#",
            "Title",
            "Author",
            "Year",
            "Language",
            "Format",
            iw = index_width
        )
        .bold()
    );
    println!("{}", "─".repeat(index_width + 100).dimmed());

    for (i, book) in books.iter().enumerate() {
        println!(
            "{:>iw$}  {}  {}  {:<6}  {}  {}",
            i,
            pad_to_width(&truncate_with_ellipsis(&book.title, 40), 40),
            pad_to_width(&truncate_with_ellipsis(&book.author, 24), 24),
            book.year().unwrap_or("-"),
            pad_to_width(&truncate_with_ellipsis(&book.language, 18), 18),
            book.extension.cyan(),
            iw = index_width
        );
    }
}

/// Pad text with spaces to a display width.
fn pad_to_width(text: &str, width: usize) -> String {
    let current = unicode_width::UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(current)))
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    let total_width = unicode_width::UnicodeWidthStr::width(text);
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + w > max_width - 3 {
            break;
        }
        current_width += w;
        truncated.push(c);
    }

    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFERED: [FollowUpAction; 2] = [FollowUpAction::Open, FollowUpAction::Reveal];

    #[test]
    fn test_parse_follow_up() {
        assert_eq!(parse_follow_up("o\n", &OFFERED), FollowUpAction::Open);
        assert_eq!(parse_follow_up("Open", &OFFERED), FollowUpAction::Open);
        assert_eq!(parse_follow_up("R", &OFFERED), FollowUpAction::Reveal);
        assert_eq!(parse_follow_up("reveal", &OFFERED), FollowUpAction::Reveal);
        assert_eq!(parse_follow_up("", &OFFERED), FollowUpAction::None);
        assert_eq!(parse_follow_up("x", &OFFERED), FollowUpAction::None);
    }

    #[test]
    fn test_parse_follow_up_only_offered() {
        assert_eq!(
            parse_follow_up("r", &[FollowUpAction::Open]),
            FollowUpAction::None
        );
    }

    #[tokio::test]
    async fn test_interrupt_ends_follow_up_prompt() {
        let answer = std::future::pending::<FollowUpAction>();
        let result = answer_or_interrupt(answer, async {}).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_answer_wins_without_interrupt() {
        let answer = async { FollowUpAction::Reveal };
        let result = answer_or_interrupt(answer, std::future::pending::<()>()).await;
        assert_eq!(result, Some(FollowUpAction::Reveal));
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("a long book title", 10), "a long ...");
        assert_eq!(truncate_with_ellipsis("anything", 3), "...");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // Each CJK character is two columns wide
        assert_eq!(truncate_with_ellipsis("红楼梦红楼梦", 7), "红楼...");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("红", 4), "红  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Cancelled), "○");
    }
}
