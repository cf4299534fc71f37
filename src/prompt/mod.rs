use std::io::{self, BufRead, Write};

use colored::Colorize;

/// Blocking dialogs a handler may raise: a message, a yes/no question and
/// a free-text question with a pre-filled answer.
pub trait Prompter {
    fn alert(&mut self, message: &str);

    fn confirm(&mut self, message: &str) -> bool;

    /// `None` when the user cancels.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}

/// Prompter over the process' stdin/stderr.
#[derive(Clone, Debug, Default)]
pub struct TerminalPrompter {
    pub assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn alert(&mut self, message: &str) {
        eprintln!(
            "{}{}{} {}",
            "[".bold().white(),
            "WRN".bold().yellow(),
            "]".bold().white(),
            message
        );
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        matches!(
            self.read_line().as_deref().map(|s| s.trim().to_lowercase()),
            Some(ref answer) if answer == "y" || answer == "yes"
        )
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        eprintln!("{message}");
        if default.is_empty() {
            eprint!("> ");
        } else {
            eprint!("[{default}] > ");
        }
        let _ = io::stderr().flush();
        let line = self.read_line()?;
        if line.is_empty() {
            Some(default.to_string())
        } else {
            Some(line)
        }
    }
}
