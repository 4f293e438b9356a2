//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    stdout: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            stdout: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Emit a CI warning annotation on stdout, where the Actions log
    /// parser picks it up.
    pub(crate) fn annotation(&self, title: &str, msg: &str) {
        let _ = self
            .stdout
            .write_line(&format!("::warning title={title}::{msg}"));
    }

    /// Ask a yes/no question, requiring a full `yes` or `no` answer.
    pub(crate) fn confirm(&self, message: &str) -> bool {
        // Requiring the full word is heavy-handed, but this is the only
        // confirmation layer before pushing.
        loop {
            let _ = self.term.write_str(&format!("{message} [yes/no]? "));
            let Ok(answer) = self.term.read_line() else {
                return false;
            };
            match answer.trim().to_lowercase().as_str() {
                "yes" => return true,
                "no" => return false,
                _ => {}
            }
        }
    }
}
