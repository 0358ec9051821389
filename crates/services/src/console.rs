use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::time::Instant;

/// Result of one line-oriented read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// A submitted line, without its terminator.
    Line(String),
    /// The deadline passed before a line was submitted.
    TimedOut,
    /// Input reached end of file.
    Closed,
}

/// Line-oriented terminal seam used by every interactive step.
#[async_trait]
pub trait Console: Send {
    /// Print `text` followed by a newline.
    fn say(&mut self, text: &str);

    /// Show `prompt` on the same line and wait for the next line.
    ///
    /// Never returns [`ConsoleInput::TimedOut`].
    async fn read_line(&mut self, prompt: &str) -> ConsoleInput;

    /// Wait for the next line, giving up at `deadline`.
    async fn read_line_until(&mut self, deadline: Instant) -> ConsoleInput;
}

//
// ─── SCRIPTED CONSOLE ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
enum Step {
    Line(String),
    Timeout,
}

/// Shared view of everything a [`ScriptedConsole`] printed.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Arc<Mutex<String>>);

impl Transcript {
    fn push(&self, text: &str) {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push_str(text);
        guard.push('\n');
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    /// Number of non-overlapping occurrences of `needle`.
    #[must_use]
    pub fn count(&self, needle: &str) -> usize {
        self.text().matches(needle).count()
    }
}

/// Console fed from a fixed script, for tests.
///
/// Once the script runs out every read reports [`ConsoleInput::Closed`].
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    steps: VecDeque<Step>,
    transcript: Transcript,
}

impl ScriptedConsole {
    #[must_use]
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            steps: lines.into_iter().map(|l| Step::Line(l.into())).collect(),
            transcript: Transcript::default(),
        }
    }

    /// Append a line to the script.
    #[must_use]
    pub fn then(mut self, line: impl Into<String>) -> Self {
        self.steps.push_back(Step::Line(line.into()));
        self
    }

    /// Make the next timed read report a timeout.
    #[must_use]
    pub fn then_timeout(mut self) -> Self {
        self.steps.push_back(Step::Timeout);
        self
    }

    #[must_use]
    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }

    fn next_line(&mut self) -> ConsoleInput {
        match self.steps.pop_front() {
            Some(Step::Line(line)) => {
                self.transcript.push(&format!("> {line}"));
                ConsoleInput::Line(line)
            }
            Some(Step::Timeout) | None => ConsoleInput::Closed,
        }
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    fn say(&mut self, text: &str) {
        self.transcript.push(text);
    }

    async fn read_line(&mut self, prompt: &str) -> ConsoleInput {
        if !prompt.is_empty() {
            self.transcript.push(prompt);
        }
        self.next_line()
    }

    async fn read_line_until(&mut self, deadline: Instant) -> ConsoleInput {
        if Instant::now() >= deadline {
            return ConsoleInput::TimedOut;
        }
        if matches!(self.steps.front(), Some(Step::Timeout)) {
            self.steps.pop_front();
            return ConsoleInput::TimedOut;
        }
        self.next_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn scripted_console_replays_and_records() {
        let mut console = ScriptedConsole::new(["b"]).then_timeout();
        let transcript = console.transcript();
        console.say("Question 1");
        assert_eq!(
            console.read_line("Your answer: ").await,
            ConsoleInput::Line("b".into())
        );
        let deadline = Instant::now() + Duration::from_secs(60);
        assert_eq!(console.read_line_until(deadline).await, ConsoleInput::TimedOut);
        assert_eq!(console.read_line("again: ").await, ConsoleInput::Closed);
        assert!(transcript.contains("Question 1\nYour answer: \n> b\n"));
    }

    #[tokio::test]
    async fn past_deadline_times_out_without_consuming() {
        let mut console = ScriptedConsole::new(["kept"]);
        let deadline = Instant::now();
        assert_eq!(console.read_line_until(deadline).await, ConsoleInput::TimedOut);
        assert_eq!(console.read_line("").await, ConsoleInput::Line("kept".into()));
    }
}
