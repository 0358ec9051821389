use std::borrow::Cow;
use std::io::Write;
use std::mem;

use async_trait::async_trait;
use services::{Console, ConsoleInput};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader, Stdin};
use tokio::time::Instant;
use tracing::warn;

/// Console over the process's stdout and a line-oriented reader, stdin by
/// default.
pub struct StdConsole<R = BufReader<Stdin>> {
    reader: R,
    /// Bytes of the line being read. Kept across timed-out reads.
    pending: Vec<u8>,
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl StdConsole {
    pub fn new() -> Self {
        Self::from_reader(tokio::io::stdin())
    }
}

impl<A: AsyncRead + Unpin> StdConsole<BufReader<A>> {
    pub fn from_reader(reader: A) -> Self {
        Self {
            reader: BufReader::new(reader),
            pending: Vec::new(),
        }
    }
}

/// Decode one raw line. Bytes that are not UTF-8 become replacement
/// characters, so the line reaches the input helpers as invalid input.
fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if matches!(text, Cow::Owned(_)) {
        warn!(len = bytes.len(), "input line is not valid UTF-8");
    }
    text.trim_end_matches(['\n', '\r']).to_string()
}

impl<R: AsyncBufRead + Unpin + Send> StdConsole<R> {
    async fn next_line(&mut self) -> ConsoleInput {
        // read_until appends to `pending`, so a read cancelled by a deadline
        // resumes where it stopped.
        match self.reader.read_until(b'\n', &mut self.pending).await {
            Ok(0) if self.pending.is_empty() => ConsoleInput::Closed,
            Ok(_) => ConsoleInput::Line(decode(&mem::take(&mut self.pending))),
            Err(err) => {
                warn!(error = %err, "stdin read failed");
                ConsoleInput::Closed
            }
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Console for StdConsole<R> {
    fn say(&mut self, text: &str) {
        println!("{text}");
    }

    async fn read_line(&mut self, prompt: &str) -> ConsoleInput {
        if !prompt.is_empty() {
            print!("{prompt}");
            if let Err(err) = std::io::stdout().flush() {
                warn!(error = %err, "stdout flush failed");
            }
        }
        self.next_line().await
    }

    async fn read_line_until(&mut self, deadline: Instant) -> ConsoleInput {
        match tokio::time::timeout_at(deadline, self.next_line()).await {
            Ok(input) => input,
            Err(_) => ConsoleInput::TimedOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::input::{ChoiceInput, ask_choice};
    use toeic_core::model::AnswerChoice;

    #[tokio::test]
    async fn non_utf8_line_is_read_as_invalid_text() {
        let mut console = StdConsole::from_reader(&b"\xe9\nA\r\nlast"[..]);
        assert_eq!(
            console.read_line("").await,
            ConsoleInput::Line("\u{FFFD}".to_string())
        );
        assert_eq!(console.read_line("").await, ConsoleInput::Line("A".to_string()));
        assert_eq!(console.read_line("").await, ConsoleInput::Line("last".to_string()));
        assert_eq!(console.read_line("").await, ConsoleInput::Closed);
    }

    #[tokio::test]
    async fn non_utf8_answer_reprompts_instead_of_quitting() {
        let mut console = StdConsole::from_reader(&b"\xe9\nb\n"[..]);
        assert_eq!(
            ask_choice(&mut console, "Your answer: ").await,
            ChoiceInput::Answer(AnswerChoice::B)
        );
    }

    #[tokio::test]
    async fn timed_read_returns_buffered_line() {
        let mut console = StdConsole::from_reader(&b"hello\n"[..]);
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        assert_eq!(
            console.read_line_until(deadline).await,
            ConsoleInput::Line("hello".to_string())
        );
        assert_eq!(console.read_line_until(deadline).await, ConsoleInput::Closed);
    }
}
