// Blocking confirmation prompts

use std::io::{self, BufRead, Write};
use tracing::warn;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this book?";

/// Asks the user a yes/no question and blocks until answered
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&mut self, question: &str) -> bool {
        (**self).confirm(question)
    }
}

/// Answers every question with yes, e.g. for `--yes`
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _question: &str) -> bool {
        true
    }
}

/// Prompts on a writer and reads the answer from a line-based reader
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl LinePrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, answer on stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} [y/N] ", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    /// Anything but an explicit yes declines, including I/O errors
    fn confirm(&mut self, question: &str) -> bool {
        self.ask(question).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read confirmation, declining");
            false
        })
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
