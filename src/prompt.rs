//! Interactive questions asked between thumbnail generation and finishing.
//!
//! The pipeline only talks to the [`Prompter`] trait. [`LinePrompter`] asks on
//! any `BufRead` / `Write` pair (the terminal in production, byte buffers in
//! tests); [`AutoPrompter`] answers without asking, for unattended runs.

use crate::naming;
use crate::tools::Rotation;
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("input closed while waiting for an answer")]
    Closed,
}

/// Answers the per-image questions.
pub trait Prompter {
    /// Caption for the image at `source` (1-based `index`).
    fn caption(&mut self, index: usize, source: &Path) -> Result<String, PromptError>;

    /// Rotation to apply to the image, if any.
    fn rotation(&mut self, index: usize, source: &Path) -> Result<Option<Rotation>, PromptError>;
}

/// Line-oriented prompter over a reader and a writer.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
    max_len: usize,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W, max_len: usize) -> Self {
        Self {
            input,
            output,
            max_len: max_len.max(1),
        }
    }

    /// Print `message: ` and read one line, without its line terminator.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`.
    /// Answers longer than `max_len` characters are truncated.
    pub fn ask(&mut self, message: &str) -> Result<String, PromptError> {
        write!(self.output, "{message}: ")?;
        self.output.flush()?;

        // Raw bytes: a terminal in a non-UTF-8 locale still gets an answer.
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(PromptError::Closed);
        }
        let line = String::from_utf8_lossy(&raw);
        let trimmed = line.trim_end_matches(['\n', '\r']);

        if trimmed.chars().count() > self.max_len {
            log::warn!(
                "answer longer than {} characters, extra input dropped",
                self.max_len
            );
            return Ok(trimmed.chars().take(self.max_len).collect());
        }
        Ok(trimmed.to_string())
    }

    /// Print a line that is not a question.
    pub fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    /// An empty answer falls back to the name-derived caption.
    fn caption(&mut self, index: usize, source: &Path) -> Result<String, PromptError> {
        let answer = self.ask(&format!(
            "[{}] caption for {}",
            naming::format_index(index),
            source.display()
        ))?;
        let answer = answer.trim();
        if answer.is_empty() {
            Ok(naming::default_caption(source))
        } else {
            Ok(answer.to_string())
        }
    }

    fn rotation(&mut self, index: usize, _source: &Path) -> Result<Option<Rotation>, PromptError> {
        let answer = self.ask(&format!(
            "[{}] rotate? [l]eft / [r]ight / enter to keep",
            naming::format_index(index)
        ))?;
        Ok(Rotation::from_answer(&answer))
    }
}

/// Non-interactive answers: name-derived caption, no rotation.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoPrompter;

impl Prompter for AutoPrompter {
    fn caption(&mut self, _index: usize, source: &Path) -> Result<String, PromptError> {
        Ok(naming::default_caption(source))
    }

    fn rotation(&mut self, _index: usize, _source: &Path) -> Result<Option<Rotation>, PromptError> {
        Ok(None)
    }
}
