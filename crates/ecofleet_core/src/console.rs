//! Line-oriented operator interface consumed by the interactive flows.
//!
//! # Responsibility
//! - Abstract prompt/read and message output so flows stay terminal-agnostic.
//! - Provide a scripted implementation for tests and non-interactive runs.
//!
//! # Invariants
//! - `read_line` returning `Ok(None)` means the operator ended input; flows
//!   treat it as an abort and discard any working copy.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Visual weight of one output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Success,
    Failure,
    Notice,
}

/// Source of raw operator input and sink for feedback.
pub trait Console {
    /// Shows `prompt` and reads one line without its trailing newline.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn show(&mut self, tone: Tone, message: &str);

    fn clear(&mut self) {}

    /// Holds the screen until the operator acknowledges it.
    fn pause(&mut self) {}
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        (**self).read_line(prompt)
    }

    fn show(&mut self, tone: Tone, message: &str) {
        (**self).show(tone, message)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn pause(&mut self) {
        (**self).pause()
    }
}

/// Why an interactive prompt could not produce a value.
#[derive(Debug)]
pub enum PromptError {
    /// Input ended before a valid value was supplied.
    Aborted,
    Io(io::Error),
}

impl Display for PromptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aborted => write!(f, "input ended before the operation completed"),
            Self::Io(err) => write!(f, "failed to read operator input: {err}"),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Aborted => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Reads one line, mapping end of input to `PromptError::Aborted`.
pub fn ask<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<String, PromptError> {
    console.read_line(prompt)?.ok_or(PromptError::Aborted)
}

/// Console that replays prepared answers and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    transcript: Vec<(Tone, String)>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn transcript(&self) -> &[(Tone, String)] {
        &self.transcript
    }

    /// Messages shown with the given tone.
    pub fn messages(&self, tone: Tone) -> Vec<&str> {
        self.transcript
            .iter()
            .filter(|(shown, _)| *shown == tone)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    /// Whether any shown line contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript
            .iter()
            .any(|(_, message)| message.contains(needle))
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn show(&mut self, tone: Tone, message: &str) {
        self.transcript.push((tone, message.to_string()));
    }
}
