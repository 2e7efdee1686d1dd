//! Validation primitives for raw operator input.
//!
//! # Responsibility
//! - Turn raw strings into guaranteed-valid typed values.
//! - Re-solicit input until it is valid (`require_*`), emitting exactly one
//!   diagnostic line per rejected attempt.
//!
//! # Invariants
//! - `require_*` never returns an invalid value; the only way out without a
//!   value is the operator ending input (`PromptError::Aborted`).

use crate::console::{ask, Console, PromptError, Tone};
use crate::model::project::ProjectStatus;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a single raw input was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    EmptyText,
    NotANumber(String),
    NotPositive(f64),
    NotAWholeNumber(String),
    OutOfRange { choice: i64, max: usize },
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "value cannot be empty"),
            Self::NotANumber(raw) => write!(f, "`{raw}` is not a valid number"),
            Self::NotPositive(value) => write!(f, "{value} is not greater than zero"),
            Self::NotAWholeNumber(raw) => write!(f, "`{raw}` is not a whole number"),
            Self::OutOfRange { choice, max } => {
                write!(f, "option {choice} is outside 1 to {max}")
            }
        }
    }
}

impl Error for InputError {}

/// Accepts iff `raw` parses as a finite number strictly greater than zero.
pub fn parse_positive_number(raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| InputError::NotANumber(trimmed.to_string()))?;
    if value <= 0.0 {
        return Err(InputError::NotPositive(value));
    }
    Ok(value)
}

/// Accepts iff `raw` is non-empty after trimming; returns the trimmed text.
pub fn parse_non_empty_text(raw: &str) -> Result<String, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Accepts iff `raw` is a whole number strictly greater than zero.
pub fn parse_positive_id(raw: &str) -> Result<i64, InputError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| InputError::NotAWholeNumber(trimmed.to_string()))?;
    if value <= 0 {
        return Err(InputError::NotPositive(value as f64));
    }
    Ok(value)
}

/// Accepts a 1-based menu position in `1..=count` and returns it 0-based.
pub fn parse_menu_choice(raw: &str, count: usize) -> Result<usize, InputError> {
    let trimmed = raw.trim();
    let choice = trimmed
        .parse::<i64>()
        .map_err(|_| InputError::NotAWholeNumber(trimmed.to_string()))?;
    match usize::try_from(choice) {
        Ok(position) if (1..=count).contains(&position) => Ok(position - 1),
        _ => Err(InputError::OutOfRange {
            choice,
            max: count,
        }),
    }
}

/// Re-prompts until `raw` (then each re-supplied line) is a positive number.
pub fn require_positive_number<C: Console + ?Sized>(
    console: &mut C,
    raw: String,
    field: &str,
) -> Result<f64, PromptError> {
    require_with(console, raw, field, parse_positive_number, |_| {
        format!("The field '{field}' must be a positive number.")
    })
}

/// Re-prompts until `raw` (then each re-supplied line) has visible text.
pub fn require_non_empty_text<C: Console + ?Sized>(
    console: &mut C,
    raw: String,
    field: &str,
) -> Result<String, PromptError> {
    require_with(console, raw, field, parse_non_empty_text, |_| {
        format!("The field '{field}' cannot be empty.")
    })
}

/// Re-prompts until `raw` (then each re-supplied line) is a positive id.
pub fn require_positive_id<C: Console + ?Sized>(
    console: &mut C,
    raw: String,
    field: &str,
) -> Result<i64, PromptError> {
    require_with(console, raw, field, parse_positive_id, |_| {
        format!("The field '{field}' must be a positive whole number.")
    })
}

/// Prompts until a position in `1..=count` is entered; returns it 0-based.
pub fn require_menu_choice<C: Console + ?Sized>(
    console: &mut C,
    count: usize,
) -> Result<usize, PromptError> {
    let prompt = format!("Choose an option (1 to {count}): ");
    loop {
        let raw = ask(console, &prompt)?;
        match parse_menu_choice(&raw, count) {
            Ok(index) => return Ok(index),
            Err(InputError::NotAWholeNumber(_)) => {
                console.show(Tone::Failure, "Invalid input. Please enter a number.")
            }
            Err(_) => console.show(Tone::Failure, "Invalid option. Try again."),
        }
    }
}

/// Closed two-option status menu; loops until a canonical value is picked.
pub fn require_status<C: Console + ?Sized>(
    console: &mut C,
    heading: &str,
) -> Result<ProjectStatus, PromptError> {
    console.show(Tone::Heading, heading);
    for (position, status) in ProjectStatus::ALL.iter().enumerate() {
        console.show(Tone::Plain, &format!("{}. {}", position + 1, status.label()));
    }
    let index = require_menu_choice(console, ProjectStatus::ALL.len())?;
    Ok(ProjectStatus::ALL[index])
}

fn require_with<C, T, P, M>(
    console: &mut C,
    mut raw: String,
    field: &str,
    parse: P,
    message: M,
) -> Result<T, PromptError>
where
    C: Console + ?Sized,
    P: Fn(&str) -> Result<T, InputError>,
    M: Fn(&InputError) -> String,
{
    loop {
        match parse(&raw) {
            Ok(value) => return Ok(value),
            Err(err) => {
                console.show(Tone::Failure, &message(&err));
                raw = ask(console, &format!("Enter the field '{field}' again: "))?;
            }
        }
    }
}
