// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

// Interactive input. The parse_* functions are pure validators; Prompter is the thin I/O loop that
// keeps asking until a validator accepts the answer.

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use log::debug;

use crate::errors::TaxseqError;

#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    NotAnInteger(String),
    NotPositive,
    NotANumber(String),
    NonPositiveWeight(f64),
    Empty(&'static str),
    InvalidId(String),
    BelowMinimum { min: u64 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotAnInteger(s) => write!(f, "'{}' is not a valid whole number.", s),
            InputError::NotPositive => write!(f, "The value must be greater than 0."),
            InputError::NotANumber(s) => write!(f, "'{}' is not a valid number.", s),
            InputError::NonPositiveWeight(_) => write!(f, "Weight must be greater than 0."),
            InputError::Empty(what) => write!(f, "{} cannot be empty.", what),
            InputError::InvalidId(s) => write!(
                f,
                "'{}' is not a valid ID (no spaces or path separators allowed).",
                s
            ),
            InputError::BelowMinimum { min } => {
                write!(f, "Maximum length must be at least the minimum ({}).", min)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Sequence length: a whole number > 0.
pub fn parse_length(input: &str) -> Result<usize, InputError> {
    let s = input.trim();
    // Parse as signed first, so that "-3" is reported as non-positive rather than as garbage.
    let value: i64 = s
        .parse()
        .map_err(|_| InputError::NotAnInteger(s.to_string()))?;
    if value <= 0 {
        return Err(InputError::NotPositive);
    }
    usize::try_from(value).map_err(|_| InputError::NotAnInteger(s.to_string()))
}

/// Any non-blank text, trimmed. `what` names the field in the error message.
pub fn parse_non_empty(input: &str, what: &'static str) -> Result<String, InputError> {
    let s = input.trim();
    if s.is_empty() {
        Err(InputError::Empty(what))
    } else {
        Ok(s.to_string())
    }
}

/// Sequence ID. It becomes both the FastA header's first word and the file name, so whitespace and
/// path separators are refused.
pub fn parse_sequence_id(input: &str) -> Result<String, InputError> {
    let id = parse_non_empty(input, "Sequence ID")?;
    if id
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\')
        || id == "."
        || id == ".."
    {
        return Err(InputError::InvalidId(id));
    }
    Ok(id)
}

/// Relative nucleotide weight: a finite number > 0.
pub fn parse_weight(input: &str) -> Result<f64, InputError> {
    let s = input.trim();
    let value: f64 = s
        .parse()
        .map_err(|_| InputError::NotANumber(s.to_string()))?;
    if !value.is_finite() {
        return Err(InputError::NotANumber(s.to_string()));
    }
    if value <= 0.0 {
        return Err(InputError::NonPositiveWeight(value));
    }
    Ok(value)
}

/// Anything that isn't an explicit yes counts as no. 't'/'tak' are accepted too.
pub fn parse_yes_no(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "y" | "yes" | "t" | "tak"
    )
}

pub fn parse_taxid(input: &str) -> Result<u32, InputError> {
    let s = input.trim();
    let taxid: u32 = s
        .parse()
        .map_err(|_| InputError::NotAnInteger(s.to_string()))?;
    if taxid == 0 {
        return Err(InputError::NotPositive);
    }
    Ok(taxid)
}

/// Sequence length bound (may be 0).
pub fn parse_bound(input: &str) -> Result<u64, InputError> {
    let s = input.trim();
    s.parse()
        .map_err(|_| InputError::NotAnInteger(s.to_string()))
}

pub fn parse_max_bound(input: &str, min: u64) -> Result<u64, InputError> {
    let max = parse_bound(input)?;
    if max < min {
        return Err(InputError::BelowMinimum { min });
    }
    Ok(max)
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Prints `question` and returns the answer without its line terminator. Running out of input
    /// is an error: there is nobody left to answer.
    pub fn ask(&mut self, question: &str) -> Result<String, TaxseqError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Err(TaxseqError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            )));
        }
        let answer = line.trim_end_matches(&['\n', '\r'][..]).to_string();
        debug!("{} -> {:?}", question.trim_end(), answer);
        Ok(answer)
    }

    /// Asks `question` until `validate` accepts the answer, printing the validator's complaint
    /// after each rejected one.
    pub fn ask_until<T, F>(&mut self, question: &str, validate: F) -> Result<T, TaxseqError>
    where
        F: Fn(&str) -> Result<T, InputError>,
    {
        loop {
            let answer = self.ask(question)?;
            match validate(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool, TaxseqError> {
        Ok(parse_yes_no(&self.ask(question)?))
    }

    pub fn say(&mut self, message: &str) -> Result<(), TaxseqError> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
