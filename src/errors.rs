// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{fmt, io};

use crate::seq::genbank::RecordError;

#[derive(Debug)]
pub enum TaxseqError {
    Io(io::Error),
    Format(String),
    Http(reqwest::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    // Index is the 0-based position of the offending record in the fetched batch.
    Record { index: usize, error: RecordError },
    EmptySequence,
}

// These allow conversion to TaxseqError, required for main() to return Result<()> and for '?' to
// work.

impl From<io::Error> for TaxseqError {
    fn from(e: io::Error) -> Self {
        TaxseqError::Io(e)
    }
}

impl From<String> for TaxseqError {
    fn from(s: String) -> Self {
        TaxseqError::Format(s)
    }
}

impl From<reqwest::Error> for TaxseqError {
    fn from(e: reqwest::Error) -> Self {
        TaxseqError::Http(e)
    }
}

impl From<serde_json::Error> for TaxseqError {
    fn from(e: serde_json::Error) -> Self {
        TaxseqError::Json(e)
    }
}

impl From<csv::Error> for TaxseqError {
    fn from(e: csv::Error) -> Self {
        TaxseqError::Csv(e)
    }
}

impl fmt::Display for TaxseqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxseqError::Io(e) => write!(f, "I/O error: {}", e),
            TaxseqError::Format(msg) => write!(f, "Format error: {}", msg),
            TaxseqError::Http(e) => write!(f, "HTTP error: {}", e),
            TaxseqError::Json(e) => write!(f, "JSON error: {}", e),
            TaxseqError::Csv(e) => write!(f, "CSV error: {}", e),
            TaxseqError::Record { index, error } => {
                write!(f, "Malformed record #{}: {}", index + 1, error)
            }
            TaxseqError::EmptySequence => {
                write!(f, "Cannot compute composition of an empty sequence")
            }
        }
    }
}

impl std::error::Error for TaxseqError {}
