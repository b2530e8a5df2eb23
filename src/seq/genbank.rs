// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

// Minimal GenBank flat-file reader: only LOCUS (length), DEFINITION and ACCESSION are looked at.
// Everything else in a record (FEATURES, ORIGIN, ...) is skipped.

use std::fmt;

use itertools::{Either, Itertools};
use log::{debug, warn};

use crate::errors::TaxseqError;
use crate::seq::record::SequenceRecord;

const RECORD_TERMINATOR: &str = "//";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Accession,
    Length,
    Description,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordField::Accession => "ACCESSION",
            RecordField::Length => "LOCUS length",
            RecordField::Description => "DEFINITION",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    MissingField(RecordField),
    BadLength(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::MissingField(field) => write!(f, "missing {} field", field),
            RecordError::BadLength(token) => write!(f, "bad sequence length '{}'", token),
        }
    }
}

impl std::error::Error for RecordError {}

/// Records parsed in lenient mode, plus the (0-based) index and cause of every record that was
/// skipped.
#[derive(Debug, Default)]
pub struct LenientParse {
    pub records: Vec<SequenceRecord>,
    pub skipped: Vec<(usize, RecordError)>,
}

/// Splits a batch of concatenated records on the `//` terminator. The terminator is either a line
/// of its own or the last whitespace-separated token of a line, in which case the text before it
/// still belongs to the record. Whatever follows the last terminator is dropped.
pub fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if let Some(head) = terminated_head(line) {
            records.push(&text[start..offset + head.len()]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    let rest = &text[start..];
    if !rest.trim().is_empty() {
        warn!(
            "Dropping {} bytes after the last '{}' terminator",
            rest.len(),
            RECORD_TERMINATOR
        );
    }
    records
}

// The part of a line preceding its `//` terminator token, if it has one. A `//` glued to other
// text (e.g. in a URL) is not a terminator.
fn terminated_head(line: &str) -> Option<&str> {
    let head = line.trim_end().strip_suffix(RECORD_TERMINATOR)?;
    if head.is_empty() || head.ends_with(char::is_whitespace) {
        Some(head.trim_end())
    } else {
        None
    }
}

// Returns the rest of the line if it starts with the given keyword (keywords are only valid in
// column 0 and must be followed by whitespace or EOL).
fn labelled<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(label)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

fn extract_accession(record: &str) -> Result<String, RecordError> {
    record
        .lines()
        .find_map(|l| labelled(l, "ACCESSION"))
        .and_then(|rest| rest.split_whitespace().next())
        .map(String::from)
        .ok_or(RecordError::MissingField(RecordField::Accession))
}

fn extract_length(record: &str) -> Result<u64, RecordError> {
    let locus = record
        .lines()
        .find_map(|l| labelled(l, "LOCUS"))
        .ok_or(RecordError::MissingField(RecordField::Length))?;
    // LOCUS       <name>   <length> bp   <moltype> ...
    let (len_token, _) = locus
        .split_whitespace()
        .skip(1)
        .tuple_windows()
        .find(|(_, unit)| *unit == "bp")
        .ok_or(RecordError::MissingField(RecordField::Length))?;
    len_token
        .parse::<u64>()
        .map_err(|_| RecordError::BadLength(len_token.to_string()))
}

fn extract_description(record: &str) -> Result<String, RecordError> {
    let mut lines = record.lines();
    let first = lines
        .by_ref()
        .find_map(|l| labelled(l, "DEFINITION"))
        .ok_or(RecordError::MissingField(RecordField::Description))?;
    let mut parts = vec![first];
    let mut terminated = false;
    for line in lines {
        if labelled(line, "ACCESSION").is_some() {
            terminated = true;
            break;
        }
        parts.push(line);
    }
    // A DEFINITION that is never followed by ACCESSION means the record is truncated.
    if !terminated {
        return Err(RecordError::MissingField(RecordField::Description));
    }
    let description = parts.iter().flat_map(|p| p.split_whitespace()).join(" ");
    if description.is_empty() {
        return Err(RecordError::MissingField(RecordField::Description));
    }
    Ok(description)
}

pub fn parse_record(record: &str) -> Result<SequenceRecord, RecordError> {
    Ok(SequenceRecord {
        accession: extract_accession(record)?,
        length: extract_length(record)?,
        description: extract_description(record)?,
    })
}

/// Parses every record in the batch; the first malformed record aborts the whole parse.
pub fn parse_genbank_records(text: &str) -> Result<Vec<SequenceRecord>, TaxseqError> {
    let records = split_records(text)
        .into_iter()
        .enumerate()
        .map(|(index, rec)| parse_record(rec).map_err(|error| TaxseqError::Record { index, error }))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Parsed {} GenBank records", records.len());
    Ok(records)
}

/// Like parse_genbank_records(), but malformed records are skipped instead of failing the batch.
pub fn parse_genbank_records_lenient(text: &str) -> LenientParse {
    let (records, skipped): (Vec<_>, Vec<_>) = split_records(text)
        .into_iter()
        .enumerate()
        .partition_map(|(index, rec)| match parse_record(rec) {
            Ok(record) => Either::Left(record),
            Err(e) => Either::Right((index, e)),
        });
    for (index, e) in &skipped {
        warn!("Skipping record #{}: {}", index + 1, e);
    }
    LenientParse { records, skipped }
}
