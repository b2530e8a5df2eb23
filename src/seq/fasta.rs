// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use log::debug;

use crate::errors::TaxseqError;

pub const FASTA_LINE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Truncate,
    Append,
}

/// Formats a single FastA record: '>' + id (+ ' ' + description if there is one), then the
/// sequence wrapped at FASTA_LINE_WIDTH characters. An empty sequence yields just the header.
pub fn format_fasta_record(id: &str, description: &str, sequence: &str) -> String {
    let mut out = String::with_capacity(sequence.len() + sequence.len() / FASTA_LINE_WIDTH + 80);
    out.push('>');
    out.push_str(id);
    if !description.is_empty() {
        out.push(' ');
        out.push_str(description);
    }
    out.push('\n');
    // Count chars, not bytes: the sequence may contain a non-ASCII marker.
    for line in &sequence.chars().chunks(FASTA_LINE_WIDTH) {
        out.extend(line);
        out.push('\n');
    }
    out
}

pub fn write_fasta_record<P: AsRef<Path>>(
    path: P,
    id: &str,
    description: &str,
    sequence: &str,
    mode: WriteMode,
) -> Result<(), TaxseqError> {
    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Truncate => options.write(true).create(true).truncate(true),
        WriteMode::Append => options.append(true).create(true),
    };
    let file = options.open(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(format_fasta_record(id, description, sequence).as_bytes())?;
    writer.flush()?;
    debug!("Wrote FastA record '{}' to {} ({:?})", id, path.as_ref().display(), mode);
    Ok(())
}
