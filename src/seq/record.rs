// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use serde::Serialize;

// One GenBank entry, reduced to the three fields that end up in the report. Field names are those
// of the CSV columns.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceRecord {
    #[serde(rename = "accession_number")]
    pub accession: String,
    #[serde(rename = "seq_length")]
    pub length: u64,
    #[serde(rename = "seq_description")]
    pub description: String,
}
