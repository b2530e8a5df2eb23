// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::{fs, io::Write, path::Path};

use log::{info, warn};

use crate::errors::TaxseqError;
use crate::seq::record::SequenceRecord;

pub const REPORT_FILE_NAME: &str = "report.csv";

/// Serializes `records` to CSV (header: accession_number,seq_length,seq_description) into any
/// writer.
pub fn write_records<W: Write>(records: &[SequenceRecord], writer: W) -> Result<(), TaxseqError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the CSV report. With no records nothing is written (not even a header), a warning is
/// logged and Ok(false) is returned; reporting that to the user is up to the caller.
pub fn write_csv<P: AsRef<Path>>(records: &[SequenceRecord], path: P) -> Result<bool, TaxseqError> {
    let path = path.as_ref();
    if records.is_empty() {
        warn!("No records to save; not writing {}", path.display());
        return Ok(false);
    }
    let file = fs::File::create(path)?;
    write_records(records, file)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(true)
}

/// Saves the raw fetched batch, unchanged.
pub fn write_snapshot<P: AsRef<Path>>(text: &str, path: P) -> Result<(), TaxseqError> {
    fs::write(path.as_ref(), text)?;
    info!("Wrote {} bytes of raw records to {}", text.len(), path.as_ref().display());
    Ok(())
}
