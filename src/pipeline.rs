// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

// The two pipelines, each a straight sequence of steps. Console output goes through the Prompter
// (or a plain writer), so that both can be driven from tests.

use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use log::{error, info, warn};
use rand::Rng;

use crate::{
    chart::{length_summary, save_length_chart, CHART_FILE_NAME},
    config::{ChartConfig, EntrezConfig},
    entrez::{RecordSource, TaxonQuery},
    errors::TaxseqError,
    prompt::{
        parse_bound, parse_length, parse_max_bound, parse_non_empty, parse_sequence_id,
        parse_taxid, parse_weight, Prompter,
    },
    report::{write_csv, write_snapshot, REPORT_FILE_NAME},
    seq::{
        fasta::{write_fasta_record, WriteMode},
        genbank::{parse_genbank_records, parse_genbank_records_lenient},
        nucleotide::{Nucleotide, PairedSymbols},
        record::SequenceRecord,
    },
    synth::{
        generator::{generate_sequence, inject_marker, GeneratedSequence, NucleotideWeights},
        stats::{composition, CompositionStats},
    },
};

// Retrieval

#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    pub out_dir: PathBuf,
    pub sample_size: u64,
    pub lenient: bool,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        RetrievalOptions {
            out_dir: PathBuf::from("."),
            sample_size: 5,
            lenient: false,
        }
    }
}

#[derive(Debug)]
pub enum RetrievalOutcome {
    /// Lookup, search or fetch failed; nothing was written.
    UpstreamError(TaxseqError),
    NoHits,
    /// The batch was fetched (and snapshotted) but held no parsable record.
    NoRecords,
    Completed(Vec<SequenceRecord>),
}

/// Asks for whatever the config doesn't already provide (email, API key), then for the search
/// parameters.
pub fn collect_retrieval_input<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    base: &EntrezConfig,
) -> Result<(EntrezConfig, TaxonQuery), TaxseqError> {
    let mut config = base.clone();
    if config.email.is_none() {
        let email = prompter.ask_until("Enter your email address for NCBI: ", |s| {
            parse_non_empty(s, "Email")
        })?;
        config.email = Some(email);
    } else {
        info!("Using email from config file");
    }
    if config.api_key.is_none() {
        let key = prompter.ask("Enter your NCBI API key (leave blank for none): ")?;
        let key = key.trim();
        if !key.is_empty() {
            config.api_key = Some(key.to_string());
        }
    }
    let taxid = prompter.ask_until("Enter taxonomic ID (taxid) of the organism: ", parse_taxid)?;
    let min_len = prompter.ask_until("Enter min sequence length: ", parse_bound)?;
    let max_len = prompter.ask_until("Enter max sequence length: ", |s| {
        parse_max_bound(s, min_len)
    })?;
    Ok((
        config,
        TaxonQuery {
            taxid,
            min_len,
            max_len,
        },
    ))
}

fn upstream_error<W: Write>(
    out: &mut W,
    context: String,
    e: TaxseqError,
) -> Result<RetrievalOutcome, TaxseqError> {
    error!("{}: {}", context, e);
    writeln!(out, "{}: {}", context, e)?;
    Ok(RetrievalOutcome::UpstreamError(e))
}

/// Search, fetch a sample, parse it, then write the raw snapshot, CSV report and chart into
/// `options.out_dir`. Upstream failures end the run quietly (reported, not returned as Err);
/// a malformed record does not, unless `options.lenient` is set.
pub fn run_retrieval<S: RecordSource, W: Write>(
    source: &S,
    query: &TaxonQuery,
    chart_config: &ChartConfig,
    options: &RetrievalOptions,
    out: &mut W,
) -> Result<RetrievalOutcome, TaxseqError> {
    writeln!(out, "Searching for records with taxID: {}", query.taxid)?;
    let taxon = match source.lookup_taxon(query.taxid) {
        Ok(t) => t,
        Err(e) => return upstream_error(out, format!("Error searching TaxID {}", query.taxid), e),
    };
    writeln!(
        out,
        "Organism: {} (TaxID: {})",
        taxon.scientific_name, taxon.taxid
    )?;

    let session = match source.search(query) {
        Ok(s) => s,
        Err(e) => return upstream_error(out, format!("Error searching TaxID {}", query.taxid), e),
    };
    if session.count == 0 {
        writeln!(out, "No records found for {}", taxon.scientific_name)?;
        writeln!(out, "No records found. Exiting.")?;
        return Ok(RetrievalOutcome::NoHits);
    }
    writeln!(out, "Found {} records", session.count)?;

    writeln!(out, "\nFetching sample records...")?;
    let batch = match source.fetch_records(&session, 0, options.sample_size) {
        Ok(text) => text,
        Err(e) => return upstream_error(out, String::from("Error fetching records"), e),
    };

    // Saved before parsing, so that a batch that fails to parse can still be inspected.
    let snapshot_path = options
        .out_dir
        .join(format!("taxid_{}_sample.gb", query.taxid));
    write_snapshot(&batch, &snapshot_path)?;

    let records = if options.lenient {
        let parsed = parse_genbank_records_lenient(&batch);
        if !parsed.skipped.is_empty() {
            writeln!(out, "Skipped {} malformed record(s)", parsed.skipped.len())?;
        }
        parsed.records
    } else {
        parse_genbank_records(&batch)?
    };

    let report_path = options.out_dir.join(REPORT_FILE_NAME);
    if !write_csv(&records, &report_path)? {
        writeln!(out, "No records to save.")?;
        writeln!(out, "Saved sample records to {}", snapshot_path.display())?;
        return Ok(RetrievalOutcome::NoRecords);
    }
    writeln!(
        out,
        "Saved {} records to {}",
        records.len(),
        report_path.display()
    )?;

    let chart_path = options.out_dir.join(CHART_FILE_NAME);
    save_length_chart(&records, chart_config, &chart_path)?;
    writeln!(out, "Graph saved as {}", chart_path.display())?;
    writeln!(out, "\nRecords summary (by length desc):")?;
    write!(out, "{}", length_summary(&records))?;

    writeln!(out, "Saved sample records to {}", snapshot_path.display())?;
    Ok(RetrievalOutcome::Completed(records))
}

// Synthesis

#[derive(Debug, Clone)]
pub struct SynthesisInput {
    pub length: usize,
    pub id: String,
    pub description: String,
    pub author: String,
    pub weights: Option<NucleotideWeights>,
}

#[derive(Debug, Clone)]
pub struct SynthesisReport {
    pub path: PathBuf,
    pub mode: WriteMode,
    pub generated: GeneratedSequence,
    pub stats: CompositionStats,
}

/// Optional per-nucleotide weights; None means uniform.
pub fn collect_weights<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Option<NucleotideWeights>, TaxseqError> {
    if !prompter.ask_yes_no("Do you want to set nucleotide weights? (y/n): ")? {
        return Ok(None);
    }
    prompter.say("Enter a weight for each nucleotide (numbers greater than 0):")?;
    let mut weights = [0.0; 4];
    for n in Nucleotide::ALL {
        weights[n.index()] = prompter.ask_until(&format!("Weight for {}: ", n), parse_weight)?;
    }
    let weights =
        NucleotideWeights::new(weights).map_err(|e| TaxseqError::Format(e.to_string()))?;
    Ok(Some(weights))
}

pub fn collect_synthesis_input<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<SynthesisInput, TaxseqError> {
    let length = prompter.ask_until("Enter sequence length: ", parse_length)?;
    let id = prompter.ask_until("Enter sequence ID: ", parse_sequence_id)?;
    let description = prompter.ask("Enter sequence description: ")?.trim().to_string();
    let author = prompter.ask_until("Enter your name: ", |s| parse_non_empty(s, "Name"))?;
    let weights = collect_weights(prompter)?;
    Ok(SynthesisInput {
        length,
        id,
        description,
        author,
        weights,
    })
}

fn choose_write_mode<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    path: &Path,
) -> Result<WriteMode, TaxseqError> {
    if !path.exists() {
        return Ok(WriteMode::Truncate);
    }
    let append = prompter.ask_yes_no(&format!(
        "File {} already exists. Append the sequence to it? (y/n): ",
        path.display()
    ))?;
    Ok(if append {
        WriteMode::Append
    } else {
        WriteMode::Truncate
    })
}

/// Prompts for the parameters, generates the sequence, writes <id>.fasta into `out_dir` and
/// prints the composition of the generated sequence (author name excluded).
pub fn run_synthesis<R: BufRead, W: Write, G: Rng + ?Sized>(
    prompter: &mut Prompter<R, W>,
    rng: &mut G,
    out_dir: &Path,
    paired: PairedSymbols,
) -> Result<SynthesisReport, TaxseqError> {
    let input = collect_synthesis_input(prompter)?;
    let sequence = generate_sequence(rng, input.length, input.weights.as_ref());
    let generated = inject_marker(rng, sequence, &input.author);
    info!(
        "Generated {} nt, marker at {}",
        generated.sequence.len(),
        generated.splice_pos
    );
    let stats = composition(&generated.sequence, paired)?;

    let path = out_dir.join(format!("{}.fasta", input.id));
    let mode = choose_write_mode(prompter, &path)?;
    if mode == WriteMode::Truncate && path.exists() {
        warn!("Overwriting {}", path.display());
    }
    write_fasta_record(
        &path,
        &input.id,
        &input.description,
        &generated.spliced(),
        mode,
    )?;

    prompter.say(&format!("\nSequence saved to file {}", path.display()))?;
    prompter.say("Sequence statistics:")?;
    prompter.say(&stats.to_string())?;

    Ok(SynthesisReport {
        path,
        mode,
        generated,
        stats,
    })
}
