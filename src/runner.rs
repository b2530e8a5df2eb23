// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::load_config;
use crate::entrez::{EntrezClient, MAX_BATCH};
use crate::errors::TaxseqError;
use crate::pipeline::{
    collect_retrieval_input, run_retrieval, run_synthesis, RetrievalOptions,
};
use crate::prompt::Prompter;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a sample of GenBank records for a taxon; write a CSV report and a length chart
    Fetch {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Number of records to fetch (at most 500)
        #[arg(short, long, default_value_t = 5,
            value_parser = clap::value_parser!(u64).range(1..=MAX_BATCH))]
        sample_size: u64,

        /// Skip malformed records instead of aborting
        #[arg(short, long)]
        lenient: bool,
    },
    /// Generate a random DNA sequence, save it as FastA and print its composition
    Generate {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// RNG seed, for reproducible sequences
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run() -> Result<(), TaxseqError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let config = load_config();
    debug!("Config: {:?}", config);

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    match cli.command {
        Command::Fetch {
            out_dir,
            sample_size,
            lenient,
        } => {
            fs::create_dir_all(&out_dir)?;
            let (entrez_config, query) = collect_retrieval_input(&mut prompter, &config.entrez)?;
            let client = EntrezClient::new(entrez_config)?;
            let options = RetrievalOptions {
                out_dir,
                sample_size,
                lenient,
            };
            let mut out = io::stdout();
            let outcome = run_retrieval(&client, &query, &config.chart, &options, &mut out)?;
            out.flush()?;
            debug!("Retrieval outcome: {:?}", outcome);
        }
        Command::Generate { out_dir, seed } => {
            fs::create_dir_all(&out_dir)?;
            let report = match seed {
                Some(seed) => {
                    info!("Using RNG seed {}", seed);
                    let mut rng = StdRng::seed_from_u64(seed);
                    run_synthesis(&mut prompter, &mut rng, &out_dir, config.paired_symbols)?
                }
                None => {
                    let mut rng = rand::thread_rng();
                    run_synthesis(&mut prompter, &mut rng, &out_dir, config.paired_symbols)?
                }
            };
            debug!("Wrote {} ({:?})", report.path.display(), report.mode);
        }
    }

    Ok(())
}
