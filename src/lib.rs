pub mod chart;
pub mod config;
pub mod entrez;
pub mod errors;
pub mod pipeline;
pub mod prompt;
pub mod report;
mod runner;
pub mod seq;
pub mod synth;

use crate::errors::TaxseqError;

pub fn run() -> Result<(), TaxseqError> {
    runner::run()
}
