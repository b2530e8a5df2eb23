// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fmt;

use crate::errors::TaxseqError;
use crate::seq::nucleotide::{Nucleotide, PairedSymbols};

#[derive(Debug, Clone, PartialEq)]
pub struct CompositionStats {
    // Indexed like Nucleotide::ALL.
    percentages: [f64; 4],
    paired: PairedSymbols,
    paired_content: f64,
}

impl CompositionStats {
    pub fn percentage(&self, n: Nucleotide) -> f64 {
        self.percentages[n.index()]
    }

    pub fn percentages(&self) -> impl Iterator<Item = (Nucleotide, f64)> + '_ {
        Nucleotide::ALL.iter().map(move |n| (*n, self.percentage(*n)))
    }

    pub fn paired(&self) -> PairedSymbols {
        self.paired
    }

    pub fn paired_content(&self) -> f64 {
        self.paired_content
    }
}

/// Per-nucleotide percentages and paired (by default GC) content of `sequence`. Fails on an empty
/// sequence and on any symbol outside ACGT (case-insensitive).
pub fn composition(sequence: &str, paired: PairedSymbols) -> Result<CompositionStats, TaxseqError> {
    let mut counts = [0usize; 4];
    let mut total = 0usize;
    for c in sequence.chars() {
        let n = Nucleotide::from_char(c)
            .ok_or_else(|| TaxseqError::Format(format!("Unexpected symbol '{}' in sequence", c)))?;
        counts[n.index()] += 1;
        total += 1;
    }
    if total == 0 {
        return Err(TaxseqError::EmptySequence);
    }
    let pct = |count: usize| 100.0 * count as f64 / total as f64;
    let percentages = counts.map(pct);
    let paired_content = pct(counts[paired.0.index()] + counts[paired.1.index()]);
    Ok(CompositionStats {
        percentages,
        paired,
        paired_content,
    })
}

impl fmt::Display for CompositionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, pct) in self.percentages() {
            writeln!(f, "{}: {:.1}%", n, pct)?;
        }
        write!(f, "%{}: {:.1}", self.paired, self.paired_content)
    }
}
