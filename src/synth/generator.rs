// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::SliceRandom,
    Rng,
};

use crate::prompt::InputError;
use crate::seq::nucleotide::Nucleotide;

/// Relative (unnormalized) probabilities for A, C, G and T, in that order. All four must be
/// strictly positive; this is checked once, here, so that sampling cannot fail.
#[derive(Debug, Clone)]
pub struct NucleotideWeights {
    weights: [f64; 4],
    sampler: WeightedIndex<f64>,
}

impl NucleotideWeights {
    pub fn new(weights: [f64; 4]) -> Result<Self, InputError> {
        if let Some(bad) = weights.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(InputError::NonPositiveWeight(*bad));
        }
        let sampler = WeightedIndex::new(weights)
            .map_err(|_| InputError::NonPositiveWeight(weights.iter().sum()))?;
        Ok(NucleotideWeights { weights, sampler })
    }

    pub fn weight(&self, n: Nucleotide) -> f64 {
        self.weights[n.index()]
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Nucleotide {
        Nucleotide::ALL[self.sampler.sample(rng)]
    }
}

/// Draws `length` nucleotides independently, using `weights` if given, uniformly otherwise.
pub fn generate_sequence<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    weights: Option<&NucleotideWeights>,
) -> String {
    match weights {
        Some(w) => (0..length).map(|_| w.sample(rng).as_char()).collect(),
        None => (0..length)
            .filter_map(|_| Nucleotide::ALL.choose(rng).map(|n| n.as_char()))
            .collect(),
    }
}

/// A generated sequence together with the marker spliced into it. `sequence` is kept as drawn, so
/// that statistics never see the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSequence {
    pub sequence: String,
    pub marker: String,
    pub splice_pos: usize,
}

impl GeneratedSequence {
    pub fn spliced(&self) -> String {
        let mut out = String::with_capacity(self.sequence.len() + self.marker.len());
        out.push_str(&self.sequence[..self.splice_pos]);
        out.push_str(&self.marker);
        out.push_str(&self.sequence[self.splice_pos..]);
        out
    }
}

/// Inserts `marker` at a uniformly random position in [0, len] (both ends included).
pub fn inject_marker<R: Rng + ?Sized>(
    rng: &mut R,
    sequence: String,
    marker: &str,
) -> GeneratedSequence {
    // Sequences are pure ASCII, so byte and char positions coincide.
    let splice_pos = rng.gen_range(0..=sequence.len());
    GeneratedSequence {
        sequence,
        marker: marker.to_string(),
        splice_pos,
    }
}
