// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

mod common;

use std::fs;

use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, SeedableRng};

use crate::common::utils;

use taxseq::{
    pipeline::run_synthesis,
    seq::{
        fasta::WriteMode,
        nucleotide::{Nucleotide, PairedSymbols},
    },
    synth::{
        generator::{generate_sequence, NucleotideWeights},
        stats::composition,
    },
};

#[test]
fn generate_writes_fasta_and_reports_stats() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut rng = StdRng::seed_from_u64(2025);
    let mut prompter = utils::scripted_prompter(&[
        "ten",  // rejected
        "130",
        "",     // empty ID, rejected
        "seq1",
        "random test sequence",
        "   ",  // empty name, rejected
        "Ada",
        "n",
    ]);
    let report = run_synthesis(&mut prompter, &mut rng, dir.path(), PairedSymbols::default())
        .expect("synthesis");

    assert_eq!(report.path, dir.path().join("seq1.fasta"));
    assert_eq!(report.mode, WriteMode::Truncate);
    assert_eq!(report.generated.sequence.len(), 130);
    assert_eq!(report.generated.marker, "Ada");

    let content = fs::read_to_string(&report.path).expect("fasta");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], ">seq1 random test sequence");
    let body: String = lines[1..].concat();
    assert_eq!(body, report.generated.spliced());
    let body_lens: Vec<usize> = lines[1..].iter().map(|l| l.len()).collect();
    assert_eq!(body_lens, vec![60, 60, 13]);

    // Statistics ignore the marker
    let sum: f64 = report.stats.percentages().map(|(_, p)| p).sum();
    assert_abs_diff_eq!(sum, 100.0, epsilon = 1e-6);
    let expected = composition(&report.generated.sequence, PairedSymbols::default()).expect("stats");
    assert_eq!(report.stats, expected);

    let out = utils::output_text(prompter);
    assert!(out.contains("is not a valid whole number."));
    assert!(out.contains("Sequence ID cannot be empty."));
    assert!(out.contains("Name cannot be empty."));
    assert!(out.contains("Sequence statistics:"));
    assert!(out.contains("%CG: "));
}

#[test]
fn existing_file_append_or_overwrite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("s2.fasta");
    fs::write(&path, ">old\nACGT\n").expect("seed file");

    let mut rng = StdRng::seed_from_u64(1);
    let mut prompter = utils::scripted_prompter(&["10", "s2", "", "Bo", "n", "y"]);
    let report = run_synthesis(&mut prompter, &mut rng, dir.path(), PairedSymbols::default())
        .expect("append");
    assert_eq!(report.mode, WriteMode::Append);
    let content = fs::read_to_string(&path).expect("fasta");
    assert!(content.starts_with(">old\nACGT\n>s2\n"));
    // No description -> bare header
    assert_eq!(content.lines().count(), 4);

    let mut prompter = utils::scripted_prompter(&["10", "s2", "", "Bo", "n", "n"]);
    let report = run_synthesis(&mut prompter, &mut rng, dir.path(), PairedSymbols::default())
        .expect("overwrite");
    assert_eq!(report.mode, WriteMode::Truncate);
    let content = fs::read_to_string(&path).expect("fasta");
    assert!(content.starts_with(">s2\n"));
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn weighted_generation_from_prompts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut rng = StdRng::seed_from_u64(99);
    let mut prompter = utils::scripted_prompter(&[
        "5000", "gc_rich", "", "Cy", "y",
        "1",
        "0",  // rejected
        "-2", // rejected
        "9",
        "9",
        "1",
    ]);
    let report = run_synthesis(&mut prompter, &mut rng, dir.path(), PairedSymbols::default())
        .expect("synthesis");
    // Expected CG share is 18/20 = 90%
    assert!(
        report.stats.paired_content() > 85.0,
        "paired content {}",
        report.stats.paired_content()
    );
    let out = utils::output_text(prompter);
    assert_eq!(out.matches("Weight must be greater than 0.").count(), 2);
}

#[test]
fn custom_pair_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut rng = StdRng::seed_from_u64(5);
    let at = PairedSymbols(Nucleotide::A, Nucleotide::T);
    let mut prompter = utils::scripted_prompter(&["50", "at", "", "Di", "n"]);
    let report = run_synthesis(&mut prompter, &mut rng, dir.path(), at).expect("synthesis");
    let expected =
        report.stats.percentage(Nucleotide::A) + report.stats.percentage(Nucleotide::T);
    assert_abs_diff_eq!(report.stats.paired_content(), expected, epsilon = 1e-9);
    assert!(utils::output_text(prompter).contains("%AT: "));
}

#[test]
fn percentages_sum_to_100_for_many_lengths() {
    let mut rng = StdRng::seed_from_u64(12);
    for len in [1, 2, 3, 7, 60, 61, 999, 4096] {
        let seq = generate_sequence(&mut rng, len, None);
        let stats = composition(&seq, PairedSymbols::default()).expect("stats");
        let sum: f64 = stats.percentages().map(|(_, p)| p).sum();
        assert_abs_diff_eq!(sum, 100.0, epsilon = 1e-6);
        let pair = stats.percentage(Nucleotide::C) + stats.percentage(Nucleotide::G);
        assert_abs_diff_eq!(stats.paired_content(), pair, epsilon = 1e-9);
    }
}

#[test]
fn equal_weights_match_uniform_distribution() {
    const N: usize = 200_000;
    let equal = NucleotideWeights::new([1.0, 1.0, 1.0, 1.0]).expect("weights");
    let mut rng = StdRng::seed_from_u64(31337);
    let weighted = generate_sequence(&mut rng, N, Some(&equal));
    let uniform = generate_sequence(&mut rng, N, None);
    let w = composition(&weighted, PairedSymbols::default()).expect("stats");
    let u = composition(&uniform, PairedSymbols::default()).expect("stats");
    for n in Nucleotide::ALL {
        // Standard deviation of each share is ~0.1 percentage points at this size.
        assert_abs_diff_eq!(w.percentage(n), 25.0, epsilon = 0.75);
        assert_abs_diff_eq!(u.percentage(n), 25.0, epsilon = 0.75);
        assert_abs_diff_eq!(w.percentage(n), u.percentage(n), epsilon = 1.0);
    }
}
