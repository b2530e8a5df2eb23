// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

mod common;

use std::fs;

use crate::common::utils::{self, FailAt, FakeSource};

use taxseq::{
    config::{ChartConfig, EntrezConfig},
    entrez::TaxonQuery,
    errors::TaxseqError,
    pipeline::{collect_retrieval_input, run_retrieval, RetrievalOptions, RetrievalOutcome},
};

fn query() -> TaxonQuery {
    TaxonQuery {
        taxid: 7460,
        min_len: 100,
        max_len: 2000,
    }
}

fn options(dir: &tempfile::TempDir) -> RetrievalOptions {
    RetrievalOptions {
        out_dir: dir.path().to_path_buf(),
        ..RetrievalOptions::default()
    }
}

#[test]
fn full_run_writes_report_chart_and_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(1234, utils::sample_batch());
    let mut out = Vec::new();
    let outcome = run_retrieval(
        &source,
        &query(),
        &ChartConfig::default(),
        &options(&dir),
        &mut out,
    )
    .expect("retrieval");

    let records = match outcome {
        RetrievalOutcome::Completed(records) => records,
        other => panic!("unexpected outcome {:?}", other),
    };
    assert_eq!(records.len(), 3);
    // Default sample size
    assert_eq!(*source.fetches.borrow(), vec![(0, 5)]);

    let csv = fs::read_to_string(dir.path().join("report.csv")).expect("report");
    insta::assert_snapshot!(csv, @r#"
    accession_number,seq_length,seq_description
    PP412345,658,"Apis mellifera isolate AM-PL-07 cytochrome c oxidase subunit I (COX1) gene, partial cds; mitochondrial."
    OQ998877,1482,"Apis mellifera carnica 16S ribosomal RNA gene, partial sequence; mitochondrial."
    MN654321,402,Apis mellifera microsatellite A113 sequence.
    "#);

    let svg = fs::read_to_string(dir.path().join("graph.svg")).expect("chart");
    assert_eq!(svg.matches("<circle").count(), 3);

    let snapshot = fs::read_to_string(dir.path().join("taxid_7460_sample.gb")).expect("snapshot");
    assert_eq!(snapshot, utils::sample_batch());

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Organism: Apis mellifera (TaxID: 7460)"));
    assert!(text.contains("Found 1234 records"));
    let longest = text.find("OQ998877").expect("summary row");
    let shortest = text.find("MN654321").expect("summary row");
    assert!(longest < shortest);
}

#[test]
fn zero_hits_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(0, String::new());
    let mut out = Vec::new();
    let outcome = run_retrieval(
        &source,
        &query(),
        &ChartConfig::default(),
        &options(&dir),
        &mut out,
    )
    .expect("retrieval");
    assert!(matches!(outcome, RetrievalOutcome::NoHits));
    assert!(source.fetches.borrow().is_empty());
    assert_eq!(fs::read_dir(dir.path()).expect("dir").count(), 0);
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("No records found for Apis mellifera"));
}

#[test]
fn upstream_failures_are_reported_not_raised() {
    for fail_at in [FailAt::Lookup, FailAt::Search, FailAt::Fetch] {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = FakeSource::new(10, utils::sample_batch()).failing_at(fail_at);
        let mut out = Vec::new();
        let outcome = run_retrieval(
            &source,
            &query(),
            &ChartConfig::default(),
            &options(&dir),
            &mut out,
        )
        .expect("upstream errors are not fatal");
        assert!(matches!(outcome, RetrievalOutcome::UpstreamError(_)));
        assert!(!dir.path().join("report.csv").exists());
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("service unavailable"));
    }
}

#[test]
fn malformed_record_aborts_strict_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let batch = format!(
        "{}\nLOCUS       BROKEN\nDEFINITION  no length.\nACCESSION   XX000001\n//\n",
        utils::sample_batch().trim_end()
    );
    let source = FakeSource::new(4, batch);
    let mut out = Vec::new();
    let result = run_retrieval(
        &source,
        &query(),
        &ChartConfig::default(),
        &options(&dir),
        &mut out,
    );
    match result {
        Err(TaxseqError::Record { index, .. }) => assert_eq!(index, 3),
        other => panic!("expected record error, got {:?}", other),
    }
    assert!(!dir.path().join("report.csv").exists());
    // The raw batch is kept for inspection
    assert!(dir.path().join("taxid_7460_sample.gb").exists());
}

#[test]
fn lenient_run_skips_malformed_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let batch = format!(
        "LOCUS       BROKEN\nDEFINITION  no length.\nACCESSION   XX000001\n//\n{}",
        utils::sample_batch()
    );
    let source = FakeSource::new(4, batch);
    let mut out = Vec::new();
    let opts = RetrievalOptions {
        lenient: true,
        ..options(&dir)
    };
    let outcome = run_retrieval(&source, &query(), &ChartConfig::default(), &opts, &mut out)
        .expect("retrieval");
    match outcome {
        RetrievalOutcome::Completed(records) => assert_eq!(records.len(), 3),
        other => panic!("unexpected outcome {:?}", other),
    }
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Skipped 1 malformed record(s)"));
}

#[test]
fn empty_batch_saves_no_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(2, String::from("\n"));
    let mut out = Vec::new();
    let outcome = run_retrieval(
        &source,
        &query(),
        &ChartConfig::default(),
        &options(&dir),
        &mut out,
    )
    .expect("retrieval");
    assert!(matches!(outcome, RetrievalOutcome::NoRecords));
    assert!(!dir.path().join("report.csv").exists());
    assert!(!dir.path().join("graph.svg").exists());
    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text.matches("No records to save.").count(), 1);
}

#[test]
fn terminator_trailing_accession_line_is_parsed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let batch = String::from(
        "LOCUS       AB123   120 bp    DNA\nACCESSION   AB123\nDEFINITION  desc text\nACCESSION   AB123 //\n",
    );
    let source = FakeSource::new(1, batch);
    let mut out = Vec::new();
    let outcome = run_retrieval(
        &source,
        &query(),
        &ChartConfig::default(),
        &options(&dir),
        &mut out,
    )
    .expect("retrieval");
    match outcome {
        RetrievalOutcome::Completed(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].accession, "AB123");
            assert_eq!(records[0].description, "desc text");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(dir.path().join("report.csv").exists());
}

#[test]
fn retrieval_input_reprompts_and_respects_config() {
    let mut prompter = utils::scripted_prompter(&[
        "",               // email, rejected
        "me@example.org", // email
        "",               // no API key
        "bee",            // taxid, rejected
        "7460",
        "500",
        "100", // max below min, rejected
        "2000",
    ]);
    let (config, query) =
        collect_retrieval_input(&mut prompter, &EntrezConfig::default()).expect("input");
    assert_eq!(config.email.as_deref(), Some("me@example.org"));
    assert_eq!(config.api_key, None);
    assert_eq!(
        query,
        TaxonQuery {
            taxid: 7460,
            min_len: 500,
            max_len: 2000
        }
    );
    let text = utils::output_text(prompter);
    assert!(text.contains("Email cannot be empty."));
    assert!(text.contains("Maximum length must be at least the minimum (500)."));

    // Credentials from the config file are not asked for.
    let base = EntrezConfig {
        email: Some(String::from("cfg@example.org")),
        api_key: Some(String::from("k3y")),
        ..EntrezConfig::default()
    };
    let mut prompter = utils::scripted_prompter(&["9606", "0", "10"]);
    let (config, query) = collect_retrieval_input(&mut prompter, &base).expect("input");
    assert_eq!(config, base);
    assert_eq!(query.taxid, 9606);
    assert!(!utils::output_text(prompter).contains("email"));
}
