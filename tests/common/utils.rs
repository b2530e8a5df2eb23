// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{cell::RefCell, fs, io::Cursor};

use taxseq::{
    entrez::{RecordSource, SearchSession, TaxonQuery, TaxonSummary},
    errors::TaxseqError,
    prompt::Prompter,
};

pub const SAMPLE_GB: &str = "tests/data/sample.gb";

#[allow(dead_code)]
pub fn sample_batch() -> String {
    fs::read_to_string(SAMPLE_GB).expect("Test file not found")
}

/// Prompter fed with canned answers (one per line), writing into a Vec.
#[allow(dead_code)]
pub fn scripted_prompter(answers: &[&str]) -> Prompter<Cursor<String>, Vec<u8>> {
    let mut script = answers.join("\n");
    script.push('\n');
    Prompter::new(Cursor::new(script), Vec::new())
}

#[allow(dead_code)]
pub fn output_text(prompter: Prompter<Cursor<String>, Vec<u8>>) -> String {
    String::from_utf8(prompter.into_output()).expect("utf8 output")
}

/// Where a FakeSource should fail, if anywhere.
#[allow(dead_code)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nowhere,
    Lookup,
    Search,
    Fetch,
}

/// Stands in for NCBI: a fixed organism, hit count and batch.
#[allow(dead_code)]
pub struct FakeSource {
    pub count: u64,
    pub batch: String,
    pub fail_at: FailAt,
    // (start, max_records) of every fetch
    pub fetches: RefCell<Vec<(u64, u64)>>,
}

#[allow(dead_code)]
impl FakeSource {
    pub fn new(count: u64, batch: String) -> Self {
        FakeSource {
            count,
            batch,
            fail_at: FailAt::Nowhere,
            fetches: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_at(mut self, fail_at: FailAt) -> Self {
        self.fail_at = fail_at;
        self
    }

    fn fail(&self, at: FailAt) -> Result<(), TaxseqError> {
        if self.fail_at == at {
            Err(TaxseqError::Format(String::from("service unavailable")))
        } else {
            Ok(())
        }
    }
}

impl RecordSource for FakeSource {
    fn lookup_taxon(&self, taxid: u32) -> Result<TaxonSummary, TaxseqError> {
        self.fail(FailAt::Lookup)?;
        Ok(TaxonSummary {
            taxid,
            scientific_name: String::from("Apis mellifera"),
        })
    }

    fn search(&self, _query: &TaxonQuery) -> Result<SearchSession, TaxseqError> {
        self.fail(FailAt::Search)?;
        Ok(SearchSession {
            web_env: String::from("MCID_test"),
            query_key: String::from("1"),
            count: self.count,
        })
    }

    fn fetch_records(
        &self,
        session: &SearchSession,
        start: u64,
        max_records: u64,
    ) -> Result<String, TaxseqError> {
        self.fail(FailAt::Fetch)?;
        assert_eq!(session.web_env, "MCID_test");
        self.fetches.borrow_mut().push((start, max_records));
        Ok(self.batch.clone())
    }
}
