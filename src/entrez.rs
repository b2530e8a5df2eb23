// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

//! Blocking client for the NCBI E-utilities.
//!
//! Three requests are used:
//!
//! | Call | Endpoint | Returns |
//! |------|----------|---------|
//! | [`EntrezClient::lookup_taxon`] | `esummary.fcgi?db=taxonomy` (JSON) | scientific name |
//! | [`EntrezClient::search`] | `esearch.fcgi?db=nucleotide&usehistory=y` (JSON) | WebEnv, query_key, count |
//! | [`EntrezClient::fetch_records`] | `efetch.fcgi?db=nucleotide&rettype=gb` (text) | GenBank flat file |
//!
//! The search result stays on NCBI's history server; the returned [`SearchSession`] is the only
//! handle to it, so there is no way to fetch without having searched first.

use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::EntrezConfig;
use crate::errors::TaxseqError;

/// Upper bound on records per efetch request.
pub const MAX_BATCH: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonQuery {
    pub taxid: u32,
    pub min_len: u64,
    pub max_len: u64,
}

impl TaxonQuery {
    /// Entrez search term: organism (including sub-taxa) and inclusive length range.
    pub fn term(&self) -> String {
        format!(
            "txid{}[Organism] AND {}:{}[SLEN]",
            self.taxid, self.min_len, self.max_len
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonSummary {
    pub taxid: u32,
    pub scientific_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub web_env: String,
    pub query_key: String,
    pub count: u64,
}

/// The three calls the retrieval pipeline needs. EntrezClient is the real implementation.
pub trait RecordSource {
    fn lookup_taxon(&self, taxid: u32) -> Result<TaxonSummary, TaxseqError>;
    fn search(&self, query: &TaxonQuery) -> Result<SearchSession, TaxseqError>;
    fn fetch_records(
        &self,
        session: &SearchSession,
        start: u64,
        max_records: u64,
    ) -> Result<String, TaxseqError>;
}

pub struct EntrezClient {
    config: EntrezConfig,
    http: Client,
}

impl EntrezClient {
    pub fn new(config: EntrezConfig) -> Result<Self, TaxseqError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(EntrezClient { config, http })
    }

    // Parameters NCBI wants on every request.
    fn request_params(&self, specific: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = specific.to_vec();
        params.push(("tool", self.config.tool.clone()));
        if let Some(email) = &self.config.email {
            params.push(("email", email.clone()));
        }
        if let Some(key) = &self.config.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url, endpoint)
    }

    fn get(
        &self,
        endpoint: &str,
        specific: &[(&'static str, String)],
    ) -> Result<reqwest::blocking::Response, TaxseqError> {
        let url = self.endpoint_url(endpoint);
        debug!("GET {} {:?}", url, specific);
        let response = self
            .http
            .get(&url)
            .query(&self.request_params(specific))
            .send()?
            .error_for_status()?;
        Ok(response)
    }

    fn get_json(
        &self,
        endpoint: &str,
        specific: &[(&'static str, String)],
    ) -> Result<Value, TaxseqError> {
        Ok(self.get(endpoint, specific)?.json::<Value>()?)
    }
}

impl RecordSource for EntrezClient {
    fn lookup_taxon(&self, taxid: u32) -> Result<TaxonSummary, TaxseqError> {
        let json = self.get_json(
            "esummary.fcgi",
            &[
                ("db", String::from("taxonomy")),
                ("id", taxid.to_string()),
                ("retmode", String::from("json")),
            ],
        )?;
        let summary = parse_taxon_summary(&json, taxid)?;
        info!("TaxID {} is {}", taxid, summary.scientific_name);
        Ok(summary)
    }

    fn search(&self, query: &TaxonQuery) -> Result<SearchSession, TaxseqError> {
        let json = self.get_json(
            "esearch.fcgi",
            &[
                ("db", String::from("nucleotide")),
                ("term", query.term()),
                ("usehistory", String::from("y")),
                ("retmode", String::from("json")),
            ],
        )?;
        let session = parse_search_result(&json)?;
        info!("Search '{}' matched {} records", query.term(), session.count);
        Ok(session)
    }

    fn fetch_records(
        &self,
        session: &SearchSession,
        start: u64,
        max_records: u64,
    ) -> Result<String, TaxseqError> {
        let batch_size = max_records.min(MAX_BATCH);
        let text = self
            .get(
                "efetch.fcgi",
                &[
                    ("db", String::from("nucleotide")),
                    ("rettype", String::from("gb")),
                    ("retmode", String::from("text")),
                    ("retstart", start.to_string()),
                    ("retmax", batch_size.to_string()),
                    ("WebEnv", session.web_env.clone()),
                    ("query_key", session.query_key.clone()),
                ],
            )?
            .text()?;
        debug!("efetch returned {} bytes", text.len());
        Ok(text)
    }
}

/// Extracts the scientific name from an esummary (db=taxonomy, retmode=json) payload.
pub fn parse_taxon_summary(json: &Value, taxid: u32) -> Result<TaxonSummary, TaxseqError> {
    if let Some(err) = json.get("error").and_then(Value::as_str) {
        return Err(TaxseqError::Format(format!("esummary error: {}", err)));
    }
    let entry = json
        .get("result")
        .and_then(|r| r.get(taxid.to_string()))
        .ok_or_else(|| TaxseqError::Format(format!("TaxID {} not found in taxonomy", taxid)))?;
    if let Some(err) = entry.get("error").and_then(Value::as_str) {
        return Err(TaxseqError::Format(format!("TaxID {}: {}", taxid, err)));
    }
    let scientific_name = entry
        .get("scientificname")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            TaxseqError::Format(format!("No scientific name for TaxID {}", taxid))
        })?;
    Ok(TaxonSummary {
        taxid,
        scientific_name: scientific_name.to_string(),
    })
}

/// Reads count, WebEnv and query_key from an esearch (retmode=json, usehistory=y) payload. NCBI
/// reports counts as strings.
pub fn parse_search_result(json: &Value) -> Result<SearchSession, TaxseqError> {
    let result = json
        .get("esearchresult")
        .ok_or_else(|| TaxseqError::Format(String::from("esearch returned an invalid payload")))?;
    if let Some(err) = result.get("ERROR").and_then(Value::as_str) {
        return Err(TaxseqError::Format(format!("esearch error: {}", err)));
    }
    let count = match result.get("count") {
        Some(Value::String(s)) => s.parse::<u64>().ok(),
        Some(v) => v.as_u64(),
        None => None,
    }
    .ok_or_else(|| TaxseqError::Format(String::from("esearch payload has no valid count")))?;
    let text_field = |key: &str| {
        result
            .get(key)
            .and_then(Value::as_str)
            .map(String::from)
    };
    let (web_env, query_key) = match (text_field("webenv"), text_field("querykey")) {
        (Some(w), Some(q)) => (w, q),
        // Nothing to fetch anyway
        _ if count == 0 => (String::new(), String::new()),
        _ => {
            return Err(TaxseqError::Format(String::from(
                "esearch payload lacks WebEnv/query_key (was usehistory=y sent?)",
            )))
        }
    };
    Ok(SearchSession {
        web_env,
        query_key,
        count,
    })
}
