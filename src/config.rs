// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

// Settings read from an optional JSON file (.taxseqconfig). Every key is optional; a missing or
// invalid value falls back to its default, so a partly broken file still yields a usable config.

use std::{fs, path::{Path, PathBuf}};

use hex_color::HexColor;
use log::warn;
use serde_json::Value;

use crate::errors::TaxseqError;
use crate::seq::nucleotide::PairedSymbols;

pub const CONFIG_FILE_NAME: &str = ".taxseqconfig";
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_TOOL: &str = "taxseq";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LINE_COLOR: HexColor = HexColor::rgb(0x1f, 0x77, 0xb4);

#[derive(Debug, Clone, PartialEq)]
pub struct EntrezConfig {
    pub email: Option<String>,
    pub api_key: Option<String>,
    pub tool: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        EntrezConfig {
            email: None,
            api_key: None,
            tool: String::from(DEFAULT_TOOL),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EntrezConfig {
    pub fn from_value(value: &Value) -> Self {
        let defaults = EntrezConfig::default();
        EntrezConfig {
            email: non_empty_str(value, "email"),
            api_key: non_empty_str(value, "api_key"),
            tool: non_empty_str(value, "tool").unwrap_or(defaults.tool),
            base_url: non_empty_str(value, "base_url")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout_secs: value
                .get("timeout_secs")
                .and_then(Value::as_u64)
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub line_color: HexColor,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 800,
            height: 500,
            line_color: DEFAULT_LINE_COLOR,
        }
    }
}

impl ChartConfig {
    pub fn from_value(value: &Value) -> Self {
        let defaults = ChartConfig::default();
        // Anything smaller can't hold the margins and labels.
        let dimension = |key: &str, default: u32| {
            value
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v >= 200)
                .unwrap_or(default)
        };
        ChartConfig {
            width: dimension("chart_width", defaults.width),
            height: dimension("chart_height", defaults.height),
            line_color: value
                .get("line_color")
                .and_then(Value::as_str)
                .and_then(|s| HexColor::parse(s).ok())
                .unwrap_or(defaults.line_color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaxseqConfig {
    pub entrez: EntrezConfig,
    pub chart: ChartConfig,
    pub paired_symbols: PairedSymbols,
}

impl TaxseqConfig {
    pub fn from_value(value: &Value) -> Self {
        let paired_symbols = match value.get("paired_symbols").and_then(Value::as_str) {
            Some(s) => PairedSymbols::parse(s).unwrap_or_else(|| {
                warn!("Ignoring invalid paired_symbols '{}'", s);
                PairedSymbols::default()
            }),
            None => PairedSymbols::default(),
        };
        TaxseqConfig {
            entrez: EntrezConfig::from_value(value),
            chart: ChartConfig::from_value(value),
            paired_symbols,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, TaxseqError> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        if !value.is_object() {
            return Err(TaxseqError::Format(format!(
                "{}: expected a JSON object",
                path.display()
            )));
        }
        Ok(TaxseqConfig::from_value(&value))
    }
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Looks for .taxseqconfig in $HOME, then in the current directory.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// The config from find_config(), or defaults if there is none or it can't be read.
pub fn load_config() -> TaxseqConfig {
    match find_config() {
        Some(path) => match TaxseqConfig::from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Error reading {}: {}; using defaults", path.display(), e);
                TaxseqConfig::default()
            }
        },
        None => TaxseqConfig::default(),
    }
}
