// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{fs, path::Path};

use hex_color::HexColor;
use itertools::Itertools;
use log::info;

use crate::{config::ChartConfig, errors::TaxseqError, seq::record::SequenceRecord};

pub const CHART_FILE_NAME: &str = "graph.svg";

const FONT_SIZE: u32 = 12;
const TITLE_FONT_SIZE: u32 = 16;
const MARKER_RADIUS: u32 = 4;
const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 50;
// Room for the rotated accession labels
const MARGIN_BOTTOM: u32 = 120;
const Y_TICKS: u64 = 5;

/// Records sorted by decreasing length; ties keep their input order.
pub fn by_length_desc(records: &[SequenceRecord]) -> Vec<&SequenceRecord> {
    records
        .iter()
        .sorted_by(|a, b| b.length.cmp(&a.length))
        .collect()
}

/// Renders a line chart of sequence lengths (one marker per record, longest first) as an SVG
/// document.
pub fn render_length_chart(
    records: &[SequenceRecord],
    config: &ChartConfig,
) -> Result<String, TaxseqError> {
    if records.is_empty() {
        return Err(TaxseqError::Format(String::from("No records to plot")));
    }
    let sorted = by_length_desc(records);
    let width = config.width as f64;
    let height = config.height as f64;
    let plot_w = width - (MARGIN_LEFT + MARGIN_RIGHT) as f64;
    let plot_h = height - (MARGIN_TOP + MARGIN_BOTTOM) as f64;
    let left = MARGIN_LEFT as f64;
    let top = MARGIN_TOP as f64;
    let bottom = top + plot_h;
    let max_len = sorted[0].length.max(1) as f64;

    let x_of = |i: usize| {
        if sorted.len() == 1 {
            left + plot_w / 2.0
        } else {
            left + plot_w * i as f64 / (sorted.len() - 1) as f64
        }
    };
    let y_of = |len: u64| bottom - plot_h * len as f64 / max_len;
    let color = hex(config.line_color);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n",
        config.width, config.height, config.width, config.height
    ));
    out.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    out.push_str(&format!(
        "<g font-family=\"sans-serif\" font-size=\"{}\" fill=\"black\">\n",
        FONT_SIZE
    ));
    out.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{}\" font-size=\"{}\" text-anchor=\"middle\">Descending graph of sequence length</text>\n",
        width / 2.0,
        MARGIN_TOP / 2,
        TITLE_FONT_SIZE
    ));

    // Axes
    out.push_str(&format!(
        "<line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"black\"/>\n",
        l = left,
        t = top,
        b = bottom
    ));
    out.push_str(&format!(
        "<line x1=\"{:.1}\" y1=\"{b:.1}\" x2=\"{:.1}\" y2=\"{b:.1}\" stroke=\"black\"/>\n",
        left,
        left + plot_w,
        b = bottom
    ));
    for tick in 0..=Y_TICKS {
        // length * tick may exceed u64
        let value = (sorted[0].length as u128 * tick as u128 / Y_TICKS as u128) as u64;
        let y = y_of(value);
        out.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"black\"/>\n",
            left - 5.0,
            left,
            y = y
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            left - 8.0,
            y,
            value
        ));
    }
    out.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">Accession Number</text>\n",
        left + plot_w / 2.0,
        height - 10.0
    ));
    out.push_str(&format!(
        "<text x=\"20\" y=\"{y:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 20 {y:.1})\">Sequence Length</text>\n",
        y = top + plot_h / 2.0
    ));

    // Data
    let points = sorted
        .iter()
        .enumerate()
        .map(|(i, rec)| format!("{:.1},{:.1}", x_of(i), y_of(rec.length)))
        .join(" ");
    out.push_str(&format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
        points, color
    ));
    for (i, rec) in sorted.iter().enumerate() {
        let x = x_of(i);
        let y = y_of(rec.length);
        out.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{}\" fill=\"{}\"><title>{}: {} bp</title></circle>\n",
            x,
            y,
            MARKER_RADIUS,
            color,
            escape_svg(&rec.accession),
            rec.length
        ));
        let label_y = bottom + 15.0;
        out.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{ly:.1}\" text-anchor=\"end\" transform=\"rotate(-45 {x:.1} {ly:.1})\">{}</text>\n",
            escape_svg(&rec.accession),
            x = x,
            ly = label_y
        ));
    }

    out.push_str("</g>\n</svg>\n");
    Ok(out)
}

pub fn save_length_chart<P: AsRef<Path>>(
    records: &[SequenceRecord],
    config: &ChartConfig,
    path: P,
) -> Result<(), TaxseqError> {
    let svg = render_length_chart(records, config)?;
    fs::write(path.as_ref(), svg)?;
    info!("Chart of {} records written to {}", records.len(), path.as_ref().display());
    Ok(())
}

/// Plain-text table of accession and length, longest first.
pub fn length_summary(records: &[SequenceRecord]) -> String {
    let sorted = by_length_desc(records);
    let acc_width = sorted
        .iter()
        .map(|r| r.accession.chars().count())
        .chain(std::iter::once("accession_number".len()))
        .max()
        .unwrap_or(0);
    let mut out = format!("{:<acc_width$}  {:>10}\n", "accession_number", "seq_length");
    for rec in sorted {
        out.push_str(&format!("{:<acc_width$}  {:>10}\n", rec.accession, rec.length));
    }
    out
}

fn hex(color: HexColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn escape_svg(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
