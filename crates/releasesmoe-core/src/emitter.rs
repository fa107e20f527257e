//! Result sinks
//!
//! Every scraped row is handed to a [`ResultSink`] as soon as it is
//! complete. The pipe printer speaks the line format search hosts read from
//! plugin stdout; the JSON printer is for scripting.

use std::io::Write;

use regex::Regex;

use crate::error::Result;
use crate::types::ResultRow;

/// Destination for result rows
pub trait ResultSink {
    /// Accepts one row
    fn emit(&mut self, row: &ResultRow) -> Result<()>;
}

/// Collects rows in memory
impl ResultSink for Vec<ResultRow> {
    fn emit(&mut self, row: &ResultRow) -> Result<()> {
        self.push(row.clone());
        Ok(())
    }
}

/// Writes `link|name|size|seeds|leech|engine_url|desc_link|pub_date` lines
///
/// Sizes are converted to bytes; missing numbers print as `-1` and missing
/// strings as empty fields.
pub struct PipePrinter<W: Write> {
    out: W,
}

impl<W: Write> PipePrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for PipePrinter<W> {
    fn emit(&mut self, row: &ResultRow) -> Result<()> {
        writeln!(self.out, "{}", format_pipe_line(row))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes one JSON object per line
pub struct JsonLinesPrinter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonLinesPrinter<W> {
    fn emit(&mut self, row: &ResultRow) -> Result<()> {
        serde_json::to_writer(&mut self.out, row)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Formats a row as a pipe-delimited line (without the newline)
pub fn format_pipe_line(row: &ResultRow) -> String {
    let size = row.size.as_deref().map(size_to_bytes).unwrap_or(-1);

    [
        field(row.link.as_deref().unwrap_or_default()),
        field(row.name.as_deref().unwrap_or_default()),
        size.to_string(),
        row.seeds.unwrap_or(-1).to_string(),
        row.leech.unwrap_or(-1).to_string(),
        field(&row.engine_url),
        field(&row.desc_link),
        row.pub_date.unwrap_or(-1).to_string(),
    ]
    .join("|")
}

// Separators and line breaks would split the record.
fn field(text: &str) -> String {
    text.replace(['|', '\n', '\r'], " ")
}

/// Converts a human-readable size to bytes
///
/// Accepts `"1.4 GiB"`, `"700 MB"`, `"512KiB"`, `"12 B"`; units are binary
/// multiples and fractions are truncated.
///
/// # Returns
/// The byte count, or `-1` if the text is not a size
pub fn size_to_bytes(text: &str) -> i64 {
    let Ok(re) = Regex::new(r"(?i)^\s*([0-9]+(?:\.[0-9]+)?)\s*([KMGTP]?)(?:i?B)?\s*$") else {
        return -1;
    };
    let Some(caps) = re.captures(text) else {
        return -1;
    };
    let Ok(value) = caps[1].parse::<f64>() else {
        return -1;
    };

    let exponent = match caps[2].to_ascii_uppercase().as_str() {
        "K" => 10,
        "M" => 20,
        "G" => 30,
        "T" => 40,
        "P" => 50,
        _ => 0,
    };

    (value * 2f64.powi(exponent)) as i64
}
