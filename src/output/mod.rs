//! Rendering of command results as aligned text or JSON.

use std::io::{self, Write};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::Serialize;

use crate::config::OutputFormat;

pub mod report;

// Re-export commonly used types
pub use report::{
    AllocatedSubnet, ContainsReport, CountReport, DivideReport, EmbedEntry, EmbedReport,
    NetworkReport, UsableRange, VlsmReport,
};

/// Gap between the label column and the value column
const COLUMN_PADDING: usize = 2;

/// A report that knows its plain-text layout
pub trait Tabular {
    fn write_tab(&self, w: &mut dyn Write) -> io::Result<()>;
}

/// Write `key value` rows with the values aligned in one column
pub fn write_rows<L: AsRef<str>>(w: &mut dyn Write, rows: &[(L, String)]) -> io::Result<()> {
    write_aligned(w, rows, "")
}

/// Write `Label: value` rows describing a single object
pub fn write_fields<L: AsRef<str>>(w: &mut dyn Write, rows: &[(L, String)]) -> io::Result<()> {
    write_aligned(w, rows, ":")
}

fn write_aligned<L: AsRef<str>>(
    w: &mut dyn Write,
    rows: &[(L, String)],
    suffix: &str,
) -> io::Result<()> {
    let width = rows
        .iter()
        .map(|(label, _)| label.as_ref().chars().count() + suffix.len())
        .max()
        .unwrap_or(0)
        + COLUMN_PADDING;

    for (label, value) in rows {
        let label = format!("{}{}", label.as_ref(), suffix);
        writeln!(w, "{:<width$}{}", label, value, width = width)?;
    }
    Ok(())
}

/// Render `report` to `w` in the requested format
pub fn render<T>(report: &T, format: OutputFormat, w: &mut dyn Write) -> Result<()>
where
    T: Serialize + Tabular,
{
    match format {
        OutputFormat::Tab => report.write_tab(w).wrap_err("Failed to write output")?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, report).wrap_err("Failed to encode JSON")?;
            writeln!(w).wrap_err("Failed to write output")?;
        }
    }
    Ok(())
}
