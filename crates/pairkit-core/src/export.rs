//! Row rendering: CSV, JSON, and a pipe table.
//!
//! Columns follow the parameter declaration order of the domains.

use std::path::Path;

use pairkit_ir::types::{Domains, Row};
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Output encoding for a row file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// `.json` selects JSON; anything else is written as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header line plus one line per row. No rows renders as empty text.
pub fn render_csv(domains: &Domains, rows: &[Row]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let names: Vec<&str> = domains.names().collect();
    let mut out = String::new();
    out.push_str(&names.iter().map(|n| csv_field(n)).collect::<Vec<_>>().join(","));
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = names
            .iter()
            .map(|n| csv_field(row.get(n).unwrap_or_default()))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Pretty JSON array with one object per row.
pub fn render_json(rows: &[Row]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Markdown-style pipe table for terminal display.
pub fn render_table(domains: &Domains, rows: &[Row]) -> String {
    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }

    let names: Vec<&str> = domains.names().collect();
    let mut builder = Builder::default();
    builder.push_record(names.iter().copied());
    for row in rows {
        builder.push_record(names.iter().map(|n| row.get(n).unwrap_or_default()));
    }

    let mut table = builder.build();
    table.with(Style::markdown());
    format!("{table}\n")
}

/// Write rows to `path` in the format its extension selects.
pub fn write_rows(
    path: impl AsRef<Path>,
    domains: &Domains,
    rows: &[Row],
) -> Result<OutputFormat, ExportError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path);
    let text = match format {
        OutputFormat::Csv => render_csv(domains, rows),
        OutputFormat::Json => render_json(rows)?,
    };
    std::fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), rows = rows.len(), ?format, "rows written");
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Csv);
    }
}
