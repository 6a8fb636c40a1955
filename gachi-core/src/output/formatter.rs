//! Diagnostic formatters

use super::colors::{ansi, paint, severity_color};
use crate::diagnostics::Diagnostic;
use crate::source_utils::get_source_lines;
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticFormat {
    /// GCC-style file:line:col: severity: message
    #[default]
    Gcc,
    /// JSON array with diagnostic details
    Json,
}

impl DiagnosticFormat {
    /// Parse format from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gcc" => Some(DiagnosticFormat::Gcc),
            "json" => Some(DiagnosticFormat::Json),
            _ => None,
        }
    }

    /// Get list of all valid format names
    pub fn valid_formats() -> &'static [&'static str] {
        &["gcc", "json"]
    }
}

/// JSON output structure
#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<u32>,
    severity: &'static str,
    message: &'a str,
}

/// Format the diagnostics of one file. `source` supplies context lines.
pub fn format_diagnostics(
    file: &str,
    source: &str,
    diagnostics: &[Diagnostic],
    format: DiagnosticFormat,
    use_color: bool,
) -> String {
    match format {
        DiagnosticFormat::Gcc => format_gcc(file, source, diagnostics, use_color),
        DiagnosticFormat::Json => format_json(file, diagnostics),
    }
}

fn format_gcc(file: &str, source: &str, diagnostics: &[Diagnostic], use_color: bool) -> String {
    let mut output = String::new();
    for d in diagnostics {
        let severity = paint(d.severity.as_str(), severity_color(d.severity), use_color);
        let Some(pos) = d.position else {
            output.push_str(&format!("{}: {}: {}\n", file, severity, d.message));
            continue;
        };
        output.push_str(&format!(
            "{}:{}:{}: {}: {}\n",
            file, pos.line, pos.column, severity, d.message
        ));

        // Add source context
        let Some(source_line) = get_source_lines(source, pos.line, pos.line).first().copied() else {
            continue;
        };
        let line_num_width = pos.line.to_string().len();
        output.push_str(&format!(
            "{:>width$} | {}\n",
            pos.line,
            source_line,
            width = line_num_width
        ));

        let caret_col = (pos.column as usize).saturating_sub(1);
        let padding = " ".repeat(line_num_width + 3 + caret_col);
        if use_color {
            output.push_str(&format!("{}{}^{}\n", padding, ansi::GREEN, ansi::RESET));
        } else {
            output.push_str(&format!("{}^\n", padding));
        }
    }
    output
}

fn format_json(file: &str, diagnostics: &[Diagnostic]) -> String {
    let json: Vec<JsonDiagnostic> = diagnostics
        .iter()
        .map(|d| JsonDiagnostic {
            file,
            line: d.position.map(|p| p.line),
            column: d.position.map(|p| p.column),
            severity: d.severity.as_str(),
            message: &d.message,
        })
        .collect();

    serde_json::to_string_pretty(&json).unwrap_or_else(|_| "[]".to_string())
}
