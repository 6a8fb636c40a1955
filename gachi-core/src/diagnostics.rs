//! Diagnostics collected during a single transformation call.
//!
//! A [`Diagnostics`] collector is created per call, appended to while the
//! walker runs and handed back inside the result. It is never shared
//! between calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based line and column (column counted in bytes, matching Tree-sitter + 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Convert a zero-based Tree-sitter point
    pub fn from_point(point: tree_sitter::Point) -> Self {
        Position {
            line: point.row as u32 + 1,
            column: point.column as u32 + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            position: None,
            severity,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{}: {}: {}", pos, self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Append-only diagnostic list for one transformation call
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, position: Option<Position>) {
        self.push_at(Severity::Error, message, position);
    }

    pub fn warning(&mut self, message: impl Into<String>, position: Option<Position>) {
        self.push_at(Severity::Warning, message, position);
    }

    pub fn info(&mut self, message: impl Into<String>, position: Option<Position>) {
        self.push_at(Severity::Info, message, position);
    }

    fn push_at(&mut self, severity: Severity, message: impl Into<String>, position: Option<Position>) {
        self.items.push(Diagnostic {
            message: message.into(),
            position,
            severity,
        });
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter);
    }

    /// True when any diagnostic has [`Severity::Error`]
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.severity == severity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(items: Vec<Diagnostic>) -> Self {
        Diagnostics { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors_only_counts_errors() {
        let mut diags = Diagnostics::new();
        diags.warning("node failed", Some(Position::new(1, 4)));
        diags.info("annotated", None);
        assert!(!diags.has_errors());

        diags.error("failed to parse", None);
        assert!(diags.has_errors());
        assert_eq!(diags.len(), 3);
    }

    #[test]
    fn test_by_severity() {
        let mut diags = Diagnostics::new();
        diags.warning("a", None);
        diags.error("b", None);
        diags.warning("c", None);

        let warnings: Vec<_> = diags.by_severity(Severity::Warning).map(|d| d.message.as_str()).collect();
        assert_eq!(warnings, vec!["a", "c"]);
        assert_eq!(diags.by_severity(Severity::Info).count(), 0);
    }

    #[test]
    fn test_display_with_position() {
        let d = Diagnostic::warning("mapping collision").at(Position::new(3, 7));
        assert_eq!(d.to_string(), "3:7: warning: mapping collision");
        assert_eq!(Diagnostic::error("boom").to_string(), "error: boom");
    }

    #[test]
    fn test_serialize_skips_missing_position() {
        let json = serde_json::to_string(&Diagnostic::info("hi")).unwrap();
        assert_eq!(json, r#"{"message":"hi","severity":"info"}"#);
    }
}
