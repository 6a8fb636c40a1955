//! Diagnostic output
//!
//! Supports two formats:
//! - gcc: GCC-style file:line:col: severity: message, with the source line
//! - json: JSON array with one object per diagnostic

mod colors;
mod formatter;

pub use colors::{ansi, should_use_color};
pub use formatter::{format_diagnostics, DiagnosticFormat};
