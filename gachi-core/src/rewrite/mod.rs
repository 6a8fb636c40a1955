//! Rewrite engine
//!
//! Forward mode walks the parsed host program and substitutes eligible
//! nodes; reverse mode scans GachiScript text word by word and then parses
//! the result to validate it. Both produce byte-range [`Edit`]s or plain
//! text and never re-print a tree.

pub mod edits;
pub mod forward;
pub mod reverse;

pub use edits::{apply_edits, Edit, EditError};
pub use forward::{rewrite_forward, ForwardContext};
pub use reverse::{rewrite_reverse, WordScanner};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::parser::ParseError;
use crate::source_utils::{leading_indent, line_start};
use thiserror::Error;

/// Output of one successful rewrite
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub code: String,
    pub diagnostics: Diagnostics,
    pub substitutions: usize,
}

/// Failures that abort a whole rewrite
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("failed to parse: {0}")]
    Parse(#[from] ParseError),
    #[error("internal rewrite error: {0}")]
    Edit(#[from] EditError),
}

impl RewriteError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string());
        match self {
            RewriteError::Parse(e) => match e.position() {
                Some(position) => diagnostic.at(position),
                None => diagnostic,
            },
            RewriteError::Edit(_) => diagnostic,
        }
    }
}

/// Deletion for a comment at `start..end`.
///
/// A comment alone on its line takes the whole line with it; a trailing
/// comment takes the blanks before it.
pub(crate) fn remove_comment(source: &str, start: usize, end: usize) -> Edit {
    let after_blanks = end + blank_run(&source[end..]);
    let rest = &source[after_blanks..];
    let at_line_end = rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n");

    if leading_indent(source, start).is_some() && at_line_end {
        let newline = if rest.starts_with("\r\n") {
            2
        } else if rest.starts_with('\n') {
            1
        } else {
            0
        };
        return Edit::delete(line_start(source, start), after_blanks + newline);
    }

    if at_line_end {
        let before = source[..start].trim_end_matches([' ', '\t']);
        return Edit::delete(before.len(), end);
    }

    Edit::delete(start, end)
}

fn blank_run(text: &str) -> usize {
    text.len() - text.trim_start_matches([' ', '\t']).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(source: &str, comment: &str) -> String {
        let start = source.find(comment).unwrap();
        let edit = remove_comment(source, start, start + comment.len());
        apply_edits(source, vec![edit]).unwrap()
    }

    #[test]
    fn test_remove_own_line_comment() {
        assert_eq!(strip("a;\n  // note\nb;", "// note"), "a;\nb;");
        assert_eq!(strip("a;\r\n// note\r\nb;", "// note"), "a;\r\nb;");
    }

    #[test]
    fn test_remove_trailing_comment() {
        assert_eq!(strip("a; // note\nb;", "// note"), "a;\nb;");
    }

    #[test]
    fn test_remove_inline_comment() {
        assert_eq!(strip("a(/* x */ 1);", "/* x */"), "a( 1);");
    }
}
