//! Byte-range edits over source text
//!
//! The walkers never mutate a tree. They collect edits against the original
//! text and splice them in one pass, so everything outside an edit stays
//! byte-identical.

use thiserror::Error;

/// Replace `source[start..end]` with `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Edit {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    pub fn delete(start: usize, end: usize) -> Self {
        Self::replace(start, end, String::new())
    }

    pub fn is_insert(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    /// Two edits touch the same bytes, splicing is ambiguous
    #[error("overlapping edits at bytes {}..{} and {}..{}", .first.0, .first.1, .second.0, .second.1)]
    Overlapping {
        first: (usize, usize),
        second: (usize, usize),
    },
    #[error("edit {start}..{end} is outside the source ({len} bytes)")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Apply edits to `source` in a single pass.
///
/// Edits are sorted by position; identical edits collapse into one.
/// Insertions at the same offset keep their input order. An insertion at
/// the start of a replaced range is applied before the replacement.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    for edit in &edits {
        if edit.start > edit.end
            || edit.end > source.len()
            || !source.is_char_boundary(edit.start)
            || !source.is_char_boundary(edit.end)
        {
            return Err(EditError::OutOfBounds {
                start: edit.start,
                end: edit.end,
                len: source.len(),
            });
        }
    }

    // Stable: same-position inserts stay in the order they were produced
    edits.sort_by_key(|e| (e.start, e.end));
    edits.dedup();

    for pair in edits.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if current.end > next.start || (!current.is_insert() && current.start == next.start) {
            return Err(EditError::Overlapping {
                first: (current.start, current.end),
                second: (next.start, next.end),
            });
        }
    }

    let extra: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut result = String::with_capacity(source.len() + extra);
    let mut last_end = 0;
    for edit in &edits {
        result.push_str(&source[last_end..edit.start]);
        result.push_str(&edit.replacement);
        last_end = edit.end;
    }
    result.push_str(&source[last_end..]);

    Ok(result)
}
