//! Source text position utilities
//!
//! Line helpers used when inserting comments and rendering diagnostics.

/// Byte offset of the start of the line containing `offset`
pub fn line_start(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source.as_bytes()[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// The indentation before `offset` when only whitespace precedes it on its line
pub fn leading_indent(source: &str, offset: usize) -> Option<&str> {
    let start = line_start(source, offset);
    let prefix = source.get(start..offset)?;
    prefix.chars().all(|c| c == ' ' || c == '\t').then_some(prefix)
}

/// Get full source lines for a range (inclusive of start and end lines)
pub fn get_source_lines(source: &str, start_line: u32, end_line: u32) -> Vec<&str> {
    if start_line == 0 || end_line == 0 || start_line > end_line {
        return Vec::new();
    }

    let lines: Vec<&str> = source.lines().collect();
    let start_idx = (start_line as usize).saturating_sub(1);
    let end_idx = (end_line as usize).min(lines.len());

    if start_idx >= lines.len() {
        return Vec::new();
    }

    lines[start_idx..end_idx]
        .iter()
        .map(|s| s.trim_end_matches('\r'))
        .collect()
}
