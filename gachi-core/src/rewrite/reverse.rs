//! Reverse rewrite: GachiScript to host source
//!
//! GachiScript is not a grammar the parser understands, so the reverse
//! direction is a textual pass. [`WordScanner`] walks the text once, left
//! to right, replacing boundary-delimited substituted forms with their host
//! forms. The result is then parsed as host code to validate it.
//!
//! The scan has no syntactic context: a substituted form inside a string
//! literal or a comment is replaced like any other occurrence.

use super::{apply_edits, remove_comment, RewriteError, Rewritten};
use crate::config::TranspilerOptions;
use crate::diagnostics::Diagnostics;
use crate::dictionary::ReverseIndex;
use crate::parser::{comment_ranges, parse_source, Dialect};
use std::collections::HashMap;

/// Characters that continue an identifier
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Single-pass replacer over a reverse index.
///
/// Candidates starting with the same character are tried longest first,
/// then in lexicographic order, so a form is never cut short by one of its
/// prefixes. Replaced spans are not rescanned.
#[derive(Debug, Clone, Default)]
pub struct WordScanner {
    buckets: HashMap<char, Vec<(String, String)>>,
}

impl WordScanner {
    pub fn new(index: &ReverseIndex) -> Self {
        let mut buckets: HashMap<char, Vec<(String, String)>> = HashMap::new();
        for (substituted, host) in index.iter() {
            if let Some(first) = substituted.chars().next() {
                buckets
                    .entry(first)
                    .or_default()
                    .push((substituted.to_string(), host.to_string()));
            }
        }
        for candidates in buckets.values_mut() {
            candidates.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        }
        WordScanner { buckets }
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Replace every boundary-delimited occurrence. Returns the new text and
    /// the number of replacements.
    pub fn scan(&self, text: &str) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut count = 0;
        let mut prev: Option<char> = None;
        let mut i = 0;

        while let Some(c) = text[i..].chars().next() {
            let found = self
                .buckets
                .get(&c)
                .and_then(|candidates| candidates.iter().find(|(from, _)| matches_at(text, i, from, prev)));

            match found {
                Some((from, to)) => {
                    out.push_str(to);
                    i += from.len();
                    prev = from.chars().next_back();
                    count += 1;
                }
                None => {
                    out.push(c);
                    i += c.len_utf8();
                    prev = Some(c);
                }
            }
        }

        (out, count)
    }
}

/// `candidate` occurs at `i` and is not part of a longer identifier.
///
/// A side is checked only when the candidate's edge character there is an
/// identifier character.
fn matches_at(text: &str, i: usize, candidate: &str, prev: Option<char>) -> bool {
    if !text[i..].starts_with(candidate) {
        return false;
    }
    let (Some(first), Some(last)) = (candidate.chars().next(), candidate.chars().next_back()) else {
        return false;
    };
    if is_identifier_char(first) && prev.is_some_and(is_identifier_char) {
        return false;
    }
    let next = text[i + candidate.len()..].chars().next();
    !(is_identifier_char(last) && next.is_some_and(is_identifier_char))
}

/// Rewrite GachiScript `source` back into host code
pub fn rewrite_reverse(
    source: &str,
    scanner: &WordScanner,
    options: &TranspilerOptions,
) -> Result<Rewritten, RewriteError> {
    let (text, substitutions) = scanner.scan(source);

    let dialect = options.dialect.unwrap_or_else(|| Dialect::sniff(&text));
    let tree = parse_source(&text, dialect)?;

    let code = if options.preserve_comments {
        text
    } else {
        let edits = comment_ranges(&tree)
            .into_iter()
            .map(|(start, end)| remove_comment(&text, start, end))
            .collect();
        apply_edits(&text, edits)?
    };

    Ok(Rewritten {
        code,
        diagnostics: Diagnostics::new(),
        substitutions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{Framework, IndexScope, MappingTable};

    fn scanner(framework: Framework) -> WordScanner {
        let table = MappingTable::builtin();
        WordScanner::new(&ReverseIndex::build(&table, IndexScope::Framework(framework)))
    }

    #[test]
    fn test_scan_replaces_whole_words() {
        let (text, count) = scanner(Framework::None).scan("tight x becomes a deeplyMatches b;");
        assert_eq!(text, "const x = a === b;");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_scan_respects_word_boundaries() {
        let scanner = scanner(Framework::None);
        assert_eq!(scanner.scan("whenHardValue = 1;").0, "whenHardValue = 1;");
        assert_eq!(scanner.scan("myTight = tight_;").0, "myTight = tight_;");
        assert_eq!(scanner.scan("$tight").0, "$tight");
    }

    #[test]
    fn test_longest_candidate_wins() {
        let scanner = scanner(Framework::None);
        // `locate` is a prefix of `locatePosition`
        assert_eq!(scanner.scan("xs.locatePosition(f)").0, "xs.findIndex(f)");
        assert_eq!(scanner.scan("xs.locate(f)").0, "xs.find(f)");
    }

    #[test]
    fn test_replaced_spans_not_rescanned() {
        let mut table = MappingTable::empty();
        table.add("b", "a");
        table.add("c", "b");
        let scanner = WordScanner::new(&ReverseIndex::build(&table, IndexScope::Full));
        assert_eq!(scanner.scan("a b").0, "b c");
    }

    #[test]
    fn test_non_word_edges_skip_boundary_check() {
        let scanner = scanner(Framework::Angular);
        assert_eq!(scanner.scan("x@Performer({})").0, "x@Component({})");
        assert_eq!(scanner.scan("'dungeon-root'").0, "'app-root'");
    }

    #[test]
    fn test_scan_is_lenient_inside_strings() {
        let (text, _) = scanner(Framework::None).scan("let s = \"whenHard\";");
        assert_eq!(text, "let s = \"if\";");
    }

    #[test]
    fn test_scan_unicode() {
        let (text, count) = scanner(Framework::None).scan("tight ñtight = \"é\";");
        assert_eq!(text, "const ñtight = \"é\";");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_rewrite_reverse_validates() {
        let scanner = scanner(Framework::None);
        let options = TranspilerOptions::default();
        let ok = rewrite_reverse("tight a becomes 1;", &scanner, &options).unwrap();
        assert_eq!(ok.code, "const a = 1;");
        assert_eq!(ok.substitutions, 2);

        let err = rewrite_reverse("tight becomes;", &scanner, &options).unwrap_err();
        assert!(matches!(err, RewriteError::Parse(_)));
    }

    #[test]
    fn test_rewrite_reverse_strips_comments() {
        let scanner = scanner(Framework::None);
        let options = TranspilerOptions {
            preserve_comments: false,
            ..TranspilerOptions::default()
        };
        let result = rewrite_reverse("/* Boy next door */\ntight a becomes 1; // done\n", &scanner, &options).unwrap();
        assert_eq!(result.code, "const a = 1;\n");
    }
}
