//! Transpiler session
//!
//! A [`Transpiler`] binds a shared [`MappingTable`] to one set of
//! [`TranspilerOptions`]. Construction derives everything the walkers need
//! (classifier rules, the framework-scoped reverse index and its scanner),
//! so each transform call is a read-only pass over shared state.

use crate::classifier::Classifier;
use crate::config::TranspilerOptions;
use crate::diagnostics::Diagnostic;
use crate::dictionary::{Framework, IndexScope, MappingTable, ReverseIndex};
use crate::parser::syntax::is_word;
use crate::parser::{has_markup, has_type_syntax};
use crate::quotes::QuoteSource;
use crate::rewrite::{rewrite_forward, rewrite_reverse, ForwardContext, RewriteError, Rewritten, WordScanner};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Most suggestions offered per unknown word
pub const MAX_SUGGESTIONS: usize = 5;

/// Result of one transform call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranspileResult {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl TranspileResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    fn from_rewrite(result: Result<Rewritten, RewriteError>) -> Self {
        match result {
            Ok(rewritten) => TranspileResult {
                code: rewritten.code,
                diagnostics: rewritten.diagnostics.into_vec(),
            },
            Err(e) => TranspileResult {
                code: String::new(),
                diagnostics: vec![e.to_diagnostic()],
            },
        }
    }
}

/// Result of [`Transpiler::validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Host keywords. In GachiScript these must appear in substituted form,
/// unless the session's table has no mapping for them.
static RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do", "else", "enum",
    "export", "extends", "false", "finally", "for", "function", "if", "implements", "import", "in", "instanceof",
    "interface", "let", "new", "null", "private", "protected", "public", "return", "static", "super", "switch",
    "this", "throw", "true", "try", "typeof", "var", "void", "while", "yield", "async", "await",
];

/// String literals and comments, blanked before validation
static TRIVIA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"//[^\n]*|/\*[\s\S]*?\*/|"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\[\s\S])*`"#).unwrap()
});

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[@#]?[\p{L}\p{N}_$]+").unwrap());

/// Framework marker tokens in detection priority order
static FRAMEWORK_MARKERS: &[(Framework, &[&str])] = &[
    (
        Framework::React,
        &["import React", "from 'react'", "from \"react\"", "useState", "jsx"],
    ),
    (Framework::Angular, &["@Component", "@Injectable", "@angular"]),
    (
        Framework::Vue,
        &["from 'vue'", "from \"vue\"", "Vue", "<template>"],
    ),
];

pub struct Transpiler {
    table: Arc<MappingTable>,
    options: TranspilerOptions,
    classifier: Classifier,
    index: ReverseIndex,
    scanner: WordScanner,
    integrity: Vec<Diagnostic>,
}

impl Transpiler {
    pub fn new(table: Arc<MappingTable>, options: TranspilerOptions) -> Self {
        let classifier = Classifier::new(options.framework);
        let index = ReverseIndex::build(&table, IndexScope::Framework(options.framework));
        let scanner = WordScanner::new(&index);
        let integrity: Vec<Diagnostic> = index.collisions().iter().map(|c| c.to_diagnostic()).collect();
        for diagnostic in &integrity {
            warn!("{}", diagnostic.message);
        }
        debug!(
            framework = %options.framework,
            reverse_entries = index.len(),
            "transpiler session ready"
        );

        Transpiler {
            table,
            options,
            classifier,
            index,
            scanner,
            integrity,
        }
    }

    /// Session over the built-in vocabulary
    pub fn with_builtin(options: TranspilerOptions) -> Self {
        Self::new(Arc::new(MappingTable::builtin()), options)
    }

    pub fn options(&self) -> &TranspilerOptions {
        &self.options
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    pub fn reverse_index(&self) -> &ReverseIndex {
        &self.index
    }

    /// Collisions in this session's reverse index, as warnings
    pub fn integrity_warnings(&self) -> &[Diagnostic] {
        &self.integrity
    }

    /// Host source to GachiScript
    pub fn transform_forward(&self, source: &str) -> TranspileResult {
        let mut quotes = QuoteSource::new(self.options.quote_seed);
        self.transform_forward_with(source, &mut quotes)
    }

    /// Host source to GachiScript, drawing phrases from `quotes`
    pub fn transform_forward_with(&self, source: &str, quotes: &mut QuoteSource) -> TranspileResult {
        let context = ForwardContext {
            table: &self.table,
            classifier: &self.classifier,
            options: &self.options,
        };
        let result = rewrite_forward(source, context, quotes);
        if let Ok(rewritten) = &result {
            debug!(
                substitutions = rewritten.substitutions,
                diagnostics = rewritten.diagnostics.len(),
                "forward transform"
            );
        }
        TranspileResult::from_rewrite(result)
    }

    /// GachiScript to host source
    pub fn transform_reverse(&self, source: &str) -> TranspileResult {
        let result = rewrite_reverse(source, &self.scanner, &self.options);
        if let Ok(rewritten) = &result {
            debug!(substitutions = rewritten.substitutions, "reverse transform");
        }
        TranspileResult::from_rewrite(result)
    }

    /// Check GachiScript source for unknown words, then check that it
    /// reverses into parseable host code.
    pub fn validate(&self, source: &str) -> ValidationReport {
        let blanked = TRIVIA_RE.replace_all(source, |caps: &regex::Captures<'_>| {
            caps[0].chars().map(|c| if c == '\n' { '\n' } else { ' ' }).collect::<String>()
        });

        let mut report = ValidationReport::default();
        let mut seen: Vec<&str> = Vec::new();
        for found in WORD_RE.find_iter(&blanked) {
            let word = found.as_str();
            if seen.contains(&word) || self.is_known_word(&blanked, found.start(), found.end()) {
                continue;
            }
            seen.push(word);
            report.errors.push(format!("Unknown GachiScript keyword: \"{}\"", word));
            let suggestions = self.index.suggestions(word, MAX_SUGGESTIONS);
            if !suggestions.is_empty() {
                report.suggestions.push(format!("Did you mean: {}?", suggestions.join(", ")));
            }
        }

        if report.errors.is_empty() {
            let reversed = self.transform_reverse(source);
            report
                .errors
                .extend(reversed.diagnostics.iter().filter(|d| d.is_error()).map(ToString::to_string));
        }

        report.valid = report.errors.is_empty();
        report
    }

    fn is_known_word(&self, text: &str, start: usize, end: usize) -> bool {
        let word = &text[start..end];
        if word.starts_with(|c: char| c.is_ascii_digit()) || self.index.contains(word) {
            return true;
        }
        if let Some(name) = word.strip_prefix('@') {
            return is_word(name) && !self.is_unsubstituted_keyword(name);
        }
        let name = word.strip_prefix('#').unwrap_or(word);
        if !is_word(name) {
            return false;
        }
        // Property names keep their host spelling
        let before = text[..start].trim_end();
        let after = text[end..].trim_start();
        if before.ends_with('.') || (after.starts_with(':') && !after.starts_with("::")) {
            return true;
        }
        !self.is_unsubstituted_keyword(name)
    }

    fn is_unsubstituted_keyword(&self, word: &str) -> bool {
        RESERVED_WORDS.contains(&word) && self.table.forward_scoped(word, None, self.options.framework).is_some()
    }

    /// Guess the framework from marker text, in either vocabulary
    pub fn detect_framework(&self, source: &str) -> Framework {
        detect_framework(&self.table, source)
    }
}

/// First framework, in priority order, with a marker in `source`.
///
/// Markers are plain substrings, in host spelling or with each word
/// substituted through `table`, so `Vuex` counts as a Vue marker.
pub fn detect_framework(table: &MappingTable, source: &str) -> Framework {
    for (framework, markers) in FRAMEWORK_MARKERS {
        for marker in markers.iter() {
            let substituted: Vec<&str> = marker.split(' ').map(|word| table.forward(word, None)).collect();
            if source.contains(marker) || source.contains(&substituted.join(" ")) {
                return *framework;
            }
        }
    }
    Framework::None
}

/// Extension for reversed host code: markup and types pick the variant
pub fn sniff_extension(host_code: &str) -> &'static str {
    match (has_markup(host_code), has_type_syntax(host_code)) {
        (true, true) => "tsx",
        (true, false) => "jsx",
        (false, true) => "ts",
        (false, false) => "js",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn session(framework: Framework) -> Transpiler {
        Transpiler::with_builtin(TranspilerOptions::default().with_framework(framework))
    }

    #[test]
    fn test_forward_and_reverse() {
        let transpiler = session(Framework::None);
        let forward = transpiler.transform_forward("if (a) { return b; }");
        assert_eq!(forward.code, "whenHard (a) { deliver b; }");
        assert!(forward.diagnostics.is_empty());

        let reverse = transpiler.transform_reverse(&forward.code);
        assert_eq!(reverse.code, "if (a) { return b; }");
    }

    #[test]
    fn test_parse_failure_is_single_error() {
        let transpiler = session(Framework::None);
        let result = transpiler.transform_forward("function (");
        assert_eq!(result.code, "");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, Severity::Error);
        assert!(result.diagnostics[0].message.starts_with("failed to parse"));
        assert!(result.has_errors());
    }

    #[test]
    fn test_reverse_parse_failure() {
        let transpiler = session(Framework::None);
        let result = transpiler.transform_reverse("tight = whenHard;");
        assert_eq!(result.code, "");
        assert!(result.has_errors());
    }

    #[test]
    fn test_seeded_quotes_are_deterministic() {
        let options = TranspilerOptions {
            add_random_quotes: true,
            quote_seed: Some(3),
            ..TranspilerOptions::default()
        };
        let transpiler = Transpiler::with_builtin(options);
        let source = "function a() {}\nfunction b() {}\n";
        let first = transpiler.transform_forward(source);
        let second = transpiler.transform_forward(source);
        assert_eq!(first.code, second.code);
        assert_eq!(first.code.matches("/* ").count(), 2);
    }

    #[test]
    fn test_validate_accepts_gachiscript() {
        let transpiler = session(Framework::None);
        let report = transpiler.validate("tight total becomes 1;\nwhenHard (total) { console.log(\"if\"); }");
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn test_validate_rejects_host_keywords() {
        let transpiler = session(Framework::None);
        let report = transpiler.validate("const a becomes 1;");
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Unknown GachiScript keyword: \"const\"".to_string()]);
    }

    #[test]
    fn test_validate_allows_property_names() {
        let transpiler = session(Framework::None);
        let report = transpiler.validate("tight o becomes { if: 1 }; o.const;");
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn test_validate_suggestions() {
        let transpiler = session(Framework::None);
        let report = transpiler.validate("tight a becomes 1; while (a) {}");
        assert_eq!(report.errors.len(), 1);
        assert!(report.suggestions.is_empty() || report.suggestions[0].starts_with("Did you mean: "));

        let report = transpiler.validate("whenHard (a) {} else {}");
        assert!(!report.valid);
        assert_eq!(report.suggestions, vec!["Did you mean: orElse?".to_string()]);
    }

    #[test]
    fn test_validate_reports_parse_failure() {
        let transpiler = session(Framework::None);
        let report = transpiler.validate("tight becomes;");
        assert!(!report.valid);
        assert!(report.errors[0].contains("failed to parse"));
    }

    #[test]
    fn test_detect_framework() {
        let transpiler = session(Framework::None);
        assert_eq!(transpiler.detect_framework("import React from 'react';"), Framework::React);
        assert_eq!(transpiler.detect_framework("summon Gachi via 'react';"), Framework::React);
        assert_eq!(transpiler.detect_framework("@Component({})\nclass A {}"), Framework::Angular);
        assert_eq!(transpiler.detect_framework("@Performer({})"), Framework::Angular);
        assert_eq!(transpiler.detect_framework("summon GachiView via 'vue';"), Framework::Vue);
        assert_eq!(transpiler.detect_framework("import Vuex from 'vuex';"), Framework::Vue);
        assert_eq!(transpiler.detect_framework("const a = 1;"), Framework::None);
        // React wins over Vue when both appear
        assert_eq!(transpiler.detect_framework("useState(Vue)"), Framework::React);
    }

    #[test]
    fn test_sniff_extension() {
        assert_eq!(sniff_extension("const a = <div />;"), "jsx");
        assert_eq!(sniff_extension("const a: string = 'x';"), "ts");
        assert_eq!(sniff_extension("const a = (p: number) => <div />;"), "tsx");
        assert_eq!(sniff_extension("const a = 1;"), "js");
    }

    #[test]
    fn test_collisions_surface_as_warnings() {
        let mut table = MappingTable::builtin();
        table.add("greet", "tight");
        let transpiler = Transpiler::new(Arc::new(table), TranspilerOptions::default());
        assert_eq!(transpiler.integrity_warnings().len(), 1);
        assert_eq!(transpiler.integrity_warnings()[0].severity, Severity::Warning);
    }
}
