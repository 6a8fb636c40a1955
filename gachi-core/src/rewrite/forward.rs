//! Forward walker: host source to GachiScript
//!
//! Depth-first over the Tree-sitter tree in source order. Each node is
//! folded into a [`Site`], classified, and on eligibility looked up in the
//! table. A substitution becomes an [`Edit`] on the original text. A node
//! that cannot be substituted produces a warning and the walk continues.

use super::{apply_edits, remove_comment, Edit, RewriteError, Rewritten};
use crate::classifier::{Classifier, Lookup, Verdict};
use crate::config::TranspilerOptions;
use crate::diagnostics::{Diagnostics, Position};
use crate::dictionary::{Category, MappingTable};
use crate::parser::syntax::{decoration_anchor, is_word, site, NodeTag, Site};
use crate::parser::{parse_source, Dialect, SYNTAX};
use crate::quotes::QuoteSource;
use crate::source_utils::leading_indent;
use std::collections::HashSet;
use thiserror::Error;
use tracing::trace;
use tree_sitter::Node;

/// Everything the forward walker reads
#[derive(Debug, Clone, Copy)]
pub struct ForwardContext<'a> {
    pub table: &'a MappingTable,
    pub classifier: &'a Classifier,
    pub options: &'a TranspilerOptions,
}

/// Why a single node could not be substituted
#[derive(Error, Debug, PartialEq, Eq)]
enum NodeError {
    #[error("`{0}` is not a valid identifier")]
    InvalidIdentifier(String),
    #[error("`{0}` cannot be placed inside a string literal")]
    InvalidStringContent(String),
    #[error("string literal is not quoted")]
    UnquotedString,
}

/// Rewrite host `source` into GachiScript
pub fn rewrite_forward(
    source: &str,
    context: ForwardContext<'_>,
    quotes: &mut QuoteSource,
) -> Result<Rewritten, RewriteError> {
    let dialect = context.options.dialect.unwrap_or_else(|| Dialect::sniff(source));
    let tree = parse_source(source, dialect)?;

    let mut walker = ForwardWalker {
        source,
        context,
        phrases: context.table.phrases(),
        quotes,
        edits: Vec::new(),
        diagnostics: Diagnostics::new(),
        decorated: HashSet::new(),
        substitutions: 0,
    };
    walker.visit(tree.root_node(), None, None);

    let ForwardWalker {
        edits,
        diagnostics,
        substitutions,
        ..
    } = walker;

    Ok(Rewritten {
        code: apply_edits(source, edits)?,
        diagnostics,
        substitutions,
    })
}

struct ForwardWalker<'a, 's, 'q> {
    source: &'s str,
    context: ForwardContext<'a>,
    phrases: Vec<&'a str>,
    quotes: &'q mut QuoteSource,
    edits: Vec<Edit>,
    diagnostics: Diagnostics,
    /// Start offsets of anchors that already received a phrase
    decorated: HashSet<usize>,
    substitutions: usize,
}

impl<'a, 's, 'q> ForwardWalker<'a, 's, 'q> {
    fn visit(&mut self, node: Node<'_>, parent: Option<Node<'_>>, field: Option<&str>) {
        let kind = node.kind();
        if SYNTAX.is_comment(kind) {
            if !self.context.options.preserve_comments {
                self.edits.push(remove_comment(self.source, node.start_byte(), node.end_byte()));
            }
            return;
        }

        if self.context.options.add_random_quotes && SYNTAX.is_anchor(kind) {
            self.decorate(node);
        }

        let Some(site) = site(node, parent, field, self.source) else {
            self.visit_children(node);
            return;
        };

        match self.context.classifier.classify(&site) {
            Verdict::Substitute(lookup) => self.substitute(node, &site, lookup),
            Verdict::Skip(reason) => {
                trace!(text = site.text, reason = reason.as_str(), "skipped {}", site.tag.as_str());
            }
            Verdict::Descend => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return;
        }
        loop {
            let field = cursor.field_name();
            self.visit(cursor.node(), Some(node), field);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    fn substitute(&mut self, node: Node<'_>, site: &Site<'_>, lookup: Lookup) {
        let result = match (site.tag, lookup) {
            (NodeTag::StringLiteral, Lookup::StringContent) => self.substitute_string(node, site),
            (NodeTag::Operator, _) => self.substitute_operator(node, site, lookup),
            _ => self.substitute_word(node, site, lookup),
        };

        if let Err(e) = result {
            let position = Position::from_point(node.start_position());
            self.diagnostics.warning(
                format!(
                    "failed to transform {} `{}` at {}: {}",
                    site.tag.as_str(),
                    site.text,
                    position,
                    e
                ),
                Some(position),
            );
        }
    }

    fn lookup(&self, text: &str, lookup: Lookup) -> Option<&'a str> {
        let table = self.context.table;
        let framework = self.context.options.framework;
        match lookup {
            Lookup::Code => table.forward_scoped(text, None, framework),
            Lookup::Category(category) => table.forward_scoped(text, Some(category), framework),
            Lookup::Decorator => table
                .forward_scoped(&format!("@{}", text), Some(Category::FrameworkIdentifier), framework)
                .map(|name| name.strip_prefix('@').unwrap_or(name))
                .or_else(|| table.forward_scoped(text, None, framework)),
            Lookup::StringContent => table.forward_scoped(text, Some(Category::FrameworkIdentifier), framework),
        }
    }

    fn substitute_word(&mut self, node: Node<'_>, site: &Site<'_>, lookup: Lookup) -> Result<(), NodeError> {
        let Some(replacement) = self.lookup(site.text, lookup) else {
            return Ok(());
        };
        if replacement == site.text {
            return Ok(());
        }
        if !is_word(replacement) {
            return Err(NodeError::InvalidIdentifier(replacement.to_string()));
        }
        self.push_substitution(node.start_byte(), node.end_byte(), replacement);
        Ok(())
    }

    fn substitute_string(&mut self, node: Node<'_>, site: &Site<'_>) -> Result<(), NodeError> {
        let text = site.text;
        let quoted = text.len() >= 2
            && text.starts_with(['"', '\''])
            && text.ends_with(['"', '\''])
            && text.as_bytes()[0] == text.as_bytes()[text.len() - 1];
        if !quoted {
            return Err(NodeError::UnquotedString);
        }

        let inner = &text[1..text.len() - 1];
        let Some(replacement) = self.lookup(inner, Lookup::StringContent) else {
            return Ok(());
        };
        if replacement.contains(['"', '\'', '\\', '\n', '\r']) {
            return Err(NodeError::InvalidStringContent(replacement.to_string()));
        }
        self.push_substitution(node.start_byte() + 1, node.end_byte() - 1, replacement);
        Ok(())
    }

    /// Operators are replaced in place only where a word cannot merge with
    /// its neighbours. Elsewhere strict mode annotates the operator instead.
    fn substitute_operator(&mut self, node: Node<'_>, site: &Site<'_>, lookup: Lookup) -> Result<(), NodeError> {
        let Some(replacement) = self.lookup(site.text, lookup) else {
            return Ok(());
        };
        if !is_word(replacement) {
            return Err(NodeError::InvalidIdentifier(replacement.to_string()));
        }

        let (start, end) = (node.start_byte(), node.end_byte());
        if operator_fits(self.source, start, end) {
            self.push_substitution(start, end, replacement);
            return Ok(());
        }

        if self.context.options.strict_mode {
            let position = Position::from_point(node.start_position());
            // Without the space `a/b` would become a `//` line comment
            // The space keeps `/` and `*` from fusing with the comment opener
            self.edits.push(Edit::insert(
                end,
                format!(" /* gachi: {} -> {} */", site.text, replacement),
            ));
            self.diagnostics.info(
                format!(
                    "operator `{}` at {} kept, annotated as `{}`",
                    site.text, position, replacement
                ),
                Some(position),
            );
        } else {
            trace!(operator = site.text, "operator not separated, left in place");
        }
        Ok(())
    }

    fn push_substitution(&mut self, start: usize, end: usize, replacement: &str) {
        self.edits.push(Edit::replace(start, end, replacement));
        self.substitutions += 1;
    }

    /// Put a phrase comment before the declaration, or before its `export`
    fn decorate(&mut self, node: Node<'_>) {
        let anchor = decoration_anchor(node);
        let at = anchor.start_byte();
        if !self.decorated.insert(at) {
            return;
        }
        let Some(phrase) = self.quotes.pick(&self.phrases) else {
            return;
        };
        let phrase = phrase.replace("*/", "* /");
        let text = match leading_indent(self.source, at) {
            Some(indent) => format!("/* {} */\n{}", phrase, indent),
            None => format!("/* {} */ ", phrase),
        };
        self.edits.push(Edit::insert(at, text));
    }
}

/// Both neighbours of `start..end` keep a word from fusing with other tokens
fn operator_fits(source: &str, start: usize, end: usize) -> bool {
    let separates = |c: Option<char>| match c {
        None => true,
        Some(c) => c.is_whitespace() || "()[]{},;\"'`".contains(c),
    };
    separates(source[..start].chars().next_back()) && separates(source[end..].chars().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Framework;

    fn forward_with(source: &str, options: TranspilerOptions) -> Rewritten {
        let table = MappingTable::builtin();
        let classifier = Classifier::new(options.framework);
        let context = ForwardContext {
            table: &table,
            classifier: &classifier,
            options: &options,
        };
        rewrite_forward(source, context, &mut QuoteSource::seeded(1)).unwrap()
    }

    fn forward(source: &str) -> String {
        forward_with(source, TranspilerOptions::default()).code
    }

    #[test]
    fn test_keywords_and_operators() {
        assert_eq!(forward("const x = a === b;"), "tight x becomes a deeplyMatches b;");
    }

    #[test]
    fn test_property_names_untouched() {
        assert_eq!(
            forward("let o = { if: 1 }; o.if;"),
            "loose o becomes { if: 1 }; o.if;"
        );
    }

    #[test]
    fn test_method_callee_and_builtin_object() {
        assert_eq!(
            forward("Promise.all(xs.map(f));"),
            "Commitment.all(xs.transform(f));"
        );
    }

    #[test]
    fn test_string_and_template_contents_untouched() {
        assert_eq!(forward("let s = \"if else\";"), "loose s becomes \"if else\";");
        assert_eq!(forward("let t = `if ${this}`;"), "loose t becomes `if ${self}`;");
    }

    #[test]
    fn test_type_positions() {
        assert_eq!(
            forward("let p: Promise<string> = null;"),
            "loose p: Commitment<rope> becomes emptyHole;"
        );
    }

    #[test]
    fn test_unseparated_operator_left_alone() {
        let result = forward_with("a=b;", TranspilerOptions::default());
        assert_eq!(result.code, "a=b;");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_strict_mode_annotates_operator() {
        let options = TranspilerOptions {
            strict_mode: true,
            ..TranspilerOptions::default()
        };
        let result = forward_with("a=b;", options);
        assert_eq!(result.code, "a= /* gachi: = -> becomes */b;");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(!result.diagnostics.has_errors());
    }

    #[test]
    fn test_strict_annotation_after_division_stays_a_block_comment() {
        let options = TranspilerOptions {
            strict_mode: true,
            ..TranspilerOptions::default()
        };
        let result = forward_with("x = a/b;", options.clone());
        assert_eq!(result.code, "x becomes a/ /* gachi: / -> dividedBy */b;");

        let result = forward_with("x = a*b/c;", options);
        assert_eq!(
            result.code,
            "x becomes a* /* gachi: * -> times */b/ /* gachi: / -> dividedBy */c;"
        );
        assert!(!result.code.contains("//"));
    }

    #[test]
    fn test_comments_removed_when_not_preserved() {
        let options = TranspilerOptions {
            preserve_comments: false,
            ..TranspilerOptions::default()
        };
        let result = forward_with("// head\nconst a = 1; /* tail */\n", options);
        assert_eq!(result.code, "tight a becomes 1;\n");
    }

    #[test]
    fn test_comments_kept_by_default() {
        assert_eq!(forward("// if\nif (a) {}"), "// if\nwhenHard (a) {}");
    }

    #[test]
    fn test_random_quotes_before_declarations() {
        let options = TranspilerOptions {
            add_random_quotes: true,
            ..TranspilerOptions::default()
        };
        let result = forward_with("export function f() {}\n  class A {}\n", options);
        let lines: Vec<&str> = result.code.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("/* ") && lines[0].ends_with(" */"));
        assert_eq!(lines[1], "share performance f() {}");
        assert!(lines[2].starts_with("  /* "));
        assert_eq!(lines[3], "  gymClass A {}");
    }

    #[test]
    fn test_react_markup_names() {
        let options = TranspilerOptions::default().with_framework(Framework::React);
        let result = forward_with("const el = <div className=\"if\">hi</div>;", options);
        assert_eq!(
            result.code,
            "tight el becomes <dungeon className=\"if\">hi</dungeon>;"
        );
    }

    #[test]
    fn test_angular_decorator_and_selector() {
        let options = TranspilerOptions::default().with_framework(Framework::Angular);
        let source = "@Component({ selector: 'app-root', template: 'app-root' })\nclass AppComponent {}";
        let result = forward_with(source, options);
        assert_eq!(
            result.code,
            "@Performer({ selector: 'dungeon-root', template: 'app-root' })\ngymClass AppComponent {}"
        );
    }

    #[test]
    fn test_invalid_substitution_is_a_warning() {
        let mut table = MappingTable::builtin();
        table.add("greet", "not valid");
        let options = TranspilerOptions::default();
        let classifier = Classifier::new(Framework::None);
        let context = ForwardContext {
            table: &table,
            classifier: &classifier,
            options: &options,
        };
        let result = rewrite_forward("const a = greet;", context, &mut QuoteSource::seeded(1)).unwrap();
        assert_eq!(result.code, "tight a becomes greet;");
        assert_eq!(result.diagnostics.len(), 1);
        let warning = result.diagnostics.iter().next().unwrap();
        assert!(warning.message.starts_with("failed to transform identifier `greet` at 1:11"));
    }

    #[test]
    fn test_parse_failure_aborts() {
        let table = MappingTable::builtin();
        let options = TranspilerOptions::default();
        let classifier = Classifier::new(Framework::None);
        let context = ForwardContext {
            table: &table,
            classifier: &classifier,
            options: &options,
        };
        let err = rewrite_forward("const = ;", context, &mut QuoteSource::seeded(1)).unwrap_err();
        assert!(matches!(err, RewriteError::Parse(_)));
        assert!(err.to_diagnostic().is_error());
    }

    #[test]
    fn test_operator_fits() {
        assert!(operator_fits("a + b", 2, 3));
        assert!(operator_fits("(+)", 1, 2));
        assert!(!operator_fits("a+b", 1, 2));
        assert!(!operator_fits("!x", 0, 1));
    }
}
