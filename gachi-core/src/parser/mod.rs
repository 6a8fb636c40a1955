//! TreeSitter-based parser for the JavaScript/TypeScript host language
//!
//! Parsing is the black box the rewriter sits on: source text goes in, a
//! tree with byte ranges and positions comes out. Any ERROR or MISSING node
//! counts as a parse failure.

pub mod config;
pub mod syntax;

use crate::diagnostics::Position;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tree_sitter::{Node, Tree};

pub use config::{SyntaxConfig, SYNTAX};

/// Host-language grammar variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::JavaScript => "javascript",
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "javascript" | "js" | "jsx" => Some(Dialect::JavaScript),
            "typescript" | "ts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Detect dialect from a file path extension
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit('.').next().unwrap_or("");
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Some(Dialect::JavaScript),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Pick a grammar that accepts `source`: TSX when it contains markup,
    /// TypeScript otherwise.
    pub fn sniff(source: &str) -> Self {
        if has_markup(source) {
            Dialect::Tsx
        } else {
            Dialect::TypeScript
        }
    }

    fn language(&self) -> tree_sitter::Language {
        match self {
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</[A-Za-z][\w.\-]*\s*>|</>|<[A-Za-z][\w.\-]*(\s[^<>]*)?/>").unwrap());

static TYPE_SYNTAX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)\binterface\s+[A-Za-z_$]|^\s*(export\s+)?type\s+[A-Za-z_$][\w$]*\s*(<[^>]*>)?\s*=|\benum\s+[A-Za-z_$]",
        r"|[\w$)]\??\s*:\s*(string|number|boolean|any|unknown|never|void|object|bigint|symbol)\b",
        r"|\b(private|protected|public|readonly)\s+[A-Za-z_$]|\bimplements\s+[A-Za-z_$]|\bas\s+const\b",
    ))
    .unwrap()
});

/// True when the source contains JSX-like markup
pub fn has_markup(source: &str) -> bool {
    MARKUP_RE.is_match(source)
}

/// True when the source contains type-annotation syntax
pub fn has_type_syntax(source: &str) -> bool {
    TYPE_SYNTAX_RE.is_match(source)
}

/// Errors that can occur during parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("TreeSitter error: {0}")]
    TreeSitter(String),
    #[error("Failed to parse: {0}")]
    Parse(String),
    #[error("syntax error at {position}: {detail}")]
    Syntax { position: Position, detail: String },
}

impl ParseError {
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Parse source text, rejecting trees that contain errors
pub fn parse_source(source: &str, dialect: Dialect) -> Result<Tree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| ParseError::TreeSitter(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Parse("Failed to parse source".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        let node = first_error(root).unwrap_or(root);
        return Err(ParseError::Syntax {
            position: Position::from_point(node.start_position()),
            detail: describe_error(node, source),
        });
    }

    Ok(tree)
}

/// First ERROR or MISSING node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

fn describe_error(node: Node<'_>, source: &str) -> String {
    if node.is_missing() {
        return format!("missing `{}`", node.kind());
    }
    let text = source.get(node.start_byte()..node.end_byte()).unwrap_or("");
    let snippet: String = text.chars().take(30).collect();
    let snippet = snippet.lines().next().unwrap_or("");
    if snippet.trim().is_empty() {
        "unexpected token".to_string()
    } else {
        format!("unexpected `{}`", snippet.trim())
    }
}

/// One leaf token of a parsed program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: String,
    pub text: String,
    pub position: Position,
}

/// Leaf tokens in source order, comments excluded
pub fn tokens(tree: &Tree, source: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        let is_leaf = node.child_count() == 0;
        if is_leaf && !SYNTAX.is_comment(node.kind()) && node.start_byte() < node.end_byte() {
            out.push(Token {
                kind: node.kind().to_string(),
                text: source.get(node.start_byte()..node.end_byte()).unwrap_or("").to_string(),
                position: Position::from_point(node.start_position()),
            });
        }

        if !is_leaf && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return out;
            }
        }
    }
}

/// Byte ranges of every comment in the tree
pub fn comment_ranges(tree: &Tree) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    collect_comments(tree.root_node(), &mut ranges);
    ranges
}

fn collect_comments(node: Node<'_>, ranges: &mut Vec<(usize, usize)>) {
    if SYNTAX.is_comment(node.kind()) {
        ranges.push((node.start_byte(), node.end_byte()));
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_comments(child, ranges);
    }
}
