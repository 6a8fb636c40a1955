//! Closed syntax model over the Tree-sitter tree
//!
//! The rewriter never matches on raw node-kind strings. Every node it cares
//! about is folded into a [`Site`]: the node's own [`NodeTag`], the context
//! its parent provides ([`ParentTag`]) and the child slot it occupies
//! ([`Slot`]).

use super::config::SYNTAX;
use tree_sitter::Node;

/// Node kinds the rewriter recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Identifier,
    Keyword,
    Operator,
    StringLiteral,
    TemplateLiteral,
    Decorator,
    PropertyAssignment,
    MethodDeclaration,
    FunctionDeclaration,
    VariableDeclaration,
    TypeReference,
    MarkupElement,
}

impl NodeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeTag::Identifier => "identifier",
            NodeTag::Keyword => "keyword",
            NodeTag::Operator => "operator",
            NodeTag::StringLiteral => "string literal",
            NodeTag::TemplateLiteral => "template literal",
            NodeTag::Decorator => "decorator",
            NodeTag::PropertyAssignment => "property assignment",
            NodeTag::MethodDeclaration => "method declaration",
            NodeTag::FunctionDeclaration => "function declaration",
            NodeTag::VariableDeclaration => "variable declaration",
            NodeTag::TypeReference => "type reference",
            NodeTag::MarkupElement => "markup element",
        }
    }
}

/// Context a parent node gives its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentTag {
    /// `obj.name`
    PropertyAccess,
    /// `obj.name(...)`: a property access used as a call callee
    MethodCall,
    PropertyAssignment,
    ImportSpecifier,
    ExportSpecifier,
    Decorator,
    MarkupElement,
    MarkupAttribute,
    Expression,
    VariableDeclaration,
    MethodDeclaration,
    FunctionDeclaration,
    TypePosition,
    Other,
}

/// Child slot, derived from Tree-sitter field names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Name,
    Key,
    Value,
    Property,
    Object,
    Callee,
    Alias,
    Operator,
    Other,
}

/// Everything the classifier may look at for one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'s> {
    pub tag: NodeTag,
    pub parent: ParentTag,
    pub slot: Slot,
    pub text: &'s str,
    /// For a string in value position: the key of its property assignment
    pub property_key: Option<&'s str>,
}

impl<'s> Site<'s> {
    pub fn new(tag: NodeTag, text: &'s str) -> Self {
        Site {
            tag,
            parent: ParentTag::Other,
            slot: Slot::Other,
            text,
            property_key: None,
        }
    }

    pub fn with_parent(mut self, parent: ParentTag, slot: Slot) -> Self {
        self.parent = parent;
        self.slot = slot;
        self
    }

    pub fn with_property_key(mut self, key: &'s str) -> Self {
        self.property_key = Some(key);
        self
    }
}

/// True for identifier-shaped text
pub fn is_word(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Tag for a node, or `None` when the rewriter ignores it
pub fn node_tag(node: Node<'_>, text: &str) -> Option<NodeTag> {
    let kind = node.kind();
    if SYNTAX.is_identifier(kind) {
        return Some(NodeTag::Identifier);
    }
    if SYNTAX.is_type_identifier(kind) {
        return Some(NodeTag::TypeReference);
    }
    if let Some(tag) = SYNTAX.element_tag(kind) {
        return Some(tag);
    }
    if SYNTAX.is_keyword_literal(kind) {
        return is_word(text).then_some(NodeTag::Keyword);
    }
    if node.child_count() > 0 || text.is_empty() || node.is_named() {
        return None;
    }
    if is_word(text) {
        Some(NodeTag::Keyword)
    } else {
        Some(NodeTag::Operator)
    }
}

/// Build the site for `node`, reached from `parent` through `field`
pub fn site<'s>(node: Node<'_>, parent: Option<Node<'_>>, field: Option<&str>, source: &'s str) -> Option<Site<'s>> {
    let text = source.get(node.start_byte()..node.end_byte())?;
    let tag = node_tag(node, text)?;
    let slot = SYNTAX.slot(field);

    let Some(parent) = parent else {
        return Some(Site::new(tag, text).with_parent(ParentTag::Other, slot));
    };

    if SYNTAX.is_shorthand(node.kind()) {
        return Some(Site::new(tag, text).with_parent(ParentTag::PropertyAssignment, Slot::Key));
    }

    let parent_tag = match parent.kind() {
        "member_expression" if slot == Slot::Property && is_call_callee(parent) => ParentTag::MethodCall,
        "call_expression" if slot == Slot::Callee && parent.parent().is_some_and(|g| g.kind() == "decorator") => {
            ParentTag::Decorator
        }
        kind => SYNTAX.parent_tag(kind),
    };

    let mut site = Site::new(tag, text).with_parent(parent_tag, slot);
    if tag == NodeTag::StringLiteral && parent_tag == ParentTag::PropertyAssignment && slot == Slot::Value {
        if let Some(key) = property_key(parent, source) {
            site = site.with_property_key(key);
        }
    }
    Some(site)
}

fn is_call_callee(member: Node<'_>) -> bool {
    member
        .parent()
        .filter(|p| p.kind() == "call_expression")
        .and_then(|call| call.child_by_field_name("function"))
        .is_some_and(|callee| callee.id() == member.id())
}

fn property_key<'s>(pair: Node<'_>, source: &'s str) -> Option<&'s str> {
    let key = pair.child_by_field_name("key")?;
    let text = source.get(key.start_byte()..key.end_byte())?;
    Some(text.trim_matches(|c| c == '"' || c == '\''))
}

/// Node that receives a decorative comment for a declaration
pub fn decoration_anchor(node: Node<'_>) -> Node<'_> {
    match node.parent() {
        Some(parent) if SYNTAX.is_anchor_wrapper(parent.kind()) => parent,
        _ => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_source, Dialect};

    /// Collect sites for every node whose text equals `needle`
    fn sites_for<'s>(source: &'s str, dialect: Dialect, needle: &str) -> Vec<Site<'s>> {
        let tree = parse_source(source, dialect).unwrap();
        let mut out = Vec::new();
        collect(tree.root_node(), None, None, source, needle, &mut out);
        out
    }

    fn collect<'s>(
        node: Node<'_>,
        parent: Option<Node<'_>>,
        field: Option<&str>,
        source: &'s str,
        needle: &str,
        out: &mut Vec<Site<'s>>,
    ) {
        if let Some(site) = site(node, parent, field, source) {
            if site.text == needle {
                out.push(site);
            }
        }
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let field = cursor.field_name();
                collect(cursor.node(), Some(node), field, source, needle, out);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_is_word() {
        assert!(is_word("const"));
        assert!(is_word("$el"));
        assert!(is_word("_x1"));
        assert!(!is_word("==="));
        assert!(!is_word("1a"));
        assert!(!is_word(""));
    }

    #[test]
    fn test_keyword_vs_property_name() {
        let sites = sites_for("const x = { const: 1 }; x.const;", Dialect::TypeScript, "const");
        let tags: Vec<_> = sites.iter().map(|s| (s.tag, s.parent, s.slot)).collect();
        assert_eq!(
            tags,
            vec![
                (NodeTag::Keyword, ParentTag::VariableDeclaration, Slot::Other),
                (NodeTag::Identifier, ParentTag::PropertyAssignment, Slot::Key),
                (NodeTag::Identifier, ParentTag::PropertyAccess, Slot::Property),
            ]
        );
    }

    #[test]
    fn test_method_call_callee() {
        let sites = sites_for("items.map(f); items.map;", Dialect::TypeScript, "map");
        assert_eq!(sites[0].parent, ParentTag::MethodCall);
        assert_eq!(sites[1].parent, ParentTag::PropertyAccess);
    }

    #[test]
    fn test_operator_context() {
        let sites = sites_for("a = b === c;", Dialect::TypeScript, "===");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].tag, NodeTag::Operator);
        assert_eq!(sites[0].parent, ParentTag::Expression);
        assert_eq!(sites[0].slot, Slot::Operator);
    }

    #[test]
    fn test_import_specifier() {
        let sites = sites_for("import { useState } from 'react';", Dialect::TypeScript, "useState");
        assert_eq!(sites[0].parent, ParentTag::ImportSpecifier);
    }

    #[test]
    fn test_shorthand_property_is_key() {
        let sites = sites_for("const o = { state };", Dialect::TypeScript, "state");
        assert_eq!(sites[0].parent, ParentTag::PropertyAssignment);
        assert_eq!(sites[0].slot, Slot::Key);
    }

    #[test]
    fn test_decorator_callee() {
        let sites = sites_for("@Component({ selector: 'app-root' })\nclass A {}", Dialect::TypeScript, "Component");
        assert_eq!(sites[0].tag, NodeTag::Identifier);
        assert_eq!(sites[0].parent, ParentTag::Decorator);
    }

    #[test]
    fn test_metadata_string_has_property_key() {
        let sites = sites_for("x({ selector: 'app-root' });", Dialect::TypeScript, "'app-root'");
        assert_eq!(sites[0].tag, NodeTag::StringLiteral);
        assert_eq!(sites[0].property_key, Some("selector"));
    }

    #[test]
    fn test_markup_tag_name() {
        let sites = sites_for("const a = <div className=\"x\">hi</div>;", Dialect::Tsx, "div");
        assert_eq!(sites.len(), 2);
        assert!(sites.iter().all(|s| s.parent == ParentTag::MarkupElement && s.slot == Slot::Name));
        let attr = sites_for("const a = <div className=\"x\">hi</div>;", Dialect::Tsx, "className");
        assert_eq!(attr[0].parent, ParentTag::MarkupAttribute);
    }

    #[test]
    fn test_type_reference_and_predefined_type() {
        let source = "let p: Promise<string>;";
        let promise = sites_for(source, Dialect::TypeScript, "Promise");
        assert_eq!(promise[0].tag, NodeTag::TypeReference);
        let string = sites_for(source, Dialect::TypeScript, "string");
        assert_eq!(string[0].tag, NodeTag::Keyword);
    }

    #[test]
    fn test_keyword_literals() {
        let sites = sites_for("this.a = null;", Dialect::TypeScript, "this");
        assert_eq!(sites[0].tag, NodeTag::Keyword);
        let sites = sites_for("this.a = null;", Dialect::TypeScript, "null");
        assert_eq!(sites[0].tag, NodeTag::Keyword);
    }
}
