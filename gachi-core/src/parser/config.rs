//! Node-kind tables for the JavaScript/TypeScript grammars
//!
//! The syntax adapter reads these tables to fold Tree-sitter's open-ended
//! node kinds into the closed tag set the rewriter dispatches on.

use super::syntax::{NodeTag, ParentTag, Slot};

/// Node-kind configuration shared by the JS, TS and TSX grammars
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
    /// Leaf kinds that name a value, binding or member
    pub identifier_kinds: &'static [&'static str],

    /// Shorthand forms where the identifier is also the property key
    pub shorthand_kinds: &'static [&'static str],

    /// Leaf kinds in type position
    pub type_identifier_kinds: &'static [&'static str],

    /// Named nodes whose whole text is a reserved word
    pub keyword_literal_kinds: &'static [&'static str],

    /// Map structural node kinds to their tag
    /// e.g., ("method_definition", MethodDeclaration)
    pub element_mappings: &'static [(&'static str, NodeTag)],

    /// Map node kinds to the parent context they provide to their children
    pub parent_mappings: &'static [(&'static str, ParentTag)],

    /// Map Tree-sitter field names to slots
    pub slot_mappings: &'static [(&'static str, Slot)],

    /// Declarations that receive decorative comments
    pub anchor_kinds: &'static [&'static str],

    /// Node kinds that wrap a declaration and become the anchor instead
    pub anchor_wrapper_kinds: &'static [&'static str],

    /// Comment kinds
    pub comment_kinds: &'static [&'static str],
}

impl SyntaxConfig {
    pub fn is_identifier(&self, kind: &str) -> bool {
        self.identifier_kinds.contains(&kind)
    }

    pub fn is_shorthand(&self, kind: &str) -> bool {
        self.shorthand_kinds.contains(&kind)
    }

    pub fn is_type_identifier(&self, kind: &str) -> bool {
        self.type_identifier_kinds.contains(&kind)
    }

    pub fn is_keyword_literal(&self, kind: &str) -> bool {
        self.keyword_literal_kinds.contains(&kind)
    }

    pub fn element_tag(&self, kind: &str) -> Option<NodeTag> {
        self.element_mappings
            .iter()
            .find(|(from, _)| *from == kind)
            .map(|(_, tag)| *tag)
    }

    pub fn parent_tag(&self, kind: &str) -> ParentTag {
        self.parent_mappings
            .iter()
            .find(|(from, _)| *from == kind)
            .map(|(_, tag)| *tag)
            .unwrap_or(ParentTag::Other)
    }

    pub fn slot(&self, field: Option<&str>) -> Slot {
        field
            .and_then(|name| self.slot_mappings.iter().find(|(from, _)| *from == name))
            .map(|(_, slot)| *slot)
            .unwrap_or(Slot::Other)
    }

    pub fn is_anchor(&self, kind: &str) -> bool {
        self.anchor_kinds.contains(&kind)
    }

    pub fn is_anchor_wrapper(&self, kind: &str) -> bool {
        self.anchor_wrapper_kinds.contains(&kind)
    }

    pub fn is_comment(&self, kind: &str) -> bool {
        self.comment_kinds.contains(&kind)
    }
}

pub static SYNTAX: SyntaxConfig = SyntaxConfig {
    identifier_kinds: &[
        "identifier",
        "property_identifier",
        "shorthand_property_identifier",
        "shorthand_property_identifier_pattern",
        "statement_identifier",
    ],
    shorthand_kinds: &[
        "shorthand_property_identifier",
        "shorthand_property_identifier_pattern",
    ],
    type_identifier_kinds: &["type_identifier"],
    keyword_literal_kinds: &[
        "this",
        "super",
        "true",
        "false",
        "null",
        "undefined",
        "import",
        "predefined_type",
        "accessibility_modifier",
    ],
    element_mappings: &[
        ("string", NodeTag::StringLiteral),
        ("template_string", NodeTag::TemplateLiteral),
        ("decorator", NodeTag::Decorator),
        ("pair", NodeTag::PropertyAssignment),
        ("pair_pattern", NodeTag::PropertyAssignment),
        ("method_definition", NodeTag::MethodDeclaration),
        ("method_signature", NodeTag::MethodDeclaration),
        ("abstract_method_signature", NodeTag::MethodDeclaration),
        ("function_declaration", NodeTag::FunctionDeclaration),
        ("generator_function_declaration", NodeTag::FunctionDeclaration),
        ("function_signature", NodeTag::FunctionDeclaration),
        ("lexical_declaration", NodeTag::VariableDeclaration),
        ("variable_declaration", NodeTag::VariableDeclaration),
        ("variable_declarator", NodeTag::VariableDeclaration),
        ("jsx_opening_element", NodeTag::MarkupElement),
        ("jsx_closing_element", NodeTag::MarkupElement),
        ("jsx_self_closing_element", NodeTag::MarkupElement),
    ],
    parent_mappings: &[
        ("member_expression", ParentTag::PropertyAccess),
        ("pair", ParentTag::PropertyAssignment),
        ("pair_pattern", ParentTag::PropertyAssignment),
        ("object", ParentTag::PropertyAssignment),
        ("object_pattern", ParentTag::PropertyAssignment),
        ("import_specifier", ParentTag::ImportSpecifier),
        ("export_specifier", ParentTag::ExportSpecifier),
        ("decorator", ParentTag::Decorator),
        ("jsx_opening_element", ParentTag::MarkupElement),
        ("jsx_closing_element", ParentTag::MarkupElement),
        ("jsx_self_closing_element", ParentTag::MarkupElement),
        ("jsx_attribute", ParentTag::MarkupAttribute),
        ("binary_expression", ParentTag::Expression),
        ("assignment_expression", ParentTag::Expression),
        ("augmented_assignment_expression", ParentTag::Expression),
        ("unary_expression", ParentTag::Expression),
        ("update_expression", ParentTag::Expression),
        ("ternary_expression", ParentTag::Expression),
        ("arrow_function", ParentTag::Expression),
        ("spread_element", ParentTag::Expression),
        ("lexical_declaration", ParentTag::VariableDeclaration),
        ("variable_declaration", ParentTag::VariableDeclaration),
        ("variable_declarator", ParentTag::VariableDeclaration),
        ("method_definition", ParentTag::MethodDeclaration),
        ("method_signature", ParentTag::MethodDeclaration),
        ("function_declaration", ParentTag::FunctionDeclaration),
        ("generator_function_declaration", ParentTag::FunctionDeclaration),
        ("type_annotation", ParentTag::TypePosition),
        ("type_arguments", ParentTag::TypePosition),
        ("generic_type", ParentTag::TypePosition),
        ("implements_clause", ParentTag::TypePosition),
        ("extends_type_clause", ParentTag::TypePosition),
    ],
    slot_mappings: &[
        ("name", Slot::Name),
        ("key", Slot::Key),
        ("value", Slot::Value),
        ("property", Slot::Property),
        ("object", Slot::Object),
        ("function", Slot::Callee),
        ("alias", Slot::Alias),
        ("operator", Slot::Operator),
    ],
    anchor_kinds: &[
        "function_declaration",
        "generator_function_declaration",
        "class_declaration",
        "abstract_class_declaration",
    ],
    anchor_wrapper_kinds: &["export_statement"],
    comment_kinds: &["comment", "html_comment"],
};
