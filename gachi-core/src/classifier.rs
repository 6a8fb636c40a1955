//! Lexical classifier
//!
//! Decides, per [`Site`], whether the forward walker may substitute the
//! node's text and which table lookup to use. The decision is a pure match
//! over the site's tag, parent tag and slot plus a few framework rules
//! fixed at construction.

use crate::dictionary::{Category, Framework};
use crate::parser::syntax::{NodeTag, ParentTag, Site, Slot};

/// Host-runtime globals that are never rewritten
pub static RUNTIME_GLOBALS: &[&str] = &[
    "console",
    "window",
    "document",
    "global",
    "globalThis",
    "process",
    "Buffer",
    "fs",
    "path",
    "__dirname",
    "__filename",
    "require",
    "module",
    "exports",
];

/// How an eligible node is looked up in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Every code category in priority order
    Code,
    /// A single category
    Category(Category),
    /// `@name` in the framework identifiers, falling back to [`Lookup::Code`]
    Decorator,
    /// The contents of a string literal, in the framework identifiers
    StringContent,
}

/// Why a node is left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PropertyName,
    ModuleSpecifier,
    RuntimeGlobal,
    StringData,
    MarkupAttribute,
    FrameworkDisabled,
    OperatorContext,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::PropertyName => "property name",
            SkipReason::ModuleSpecifier => "module specifier",
            SkipReason::RuntimeGlobal => "runtime global",
            SkipReason::StringData => "string data",
            SkipReason::MarkupAttribute => "markup attribute",
            SkipReason::FrameworkDisabled => "framework rule disabled",
            SkipReason::OperatorContext => "operator outside an expression",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Substitute(Lookup),
    /// Leave the node and everything below it alone
    Skip(SkipReason),
    /// Nothing to substitute here, visit the children
    Descend,
}

/// Framework-dependent switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierRules {
    pub framework: Framework,
    /// Decorator names are eligible
    pub decorators: bool,
    /// Markup tag names are eligible
    pub markup: bool,
    /// Property keys whose string values are rewritten
    pub metadata_keys: &'static [&'static str],
}

impl ClassifierRules {
    pub fn for_framework(framework: Framework) -> Self {
        match framework {
            Framework::Angular => ClassifierRules {
                framework,
                decorators: true,
                markup: false,
                metadata_keys: &["selector"],
            },
            Framework::React => ClassifierRules {
                framework,
                decorators: false,
                markup: true,
                metadata_keys: &[],
            },
            Framework::Vue | Framework::None => ClassifierRules {
                framework,
                decorators: false,
                markup: false,
                metadata_keys: &[],
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    rules: ClassifierRules,
}

impl Classifier {
    pub fn new(framework: Framework) -> Self {
        Self::with_rules(ClassifierRules::for_framework(framework))
    }

    pub fn with_rules(rules: ClassifierRules) -> Self {
        Classifier { rules }
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    pub fn classify(&self, site: &Site<'_>) -> Verdict {
        match site.tag {
            NodeTag::Identifier => self.classify_identifier(site),
            NodeTag::Keyword | NodeTag::TypeReference => Verdict::Substitute(Lookup::Code),
            NodeTag::Operator => match site.parent {
                ParentTag::Expression | ParentTag::VariableDeclaration => {
                    Verdict::Substitute(Lookup::Category(Category::Operator))
                }
                _ => Verdict::Skip(SkipReason::OperatorContext),
            },
            NodeTag::StringLiteral => match site.property_key {
                Some(key) if self.rules.metadata_keys.contains(&key) => Verdict::Substitute(Lookup::StringContent),
                _ => Verdict::Skip(SkipReason::StringData),
            },
            // Substitutions inside `${...}` are still wanted
            NodeTag::TemplateLiteral => Verdict::Descend,
            NodeTag::Decorator
            | NodeTag::PropertyAssignment
            | NodeTag::MethodDeclaration
            | NodeTag::FunctionDeclaration
            | NodeTag::VariableDeclaration
            | NodeTag::MarkupElement => Verdict::Descend,
        }
    }

    fn classify_identifier(&self, site: &Site<'_>) -> Verdict {
        match (site.parent, site.slot) {
            (ParentTag::ImportSpecifier | ParentTag::ExportSpecifier, _) => {
                Verdict::Skip(SkipReason::ModuleSpecifier)
            }
            (ParentTag::PropertyAssignment, Slot::Key) => Verdict::Skip(SkipReason::PropertyName),
            (ParentTag::MarkupAttribute, _) => Verdict::Skip(SkipReason::MarkupAttribute),
            (ParentTag::PropertyAccess, Slot::Property) => Verdict::Skip(SkipReason::PropertyName),
            (ParentTag::MethodCall, Slot::Property) => {
                Verdict::Substitute(Lookup::Category(Category::BuiltinMethod))
            }
            _ if RUNTIME_GLOBALS.contains(&site.text) => Verdict::Skip(SkipReason::RuntimeGlobal),
            (ParentTag::Decorator, _) => {
                if self.rules.decorators {
                    Verdict::Substitute(Lookup::Decorator)
                } else {
                    Verdict::Skip(SkipReason::FrameworkDisabled)
                }
            }
            (ParentTag::MarkupElement, Slot::Name) => {
                if self.rules.markup {
                    Verdict::Substitute(Lookup::Code)
                } else {
                    Verdict::Skip(SkipReason::FrameworkDisabled)
                }
            }
            _ => Verdict::Substitute(Lookup::Code),
        }
    }
}
