//! Mapping table between host-language lexical atoms and GachiScript forms
//!
//! The table is partitioned into sections: one per [`Category`], with the
//! framework-specific identifiers split into one section per [`Framework`].
//! Sections are kept in priority order, which is also the iteration order
//! used by lookups, exports and the reverse-index builder.

mod builtin;
pub mod reverse;

pub use reverse::{Collision, IndexScope, ReverseIndex};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Categories and frameworks
// =============================================================================

/// Lexical category of an atom, declared in lookup priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Keyword,
    Operator,
    Type,
    BuiltinMethod,
    BuiltinObject,
    FrameworkIdentifier,
    Phrase,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Keyword,
        Category::Operator,
        Category::Type,
        Category::BuiltinMethod,
        Category::BuiltinObject,
        Category::FrameworkIdentifier,
        Category::Phrase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Keyword => "keyword",
            Category::Operator => "operator",
            Category::Type => "type",
            Category::BuiltinMethod => "builtin_method",
            Category::BuiltinObject => "builtin_object",
            Category::FrameworkIdentifier => "framework_identifier",
            Category::Phrase => "phrase",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.to_lowercase().replace('-', "_");
        Category::ALL.into_iter().find(|c| c.as_str() == normalized)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI framework whose identifiers and classifier rules are active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    React,
    Angular,
    Vue,
    #[default]
    None,
}

impl Framework {
    /// Frameworks that own an identifier section, in lookup order
    pub const UI: [Framework; 3] = [Framework::React, Framework::Angular, Framework::Vue];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Angular => "angular",
            Framework::Vue => "vue",
            Framework::None => "none",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "react" => Some(Framework::React),
            "angular" => Some(Framework::Angular),
            "vue" => Some(Framework::Vue),
            "none" | "" => Some(Framework::None),
            _ => None,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One partition of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Section {
    pub category: Category,
    /// Set only for [`Category::FrameworkIdentifier`]
    pub framework: Option<Framework>,
}

impl Section {
    pub const fn new(category: Category, framework: Option<Framework>) -> Self {
        Section { category, framework }
    }

    const KEYWORD: Section = Section::new(Category::Keyword, None);
}

/// Sections in priority order
const SECTION_ORDER: [Section; 9] = [
    Section::new(Category::Keyword, None),
    Section::new(Category::Operator, None),
    Section::new(Category::Type, None),
    Section::new(Category::BuiltinMethod, None),
    Section::new(Category::BuiltinObject, None),
    Section::new(Category::FrameworkIdentifier, Some(Framework::React)),
    Section::new(Category::FrameworkIdentifier, Some(Framework::Angular)),
    Section::new(Category::FrameworkIdentifier, Some(Framework::Vue)),
    Section::new(Category::Phrase, None),
];

/// A mapped unit borrowed from the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LexicalAtom<'a> {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<Framework>,
    pub host: &'a str,
    pub substituted: &'a str,
}

// =============================================================================
// Errors, stats and the serializable record
// =============================================================================

#[derive(Error, Debug)]
pub enum TableError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("unknown framework: {0}")]
    UnknownFramework(String),
    #[error("category {category} {detail}")]
    SectionMismatch { category: Category, detail: &'static str },
    #[error("invalid dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Counts reported by [`MappingTable::stats`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub total_mappings: usize,
    pub reverse_entries: usize,
    pub categories: IndexMap<&'static str, usize>,
    pub frameworks: IndexMap<&'static str, usize>,
}

/// Plain serializable form of a table
///
/// `categories` is keyed by category name and never contains
/// `framework_identifier`; framework sections live under `frameworks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(default)]
    pub categories: IndexMap<String, IndexMap<String, String>>,
    #[serde(default)]
    pub frameworks: IndexMap<String, IndexMap<String, String>>,
}

// =============================================================================
// Mapping table
// =============================================================================

#[derive(Debug, Clone)]
pub struct MappingTable {
    sections: IndexMap<Section, IndexMap<String, String>>,
    reverse: IndexMap<String, String>,
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl MappingTable {
    /// A table with every section present and no entries
    pub fn empty() -> Self {
        MappingTable {
            sections: SECTION_ORDER.iter().map(|s| (*s, IndexMap::new())).collect(),
            reverse: IndexMap::new(),
        }
    }

    /// The built-in GachiScript vocabulary
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (section, entries) in builtin::SECTIONS {
            for (host, substituted) in entries.iter() {
                table.insert(*section, host.to_string(), substituted.to_string());
            }
        }
        table
    }

    /// Map a host form, falling back to identity.
    ///
    /// With no category every section is searched in priority order;
    /// framework identifiers are searched across all frameworks.
    pub fn forward<'a>(&'a self, host: &'a str, category: Option<Category>) -> &'a str {
        self.sections
            .iter()
            .filter(|(section, _)| category.map_or(true, |c| section.category == c))
            .find_map(|(_, entries)| entries.get(host))
            .map(String::as_str)
            .unwrap_or(host)
    }

    /// Lookup used while rewriting code.
    ///
    /// Framework identifiers are limited to `framework`'s section and an
    /// unqualified lookup never yields a [`Category::Phrase`].
    pub fn forward_scoped(&self, host: &str, category: Option<Category>, framework: Framework) -> Option<&str> {
        self.sections
            .iter()
            .filter(|(section, _)| match category {
                Some(c) => section.category == c,
                None => section.category != Category::Phrase,
            })
            .filter(|(section, _)| section.framework.map_or(true, |f| f == framework))
            .find_map(|(_, entries)| entries.get(host))
            .map(String::as_str)
    }

    /// Map a substituted form back, falling back to identity
    pub fn reverse<'a>(&'a self, substituted: &'a str) -> &'a str {
        self.reverse.get(substituted).map(String::as_str).unwrap_or(substituted)
    }

    pub fn has_host(&self, host: &str) -> bool {
        self.sections.values().any(|entries| entries.contains_key(host))
    }

    pub fn has_substituted(&self, substituted: &str) -> bool {
        self.reverse.contains_key(substituted)
    }

    /// Insert or overwrite a mapping.
    ///
    /// An already registered host is overwritten in the first section that
    /// holds it; a new host goes to [`Category::Keyword`]. Overwrites are
    /// silent; call [`MappingTable::check_integrity`] afterwards to surface
    /// collisions.
    pub fn add(&mut self, host: impl Into<String>, substituted: impl Into<String>) {
        let host = host.into();
        let section = SECTION_ORDER
            .iter()
            .copied()
            .find(|s| self.sections.get(s).is_some_and(|entries| entries.contains_key(&host)))
            .unwrap_or(Section::KEYWORD);
        self.insert(section, host, substituted.into());
    }

    /// Insert or overwrite a mapping in an explicit section
    pub fn add_to(
        &mut self,
        category: Category,
        framework: Option<Framework>,
        host: impl Into<String>,
        substituted: impl Into<String>,
    ) -> Result<(), TableError> {
        let section = section_for(category, framework)?;
        self.insert(section, host.into(), substituted.into());
        Ok(())
    }

    fn insert(&mut self, section: Section, host: String, substituted: String) {
        let previous = self
            .sections
            .entry(section)
            .or_default()
            .insert(host.clone(), substituted.clone());
        if let Some(previous) = previous {
            if previous != substituted && self.reverse.get(&previous) == Some(&host) {
                self.reverse.swap_remove(&previous);
            }
        }
        self.reverse.insert(substituted, host);
    }

    /// Remove `host` from every section. Returns whether anything was removed.
    ///
    /// When `host` owned a reverse entry, the index is rebuilt so another
    /// host with the same substituted form takes the entry over.
    pub fn remove(&mut self, host: &str) -> bool {
        let mut removed = false;
        let mut orphaned = false;
        for entries in self.sections.values_mut() {
            if let Some(substituted) = entries.shift_remove(host) {
                removed = true;
                orphaned |= self.reverse.get(&substituted).is_some_and(|h| h == host);
            }
        }
        if orphaned {
            let (entries, _) = ReverseIndex::build(self, IndexScope::Full).into_parts();
            self.reverse = entries;
        }
        removed
    }

    /// Rebuild the reverse index from scratch and report collisions
    pub fn check_integrity(&mut self) -> Vec<Collision> {
        let index = ReverseIndex::build(self, IndexScope::Full);
        let (entries, collisions) = index.into_parts();
        self.reverse = entries;
        collisions
    }

    /// All atoms in priority order
    pub fn atoms(&self) -> impl Iterator<Item = LexicalAtom<'_>> {
        self.sections.iter().flat_map(|(section, entries)| {
            entries.iter().map(move |(host, substituted)| LexicalAtom {
                category: section.category,
                framework: section.framework,
                host,
                substituted,
            })
        })
    }

    /// Atoms whose host or substituted form contains `word`, case-insensitively
    pub fn search(&self, word: &str) -> Vec<LexicalAtom<'_>> {
        let needle = word.to_lowercase();
        self.atoms()
            .filter(|atom| {
                atom.host.to_lowercase().contains(&needle) || atom.substituted.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Decorative phrases, in table order
    pub fn phrases(&self) -> Vec<&str> {
        self.sections
            .get(&Section::new(Category::Phrase, None))
            .map(|entries| entries.values().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> TableStats {
        let mut categories: IndexMap<&'static str, usize> =
            Category::ALL.iter().map(|c| (c.as_str(), 0)).collect();
        let mut frameworks: IndexMap<&'static str, usize> =
            Framework::UI.iter().map(|f| (f.as_str(), 0)).collect();

        for (section, entries) in &self.sections {
            *categories.entry(section.category.as_str()).or_default() += entries.len();
            if let Some(framework) = section.framework {
                *frameworks.entry(framework.as_str()).or_default() += entries.len();
            }
        }

        TableStats {
            total_mappings: self.len(),
            reverse_entries: self.reverse.len(),
            categories,
            frameworks,
        }
    }

    // -------------------------------------------------------------------------
    // Import / export
    // -------------------------------------------------------------------------

    pub fn export(&self) -> TableRecord {
        let mut record = TableRecord::default();
        for (section, entries) in &self.sections {
            let target = match section.framework {
                Some(framework) => record.frameworks.entry(framework.as_str().to_string()),
                None => record.categories.entry(section.category.as_str().to_string()),
            };
            target.or_default().extend(entries.iter().map(|(h, s)| (h.clone(), s.clone())));
        }
        record
    }

    pub fn from_record(record: &TableRecord) -> Result<Self, TableError> {
        let mut table = Self::empty();
        table.extend(record)?;
        table.check_integrity();
        Ok(table)
    }

    /// Merge a record into this table, overwriting existing hosts per section
    pub fn extend(&mut self, record: &TableRecord) -> Result<(), TableError> {
        for (name, entries) in &record.categories {
            let category = Category::from_name(name).ok_or_else(|| TableError::UnknownCategory(name.clone()))?;
            let section = section_for(category, None)?;
            for (host, substituted) in entries {
                self.insert(section, host.clone(), substituted.clone());
            }
        }
        for (name, entries) in &record.frameworks {
            let framework = Framework::from_name(name)
                .filter(|f| *f != Framework::None)
                .ok_or_else(|| TableError::UnknownFramework(name.clone()))?;
            let section = section_for(Category::FrameworkIdentifier, Some(framework))?;
            for (host, substituted) in entries {
                self.insert(section, host.clone(), substituted.clone());
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let record: TableRecord = serde_json::from_str(json)?;
        Self::from_record(&record)
    }
}

fn section_for(category: Category, framework: Option<Framework>) -> Result<Section, TableError> {
    match (category, framework) {
        (Category::FrameworkIdentifier, Some(Framework::None)) | (Category::FrameworkIdentifier, None) => {
            Err(TableError::SectionMismatch {
                category,
                detail: "requires a framework",
            })
        }
        (Category::FrameworkIdentifier, Some(framework)) => Ok(Section::new(category, Some(framework))),
        (_, Some(_)) => Err(TableError::SectionMismatch {
            category,
            detail: "does not take a framework",
        }),
        (_, None) => Ok(Section::new(category, None)),
    }
}
