//! Reverse-index builder
//!
//! Inverts the table's `(host -> substituted)` pairs. Pairs are visited in
//! table order and the last pair producing a substituted form wins; every
//! pair that loses is recorded as a [`Collision`].

use super::{Category, Framework, LexicalAtom, MappingTable};
use crate::diagnostics::Diagnostic;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Which sections feed the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexScope {
    /// Every section, including phrases and all frameworks
    Full,
    /// Code categories plus the given framework's identifiers
    Framework(Framework),
}

impl IndexScope {
    fn admits(&self, atom: &LexicalAtom<'_>) -> bool {
        match self {
            IndexScope::Full => true,
            IndexScope::Framework(active) => {
                atom.category != Category::Phrase && atom.framework.map_or(true, |f| f == *active)
            }
        }
    }
}

/// Two host forms producing the same substituted form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub substituted: String,
    /// Host form the index resolves to
    pub kept: String,
    /// Host form that can no longer be recovered
    pub dropped: String,
    pub same_category: bool,
}

impl Collision {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(format!("mapping collision: {}", self))
    }
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is produced by both `{}` and `{}`, reverse resolves to `{}`",
            self.substituted, self.dropped, self.kept, self.kept
        )?;
        if self.same_category {
            write!(f, " (same category)")?;
        }
        Ok(())
    }
}

/// Substituted form to host form
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    entries: IndexMap<String, String>,
    collisions: Vec<Collision>,
}

impl ReverseIndex {
    pub fn build(table: &MappingTable, scope: IndexScope) -> Self {
        let mut entries: IndexMap<String, (String, Category)> = IndexMap::new();
        let mut collisions = Vec::new();

        for atom in table.atoms().filter(|atom| scope.admits(atom)) {
            if atom.substituted.is_empty() {
                continue;
            }
            match entries.get_mut(atom.substituted) {
                Some((host, category)) if host.as_str() != atom.host => {
                    collisions.push(Collision {
                        substituted: atom.substituted.to_string(),
                        kept: atom.host.to_string(),
                        dropped: std::mem::replace(host, atom.host.to_string()),
                        same_category: *category == atom.category,
                    });
                    *category = atom.category;
                }
                Some(_) => {}
                None => {
                    entries.insert(atom.substituted.to_string(), (atom.host.to_string(), atom.category));
                }
            }
        }

        ReverseIndex {
            entries: entries.into_iter().map(|(subst, (host, _))| (subst, host)).collect(),
            collisions,
        }
    }

    pub fn get(&self, substituted: &str) -> Option<&str> {
        self.entries.get(substituted).map(String::as_str)
    }

    pub fn contains(&self, substituted: &str) -> bool {
        self.entries.contains_key(substituted)
    }

    /// `(substituted, host)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, h)| (s.as_str(), h.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Substituted forms related to `word`.
    ///
    /// A form matches when either string contains the other, ignoring case.
    /// Results follow index order, not relevance.
    pub fn suggestions(&self, word: &str, limit: usize) -> Vec<&str> {
        let needle = word.to_lowercase();
        self.entries
            .keys()
            .filter(|key| {
                let key = key.to_lowercase();
                key.contains(&needle) || needle.contains(&key)
            })
            .take(limit)
            .map(String::as_str)
            .collect()
    }

    pub(super) fn into_parts(self) -> (IndexMap<String, String>, Vec<Collision>) {
        (self.entries, self.collisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_index_matches_table_reverse() {
        let table = MappingTable::builtin();
        let index = ReverseIndex::build(&table, IndexScope::Full);
        assert_eq!(index.len(), table.atoms().count());
        for (substituted, host) in index.iter() {
            assert_eq!(table.reverse(substituted), host);
        }
    }

    #[test]
    fn test_scoped_index_excludes_other_frameworks_and_phrases() {
        let table = MappingTable::builtin();
        let index = ReverseIndex::build(&table, IndexScope::Framework(Framework::Angular));
        assert_eq!(index.get("@Performer"), Some("@Component"));
        assert_eq!(index.get("whenHard"), Some("if"));
        assert!(!index.contains("holdState"));
        assert!(!index.contains("Boy next door"));

        let none = ReverseIndex::build(&table, IndexScope::Framework(Framework::None));
        assert!(!none.contains("@Performer"));
        assert!(none.contains("deeplyMatches"));
    }

    #[test]
    fn test_last_inserted_wins_and_collision_recorded() {
        let mut table = MappingTable::empty();
        table.add_to(Category::Keyword, None, "first", "shared").unwrap();
        table.add_to(Category::BuiltinObject, None, "second", "shared").unwrap();

        let index = ReverseIndex::build(&table, IndexScope::Full);
        assert_eq!(index.get("shared"), Some("second"));
        assert_eq!(index.collisions().len(), 1);
        let collision = &index.collisions()[0];
        assert_eq!(collision.dropped, "first");
        assert!(!collision.same_category);
        assert!(collision.to_diagnostic().message.starts_with("mapping collision"));
    }

    #[test]
    fn test_same_host_in_two_sections_is_not_a_collision() {
        let mut table = MappingTable::empty();
        table.add_to(Category::FrameworkIdentifier, Some(Framework::React), "x", "y").unwrap();
        table.add_to(Category::FrameworkIdentifier, Some(Framework::Vue), "x", "y").unwrap();
        let index = ReverseIndex::build(&table, IndexScope::Full);
        assert!(index.collisions().is_empty());
    }

    #[test]
    fn test_suggestions_substring_either_direction() {
        let table = MappingTable::builtin();
        let index = ReverseIndex::build(&table, IndexScope::Framework(Framework::None));

        let found = index.suggestions("WHENHARDER", 5);
        assert_eq!(found, vec!["whenHard"]);

        let found = index.suggestions("deeply", 5);
        assert_eq!(found, vec!["deeplyMatches", "deeplyDiffers"]);
    }

    #[test]
    fn test_suggestions_limit() {
        let table = MappingTable::builtin();
        let index = ReverseIndex::build(&table, IndexScope::Full);
        assert_eq!(index.suggestions("e", 5).len(), 5);
    }
}
