//! Lookup structures over a loaded technology list.
//!
//! A [`GraphIndex`] owns its technologies and is never patched in place: a
//! reload builds a fresh index and the old one is dropped together with
//! every result that borrowed from it.

use crate::error::{Diagnostic, GraphError, record};
use crate::id::TechId;
use crate::technology::{Category, Technology};
use std::collections::{BTreeSet, HashMap};

/// By-id and reverse-prerequisite lookups over an immutable technology list.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    /// Technologies in load order.
    technologies: Vec<Technology>,

    /// id -> position in `technologies`.
    by_id: HashMap<TechId, usize>,

    /// prerequisite id -> positions of the technologies that list it.
    dependents: HashMap<TechId, Vec<usize>>,

    /// Dangling references found while building.
    diagnostics: Vec<Diagnostic>,
}

impl GraphIndex {
    /// Build an index from a flat technology list. Two records with the same
    /// id abort the build; prerequisites that point at unknown ids are kept
    /// on the record but reported as diagnostics.
    pub fn build(technologies: Vec<Technology>) -> Result<Self, GraphError> {
        let mut by_id = HashMap::with_capacity(technologies.len());
        for (slot, tech) in technologies.iter().enumerate() {
            if by_id.insert(tech.id.clone(), slot).is_some() {
                return Err(GraphError::DuplicateId(tech.id.clone()));
            }
        }

        let mut dependents: HashMap<TechId, Vec<usize>> = HashMap::new();
        let mut diagnostics = Vec::new();

        for (slot, tech) in technologies.iter().enumerate() {
            for prereq in &tech.prerequisites {
                if by_id.contains_key(prereq) {
                    let entry = dependents.entry(prereq.clone()).or_default();
                    // A prerequisite listed twice still yields one reverse edge.
                    if entry.last() != Some(&slot) {
                        entry.push(slot);
                    }
                } else {
                    let diagnostic = Diagnostic::DanglingPrerequisite {
                        tech: tech.id.clone(),
                        missing: prereq.clone(),
                    };
                    diagnostic.emit();
                    record(&mut diagnostics, diagnostic);
                }
            }
        }

        tracing::debug!(
            technologies = technologies.len(),
            dangling = diagnostics.len(),
            "built technology graph index"
        );

        Ok(Self {
            technologies,
            by_id,
            dependents,
            diagnostics,
        })
    }

    // -- Query API --

    /// Get a technology by id, failing with `NotFound` for unknown ids.
    pub fn lookup(&self, id: impl AsRef<str>) -> Result<&Technology, GraphError> {
        let id = id.as_ref();
        self.get(id)
            .ok_or_else(|| GraphError::NotFound(TechId::new(id)))
    }

    /// Get a technology by id.
    pub fn get(&self, id: impl AsRef<str>) -> Option<&Technology> {
        self.by_id
            .get(id.as_ref())
            .map(|&slot| &self.technologies[slot])
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.by_id.contains_key(id.as_ref())
    }

    /// All technologies that list `id` as a direct prerequisite, in load order.
    pub fn dependents_of(&self, id: impl AsRef<str>) -> Result<Vec<&Technology>, GraphError> {
        let tech = self.lookup(id)?;
        Ok(self.direct_dependents(tech).collect())
    }

    /// Direct prerequisites of `id` that exist in the index, in authored order.
    pub fn prerequisites_of(&self, id: impl AsRef<str>) -> Result<Vec<&Technology>, GraphError> {
        let tech = self.lookup(id)?;
        Ok(tech
            .prerequisites
            .iter()
            .filter_map(|prereq| self.get(prereq))
            .collect())
    }

    /// Iterate over every technology in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Technology> {
        self.technologies.iter()
    }

    /// The technologies as a slice, in load order.
    pub fn technologies(&self) -> &[Technology] {
        &self.technologies
    }

    pub fn len(&self) -> usize {
        self.technologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
    }

    /// Dangling prerequisite references found at build time.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Distinct categories present in the index.
    pub fn categories(&self) -> BTreeSet<Category> {
        self.technologies.iter().map(|t| t.category).collect()
    }

    /// Distinct areas present in the index.
    pub fn areas(&self) -> BTreeSet<&str> {
        self.technologies.iter().map(|t| t.area.as_str()).collect()
    }

    /// Distinct tiers present in the index.
    pub fn tiers(&self) -> BTreeSet<u32> {
        self.technologies.iter().map(|t| t.tier).collect()
    }

    /// Case-insensitive substring match on id and name. An empty or blank
    /// query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Technology> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.technologies
            .iter()
            .filter(|t| {
                t.id.as_str().to_lowercase().contains(&needle)
                    || t.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // -- Internal helpers --

    pub(crate) fn direct_dependents<'a>(
        &'a self,
        tech: &'a Technology,
    ) -> impl Iterator<Item = &'a Technology> + 'a {
        self.dependents
            .get(tech.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&slot| &self.technologies[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn lookup_known_and_unknown() {
        let index = lasers_index();
        assert_eq!(index.lookup("tech_lasers_1").unwrap().tier, 0);
        assert_eq!(
            index.lookup("tech_plasma_1").unwrap_err(),
            GraphError::NotFound(TechId::new("tech_plasma_1"))
        );
        assert!(index.get("tech_plasma_1").is_none());
        assert!(index.contains("tech_lasers_2"));
    }

    #[test]
    fn duplicate_ids_abort_the_build() {
        let result = GraphIndex::build(vec![
            tech("tech_a", 0, Category::Physics, "particles", &[]),
            tech("tech_b", 0, Category::Physics, "particles", &[]),
            tech("tech_a", 1, Category::Society, "biology", &[]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            GraphError::DuplicateId(TechId::new("tech_a"))
        );
    }

    #[test]
    fn dependents_are_reverse_of_prerequisites() {
        let index = ship_index();
        let dependents: Vec<&str> = index
            .dependents_of("tech_corvettes")
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(dependents, vec!["tech_destroyers"]);

        let leaves = index.dependents_of("tech_battleships").unwrap();
        assert!(leaves.is_empty());

        assert!(index.dependents_of("tech_titans").is_err());
    }

    #[test]
    fn repeated_prerequisite_gives_one_dependent() {
        let index = GraphIndex::build(vec![
            tech("tech_a", 0, Category::Physics, "particles", &[]),
            tech("tech_b", 1, Category::Physics, "particles", &["tech_a", "tech_a"]),
        ])
        .unwrap();
        assert_eq!(index.dependents_of("tech_a").unwrap().len(), 1);
    }

    #[test]
    fn dangling_prerequisite_is_diagnosed_not_fatal() {
        let index = GraphIndex::build(vec![
            tech("tech_a", 0, Category::Physics, "particles", &[]),
            tech("tech_b", 1, Category::Physics, "particles", &["tech_a", "tech_unsynced"]),
        ])
        .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.diagnostics(),
            &[Diagnostic::DanglingPrerequisite {
                tech: TechId::new("tech_b"),
                missing: TechId::new("tech_unsynced"),
            }]
        );
        let prereqs = index.prerequisites_of("tech_b").unwrap();
        assert_eq!(prereqs.len(), 1);
        assert_eq!(prereqs[0].id.as_str(), "tech_a");
    }

    #[test]
    fn axis_summaries() {
        let index = mixed_index();
        assert_eq!(
            index.categories().into_iter().collect::<Vec<_>>(),
            vec![Category::Physics, Category::Engineering]
        );
        assert!(index.areas().contains("industry"));
        assert_eq!(index.tiers().into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn search_matches_id_or_name() {
        let index = ship_index();
        let hits: Vec<&str> = index.search("CRUIS").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(hits, vec!["tech_cruisers"]);

        let by_name = index.search("power plant");
        assert_eq!(by_name.len(), 2);

        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn empty_index() {
        let index = GraphIndex::build(Vec::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.diagnostics().is_empty());
    }
}
