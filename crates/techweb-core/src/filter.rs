//! Declarative visibility filters.

use crate::error::Diagnostic;
use crate::index::GraphIndex;
use crate::resolve::ancestor_walk;
use crate::technology::{Category, Technology};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Allowed values on each axis. A technology is kept only if its category,
/// area and tier are all allowed; an empty axis allows nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub categories: HashSet<Category>,
    #[serde(default)]
    pub areas: HashSet<String>,
    #[serde(default)]
    pub tiers: BTreeSet<u32>,
    /// Pull in the ancestors of every kept technology, whether or not they
    /// pass the axis filters themselves.
    #[serde(default)]
    pub include_prerequisites: bool,
}

impl FilterSet {
    /// A filter that admits every category, area and tier present in `index`.
    pub fn allow_all(index: &GraphIndex) -> Self {
        Self {
            categories: index.categories().into_iter().collect(),
            areas: index.areas().into_iter().map(String::from).collect(),
            tiers: index.tiers(),
            include_prerequisites: false,
        }
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.areas = areas.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tiers(mut self, tiers: impl IntoIterator<Item = u32>) -> Self {
        self.tiers = tiers.into_iter().collect();
        self
    }

    pub fn with_include_prerequisites(mut self, include: bool) -> Self {
        self.include_prerequisites = include;
        self
    }

    /// Whether `tech` passes all three axis filters. Areas compare ignoring
    /// ASCII case, as layout slots do.
    pub fn admits(&self, tech: &Technology) -> bool {
        self.categories.contains(&tech.category)
            && self.tiers.contains(&tech.tier)
            && self.admits_area(&tech.area)
    }

    fn admits_area(&self, area: &str) -> bool {
        self.areas.contains(area) || self.areas.iter().any(|a| a.eq_ignore_ascii_case(area))
    }
}

/// Output of [`apply`].
#[derive(Debug, Clone, Default)]
pub struct FilterResult<'a> {
    /// Kept technologies in input order, then pulled-in prerequisites.
    pub visible: Vec<&'a Technology>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FilterResult<'_> {
    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        self.visible.iter().any(|t| t.id.as_str() == id)
    }
}

/// Filter `techs`. Prerequisites are resolved against `index`; those pulled
/// in by `include_prerequisites` are added without being filtered again.
/// The expansion is one walk over the kept set, so each technology is
/// expanded at most once.
pub fn apply<'a>(index: &'a GraphIndex, techs: &[&'a Technology], filters: &FilterSet) -> FilterResult<'a> {
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut visible: Vec<&'a Technology> = techs
        .iter()
        .copied()
        .filter(|t| filters.admits(t))
        .filter(|t| seen.insert(t.id.as_str()))
        .collect();
    let mut diagnostics = Vec::new();

    if filters.include_prerequisites {
        let kept = visible.len();
        let walk = ancestor_walk(index, &visible);
        for ancestor in walk.members {
            if seen.insert(ancestor.id.as_str()) {
                visible.push(ancestor);
            }
        }
        diagnostics = walk.diagnostics;
        tracing::debug!(
            kept,
            pulled_in = visible.len() - kept,
            expanded = walk.expanded,
            "expanded filter with prerequisites"
        );
    }

    FilterResult {
        visible,
        diagnostics,
    }
}

/// Filter every technology in the index.
pub fn apply_all<'a>(index: &'a GraphIndex, filters: &FilterSet) -> FilterResult<'a> {
    let all: Vec<&'a Technology> = index.iter().collect();
    apply(index, &all, filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn visible_ids<'a>(result: &FilterResult<'a>) -> Vec<&'a str> {
        result.visible.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn allow_all_keeps_everything() {
        let index = mixed_index();
        let result = apply_all(&index, &FilterSet::allow_all(&index));
        assert_eq!(result.visible.len(), index.len());
    }

    #[test]
    fn axes_intersect() {
        let index = mixed_index();
        let filters = FilterSet::allow_all(&index)
            .with_categories([Category::Physics])
            .with_tiers([1, 2]);
        let result = apply_all(&index, &filters);
        assert_eq!(visible_ids(&result), vec!["tech_lasers_2", "tech_lasers_3"]);

        let by_area = FilterSet::allow_all(&index).with_areas(["materials"]);
        assert_eq!(
            visible_ids(&apply_all(&index, &by_area)),
            vec!["tech_powered_exoskeletons"]
        );
    }

    #[test]
    fn empty_axis_admits_nothing() {
        let index = mixed_index();
        let filters = FilterSet::allow_all(&index).with_tiers(Vec::new());
        assert!(apply_all(&index, &filters).visible.is_empty());
        assert!(apply_all(&index, &FilterSet::default()).visible.is_empty());
    }

    #[test]
    fn include_prerequisites_crosses_categories() {
        let index = mixed_index();
        let filters = FilterSet::allow_all(&index)
            .with_categories([Category::Physics])
            .with_tiers([2])
            .with_include_prerequisites(true);
        let result = apply_all(&index, &filters);
        assert_eq!(
            visible_ids(&result),
            vec![
                "tech_lasers_3",
                "tech_lasers_2",
                "tech_lasers_1",
                "tech_basic_industry",
            ]
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn without_expansion_prerequisites_stay_hidden() {
        let index = mixed_index();
        let filters = FilterSet::allow_all(&index)
            .with_categories([Category::Physics])
            .with_tiers([2]);
        let result = apply_all(&index, &filters);
        assert_eq!(visible_ids(&result), vec!["tech_lasers_3"]);
        assert!(!result.contains("tech_basic_industry"));
    }

    #[test]
    fn output_is_deduplicated() {
        let index = lasers_index();
        let l1 = index.lookup("tech_lasers_1").unwrap();
        let l2 = index.lookup("tech_lasers_2").unwrap();
        let filters = FilterSet::allow_all(&index).with_include_prerequisites(true);
        let result = apply(&index, &[l2, l1, l2], &filters);
        assert_eq!(visible_ids(&result), vec!["tech_lasers_2", "tech_lasers_1"]);
    }

    #[test]
    fn area_filter_ignores_ascii_case() {
        let index = GraphIndex::build(vec![
            tech("tech_lasers_1", 0, Category::Physics, "Particles", &[]),
            tech("tech_lasers_2", 1, Category::Physics, "particles", &["tech_lasers_1"]),
        ])
        .unwrap();
        let filters = FilterSet::allow_all(&index).with_areas(["PARTICLES"]);
        let result = apply_all(&index, &filters);
        assert_eq!(visible_ids(&result), vec!["tech_lasers_1", "tech_lasers_2"]);
    }

    #[test]
    fn long_chain_expands_in_one_pass() {
        let n = 400;
        let techs = (0..n)
            .map(|i| {
                let prereq = (i > 0).then(|| format!("tech_{}", i - 1));
                let prereqs: Vec<&str> = prereq.iter().map(String::as_str).collect();
                tech(&format!("tech_{i}"), i, Category::Physics, "computing", &prereqs)
            })
            .collect();
        let index = GraphIndex::build(techs).unwrap();

        let everything = FilterSet::allow_all(&index).with_include_prerequisites(true);
        let result = apply_all(&index, &everything);
        assert_eq!(result.visible.len(), n as usize);
        assert_eq!(result.visible[0].id.as_str(), "tech_0");
        assert!(result.diagnostics.is_empty());

        let top_only = FilterSet::allow_all(&index)
            .with_tiers([n - 1])
            .with_include_prerequisites(true);
        let result = apply_all(&index, &top_only);
        assert_eq!(result.visible.len(), n as usize);
        assert_eq!(result.visible[1].id.as_str(), "tech_398");
        assert_eq!(result.visible[(n - 1) as usize].id.as_str(), "tech_0");
    }

    #[test]
    fn cycle_among_kept_technologies_is_reported_once() {
        let index = GraphIndex::build(vec![
            tech("tech_a", 1, Category::Society, "biology", &["tech_b"]),
            tech("tech_b", 1, Category::Society, "biology", &["tech_a"]),
        ])
        .unwrap();
        let filters = FilterSet::allow_all(&index).with_include_prerequisites(true);
        let result = apply_all(&index, &filters);
        assert_eq!(visible_ids(&result), vec!["tech_a", "tech_b"]);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn reapplying_is_idempotent() {
        let index = mixed_index();
        let filters = FilterSet::allow_all(&index).with_categories([Category::Engineering]);
        let once = apply_all(&index, &filters);
        let twice = apply(&index, &once.visible, &filters);
        assert_eq!(visible_ids(&once), visible_ids(&twice));
    }
}
