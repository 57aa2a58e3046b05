//! Research frontier and planning views.
//!
//! The frontier is computed from three inputs that the engine never owns:
//! the planned set, its prerequisite closure, and the researched set.

use crate::error::{Diagnostic, GraphError};
use crate::id::TechId;
use crate::index::GraphIndex;
use crate::resolve::{PrerequisiteAnnotation, ancestors_of_many};
use crate::technology::Technology;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// Technologies that can be researched next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frontier<'a> {
    pub technologies: Vec<&'a Technology>,

    /// Set when neither roots nor satisfied prerequisites produced anything
    /// and the lowest remaining tier was offered instead. Members of that
    /// tier may still have unresearched prerequisites.
    pub used_fallback: bool,
}

impl<'a> Frontier<'a> {
    pub fn ids(&self) -> impl Iterator<Item = &'a TechId> + '_ {
        self.technologies.iter().map(|t| &t.id)
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        self.technologies.iter().any(|t| t.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.technologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
    }

    pub fn into_vec(self) -> Vec<&'a Technology> {
        self.technologies
    }

    /// Members ordered by category, then tier, then name.
    pub fn sorted_for_display(&self) -> Vec<&'a Technology> {
        let mut sorted = self.technologies.clone();
        sort_for_display(&mut sorted);
        sorted
    }
}

/// Order technologies by category, then tier, then name, then id.
pub fn sort_for_display(technologies: &mut [&Technology]) {
    technologies.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then(a.tier.cmp(&b.tier))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Compute the researchable frontier.
///
/// The candidate pool is `planned` followed by `prerequisite_closure`,
/// deduplicated by id, minus anything researched. A candidate is available
/// if it is a root (tier 0, no prerequisites) or if every prerequisite is
/// researched. When that yields nothing, every candidate at the lowest tier
/// in the pool is returned instead.
pub fn available_frontier<'a>(
    planned: &[&'a Technology],
    prerequisite_closure: &[&'a Technology],
    researched: &HashSet<TechId>,
) -> Frontier<'a> {
    let mut seen = HashSet::new();
    let pool: Vec<&'a Technology> = planned
        .iter()
        .chain(prerequisite_closure)
        .copied()
        .filter(|t| !researched.contains(t.id.as_str()))
        .filter(|t| seen.insert(t.id.as_str()))
        .collect();

    let roots = pool.iter().copied().filter(|t| t.is_root());
    let unblocked = pool.iter().copied().filter(|t| {
        !t.is_root() && t.prerequisites.iter().all(|p| researched.contains(p))
    });
    let technologies: Vec<&'a Technology> = roots.chain(unblocked).collect();

    if !technologies.is_empty() {
        return Frontier {
            technologies,
            used_fallback: false,
        };
    }

    let Some(min_tier) = pool.iter().map(|t| t.tier).min() else {
        return Frontier {
            technologies,
            used_fallback: false,
        };
    };
    tracing::debug!(min_tier, candidates = pool.len(), "no unblocked technology, using lowest tier");
    Frontier {
        technologies: pool.into_iter().filter(|t| t.tier == min_tier).collect(),
        used_fallback: true,
    }
}

// ---------------------------------------------------------------------------
// Planning view
// ---------------------------------------------------------------------------

/// Everything a planning panel shows for a planned/researched selection.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningView<'a> {
    /// The current frontier, sorted for display.
    pub available: Vec<&'a Technology>,

    /// planned id -> its unresearched ancestors, in discovery order.
    /// Planned technologies that are already researched are omitted.
    pub remaining_prerequisites: BTreeMap<TechId, Vec<&'a Technology>>,

    /// Unresearched prerequisites of the plan with the planned
    /// technologies each one gates.
    pub annotations: Vec<PrerequisiteAnnotation<'a>>,

    pub used_fallback: bool,

    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve a plan against the index. Unknown planned ids fail; unknown
/// researched ids are ignored since stored selections can outlive a
/// catalog reload.
pub fn planning_view<'a>(
    index: &'a GraphIndex,
    planned: &HashSet<TechId>,
    researched: &HashSet<TechId>,
) -> Result<PlanningView<'a>, GraphError> {
    let seeds: BTreeSet<&TechId> = planned.iter().collect();
    let many = ancestors_of_many(index, seeds.iter())?;

    let planned_techs: Vec<&'a Technology> = many.per_seed().iter().map(|c| c.seed()).collect();
    let frontier = available_frontier(&planned_techs, many.union(), researched);

    let mut available = frontier.technologies;
    sort_for_display(&mut available);

    let remaining_prerequisites: BTreeMap<TechId, Vec<&'a Technology>> = many
        .per_seed()
        .iter()
        .filter(|c| !researched.contains(c.seed().id.as_str()))
        .map(|c| {
            let remaining: Vec<&'a Technology> = c
                .members()
                .iter()
                .copied()
                .filter(|t| !researched.contains(t.id.as_str()))
                .collect();
            (c.seed().id.clone(), remaining)
        })
        .collect();

    let annotations: Vec<PrerequisiteAnnotation<'a>> = many
        .annotations()
        .into_iter()
        .filter(|a| !researched.contains(a.technology.id.as_str()))
        .collect();

    Ok(PlanningView {
        available,
        remaining_prerequisites,
        annotations,
        used_fallback: frontier.used_fallback,
        diagnostics: many.diagnostics().to_vec(),
    })
}

// ---------------------------------------------------------------------------
// Research order
// ---------------------------------------------------------------------------

/// The unresearched part of a plan (planned technologies and their
/// ancestors) in an order where every technology follows its prerequisites.
///
/// Kahn's algorithm over the candidate subgraph; among ready technologies
/// the lowest tier goes first, then the lowest id. Technologies caught in a
/// cycle are appended at the end in id order.
pub fn research_order<'a>(
    index: &'a GraphIndex,
    planned: &HashSet<TechId>,
    researched: &HashSet<TechId>,
) -> Result<Vec<&'a Technology>, GraphError> {
    let seeds: BTreeSet<&TechId> = planned.iter().collect();
    let many = ancestors_of_many(index, seeds.iter())?;

    let mut candidates: HashMap<&'a str, &'a Technology> = HashMap::new();
    for tech in many
        .per_seed()
        .iter()
        .map(|c| c.seed())
        .chain(many.union().iter().copied())
    {
        if !researched.contains(tech.id.as_str()) {
            candidates.insert(tech.id.as_str(), tech);
        }
    }

    // Count distinct in-pool prerequisites for each candidate.
    let mut in_degree: HashMap<&'a str, usize> = HashMap::with_capacity(candidates.len());
    for (&id, tech) in &candidates {
        let distinct: HashSet<&str> = tech
            .prerequisites
            .iter()
            .map(TechId::as_str)
            .filter(|p| candidates.contains_key(p))
            .collect();
        in_degree.insert(id, distinct.len());
    }

    let mut ready: BTreeSet<(u32, &'a str)> = in_degree
        .iter()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(&id, _)| (candidates[id].tier, id))
        .collect();

    let mut order: Vec<&'a Technology> = Vec::with_capacity(candidates.len());
    while let Some((_, id)) = ready.pop_first() {
        let tech = candidates[id];
        order.push(tech);

        for dependent in index.direct_dependents(tech) {
            let dep_id = dependent.id.as_str();
            if let Some(deg) = in_degree.get_mut(dep_id) {
                *deg -= 1;
                if *deg == 0 {
                    ready.insert((dependent.tier, dep_id));
                }
            }
        }
    }

    if order.len() < candidates.len() {
        let placed: HashSet<&str> = order.iter().map(|t| t.id.as_str()).collect();
        let mut stuck: Vec<&'a Technology> = candidates
            .values()
            .copied()
            .filter(|t| !placed.contains(t.id.as_str()))
            .collect();
        stuck.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::warn!(count = stuck.len(), "research order left technologies in a cycle");
        order.extend(stuck);
    }

    Ok(order)
}
