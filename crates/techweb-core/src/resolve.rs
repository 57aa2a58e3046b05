//! Transitive prerequisite and unlock resolution.
//!
//! Traversal is an explicit depth-first worklist: each frame holds a node and
//! a cursor into its neighbours. A node already visited is counted once
//! (diamonds are normal), while a neighbour that is still on the current
//! frame path closes a cycle and is reported as a [`Diagnostic::Cycle`]
//! instead of being followed.

use crate::error::{Diagnostic, GraphError, merge, record};
use crate::id::TechId;
use crate::index::GraphIndex;
use crate::technology::Technology;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::Level;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// The transitive closure of one seed in one direction. The seed itself is
/// never a member.
#[derive(Debug, Clone)]
pub struct Closure<'a> {
    seed: &'a Technology,
    /// Members in depth-first discovery order.
    members: Vec<&'a Technology>,
    ids: HashSet<&'a str>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Closure<'a> {
    pub fn seed(&self) -> &'a Technology {
        self.seed
    }

    pub fn members(&self) -> &[&'a Technology] {
        &self.members
    }

    pub fn into_members(self) -> Vec<&'a Technology> {
        self.members
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.ids.contains(id.as_ref())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member ids in discovery order.
    pub fn ids(&self) -> impl Iterator<Item = &'a TechId> + '_ {
        self.members.iter().map(|t| &t.id)
    }

    /// Cycles and dangling references met during the traversal.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Ancestor closures for several seeds at once, with the reverse "gates"
/// mapping from each ancestor back to the seeds that need it.
#[derive(Debug, Clone)]
pub struct ManyClosure<'a> {
    /// One closure per distinct seed, in seed order.
    per_seed: Vec<Closure<'a>>,
    /// Every ancestor of any seed, first-seen order, no duplicates.
    union: Vec<&'a Technology>,
    /// ancestor id -> seeds it (transitively) gates, in seed order.
    gates: HashMap<&'a str, Vec<&'a Technology>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ManyClosure<'a> {
    pub fn per_seed(&self) -> &[Closure<'a>] {
        &self.per_seed
    }

    /// The closure computed for `seed`, if it was one of the seeds.
    pub fn closure_of(&self, seed: impl AsRef<str>) -> Option<&Closure<'a>> {
        let seed = seed.as_ref();
        self.per_seed.iter().find(|c| c.seed.id.as_str() == seed)
    }

    pub fn union(&self) -> &[&'a Technology] {
        &self.union
    }

    /// Seeds that require `ancestor`. Empty if it gates nothing.
    pub fn gated_by(&self, ancestor: impl AsRef<str>) -> &[&'a Technology] {
        self.gates
            .get(ancestor.as_ref())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// One annotation per union member, in union order.
    pub fn annotations(&self) -> Vec<PrerequisiteAnnotation<'a>> {
        self.union
            .iter()
            .map(|&technology| PrerequisiteAnnotation {
                technology,
                is_prerequisite: true,
                gates_planned_techs: self.gated_by(technology.id.as_str()).to_vec(),
            })
            .collect()
    }
}

/// A prerequisite decorated with the planned technologies it unlocks the
/// way to. Rebuilt on every resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrerequisiteAnnotation<'a> {
    pub technology: &'a Technology,
    pub is_prerequisite: bool,
    pub gates_planned_techs: Vec<&'a Technology>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Follow `prerequisites`.
    Ancestors,
    /// Follow the reverse map.
    Descendants,
}

/// Everything `seed` transitively depends on.
pub fn ancestors<'a>(index: &'a GraphIndex, seed: impl AsRef<str>) -> Result<Closure<'a>, GraphError> {
    let seed = index.lookup(seed)?;
    Ok(ancestors_of_tech(index, seed))
}

/// Everything that transitively depends on `seed`.
pub fn descendants<'a>(
    index: &'a GraphIndex,
    seed: impl AsRef<str>,
) -> Result<Closure<'a>, GraphError> {
    let seed = index.lookup(seed)?;
    Ok(traverse(index, seed, Direction::Descendants))
}

/// Ancestors of a technology that need not itself be indexed; its
/// prerequisites are resolved against `index`.
pub fn ancestors_of_tech<'a>(index: &'a GraphIndex, seed: &'a Technology) -> Closure<'a> {
    traverse(index, seed, Direction::Ancestors)
}

/// Ancestor closures for every seed plus the combined union and gating map.
/// Duplicate seeds are resolved once; any unknown seed fails the call.
pub fn ancestors_of_many<'a, I, S>(index: &'a GraphIndex, seeds: I) -> Result<ManyClosure<'a>, GraphError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut resolved: Vec<&'a Technology> = Vec::new();
    for seed in seeds {
        let tech = index.lookup(seed)?;
        if seen.insert(tech.id.as_str()) {
            resolved.push(tech);
        }
    }

    #[cfg(feature = "parallel")]
    let per_seed: Vec<Closure<'a>> = {
        use rayon::prelude::*;
        resolved
            .par_iter()
            .map(|&seed| ancestors_of_tech(index, seed))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let per_seed: Vec<Closure<'a>> = resolved
        .iter()
        .map(|&seed| ancestors_of_tech(index, seed))
        .collect();

    let mut union: Vec<&'a Technology> = Vec::new();
    let mut in_union: HashSet<&'a str> = HashSet::new();
    let mut gates: HashMap<&'a str, Vec<&'a Technology>> = HashMap::new();
    let mut diagnostics = Vec::new();

    for closure in &per_seed {
        for &member in closure.members() {
            if in_union.insert(member.id.as_str()) {
                union.push(member);
            }
            gates.entry(member.id.as_str()).or_default().push(closure.seed);
        }
        merge(&mut diagnostics, closure.diagnostics());
    }

    Ok(ManyClosure {
        per_seed,
        union,
        gates,
        diagnostics,
    })
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// One node on the depth-first path with a cursor into its neighbours.
struct Frame<'a> {
    tech: &'a Technology,
    neighbours: Vec<&'a Technology>,
    cursor: usize,
}

/// Output of one depth-first walk from one or more starting points.
pub(crate) struct Walk<'a> {
    /// Reached nodes in discovery order. A start only appears here when an
    /// earlier start reached it first.
    pub(crate) members: Vec<&'a Technology>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Nodes whose neighbours were listed; each node at most once.
    pub(crate) expanded: usize,
}

/// Ancestors of every technology in `starts`, sharing one visited set so
/// each node is expanded at most once across all starts.
pub(crate) fn ancestor_walk<'a>(index: &'a GraphIndex, starts: &[&'a Technology]) -> Walk<'a> {
    walk(index, starts, Direction::Ancestors)
}

fn traverse<'a>(index: &'a GraphIndex, seed: &'a Technology, direction: Direction) -> Closure<'a> {
    let Walk {
        members,
        diagnostics,
        ..
    } = walk(index, &[seed], direction);

    let ids = members.iter().map(|t| t.id.as_str()).collect();
    Closure {
        seed,
        members,
        ids,
        diagnostics,
    }
}

fn walk<'a>(index: &'a GraphIndex, starts: &[&'a Technology], direction: Direction) -> Walk<'a> {
    let mut members: Vec<&'a Technology> = Vec::new();
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut on_path: HashSet<&'a str> = HashSet::new();
    let mut diagnostics = Vec::new();
    let mut expanded = 0;
    let mut stack: Vec<Frame<'a>> = Vec::new();

    for &start in starts {
        if !visited.insert(start.id.as_str()) {
            continue;
        }
        on_path.insert(start.id.as_str());
        expanded += 1;
        stack.push(Frame {
            tech: start,
            neighbours: neighbours(index, start, direction, &mut diagnostics),
            cursor: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let Some(&next) = frame.neighbours.get(frame.cursor) else {
                on_path.remove(frame.tech.id.as_str());
                stack.pop();
                continue;
            };
            frame.cursor += 1;
            let from = frame.tech;

            if on_path.contains(next.id.as_str()) {
                let diagnostic = match direction {
                    // `from` requires `next`, which is already below us.
                    Direction::Ancestors => Diagnostic::Cycle {
                        at: next.id.clone(),
                        via: from.id.clone(),
                    },
                    Direction::Descendants => Diagnostic::Cycle {
                        at: from.id.clone(),
                        via: next.id.clone(),
                    },
                };
                record(&mut diagnostics, diagnostic);
                continue;
            }
            if !visited.insert(next.id.as_str()) {
                continue;
            }

            members.push(next);
            on_path.insert(next.id.as_str());
            expanded += 1;
            let children = neighbours(index, next, direction, &mut diagnostics);
            stack.push(Frame {
                tech: next,
                neighbours: children,
                cursor: 0,
            });
        }
    }

    for diagnostic in &diagnostics {
        if log_level(index, diagnostic) == Level::WARN {
            diagnostic.emit();
        } else {
            tracing::debug!(%diagnostic, "known catalog problem met during traversal");
        }
    }

    Walk {
        members,
        diagnostics,
        expanded,
    }
}

/// Problems the index already reported when it was built are logged at
/// `debug`; anything first found by a traversal is a warning.
fn log_level(index: &GraphIndex, diagnostic: &Diagnostic) -> Level {
    if index.diagnostics().contains(diagnostic) {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

fn neighbours<'a>(
    index: &'a GraphIndex,
    tech: &'a Technology,
    direction: Direction,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<&'a Technology> {
    match direction {
        Direction::Ancestors => tech
            .prerequisites
            .iter()
            .filter_map(|prereq| {
                let found = index.get(prereq);
                if found.is_none() {
                    record(
                        diagnostics,
                        Diagnostic::DanglingPrerequisite {
                            tech: tech.id.clone(),
                            missing: prereq.clone(),
                        },
                    );
                }
                found
            })
            .collect(),
        Direction::Descendants => index.direct_dependents(tech).collect(),
    }
}
