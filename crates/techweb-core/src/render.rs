//! Node/edge views handed to a rendering surface.
//!
//! Edge ids are `"<prerequisiteId>-<dependentId>"`. Renderers key highlight
//! and selection state off that exact string, so it must not change.

use crate::error::GraphError;
use crate::id::TechId;
use crate::index::GraphIndex;
use crate::layout::{LayoutConfig, position_of};
use crate::resolve::{ancestors, descendants};
use crate::technology::Technology;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode<'a> {
    pub id: &'a TechId,
    pub position: RenderPosition,
    pub data: &'a Technology,
}

/// A prerequisite edge: `source` is required by `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RenderEdge {
    pub id: String,
    pub source: TechId,
    pub target: TechId,
}

impl RenderEdge {
    pub fn new(prerequisite: &TechId, dependent: &TechId) -> Self {
        Self {
            id: edge_id(prerequisite, dependent),
            source: prerequisite.clone(),
            target: dependent.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphView<'a> {
    pub nodes: Vec<RenderNode<'a>>,
    pub edges: Vec<RenderEdge>,
}

/// The edge id for `prerequisite -> dependent`.
pub fn edge_id(prerequisite: &TechId, dependent: &TechId) -> String {
    format!("{prerequisite}-{dependent}")
}

/// Build the render view for a visible subset. An edge is emitted only
/// when both of its ends are visible.
pub fn graph_view<'a>(visible: &[&'a Technology], layout: &LayoutConfig) -> GraphView<'a> {
    let visible_ids: HashSet<&str> = visible.iter().map(|t| t.id.as_str()).collect();

    let nodes = visible
        .iter()
        .map(|&tech| {
            let (x, y) = position_of(layout, tech).to_f64();
            RenderNode {
                id: &tech.id,
                position: RenderPosition { x, y },
                data: tech,
            }
        })
        .collect();

    let mut seen_edges = HashSet::new();
    let mut edges = Vec::new();
    for tech in visible {
        for prereq in &tech.prerequisites {
            if visible_ids.contains(prereq.as_str()) && seen_edges.insert((prereq, &tech.id)) {
                edges.push(RenderEdge::new(prereq, &tech.id));
            }
        }
    }

    GraphView { nodes, edges }
}

// ---------------------------------------------------------------------------
// Highlighting
// ---------------------------------------------------------------------------

/// Nodes and edges on the dependency path through a focused technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub focus: TechId,
    pub nodes: BTreeSet<TechId>,
    pub edges: BTreeSet<String>,
}

impl Highlight {
    pub fn contains_node(&self, id: impl AsRef<str>) -> bool {
        self.nodes.contains(id.as_ref())
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains(id)
    }
}

/// Highlight `focus` with its full prerequisite chain and everything it
/// unlocks. Edges are included when both ends are on the same side of the
/// focus (or are the focus itself).
pub fn highlight(index: &GraphIndex, focus: impl AsRef<str>) -> Result<Highlight, GraphError> {
    let up = ancestors(index, focus.as_ref())?;
    let down = descendants(index, focus.as_ref())?;
    let focus = up.seed();

    let mut nodes = BTreeSet::new();
    let mut edges = BTreeSet::new();
    nodes.insert(focus.id.clone());

    for &tech in up.members().iter().chain(std::iter::once(&focus)) {
        nodes.insert(tech.id.clone());
        for prereq in &tech.prerequisites {
            if up.contains(prereq) {
                edges.insert(edge_id(prereq, &tech.id));
            }
        }
    }

    for &tech in down.members() {
        nodes.insert(tech.id.clone());
        for prereq in &tech.prerequisites {
            if prereq == &focus.id || down.contains(prereq) {
                edges.insert(edge_id(prereq, &tech.id));
            }
        }
    }

    Ok(Highlight {
        focus: focus.id.clone(),
        nodes,
        edges,
    })
}
