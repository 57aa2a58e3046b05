use crate::id::TechId;
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors surfaced by index construction and graph queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("technology not found: {0}")]
    NotFound(TechId),

    #[error("duplicate technology id: {0}")]
    DuplicateId(TechId),
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// A non-fatal data-integrity problem found while indexing or traversing.
/// The computation that found it still completes; the affected edge is
/// simply not followed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// `via` lists `at` as a prerequisite, and that edge closes a loop.
    Cycle { at: TechId, via: TechId },

    /// `tech` lists a prerequisite that is not in the index.
    DanglingPrerequisite { tech: TechId, missing: TechId },
}

impl Diagnostic {
    pub(crate) fn emit(&self) {
        match self {
            Diagnostic::Cycle { at, via } => {
                tracing::warn!(%at, %via, "prerequisite cycle detected, edge not followed");
            }
            Diagnostic::DanglingPrerequisite { tech, missing } => {
                tracing::warn!(%tech, %missing, "prerequisite references unknown technology");
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Cycle { at, via } => write!(f, "cycle through {via} -> {at}"),
            Diagnostic::DanglingPrerequisite { tech, missing } => {
                write!(f, "{tech} requires unknown technology {missing}")
            }
        }
    }
}

/// Append `diagnostic` unless an equal one is already recorded.
pub(crate) fn record(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    if !diagnostics.contains(&diagnostic) {
        diagnostics.push(diagnostic);
    }
}

/// Merge `extra` into `diagnostics`, keeping first-seen order.
pub(crate) fn merge(diagnostics: &mut Vec<Diagnostic>, extra: &[Diagnostic]) {
    for diagnostic in extra {
        record(diagnostics, diagnostic.clone());
    }
}
