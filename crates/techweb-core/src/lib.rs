//! techweb core -- the technology dependency graph engine.
//!
//! Everything here is a pure, synchronous function over an immutable
//! [`index::GraphIndex`]. Loading the technology list, persisting user
//! selections and drawing the graph all belong to callers.
//!
//! # Pipeline
//!
//! 1. **Index** -- [`index::GraphIndex::build`] turns a flat technology list
//!    into by-id and reverse-prerequisite lookups.
//! 2. **Resolve** -- [`resolve::ancestors`], [`resolve::descendants`] and
//!    [`resolve::ancestors_of_many`] compute transitive closures with a
//!    cycle guard.
//! 3. **Plan** -- [`availability::available_frontier`] and
//!    [`availability::planning_view`] decide what can be researched next.
//! 4. **Place** -- [`layout::position`] maps (category, tier, area) to a
//!    grid coordinate.
//! 5. **Filter** -- [`filter::apply`] narrows the visible set, optionally
//!    pulling prerequisites back in.
//! 6. **Render** -- [`render::graph_view`] and [`render::highlight`] build the
//!    node/edge shapes a renderer consumes.
//!
//! # Reloads
//!
//! A new technology list always means a new index. Results borrow from the
//! index that produced them, so nothing derived from an old list can survive
//! a reload.
//!
//! ```rust,ignore
//! let index = GraphIndex::build(technologies)?;
//! let filters = FilterSet::allow_all(&index).with_include_prerequisites(true);
//! let visible = filter::apply_all(&index, &filters);
//! let view = render::graph_view(&visible.visible, &LayoutConfig::default());
//! ```

pub mod availability;
pub mod error;
pub mod filter;
pub mod fixed;
pub mod id;
pub mod index;
pub mod layout;
pub mod render;
pub mod resolve;
pub mod technology;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use availability::{Frontier, PlanningView, available_frontier, planning_view, research_order};
pub use error::{Diagnostic, GraphError};
pub use filter::{FilterResult, FilterSet};
pub use id::TechId;
pub use index::GraphIndex;
pub use layout::{LayoutConfig, Position};
pub use resolve::{Closure, ManyClosure, PrerequisiteAnnotation};
pub use technology::{Category, Technology};
