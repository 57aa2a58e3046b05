//! Shared fixtures for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::id::TechId;
use crate::index::GraphIndex;
use crate::technology::{Category, Technology};
use std::collections::HashSet;

// ===========================================================================
// Constructors
// ===========================================================================

/// A technology named after its id, with the given prerequisites.
pub fn tech(id: &str, tier: u32, category: Category, area: &str, prerequisites: &[&str]) -> Technology {
    Technology::new(id, display_name(id), tier, category, area)
        .with_prerequisites(prerequisites.iter().copied())
        .with_cost(f64::from(tier + 1) * 1000.0)
}

/// An id set, e.g. for planned or researched selections.
pub fn ids(list: &[&str]) -> HashSet<TechId> {
    list.iter().map(|&id| TechId::new(id)).collect()
}

/// "tech_power_plant_2" -> "Power Plant 2".
fn display_name(id: &str) -> String {
    id.trim_start_matches("tech_")
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ===========================================================================
// Fixture graphs
// ===========================================================================

/// tech_lasers_1 (tier 0) <- tech_lasers_2 (tier 1).
pub fn lasers_techs() -> Vec<Technology> {
    vec![
        tech("tech_lasers_1", 0, Category::Physics, "particles", &[]),
        tech("tech_lasers_2", 1, Category::Physics, "particles", &["tech_lasers_1"]),
    ]
}

pub fn lasers_index() -> GraphIndex {
    build(lasers_techs())
}

/// Lasers plus a second dependent of tech_lasers_1.
pub fn lasers_branching_index() -> GraphIndex {
    let mut techs = lasers_techs();
    techs.push(tech(
        "tech_mining_lasers",
        1,
        Category::Engineering,
        "industry",
        &["tech_lasers_1"],
    ));
    build(techs)
}

/// Hull chain corvettes -> destroyers -> cruisers -> battleships, with
/// battleships also needing the power plant chain.
pub fn ship_techs() -> Vec<Technology> {
    vec![
        tech("tech_corvettes", 0, Category::Engineering, "voidcraft", &[]),
        tech("tech_destroyers", 1, Category::Engineering, "voidcraft", &["tech_corvettes"]),
        tech("tech_cruisers", 2, Category::Engineering, "voidcraft", &["tech_destroyers"]),
        tech(
            "tech_battleships",
            3,
            Category::Engineering,
            "voidcraft",
            &["tech_cruisers", "tech_power_plant_2"],
        ),
        tech("tech_power_plant_1", 0, Category::Physics, "field_manipulation", &[]),
        tech(
            "tech_power_plant_2",
            1,
            Category::Physics,
            "field_manipulation",
            &["tech_power_plant_1"],
        ),
    ]
}

pub fn ship_index() -> GraphIndex {
    build(ship_techs())
}

/// Physics laser chain whose top tier also needs an engineering technology.
pub fn mixed_techs() -> Vec<Technology> {
    vec![
        tech("tech_lasers_1", 0, Category::Physics, "particles", &[]),
        tech("tech_lasers_2", 1, Category::Physics, "particles", &["tech_lasers_1"]),
        tech(
            "tech_lasers_3",
            2,
            Category::Physics,
            "particles",
            &["tech_lasers_2", "tech_basic_industry"],
        ),
        tech("tech_basic_industry", 0, Category::Engineering, "industry", &[]),
        tech(
            "tech_powered_exoskeletons",
            1,
            Category::Engineering,
            "materials",
            &["tech_basic_industry"],
        ),
    ]
}

pub fn mixed_index() -> GraphIndex {
    build(mixed_techs())
}

fn build(techs: Vec<Technology>) -> GraphIndex {
    match GraphIndex::build(techs) {
        Ok(index) => index,
        Err(e) => panic!("fixture graph is invalid: {e}"),
    }
}
