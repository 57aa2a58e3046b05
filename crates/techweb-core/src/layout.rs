//! Grid placement of technologies.
//!
//! The horizontal axis is split into one fixed-width lane per category.
//! Inside a lane each known area has its own slot; areas the configuration
//! does not list share a trailing "other" slot. Tier maps linearly to the
//! vertical axis. All arithmetic is Q32.32 fixed-point so two runs over the
//! same input produce bit-identical coordinates.

use crate::fixed::{Fixed64, fixed64_to_f64};
use crate::id::TechId;
use crate::index::GraphIndex;
use crate::technology::{Category, Technology};
use std::collections::HashMap;

/// A layout coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: Fixed64,
    pub y: Fixed64,
}

impl Position {
    pub fn new(x: Fixed64, y: Fixed64) -> Self {
        Self { x, y }
    }

    /// Convert to floating point for the render boundary.
    pub fn to_f64(self) -> (f64, f64) {
        (fixed64_to_f64(self.x), fixed64_to_f64(self.y))
    }
}

/// Lane and slot assignment for the grid layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Width of one category lane.
    pub lane_width: Fixed64,

    /// Vertical distance between consecutive tiers.
    pub tier_spacing: Fixed64,

    /// Horizontal distance between area slots inside a lane.
    pub area_spacing: Fixed64,

    /// category -> lane index. Categories not listed use
    /// [`Category::default_lane`].
    pub lanes: HashMap<Category, u32>,

    /// category -> known areas; an area's slot is its position in the list.
    pub areas: HashMap<Category, Vec<String>>,

    /// Slot for areas not listed under their category.
    pub other_slot: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let areas = [
            (
                Category::Physics,
                vec!["computing", "field_manipulation", "particles"],
            ),
            (
                Category::Society,
                vec![
                    "biology",
                    "military_theory",
                    "new_worlds",
                    "statecraft",
                    "psionics",
                    "archaeostudies",
                ],
            ),
            (
                Category::Engineering,
                vec!["industry", "materials", "propulsion", "voidcraft"],
            ),
        ]
        .into_iter()
        .map(|(category, names)| (category, names.into_iter().map(String::from).collect()))
        .collect();

        Self {
            lane_width: Fixed64::from_num(1400),
            tier_spacing: Fixed64::from_num(250),
            area_spacing: Fixed64::from_num(200),
            lanes: Category::ALL
                .into_iter()
                .map(|category| (category, category.default_lane()))
                .collect(),
            areas,
            other_slot: 6,
        }
    }
}

impl LayoutConfig {
    pub fn lane_of(&self, category: Category) -> u32 {
        self.lanes
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_lane())
    }

    /// Slot of `area` within the lane of `category`, ignoring ASCII case.
    pub fn slot_of(&self, category: Category, area: &str) -> u32 {
        self.areas
            .get(&category)
            .and_then(|known| known.iter().position(|a| a.eq_ignore_ascii_case(area)))
            .and_then(|slot| u32::try_from(slot).ok())
            .unwrap_or(self.other_slot)
    }

    /// Number of slots a lane must hold: the longest area list, or one past
    /// the "other" slot if that is further out.
    pub fn slots_per_lane(&self) -> u32 {
        let listed = self.areas.values().map(Vec::len).max().unwrap_or(0);
        u32::try_from(listed)
            .unwrap_or(u32::MAX)
            .max(self.other_slot.saturating_add(1))
    }

    /// Whether every slot of every lane stays left of the next lane.
    pub fn slots_fit_lane(&self) -> bool {
        let span = self
            .area_spacing
            .saturating_mul(Fixed64::saturating_from_num(self.slots_per_lane()));
        span <= self.lane_width
    }
}

/// Place a node. Total: every input maps to a coordinate.
pub fn position(config: &LayoutConfig, category: Category, tier: u32, area: &str) -> Position {
    let lane = Fixed64::saturating_from_num(config.lane_of(category));
    let slot = Fixed64::saturating_from_num(config.slot_of(category, area));
    let tier = Fixed64::saturating_from_num(tier);

    let x = config
        .lane_width
        .saturating_mul(lane)
        .saturating_add(config.area_spacing.saturating_mul(slot));
    let y = config.tier_spacing.saturating_mul(tier);
    Position { x, y }
}

/// Place a technology.
pub fn position_of(config: &LayoutConfig, tech: &Technology) -> Position {
    position(config, tech.category, tech.tier, &tech.area)
}

/// Place every technology in the index.
pub fn layout_all(config: &LayoutConfig, index: &GraphIndex) -> HashMap<TechId, Position> {
    #[cfg(feature = "parallel")]
    let positions: HashMap<TechId, Position> = {
        use rayon::prelude::*;
        index
            .technologies()
            .par_iter()
            .map(|tech| (tech.id.clone(), position_of(config, tech)))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let positions: HashMap<TechId, Position> = index
        .iter()
        .map(|tech| (tech.id.clone(), position_of(config, tech)))
        .collect();

    tracing::debug!(nodes = positions.len(), "computed grid layout");
    positions
}
