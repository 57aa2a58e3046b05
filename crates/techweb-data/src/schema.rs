//! Serde shapes for catalog payloads and layout configuration.
//!
//! These mirror the wire and file formats. [`crate::catalog`] resolves them
//! into engine types.

use serde::Deserialize;
use std::collections::BTreeMap;

// ===========================================================================
// Technologies
// ===========================================================================

/// A technology record as it appears in an API response.
#[derive(Debug, Clone, Deserialize)]
pub struct TechnologyData {
    pub id: String,
    #[serde(alias = "displayName")]
    pub name: String,
    pub tier: u32,
    /// Category name; resolved case-insensitively.
    pub category: String,
    pub area: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

// ===========================================================================
// Layout
// ===========================================================================

/// Layout settings. Every field is optional; omitted values keep the
/// built-in layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutData {
    #[serde(default)]
    pub lane_width: Option<f64>,
    #[serde(default)]
    pub tier_spacing: Option<f64>,
    #[serde(default)]
    pub area_spacing: Option<f64>,
    /// category name -> lane index.
    #[serde(default)]
    pub lanes: BTreeMap<String, u32>,
    /// category name -> ordered area list. Replaces the built-in list for
    /// that category.
    #[serde(default)]
    pub areas: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub other_slot: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technology_from_api_json() {
        let json = r#"{
            "id": "tech_corvettes",
            "displayName": "Corvettes",
            "tier": 0,
            "category": "Engineering",
            "area": "voidcraft",
            "cost": 0,
            "description": "Small hulls.",
            "prerequisites": []
        }"#;
        let tech: TechnologyData = serde_json::from_str(json).unwrap();
        assert_eq!(tech.name, "Corvettes");
        assert_eq!(tech.category, "Engineering");
        assert_eq!(tech.description, "Small hulls.");
    }

    #[test]
    fn technology_optional_fields_default() {
        let json = r#"{"id": "tech_lasers_2", "name": "Blue Lasers", "tier": 1,
                       "category": "physics", "area": "particles"}"#;
        let tech: TechnologyData = serde_json::from_str(json).unwrap();
        assert_eq!(tech.cost, 0.0);
        assert!(tech.description.is_empty());
        assert!(tech.prerequisites.is_empty());
    }

    #[test]
    fn technology_missing_tier_is_rejected() {
        let json = r#"{"id": "x", "name": "X", "category": "physics", "area": "particles"}"#;
        assert!(serde_json::from_str::<TechnologyData>(json).is_err());
    }

    #[test]
    fn layout_from_ron_with_partial_fields() {
        let ron = r#"
            (
                tier_spacing: Some(300.0),
                areas: {"physics": ["particles", "computing"]},
            )
        "#;
        let layout: LayoutData = ron::from_str(ron).unwrap();
        assert_eq!(layout.tier_spacing, Some(300.0));
        assert!(layout.lane_width.is_none());
        assert_eq!(layout.areas["physics"], vec!["particles", "computing"]);
        assert!(layout.lanes.is_empty());
    }

    #[test]
    fn layout_from_toml_tables() {
        let toml_str = r#"
lane_width = 1600.0

[lanes]
engineering = 0
physics = 2

[areas]
society = ["biology", "statecraft"]
"#;
        let layout: LayoutData = toml::from_str(toml_str).unwrap();
        assert_eq!(layout.lane_width, Some(1600.0));
        assert_eq!(layout.lanes["physics"], 2);
        assert_eq!(layout.areas["society"].len(), 2);
        assert!(layout.other_slot.is_none());
    }
}
