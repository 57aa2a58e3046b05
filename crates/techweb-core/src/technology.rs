use crate::id::TechId;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The research branch a technology belongs to. Closed set; each category
/// gets its own horizontal lane in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Physics,
    Society,
    Engineering,
}

impl Category {
    /// Every category, in lane order.
    pub const ALL: [Category; 3] = [Category::Physics, Category::Society, Category::Engineering];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Physics => "physics",
            Category::Society => "society",
            Category::Engineering => "engineering",
        }
    }

    /// Parse a category name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Lane index used when a layout configuration does not place this
    /// category explicitly.
    pub fn default_lane(self) -> u32 {
        match self {
            Category::Physics => 0,
            Category::Society => 1,
            Category::Engineering => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Technology
// ---------------------------------------------------------------------------

/// A technology that can be researched. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    /// Unique identifier.
    pub id: TechId,

    /// Human-readable name.
    #[serde(alias = "displayName")]
    pub name: String,

    /// Research tier. 0 is a root tier.
    pub tier: u32,

    pub category: Category,

    /// Sub-classification within the category (e.g. "propulsion").
    pub area: String,

    #[serde(default)]
    pub cost: f64,

    #[serde(default)]
    pub description: String,

    /// Technologies that must be researched before this one. Order is kept
    /// as authored.
    #[serde(default)]
    pub prerequisites: Vec<TechId>,
}

impl Technology {
    /// Create a technology with no prerequisites, zero cost and an empty
    /// description.
    pub fn new(
        id: impl Into<TechId>,
        name: impl Into<String>,
        tier: u32,
        category: Category,
        area: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            category,
            area: area.into(),
            cost: 0.0,
            description: String::new(),
            prerequisites: Vec::new(),
        }
    }

    pub fn with_prerequisites<I, T>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TechId>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// A root technology: tier 0 with nothing to research first.
    pub fn is_root(&self) -> bool {
        self.tier == 0 && self.prerequisites.is_empty()
    }

    /// Whether `id` is listed as a direct prerequisite.
    pub fn requires(&self, id: &str) -> bool {
        self.prerequisites.iter().any(|p| p.as_str() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_name_ignores_case() {
        assert_eq!(Category::from_name("Physics"), Some(Category::Physics));
        assert_eq!(Category::from_name(" society "), Some(Category::Society));
        assert_eq!(Category::from_name("ENGINEERING"), Some(Category::Engineering));
        assert_eq!(Category::from_name("psionics"), None);
    }

    #[test]
    fn root_requires_tier_zero_and_no_prerequisites() {
        let root = Technology::new("tech_corvettes", "Corvettes", 0, Category::Engineering, "voidcraft");
        assert!(root.is_root());

        let tier_one = Technology::new("tech_a", "A", 1, Category::Physics, "particles");
        assert!(!tier_one.is_root());

        let gated = Technology::new("tech_b", "B", 0, Category::Physics, "particles")
            .with_prerequisites(["tech_a"]);
        assert!(!gated.is_root());
        assert!(gated.requires("tech_a"));
        assert!(!gated.requires("tech_c"));
    }

    #[test]
    fn deserializes_api_record() {
        let json = r#"{
            "id": "tech_lasers_2",
            "displayName": "Blue Lasers",
            "tier": 1,
            "category": "physics",
            "area": "particles",
            "cost": 1200,
            "prerequisites": ["tech_lasers_1"]
        }"#;
        let tech: Technology = serde_json::from_str(json).unwrap();
        assert_eq!(tech.id, TechId::new("tech_lasers_2"));
        assert_eq!(tech.name, "Blue Lasers");
        assert_eq!(tech.category, Category::Physics);
        assert_eq!(tech.cost, 1200.0);
        assert!(tech.description.is_empty());
        assert_eq!(tech.prerequisites, vec![TechId::new("tech_lasers_1")]);
    }

    #[test]
    fn serializes_category_lowercase() {
        let tech = Technology::new("tech_x", "X", 0, Category::Society, "biology");
        let value = serde_json::to_value(&tech).unwrap();
        assert_eq!(value["category"], "society");
        assert_eq!(value["name"], "X");
    }
}
