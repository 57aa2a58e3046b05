//! Catalog assembly: decode a technology payload, index it, and pair it with
//! the layout configuration found next to the application's settings.

use std::path::Path;
use techweb_core::fixed::{Fixed64, f64_to_fixed64};
use techweb_core::{Category, GraphIndex, LayoutConfig, TechId, Technology};

use crate::loader::{DataLoadError, Format, find_config_file, read_config};
use crate::schema::{LayoutData, TechnologyData};

/// Base name of the optional layout configuration file.
pub const LAYOUT_FILE: &str = "layout";

/// Error label for catalogs decoded from a response body.
pub const API_ORIGIN: &str = "<api response>";

// ===========================================================================
// Catalog
// ===========================================================================

/// The indexed graph and the layout to draw it with.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub index: GraphIndex,
    pub layout: LayoutConfig,
}

/// Build a catalog from a technology API body and the layout configuration
/// in `config_dir`.
pub fn load_catalog(body: &str, config_dir: &Path) -> Result<Catalog, DataLoadError> {
    let index = catalog_from_json(body)?;
    let layout = load_layout(config_dir)?;

    tracing::info!(
        technologies = index.len(),
        diagnostics = index.diagnostics().len(),
        config_dir = %config_dir.display(),
        "loaded technology catalog"
    );
    Ok(Catalog { index, layout })
}

/// Build an index from a JSON array of technology records, as returned by
/// the technology API.
pub fn catalog_from_json(body: &str) -> Result<GraphIndex, DataLoadError> {
    let origin = Path::new(API_ORIGIN);
    let records: Vec<TechnologyData> = Format::Json.decode(body, origin)?;
    let technologies = records
        .into_iter()
        .map(|data| resolve_technology(data, origin))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GraphIndex::build(technologies)?)
}

/// Read `layout.{ron,json,toml}` from `config_dir`, or the built-in layout
/// when there is none.
pub fn load_layout(config_dir: &Path) -> Result<LayoutConfig, DataLoadError> {
    match find_config_file(config_dir, LAYOUT_FILE)? {
        Some(path) => resolve_layout(read_config(&path)?, &path),
        None => Ok(LayoutConfig::default()),
    }
}

// ===========================================================================
// Resolution
// ===========================================================================

fn resolve_category(name: &str, origin: &Path) -> Result<Category, DataLoadError> {
    Category::from_name(name).ok_or_else(|| DataLoadError::UnknownCategory {
        file: origin.to_path_buf(),
        name: name.to_string(),
    })
}

/// Resolve one record into a [`Technology`].
pub fn resolve_technology(data: TechnologyData, origin: &Path) -> Result<Technology, DataLoadError> {
    let category = resolve_category(&data.category, origin)?;
    if !data.cost.is_finite() || data.cost < 0.0 {
        return Err(DataLoadError::InvalidValue {
            file: origin.to_path_buf(),
            name: data.id,
            field: "cost",
            detail: format!("expected a non-negative number, got {}", data.cost),
        });
    }

    Ok(Technology::new(data.id, data.name, data.tier, category, data.area)
        .with_cost(data.cost)
        .with_description(data.description)
        .with_prerequisites(data.prerequisites.into_iter().map(TechId::new)))
}

fn resolve_spacing(
    value: Option<f64>,
    fallback: Fixed64,
    field: &'static str,
    origin: &Path,
) -> Result<Fixed64, DataLoadError> {
    match value {
        None => Ok(fallback),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(f64_to_fixed64(v)),
        Some(v) => Err(DataLoadError::InvalidValue {
            file: origin.to_path_buf(),
            name: "layout".to_string(),
            field,
            detail: format!("expected a non-negative number, got {v}"),
        }),
    }
}

/// Resolve layout settings on top of [`LayoutConfig::default`].
///
/// When area lists are overridden but `other_slot` is not, the "other" slot
/// moves to just past the longest area list. Slots that would spill into the
/// next lane are rejected.
pub fn resolve_layout(data: LayoutData, origin: &Path) -> Result<LayoutConfig, DataLoadError> {
    let mut config = LayoutConfig::default();

    config.lane_width = resolve_spacing(data.lane_width, config.lane_width, "lane_width", origin)?;
    config.tier_spacing =
        resolve_spacing(data.tier_spacing, config.tier_spacing, "tier_spacing", origin)?;
    config.area_spacing =
        resolve_spacing(data.area_spacing, config.area_spacing, "area_spacing", origin)?;

    for (name, lane) in data.lanes {
        config.lanes.insert(resolve_category(&name, origin)?, lane);
    }

    let areas_overridden = !data.areas.is_empty();
    for (name, areas) in data.areas {
        config.areas.insert(resolve_category(&name, origin)?, areas);
    }

    config.other_slot = match data.other_slot {
        Some(slot) => slot,
        None if areas_overridden => config
            .areas
            .values()
            .map(Vec::len)
            .max()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        None => config.other_slot,
    };

    if !config.slots_fit_lane() {
        return Err(DataLoadError::InvalidValue {
            file: origin.to_path_buf(),
            name: "layout".to_string(),
            field: "areas",
            detail: format!(
                "{} area slots at spacing {} overflow lane_width {}",
                config.slots_per_lane(),
                config.area_spacing,
                config.lane_width
            ),
        });
    }

    tracing::debug!(
        file = %origin.display(),
        other_slot = config.other_slot,
        "resolved layout settings"
    );
    Ok(config)
}

// ===========================================================================
// Tests
// ===========================================================================
