pub mod catalog;
pub mod loader;
pub mod schema;

pub use catalog::{Catalog, catalog_from_json, load_catalog, load_layout};
pub use loader::DataLoadError;
