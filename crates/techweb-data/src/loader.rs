//! Decoding of catalog payloads and layout configuration files.
//!
//! Configuration may be written as RON, JSON or TOML; the format follows the
//! file extension. Only one format may exist per base name in a directory.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use techweb_core::GraphError;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors raised while decoding a catalog or reading its configuration.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("unknown category '{name}' in {file}")]
    UnknownCategory { file: PathBuf, name: String },

    /// A value that decoded fine but cannot be used.
    #[error("invalid {field} for '{name}' in {file}: {detail}")]
    InvalidValue {
        file: PathBuf,
        name: String,
        field: &'static str,
        detail: String,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Formats
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Json,
    Toml,
}

impl Format {
    /// Every format, in lookup order.
    pub const ALL: [Format; 3] = [Format::Ron, Format::Json, Format::Toml];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    /// The format named by `path`'s extension.
    pub fn of_path(path: &Path) -> Result<Self, DataLoadError> {
        let ext = path.extension().and_then(|e| e.to_str());
        Self::ALL
            .into_iter()
            .find(|f| Some(f.extension()) == ext)
            .ok_or_else(|| DataLoadError::UnsupportedFormat {
                file: path.to_path_buf(),
            })
    }

    /// Decode `content`. `origin` only labels errors.
    pub fn decode<T: DeserializeOwned>(self, content: &str, origin: &Path) -> Result<T, DataLoadError> {
        let result = match self {
            Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        result.map_err(|detail| DataLoadError::Parse {
            file: origin.to_path_buf(),
            detail,
        })
    }
}

// ===========================================================================
// Configuration files
// ===========================================================================

/// Locate `{base_name}.{ron,json,toml}` in `dir`. `Ok(None)` when absent;
/// an error when more than one format is present.
pub fn find_config_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = Format::ALL
        .into_iter()
        .map(|f| dir.join(format!("{base_name}.{}", f.extension())))
        .filter(|path| path.is_file());

    match (present.next(), present.next()) {
        (Some(a), Some(b)) => Err(DataLoadError::ConflictingFormats { a, b }),
        (found, _) => Ok(found),
    }
}

/// Read and decode a configuration file.
pub fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = Format::of_path(path)?;
    let content = std::fs::read_to_string(path)?;
    format.decode(&content, path)
}

// ===========================================================================
// Tests
// ===========================================================================
