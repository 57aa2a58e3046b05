use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifies a technology in the catalog. Stable across reloads; this is
/// the key everything else (edges, selections, highlights) is built on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechId(pub String);

impl TechId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TechId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TechId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TechId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TechId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
