//! Write-side configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::WritePrecision;

/// Options applied when encoding points to line protocol.
///
/// Deserializes from e.g. `{"precision": "ms", "default_tags": {"dc": "eu"}}`;
/// missing keys take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Unit the timestamp is rendered in.
    pub precision: WritePrecision,
    /// Tags added to every point. A tag set on the point itself wins.
    pub default_tags: BTreeMap<String, String>,
}

impl WriteOptions {
    /// Options with the given precision and no default tags.
    pub fn new(precision: WritePrecision) -> Self {
        Self {
            precision,
            default_tags: BTreeMap::new(),
        }
    }

    /// Add a default tag.
    pub fn default_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_tags.insert(key.into(), value.into());
        self
    }
}
