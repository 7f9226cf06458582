use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Settings for one export run, usually built from command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Ordinals (1-based, unique sources in export order) to leave out.
    pub exclude: BTreeSet<u64>,
    /// Emit the collection hierarchy after the records.
    pub collections: bool,
    /// Emit folder paths as tags on every record.
    pub tags: bool,
    /// Suffix repeated titles with ` (n)`.
    pub dedup: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            exclude: BTreeSet::new(),
            collections: true,
            tags: true,
            dedup: true,
        }
    }
}

impl ExportConfig {
    pub fn is_excluded(&self, ordinal: u64) -> bool {
        self.exclude.contains(&ordinal)
    }
}
