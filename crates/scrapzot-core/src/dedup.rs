use crate::config::ExportConfig;
use std::collections::HashMap;

/// Hands out ` (n)` suffixes for titles seen more than once in a run.
#[derive(Debug, Clone)]
pub struct Deduper {
    enabled: bool,
    seen: HashMap<String, u32>,
}

impl Deduper {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            enabled: config.dedup,
            seen: HashMap::new(),
        }
    }

    /// Empty on the first sighting of `title`, ` (N)` on the N-th.
    pub fn suffix(&mut self, title: &str) -> String {
        if !self.enabled {
            return String::new();
        }
        match self.seen.get_mut(title) {
            Some(count) => {
                *count += 1;
                format!(" ({count})")
            }
            None => {
                self.seen.insert(title.to_string(), 1);
                String::new()
            }
        }
    }
}

/// Slash-joined folder path from the root, used as a record's tag.
///
/// Starts unset at the root; the root's own (empty) name leaves a leading
/// separator that [`TagChain::as_subject`] strips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChain(Option<String>);

impl TagChain {
    pub fn root() -> Self {
        Self(None)
    }

    /// Chain for the children of folder `name`. Always empty with tags off.
    pub fn extend(&self, name: &str, config: &ExportConfig) -> Self {
        if !config.tags {
            return Self(Some(String::new()));
        }
        match &self.0 {
            None => Self(Some(name.to_string())),
            Some(chain) => Self(Some(format!("{chain}/{name}"))),
        }
    }

    pub fn as_subject(&self) -> &str {
        self.0.as_deref().unwrap_or("").trim_start_matches('/')
    }
}
