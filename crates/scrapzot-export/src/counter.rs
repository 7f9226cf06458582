use std::collections::HashSet;

/// Running ordinal of exported records, advanced once per distinct source.
///
/// The importer numbers records the same way while it runs, so an operator
/// can read a number off a stalled import and pass it to `--exclude`.
#[derive(Debug, Clone)]
pub struct Counter {
    next: u64,
    seen: HashSet<String>,
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Counter {
    pub fn new() -> Self {
        Self {
            next: 1,
            seen: HashSet::new(),
        }
    }

    /// Ordinal the next not-yet-seen source will take.
    pub fn ordinal(&self) -> u64 {
        self.next
    }

    /// Record `source`; returns whether it was new.
    pub fn count(&mut self, source: &str) -> bool {
        if self.seen.contains(source) {
            return false;
        }
        self.seen.insert(source.to_string());
        self.next += 1;
        true
    }
}
