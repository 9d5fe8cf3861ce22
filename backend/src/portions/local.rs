//! In-memory portion source.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Datelike;
use parking_lot::RwLock;

use super::{ErrorContext, PortionEntry, PortionError, PortionResult, PortionSource};

/// Portion source backed by a map of year to entries.
///
/// Years can be marked as failing to exercise the degraded paths of the
/// resolver. Every call to [`PortionSource::fetch_year`] is counted.
#[derive(Debug, Default)]
pub struct LocalPortionSource {
    entries: RwLock<HashMap<i32, Vec<PortionEntry>>>,
    failing: RwLock<HashSet<i32>>,
    fetches: AtomicUsize,
}

impl LocalPortionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from entries, grouped by the year of their date.
    pub fn with_entries(entries: impl IntoIterator<Item = PortionEntry>) -> Self {
        let source = Self::new();
        for entry in entries {
            source.insert(entry);
        }
        source
    }

    pub fn insert(&self, entry: PortionEntry) {
        self.entries
            .write()
            .entry(entry.date.year())
            .or_default()
            .push(entry);
    }

    /// Make every fetch for `year` fail with a timeout.
    pub fn fail_year(&self, year: i32) {
        self.failing.write().insert(year);
    }

    /// Number of `fetch_year` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PortionSource for LocalPortionSource {
    fn fetch_year(&self, year: i32) -> PortionResult<Vec<PortionEntry>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.failing.read().contains(&year) {
            return Err(PortionError::timeout(
                "simulated timeout",
                ErrorContext::new("fetch_year").with_year(year),
            ));
        }

        self.entries
            .read()
            .get(&year)
            .cloned()
            .ok_or_else(|| PortionError::unavailable(year))
    }
}
