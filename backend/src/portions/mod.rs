//! Torah-portion data sources.
//!
//! A source returns all dated entries of one Gregorian year at once; the
//! parsha resolver caches that list per year and picks the entry for a
//! given Saturday.
//!
//! - [`LocalPortionSource`]: in-memory entries, for tests and offline use
//! - [`HebcalClient`]: the public hebcal.com calendar API (feature `hebcal`)

pub mod error;
pub mod local;

#[cfg(feature = "hebcal")]
pub mod hebcal;

pub use error::{ErrorContext, PortionError, PortionResult};
pub use local::LocalPortionSource;

#[cfg(feature = "hebcal")]
pub use hebcal::HebcalClient;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category of weekly Torah-portion entries.
pub const PARASHAT_CATEGORY: &str = "parashat";

/// One dated calendar entry delivered by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortionEntry {
    pub date: NaiveDate,
    pub category: String,
    pub title: String,
}

impl PortionEntry {
    pub fn new(date: NaiveDate, category: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date,
            category: category.into(),
            title: title.into(),
        }
    }

    /// Weekly portion entry.
    pub fn parashat(date: NaiveDate, title: impl Into<String>) -> Self {
        Self::new(date, PARASHAT_CATEGORY, title)
    }

    pub fn is_parashat(&self) -> bool {
        self.category == PARASHAT_CATEGORY
    }
}

/// Source of Torah-portion entries, queried by Gregorian year.
///
/// Implementations may block (network); callers are expected to cache.
pub trait PortionSource: Send + Sync {
    fn fetch_year(&self, year: i32) -> PortionResult<Vec<PortionEntry>>;
}
