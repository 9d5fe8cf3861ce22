//! Resolution services and their caches.
//!
//! Everything is synchronous. The only blocking call is the portion source
//! fetch, done at most once per year per [`WeekResolver`].

pub mod cache;
pub mod day_cache;
pub mod parsha;
pub mod sequence;
pub mod upcoming;
pub mod week;
pub mod zmanim;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{BoundedCache, CacheStats};
pub use day_cache::DayCache;
pub use parsha::{saturday_for_date, ParshaResolver, YearPortionCache};
pub use sequence::{next_friday, SequenceResolver};
pub use upcoming::UpcomingEvent;
pub use week::WeekResolver;
pub use zmanim::ZmanimCalculator;
