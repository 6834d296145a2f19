//! Typed table rows and aggregate results

mod history;
mod index;
mod point;
mod record;
mod stats;

pub use history::HistoricalSeries;
pub use index::{Absence, IndexValue};
pub use point::{DataQuality, PrecipitationPoint};
pub use record::{DroughtClass, DroughtIndices, EnrichedRecord, Season};
pub use stats::{RegionSummary, RegionalStats, SeasonalStats, StatsReport};
