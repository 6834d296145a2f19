//! Climate metrics over point series
//!
//! Everything here is a pure function of in-memory data. `MetricsEngine`
//! binds the functions to one configuration.

mod aggregate;
mod drought;
mod engine;
mod percentile;
mod rolling;
mod stats;

pub use aggregate::{regional_stats, seasonal_stats, summary};
pub use drought::{anomaly, classify, spi, SPI_TIMESCALES};
pub use engine::MetricsEngine;
pub use percentile::percentile_ranks;
pub use rolling::{rolling_average, ROLLING_WINDOWS};
pub use stats::{mean, median, population_std, sample_std};
