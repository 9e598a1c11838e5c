//! Forecast engine.
//!
//! Observations for a zip code are bucketed into days, weeks or months,
//! a trend (and, with enough history, a seasonal profile) is fitted over the
//! trailing window, and the fit is projected forward with bounds that widen
//! with the square root of the lead time.

pub mod aggregate;
pub mod bounds;
pub mod engine;
pub mod granularity;
pub mod model;
pub mod types;
pub mod utility;

pub use engine::forecast;
pub use granularity::Granularity;
pub use types::{ForecastPoint, ForecastResult};
