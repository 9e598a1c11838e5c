//! Application services sitting between the observation store and callers.

pub mod forecaster;
pub mod observation_store;

pub use forecaster::Forecaster;
pub use observation_store::ObservationStore;
