use crate::{
    Config,
    model::{CitySummary, ForecastSeries, WeatherRecord},
    store::WeatherStore,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod mock;

pub use mock::{Delays, MockProvider};

/// Errors surfaced by a weather back end.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The normalized city name has no entry in the store. Terminal for the
    /// request; callers must not expect an internal retry.
    #[error("City not found")]
    CityNotFound,
}

/// Abstraction over a weather back end.
///
/// A front end talks to the core exclusively through these three
/// operations. Each call is independent: concurrent requests may interleave
/// in any order and nothing guarantees a consistent "as-of" instant across
/// them.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Current conditions for a city, looked up by display name
    /// (whitespace-tolerant, case-insensitive).
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord, ProviderError>;

    /// Five-day forecast for a city: today plus the four following days.
    async fn forecast(&self, city: &str) -> Result<ForecastSeries, ProviderError>;

    /// Summaries of every known city whose display name contains `query`
    /// (case-insensitive), in store order. An empty result is a normal
    /// outcome, so this never fails.
    async fn search_cities(&self, query: &str) -> Vec<CitySummary>;
}

/// Construct the bundled provider over the embedded city table, with the
/// simulated latency taken from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherApi>> {
    let store = Arc::new(WeatherStore::builtin()?);
    Ok(Box::new(MockProvider::new(store).with_delays(config.delays.as_delays())))
}
