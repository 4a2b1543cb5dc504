//! Core library for the WeatherNow dashboard.
//!
//! This crate defines:
//! - The canonical city table and its read-only store
//! - Abstraction over weather back ends, plus the bundled simulated provider
//! - Shared domain models (records, forecasts, search results)
//! - User configuration handling
//!
//! It is used by `weathernow-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod provider;
pub mod store;

pub use config::{Config, DelayConfig};
pub use model::{CitySummary, ForecastEntry, ForecastSeries, WeatherRecord};
pub use provider::{Delays, MockProvider, ProviderError, WeatherApi, provider_from_config};
pub use store::{WeatherStore, normalize_city};
