use chrono::{Duration as TimeDelta, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::model::{
    CitySummary, ForecastCity, ForecastEntry, ForecastMain, ForecastSeries, WeatherRecord,
};
use crate::provider::{ProviderError, WeatherApi};
use crate::store::{WeatherStore, normalize_city};
use async_trait::async_trait;

/// Simulated latency of a current-conditions request (milliseconds).
const DEFAULT_CURRENT_DELAY_MS: u64 = 500;

/// Simulated latency of a forecast request (milliseconds).
const DEFAULT_FORECAST_DELAY_MS: u64 = 600;

/// Simulated latency of a city search (milliseconds).
const DEFAULT_SEARCH_DELAY_MS: u64 = 300;

/// Days covered by a forecast: today plus four.
const FORECAST_DAYS: i64 = 5;

/// Uniform spread applied to the current temperature (± °C).
const CURRENT_TEMP_SPREAD: f64 = 2.0;

/// Uniform spread applied to forecast temperatures (± °C).
const FORECAST_TEMP_SPREAD: f64 = 3.0;

/// Uniform spread applied to forecast humidity (± percentage points).
const HUMIDITY_SPREAD: f64 = 10.0;

/// Artificial latency awaited before each operation resolves.
///
/// The exact values are not contractual; callers must tolerate any bounded
/// delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    pub current: Duration,
    pub forecast: Duration,
    pub search: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            current: Duration::from_millis(DEFAULT_CURRENT_DELAY_MS),
            forecast: Duration::from_millis(DEFAULT_FORECAST_DELAY_MS),
            search: Duration::from_millis(DEFAULT_SEARCH_DELAY_MS),
        }
    }
}

impl Delays {
    /// No artificial latency. Mostly useful in tests.
    pub fn none() -> Self {
        Self {
            current: Duration::ZERO,
            forecast: Duration::ZERO,
            search: Duration::ZERO,
        }
    }
}

/// Weather back end backed entirely by the in-memory store.
///
/// Simulates a remote API: each operation resolves after its configured
/// delay, and temperature/humidity fields get a small uniform jitter so
/// repeated calls look like live data. Unknown cities reject immediately
/// with [`ProviderError::CityNotFound`], before any delay.
///
/// The random source is an explicit dependency so tests can seed it; the
/// store is shared and read-only, so concurrent calls need no coordination
/// beyond the short lock around each draw.
#[derive(Debug)]
pub struct MockProvider<R = StdRng> {
    store: Arc<WeatherStore>,
    delays: Delays,
    rng: Mutex<R>,
}

impl MockProvider<StdRng> {
    /// Provider with default delays and an entropy-seeded random source.
    pub fn new(store: Arc<WeatherStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }
}

impl<R: Rng> MockProvider<R> {
    /// Provider with an explicit random source, e.g. a seeded rng in tests.
    pub fn with_rng(store: Arc<WeatherStore>, rng: R) -> Self {
        Self {
            store,
            delays: Delays::default(),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the simulated latency.
    pub fn with_delays(mut self, delays: Delays) -> Self {
        self.delays = delays;
        self
    }

    fn lookup(&self, city: &str) -> Result<WeatherRecord, ProviderError> {
        let key = normalize_city(city);
        match self.store.get(&key) {
            Some(record) => Ok(record.clone()),
            None => {
                warn!("No weather entry for '{key}'");
                Err(ProviderError::CityNotFound)
            }
        }
    }

    /// One uniform draw in `-spread..spread`. The lock is never held across
    /// an await point.
    fn draw(&self, spread: f64) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(-spread..spread)
    }
}

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[async_trait]
impl<R> WeatherApi for MockProvider<R>
where
    R: Rng + Send + std::fmt::Debug,
{
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord, ProviderError> {
        let mut record = self.lookup(city)?;
        tokio::time::sleep(self.delays.current).await;

        let jitter = self.draw(CURRENT_TEMP_SPREAD);
        record.main.temp = round1(record.main.temp + jitter);

        debug!("Current conditions for {}: {}°C ({jitter:+.2} jitter)", record.name, record.main.temp);
        Ok(record)
    }

    async fn forecast(&self, city: &str) -> Result<ForecastSeries, ProviderError> {
        let base = self.lookup(city)?;
        tokio::time::sleep(self.delays.forecast).await;

        let now = Utc::now();
        let mut list = Vec::with_capacity(FORECAST_DAYS as usize);

        for day in 0..FORECAST_DAYS {
            let when = now + TimeDelta::days(day);
            // One temperature draw per day; min/max move together with it.
            let temp_jitter = self.draw(FORECAST_TEMP_SPREAD);
            let humidity_jitter = self.draw(HUMIDITY_SPREAD).floor() as i32;

            list.push(ForecastEntry {
                dt: when.timestamp(),
                main: ForecastMain {
                    temp: round1(base.main.temp + temp_jitter),
                    temp_min: round1(base.main.temp_min + temp_jitter),
                    temp_max: round1(base.main.temp_max + temp_jitter),
                    humidity: i32::from(base.main.humidity) + humidity_jitter,
                },
                weather: base.weather.clone(),
                dt_txt: when.to_rfc3339_opts(SecondsFormat::Secs, true),
            });
        }

        debug!("Synthesized {FORECAST_DAYS}-day forecast for {}", base.name);
        Ok(ForecastSeries {
            list,
            city: ForecastCity {
                name: base.name,
                country: base.country,
            },
        })
    }

    async fn search_cities(&self, query: &str) -> Vec<CitySummary> {
        tokio::time::sleep(self.delays.search).await;

        let needle = normalize_city(query);
        self.store
            .all()
            .iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .map(CitySummary::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Clouds, Condition, Coord, MainConditions, Sys, Wind};

    fn store() -> Arc<WeatherStore> {
        Arc::new(WeatherStore::builtin().expect("embedded table must parse"))
    }

    fn provider() -> MockProvider<StdRng> {
        provider_on(store())
    }

    fn provider_on(store: Arc<WeatherStore>) -> MockProvider<StdRng> {
        MockProvider::with_rng(store, StdRng::seed_from_u64(7)).with_delays(Delays::none())
    }

    fn assert_one_decimal(value: f64) {
        let scaled = value * 10.0;
        assert!(
            (scaled - scaled.round()).abs() < 1e-6,
            "{value} is not rounded to one decimal place"
        );
    }

    #[test]
    fn round1_rounds_to_one_decimal() {
        assert_eq!(round1(15.04), 15.0);
        assert_eq!(round1(15.05), 15.1);
        assert_eq!(round1(-1.26), -1.3);
        assert_eq!(round1(22.0), 22.0);
    }

    #[tokio::test]
    async fn current_weather_preserves_identity_and_bounds_temp() {
        let store = store();
        let provider = provider_on(Arc::clone(&store));

        for spelling in ["New York", "  new york ", "LONDON", "tokyo", " Paris", "sydney "] {
            let result = provider
                .current_weather(spelling)
                .await
                .expect("known city must resolve");

            let canonical = store
                .get(&normalize_city(spelling))
                .expect("canonical entry exists");

            assert_eq!(result.name, canonical.name);
            assert_eq!(result.country, canonical.country);
            assert_eq!(result.coord, canonical.coord);
            assert_eq!(result.main.humidity, canonical.main.humidity);
            assert_eq!(result.weather, canonical.weather);

            assert!((result.main.temp - canonical.main.temp).abs() <= 2.0);
            assert_one_decimal(result.main.temp);
        }
    }

    #[tokio::test]
    async fn current_weather_example_london() {
        let result = provider()
            .current_weather("  LONDON ")
            .await
            .expect("London must resolve");

        assert_eq!(result.name, "London");
        assert_eq!(result.country, "GB");
        assert!(result.main.temp >= 13.0 && result.main.temp <= 17.0);
    }

    #[tokio::test]
    async fn current_weather_rejects_unknown_city() {
        let err = provider()
            .current_weather("Atlantis")
            .await
            .expect_err("unknown city must fail");
        assert_eq!(err, ProviderError::CityNotFound);
    }

    #[tokio::test]
    async fn repeated_calls_keep_identity_stable() {
        let provider = provider();

        let first = provider.current_weather("Sydney").await.expect("resolves");
        let second = provider.current_weather("Sydney").await.expect("resolves");

        // Temperatures may differ between calls; identity never does.
        assert_eq!(first.name, second.name);
        assert_eq!(first.country, second.country);
        assert_eq!(first.coord, second.coord);
    }

    #[tokio::test]
    async fn forecast_has_five_consecutive_days() {
        let before = Utc::now().timestamp();
        let series = provider().forecast("Tokyo").await.expect("resolves");
        let after = Utc::now().timestamp();

        assert_eq!(series.city.name, "Tokyo");
        assert_eq!(series.city.country, "JP");
        assert_eq!(series.list.len(), 5);

        assert!(series.list[0].dt >= before && series.list[0].dt <= after);
        for pair in series.list.windows(2) {
            assert_eq!(pair[1].dt - pair[0].dt, 86_400);
        }
    }

    #[tokio::test]
    async fn forecast_timestamps_render_as_iso8601() {
        let series = provider().forecast("Paris").await.expect("resolves");

        for entry in &series.list {
            let parsed = chrono::DateTime::parse_from_rfc3339(&entry.dt_txt)
                .expect("dt_txt must be ISO-8601");
            assert_eq!(parsed.timestamp(), entry.dt);
        }
    }

    #[tokio::test]
    async fn forecast_jitters_each_day_with_a_single_draw() {
        let store = store();
        let provider = provider_on(Arc::clone(&store));
        let base = store.get("london").expect("canonical entry exists").clone();

        let series = provider.forecast("London").await.expect("resolves");

        for entry in &series.list {
            assert!((entry.main.temp - base.main.temp).abs() <= 3.0 + 1e-9);
            assert!((entry.main.temp_min - base.main.temp_min).abs() <= 3.0 + 1e-9);
            assert!((entry.main.temp_max - base.main.temp_max).abs() <= 3.0 + 1e-9);
            assert_one_decimal(entry.main.temp);
            assert_one_decimal(entry.main.temp_min);
            assert_one_decimal(entry.main.temp_max);

            // temp, temp_min and temp_max shift by the same draw, so their
            // spacing survives up to independent rounding.
            let spacing = (entry.main.temp - entry.main.temp_min)
                - (base.main.temp - base.main.temp_min);
            assert!(spacing.abs() <= 0.1 + 1e-9);

            assert_eq!(entry.weather, base.weather);
        }
    }

    #[tokio::test]
    async fn forecast_humidity_varies_within_ten_points_and_is_not_clamped() {
        // A base outside the usual percent range shows that generated values
        // are reported as-is rather than clamped to 0..=100.
        let record = WeatherRecord {
            id: 1,
            name: "Steamtown".to_string(),
            country: "XX".to_string(),
            coord: Coord { lat: 0.0, lon: 0.0 },
            main: MainConditions {
                temp: 20.0,
                feels_like: 20.0,
                temp_min: 15.0,
                temp_max: 25.0,
                pressure: 1000,
                humidity: 150,
            },
            weather: vec![Condition {
                id: 800,
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            }],
            wind: Wind { speed: 1.0, deg: 0 },
            clouds: Clouds { all: 0 },
            visibility: 10_000,
            dt: 0,
            sys: Sys { country: "XX".to_string(), sunrise: 0, sunset: 0 },
            timezone: 0,
        };
        let provider = provider_on(Arc::new(WeatherStore::from_records(vec![record])));
        let series = provider.forecast("Steamtown").await.expect("resolves");

        for entry in &series.list {
            // Draw is floor(uniform(-10, 10)), so the offset sits in -10..=9.
            assert!(entry.main.humidity >= 140 && entry.main.humidity <= 159);
            // Anything above 100 proves no clamping happened.
            assert!(entry.main.humidity > 100);
        }
    }

    #[tokio::test]
    async fn search_with_empty_or_blank_query_returns_all_cities_in_order() {
        let provider = provider();

        for query in ["", "   "] {
            let results = provider.search_cities(query).await;
            let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, ["New York", "London", "Tokyo", "Paris", "Sydney"]);
        }
    }

    #[tokio::test]
    async fn search_matches_substrings_case_insensitively() {
        let provider = provider();

        let results = provider.search_cities("lon").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "London");
        assert_eq!(results[0].country, "GB");

        let shouted = provider.search_cities("LON").await;
        assert_eq!(shouted.len(), 1);
        assert_eq!(shouted[0].name, "London");

        let results = provider.search_cities("o").await;
        let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["New York", "London", "Tokyo"]);
    }

    #[tokio::test]
    async fn search_with_no_match_returns_empty() {
        let results = provider().search_cities("zzz-nonexistent").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn same_seed_reproduces_the_same_jitter() {
        let store = store();
        let a = provider_on(Arc::clone(&store));
        let b = provider_on(Arc::clone(&store));

        let first = a.current_weather("Paris").await.expect("resolves");
        let second = b.current_weather("Paris").await.expect("resolves");
        assert_eq!(first, second);

        let fa = a.forecast("Paris").await.expect("resolves");
        let fb = b.forecast("Paris").await.expect("resolves");
        for (ea, eb) in fa.list.iter().zip(&fb.list) {
            // Timestamps come from the wall clock, so compare the jittered
            // values only.
            assert_eq!(ea.main, eb.main);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn operations_wait_their_configured_delay() {
        let provider = MockProvider::with_rng(store(), StdRng::seed_from_u64(7));

        let start = tokio::time::Instant::now();
        provider.current_weather("London").await.expect("resolves");
        assert_eq!(start.elapsed(), Duration::from_millis(500));

        let start = tokio::time::Instant::now();
        provider.forecast("London").await.expect("resolves");
        assert_eq!(start.elapsed(), Duration::from_millis(600));

        let start = tokio::time::Instant::now();
        provider.search_cities("lon").await;
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_city_rejects_before_the_delay() {
        let provider = MockProvider::with_rng(store(), StdRng::seed_from_u64(7));

        let start = tokio::time::Instant::now();
        let err = provider.current_weather("Atlantis").await.expect_err("must fail");
        assert_eq!(err, ProviderError::CityNotFound);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
