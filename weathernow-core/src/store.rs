use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;

use crate::model::WeatherRecord;

/// Canonical city table bundled with the crate.
const CITY_TABLE: &str = include_str!("data/cities.json");

/// Immutable, in-memory table of canonical weather records.
///
/// Built once at startup and never extended or mutated afterwards. Lookups
/// are exact matches on the normalized city name; `all()` preserves the
/// insertion order of the table.
#[derive(Debug)]
pub struct WeatherStore {
    records: Vec<WeatherRecord>,
    index: HashMap<String, usize>,
}

impl WeatherStore {
    /// Build the store from the embedded city table.
    ///
    /// Each record's observation timestamp is stamped with the construction
    /// instant, like a snapshot taken at process start.
    pub fn builtin() -> Result<Self> {
        let mut records: Vec<WeatherRecord> =
            serde_json::from_str(CITY_TABLE).context("Failed to parse embedded city table")?;

        let now = Utc::now().timestamp();
        for record in &mut records {
            record.dt = now;
        }

        Ok(Self::from_records(records))
    }

    /// Build a store from explicit records.
    ///
    /// The first record wins when two share a normalized name, so the store
    /// always holds exactly one entry per city.
    pub fn from_records(records: Vec<WeatherRecord>) -> Self {
        let mut kept = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            let key = normalize_city(&record.name);
            if index.contains_key(&key) {
                continue;
            }
            index.insert(key, kept.len());
            kept.push(record);
        }

        Self { records: kept, index }
    }

    /// Exact lookup by normalized city key. No fuzzy or partial matching.
    pub fn get(&self, key: &str) -> Option<&WeatherRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// All records, in insertion order.
    pub fn all(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalize a city name for lookups: trim surrounding whitespace and
/// lower-case. The only normalization applied anywhere in the core.
pub fn normalize_city(name: &str) -> String {
    name.trim().to_lowercase()
}
