use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainConditions {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Canonical weather entry for a single city. Immutable once the store is
/// built; every provider response is derived from a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub coord: Coord,
    pub main: MainConditions,
    /// Non-empty, ordered list of condition descriptors.
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub clouds: Clouds,
    /// Visibility in meters.
    pub visibility: u32,
    /// Observation timestamp, epoch seconds. Stamped when the store is built.
    #[serde(default)]
    pub dt: i64,
    pub sys: Sys,
    /// UTC offset in seconds.
    pub timezone: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Jitter may push this outside 0..=100; values are reported as generated.
    pub humidity: i32,
}

/// One projected day of a forecast. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<Condition>,
    /// ISO-8601 rendering of `dt`.
    pub dt_txt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    pub country: String,
}

/// Five consecutive daily projections plus the city they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub list: Vec<ForecastEntry>,
    pub city: ForecastCity,
}

/// Search-result shape; always derivable from a [`WeatherRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySummary {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&WeatherRecord> for CitySummary {
    fn from(record: &WeatherRecord) -> Self {
        Self {
            name: record.name.clone(),
            country: record.country.clone(),
            lat: record.coord.lat,
            lon: record.coord.lon,
        }
    }
}
