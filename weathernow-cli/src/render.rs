//! Terminal rendering of provider results.

use chrono::{FixedOffset, LocalResult, TimeZone, Utc};

use weathernow_core::model::{CitySummary, ForecastSeries, WeatherRecord};

pub fn current(record: &WeatherRecord) {
    let condition = record
        .weather
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or("unknown");

    println!(
        "{}, {}  ({:.4}, {:.4})",
        record.name, record.country, record.coord.lat, record.coord.lon
    );
    println!(
        "  {condition}, {:.1}°C (feels like {:.1}°C), min {:.1}°C / max {:.1}°C",
        record.main.temp, record.main.feels_like, record.main.temp_min, record.main.temp_max
    );
    println!(
        "  humidity {}%, pressure {} hPa, clouds {}%, visibility {} m",
        record.main.humidity, record.main.pressure, record.clouds.all, record.visibility
    );
    println!(
        "  wind {:.1} m/s at {}°",
        record.wind.speed, record.wind.deg
    );
    println!(
        "  sunrise {}, sunset {} (local time)",
        local_time(record.sys.sunrise, record.timezone),
        local_time(record.sys.sunset, record.timezone)
    );
}

pub fn forecast(series: &ForecastSeries) {
    println!("5-day forecast for {}, {}:", series.city.name, series.city.country);

    for entry in &series.list {
        let condition = entry
            .weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or("unknown");

        println!(
            "  {}  {:>5.1}°C (min {:.1} / max {:.1}), humidity {}%, {}",
            day_label(entry.dt),
            entry.main.temp,
            entry.main.temp_min,
            entry.main.temp_max,
            entry.main.humidity,
            condition
        );
    }
}

pub fn cities(list: &[CitySummary]) {
    if list.is_empty() {
        println!("No matching cities.");
        return;
    }

    for city in list {
        println!("  {}, {}  ({:.4}, {:.4})", city.name, city.country, city.lat, city.lon);
    }
}

/// Render an epoch timestamp as HH:MM in the city's own UTC offset.
fn local_time(epoch: i64, offset_secs: i32) -> String {
    let Some(offset) = FixedOffset::east_opt(offset_secs) else {
        return epoch.to_string();
    };

    match Utc.timestamp_opt(epoch, 0) {
        LocalResult::Single(dt) => dt.with_timezone(&offset).format("%H:%M").to_string(),
        _ => epoch.to_string(),
    }
}

/// Weekday + date label for a forecast day.
fn day_label(epoch: i64) -> String {
    match Utc.timestamp_opt(epoch, 0) {
        LocalResult::Single(dt) => dt.format("%a %Y-%m-%d").to_string(),
        _ => epoch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_time_applies_the_utc_offset() {
        // 2021-12-20 12:00:00 UTC at UTC+9 is 21:00.
        assert_eq!(local_time(1_640_001_600, 32_400), "21:00");
        assert_eq!(local_time(1_640_001_600, 0), "12:00");
    }

    #[test]
    fn out_of_range_offset_falls_back_to_raw_epoch() {
        assert_eq!(local_time(1_640_001_600, 999_999_999), "1640001600");
    }

    #[test]
    fn day_label_shows_weekday_and_date() {
        assert_eq!(day_label(1_640_001_600), "Mon 2021-12-20");
    }
}
