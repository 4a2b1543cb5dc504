use anyhow::Context;
use clap::{Parser, Subcommand};
use std::time::Duration;

use weathernow_core::provider::{WeatherApi, provider_from_config};
use weathernow_core::{Config, WeatherStore};

use crate::render;

/// Auto-refresh period for `show --watch`, in seconds.
const DEFAULT_WATCH_SECS: u64 = 300;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "WeatherNow dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions for a city.
    Current {
        /// City name; falls back to the configured default.
        city: Option<String>,
    },

    /// Show the 5-day forecast for a city.
    Forecast {
        /// City name; falls back to the configured default.
        city: Option<String>,
    },

    /// Show current conditions and the forecast together.
    Show {
        /// City name; falls back to the configured default.
        city: Option<String>,

        /// Keep refreshing until interrupted.
        #[arg(long)]
        watch: bool,

        /// Refresh period in seconds (with --watch).
        #[arg(long, default_value_t = DEFAULT_WATCH_SECS)]
        every: u64,
    },

    /// Search the known cities by name fragment.
    Search {
        /// Fragment matched case-insensitively against city names.
        query: String,
    },

    /// List every city the dashboard knows about.
    Cities,

    /// Pick a default city and tune the simulated latency.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let provider = provider_from_config(&config)?;

        match self.command {
            Command::Current { city } => {
                let city = city.unwrap_or_else(|| config.default_city_name().to_string());
                let record = provider.current_weather(&city).await?;
                render::current(&record);
            }

            Command::Forecast { city } => {
                let city = city.unwrap_or_else(|| config.default_city_name().to_string());
                let series = provider.forecast(&city).await?;
                render::forecast(&series);
            }

            Command::Show { city, watch, every } => {
                let city = city.unwrap_or_else(|| config.default_city_name().to_string());

                show_once(provider.as_ref(), &city).await?;

                if watch {
                    let mut ticker =
                        tokio::time::interval(Duration::from_secs(every.max(1)));
                    // First tick fires immediately; the fetch above covered it.
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        show_once(provider.as_ref(), &city).await?;
                    }
                }
            }

            Command::Search { query } => {
                let results = provider.search_cities(&query).await;
                render::cities(&results);
            }

            Command::Cities => {
                let results = provider.search_cities("").await;
                render::cities(&results);
            }

            Command::Configure => configure(config).await?,
        }

        Ok(())
    }
}

async fn show_once(provider: &dyn WeatherApi, city: &str) -> anyhow::Result<()> {
    // Current conditions and forecast load together, the way the dashboard
    // fetches a selected city.
    let (record, series) = tokio::try_join!(
        provider.current_weather(city),
        provider.forecast(city),
    )?;

    render::current(&record);
    println!();
    render::forecast(&series);
    Ok(())
}

async fn configure(mut config: Config) -> anyhow::Result<()> {
    let store = WeatherStore::builtin()?;
    let names: Vec<&str> = store.all().iter().map(|r| r.name.as_str()).collect();

    let city = inquire::Select::new("Default city:", names)
        .prompt()
        .context("Configuration aborted")?;
    config.set_default_city(city);

    let tune = inquire::Confirm::new("Tune the simulated latency?")
        .with_default(false)
        .prompt()
        .context("Configuration aborted")?;

    if tune {
        config.delays.current_ms = prompt_ms("Current-conditions delay (ms):", config.delays.current_ms)?;
        config.delays.forecast_ms = prompt_ms("Forecast delay (ms):", config.delays.forecast_ms)?;
        config.delays.search_ms = prompt_ms("Search delay (ms):", config.delays.search_ms)?;
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn prompt_ms(label: &str, current: u64) -> anyhow::Result<u64> {
    inquire::CustomType::<u64>::new(label)
        .with_default(current)
        .prompt()
        .context("Configuration aborted")
}
