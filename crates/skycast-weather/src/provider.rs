//! OpenWeatherMap-compatible weather provider.
//!
//! Thin fetch/transform layer: raw API payloads in, canonical
//! [`WeatherReading`] / [`ForecastDay`] values out. All decision logic
//! lives downstream in the notification engine.

use crate::retry::{with_retry, RetryConfig};
use crate::types::{CityMatch, Condition, ForecastDay, ProviderError, WeatherReading};
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Forecast responses are trimmed to this many days.
const FORECAST_DAYS: usize = 5;
const CITY_SEARCH_LIMIT: usize = 5;
/// Meters; the API omits visibility when it is at its maximum.
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
    retry: RetryConfig,
}

impl WeatherProvider {
    /// Create a provider against the given API base URL.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            retry: RetryConfig::default(),
        })
    }

    /// Override the retry policy (tests use [`RetryConfig::none`]).
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch current conditions for a city by name.
    pub async fn current_by_city(&self, city: &str) -> Result<WeatherReading, ProviderError> {
        let url = self.endpoint("/data/2.5/weather", &[("q", city), ("units", "metric")])?;
        let raw: CurrentResponse = self.get_json(url).await?;
        raw.into_reading()
    }

    /// Fetch current conditions for a coordinate pair.
    pub async fn current_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReading, ProviderError> {
        let url = self.endpoint(
            "/data/2.5/weather",
            &[("lat", &lat.to_string()), ("lon", &lon.to_string()), ("units", "metric")],
        )?;
        let raw: CurrentResponse = self.get_json(url).await?;
        raw.into_reading()
    }

    /// Fetch the multi-day forecast for a city by name.
    pub async fn forecast_by_city(&self, city: &str) -> Result<Vec<ForecastDay>, ProviderError> {
        let url = self.endpoint("/data/2.5/forecast", &[("q", city), ("units", "metric")])?;
        let raw: ForecastResponse = self.get_json(url).await?;
        Ok(aggregate_forecast(raw.list))
    }

    /// Fetch the multi-day forecast for a coordinate pair.
    pub async fn forecast_by_coords(&self, lat: f64, lon: f64) -> Result<Vec<ForecastDay>, ProviderError> {
        let url = self.endpoint(
            "/data/2.5/forecast",
            &[("lat", &lat.to_string()), ("lon", &lon.to_string()), ("units", "metric")],
        )?;
        let raw: ForecastResponse = self.get_json(url).await?;
        Ok(aggregate_forecast(raw.list))
    }

    /// Search for cities matching a free-text query. An empty query short-
    /// circuits to an empty result without touching the network.
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CityMatch>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = CITY_SEARCH_LIMIT.to_string();
        let url = self.endpoint("/geo/1.0/direct", &[("q", query), ("limit", &limit)])?;
        let raw: Vec<GeoEntry> = self.get_json(url).await?;

        Ok(raw
            .into_iter()
            .map(|entry| CityMatch {
                name: entry.name,
                country: entry.country.unwrap_or_default(),
                lat: entry.lat,
                lon: entry.lon,
            })
            .collect())
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .and_then(|u| u.join(path))
            .map_err(|e| ProviderError::Parse(format!("invalid endpoint URL: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("appid", &self.api_key);
        }

        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        tracing::debug!("GET {}", url.path());

        let response = with_retry(&self.retry, || self.client.get(url.clone()).send()).await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Weather API returned status {} for {}", status, url.path());
            return Err(ProviderError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

// --- raw API payloads ---

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    #[serde(default)]
    sys: SysBlock,
    main: MainBlock,
    weather: Vec<WeatherBlock>,
    wind: WindBlock,
    /// Meters; omitted at maximum visibility.
    visibility: Option<f64>,
    dt: i64,
}

#[derive(Debug, Default, Deserialize)]
struct SysBlock {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WeatherBlock {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    /// Meters per second.
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastSample>,
}

/// One three-hourly forecast sample.
#[derive(Debug, Deserialize)]
struct ForecastSample {
    dt: i64,
    main: SampleMain,
    weather: Vec<WeatherBlock>,
    /// Probability of precipitation, 0.0-1.0.
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SampleMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    country: Option<String>,
    lat: f64,
    lon: f64,
}

impl CurrentResponse {
    fn into_reading(self) -> Result<WeatherReading, ProviderError> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Parse("response missing weather block".to_string()))?;

        Ok(WeatherReading {
            city: self.name,
            country: self.sys.country.unwrap_or_default(),
            temperature: round_i32(self.main.temp),
            feels_like: round_i32(self.main.feels_like),
            condition: Condition::from(weather.main),
            description: weather.description,
            humidity: self.main.humidity,
            // m/s -> km/h
            wind_speed: round_i32(self.wind.speed * 3.6),
            // m -> km
            visibility: self.visibility.unwrap_or(DEFAULT_VISIBILITY_M) / 1000.0,
            observed_at: DateTime::from_timestamp(self.dt, 0).unwrap_or_default(),
            icon: weather.icon,
        })
    }
}

/// Collapse three-hourly samples into per-day summaries.
///
/// Days come out in first-seen (ascending date) order, capped at
/// [`FORECAST_DAYS`]. The dominant condition is the most frequent across
/// the day's samples; ties go to the first-encountered value.
fn aggregate_forecast(samples: Vec<ForecastSample>) -> Vec<ForecastDay> {
    let mut days: Vec<(NaiveDate, Vec<ForecastSample>)> = Vec::new();
    for sample in samples {
        let date = DateTime::from_timestamp(sample.dt, 0)
            .unwrap_or_default()
            .date_naive();
        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(sample),
            None => days.push((date, vec![sample])),
        }
    }
    days.truncate(FORECAST_DAYS);

    days.into_iter()
        .filter_map(|(date, samples)| summarize_day(date, &samples))
        .collect()
}

fn summarize_day(date: NaiveDate, samples: &[ForecastSample]) -> Option<ForecastDay> {
    let high = samples
        .iter()
        .map(|s| s.main.temp)
        .fold(f64::NEG_INFINITY, f64::max);
    let low = samples
        .iter()
        .map(|s| s.main.temp)
        .fold(f64::INFINITY, f64::min);

    let condition_name =
        most_frequent(samples.iter().filter_map(|s| s.weather.first().map(|w| w.main.as_str())))?;

    let pop_sum: f64 = samples.iter().map(|s| s.pop.unwrap_or(0.0)).sum();
    let precipitation_chance =
        ((pop_sum / samples.len() as f64) * 100.0).round().clamp(0.0, 100.0) as u8;

    let icon = samples
        .first()
        .and_then(|s| s.weather.first())
        .map(|w| w.icon.clone())
        .unwrap_or_default();

    Some(ForecastDay {
        date,
        day_name: date.format("%a").to_string(),
        high: round_i32(high),
        low: round_i32(low),
        condition: Condition::from(condition_name.to_string()),
        description: condition_name.to_lowercase(),
        precipitation_chance,
        icon,
    })
}

/// Most frequent value; first-encountered wins ties.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut best: Option<(&str, usize)> = None;

    for value in values {
        let count = match counts.iter_mut().find(|(name, _)| *name == value) {
            Some((_, c)) => {
                *c += 1;
                *c
            }
            None => {
                counts.push((value, 1));
                1
            }
        };

        match best {
            Some((_, max)) if count > max => best = Some((value, count)),
            None => best = Some((value, count)),
            _ => {}
        }
    }

    best.map(|(value, _)| value)
}

/// Round half-away-from-zero to the nearest integer.
fn round_i32(value: f64) -> i32 {
    value.round() as i32
}
