use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition category as reported by the provider.
///
/// Open set: the common categories are first-class variants and anything
/// else is carried through verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Snow,
    Thunderstorm,
    Mist,
    Fog,
    Other(String),
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            "mist" => Self::Mist,
            "fog" => Self::Fog,
            _ => Self::Other(value),
        }
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.name().to_string()
    }
}

impl Condition {
    /// Canonical provider-facing name.
    pub fn name(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Other(s) => s,
        }
    }

    /// Get a human-readable description
    pub fn display_name(&self) -> &str {
        match self {
            Self::Clear => "Clear Sky",
            Self::Clouds => "Cloudy",
            Self::Rain => "Rainy",
            Self::Drizzle => "Light Rain",
            Self::Snow => "Snowy",
            Self::Thunderstorm => "Thunderstorm",
            Self::Mist => "Misty",
            Self::Fog => "Foggy",
            Self::Other(s) => s,
        }
    }

    /// Background gradient token for this condition.
    /// Unrecognized categories fall back to the clear-sky gradient.
    pub fn gradient(&self) -> &'static str {
        match self {
            Self::Clear => "sunrise",
            Self::Clouds => "overcast",
            Self::Rain => "downpour",
            Self::Drizzle => "shower",
            Self::Snow => "powder",
            Self::Thunderstorm => "storm",
            Self::Mist | Self::Fog => "haze",
            Self::Other(_) => "sunrise",
        }
    }

    /// True when the category text names rain (case-insensitive substring,
    /// so "Rain" matches but "Drizzle" does not).
    pub fn is_rainy(&self) -> bool {
        match self {
            Self::Rain => true,
            Self::Other(s) => s.to_lowercase().contains("rain"),
            _ => false,
        }
    }
}

/// Snapshot of current conditions for one city at one instant.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub country: String,
    /// °C, rounded to the nearest integer.
    pub temperature: i32,
    /// °C, rounded to the nearest integer.
    pub feels_like: i32,
    pub condition: Condition,
    pub description: String,
    /// Percent, 0-100.
    pub humidity: u8,
    /// km/h, rounded to the nearest integer.
    pub wind_speed: i32,
    /// Kilometers; may be fractional.
    pub visibility: f64,
    pub observed_at: DateTime<Utc>,
    /// Provider icon code (e.g. "10d").
    pub icon: String,
}

/// One future day's forecast summary.
///
/// A forecast is an ascending-date sequence of these, at most five entries,
/// index 0 being the nearest day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Short weekday label ("Sat").
    pub day_name: String,
    /// Daily high, °C.
    pub high: i32,
    /// Daily low, °C.
    pub low: i32,
    /// Dominant category across the day's samples.
    pub condition: Condition,
    pub description: String,
    /// Percent, 0-100, averaged across the day's samples.
    pub precipitation_chance: u8,
    pub icon: String,
}

/// Geocoding search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityMatch {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API returned status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    /// User-facing message for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderError::Status(404) => "Location not found. Check and try again.",
            _ => "Failed to fetch weather data. Please try again.",
        }
    }
}
