//! Unit conversion and display formatting.
//!
//! Conversions round half-away-from-zero (`f64::round`) to the nearest
//! integer; tests pin exact values.

use crate::prefs::{TemperatureUnit, TimeFormat, WindUnit};
use chrono::{DateTime, Utc};

/// Miles per kilometer.
pub(crate) const KMH_TO_MPH: f64 = 0.621371;
/// Kilometers per mile.
pub(crate) const MPH_TO_KMH: f64 = 1.60934;

pub fn celsius_to_fahrenheit(celsius: f64) -> i32 {
    (celsius * 9.0 / 5.0 + 32.0).round() as i32
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> i32 {
    ((fahrenheit - 32.0) * 5.0 / 9.0).round() as i32
}

pub fn kmh_to_mph(kmh: f64) -> i32 {
    (kmh * KMH_TO_MPH).round() as i32
}

pub fn mph_to_kmh(mph: f64) -> i32 {
    (mph * MPH_TO_KMH).round() as i32
}

/// Format a stored °C temperature in the preferred unit.
pub fn display_temperature(celsius: i32, unit: TemperatureUnit) -> String {
    match unit {
        TemperatureUnit::Celsius => format!("{celsius}°C"),
        TemperatureUnit::Fahrenheit => {
            format!("{}°F", celsius_to_fahrenheit(f64::from(celsius)))
        }
    }
}

/// Format a stored km/h wind speed in the preferred unit.
pub fn display_wind_speed(kmh: i32, unit: WindUnit) -> String {
    match unit {
        WindUnit::Kmh => format!("{kmh} km/h"),
        WindUnit::Mph => format!("{} mph", kmh_to_mph(f64::from(kmh))),
    }
}

/// Format a timestamp in the preferred clock style.
pub fn display_time(time: &DateTime<Utc>, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwelveHour => time.format("%I:%M %p").to_string(),
        TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
    }
}
