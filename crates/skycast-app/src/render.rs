//! Plain-text rendering for the CLI surface.
//!
//! Thin formatting over the presentation adapter; no decision logic.

use skycast_notify::presentation;
use skycast_notify::{convert, Notification, UserPreferences};
use skycast_weather::{ForecastDay, WeatherReading};

pub fn render_reading(reading: &WeatherReading, prefs: &UserPreferences) -> String {
    format!(
        "{}, {}: {} {} ({})\n  feels like {}, humidity {}%, wind {}, visibility {} km",
        reading.city,
        reading.country,
        convert::display_temperature(reading.temperature, prefs.temperature_unit),
        reading.condition.display_name(),
        reading.description,
        convert::display_temperature(reading.feels_like, prefs.temperature_unit),
        reading.humidity,
        convert::display_wind_speed(reading.wind_speed, prefs.wind_unit),
        reading.visibility,
    )
}

pub fn render_forecast(days: &[ForecastDay], prefs: &UserPreferences) -> String {
    days.iter()
        .map(|day| {
            format!(
                "  {}  {} / {}  {}  {}% rain",
                day.day_name,
                convert::display_temperature(day.high, prefs.temperature_unit),
                convert::display_temperature(day.low, prefs.temperature_unit),
                day.condition.display_name(),
                day.precipitation_chance,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_notifications(notifications: &[&Notification], prefs: &UserPreferences) -> String {
    if notifications.is_empty() {
        return "  No notifications at the moment".to_string();
    }

    notifications
        .iter()
        .map(|n| {
            let rendered = presentation::render(n, prefs.time_format);
            format!(
                "  [{}] {} ({}): {}",
                rendered.severity_glyph, rendered.title, rendered.timestamp, rendered.message,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
