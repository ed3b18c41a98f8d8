//! Threshold-based notification rules.
//!
//! Four independent rule families scan the same reading and forecast, each
//! gated by its preference toggle. Families run in a fixed order
//! (temperature, precipitation, wind, comfort) and their output is
//! concatenated, so the result is deterministic apart from timestamps.

use chrono::{DateTime, Utc};
use skycast_weather::{ForecastDay, WeatherReading};

use crate::convert::KMH_TO_MPH;
use crate::prefs::{UserPreferences, WindUnit};
use crate::types::{Category, Notification, NotificationIcon, Severity};

// Temperature thresholds, °C.
const EXTREME_HEAT_C: i32 = 35;
const HEAT_WARNING_C: i32 = 30;
const COLD_WARNING_C: i32 = 5;
/// Declared but not wired into any rule.
#[allow(dead_code)]
const EXTREME_COLD_C: i32 = -5;

/// Day-over-day swing that triggers a temperature-change advisory, °C.
const SIGNIFICANT_CHANGE_C: i32 = 10;

// Wind thresholds, mph.
const VERY_WINDY_MPH: f64 = 40.0;
const WINDY_MPH: f64 = 25.0;
/// Declared but not wired into any rule.
#[allow(dead_code)]
const BREEZY_MPH: f64 = 15.0;

// Rain intensity bands, mm/h. Declared but not wired into any rule.
#[allow(dead_code)]
const LIGHT_RAIN_MM_H: f64 = 0.1;
#[allow(dead_code)]
const MODERATE_RAIN_MM_H: f64 = 2.5;
#[allow(dead_code)]
const HEAVY_RAIN_MM_H: f64 = 10.0;

/// Forecast days above this precipitation chance raise a warning, percent.
const HIGH_PRECIPITATION_PCT: u8 = 70;

// Comfort thresholds.
const HIGH_HUMIDITY_PCT: u8 = 80;
const LOW_VISIBILITY_KM: f64 = 5.0;
const COLD_CLOTHING_C: i32 = 10;
const HOT_CLOTHING_C: i32 = 25;

/// Derive advisory notifications from a reading, its forecast, and the
/// user's preferences.
///
/// Never fails on well-formed input; an empty forecast simply skips the
/// forecast-driven rules.
pub fn analyze(
    current: &WeatherReading,
    forecast: &[ForecastDay],
    prefs: &UserPreferences,
) -> Vec<Notification> {
    let now = Utc::now();
    let mut notifications = Vec::new();

    if prefs.notifications.temperature {
        analyze_temperature(current, forecast, now, &mut notifications);
    }
    if prefs.notifications.precipitation {
        analyze_precipitation(current, forecast, now, &mut notifications);
    }
    if prefs.notifications.wind {
        analyze_wind(current, prefs, now, &mut notifications);
    }
    if prefs.notifications.comfort {
        analyze_comfort(current, now, &mut notifications);
    }

    tracing::debug!(
        "Derived {} notifications for {}",
        notifications.len(),
        current.city
    );
    notifications
}

fn analyze_temperature(
    current: &WeatherReading,
    forecast: &[ForecastDay],
    now: DateTime<Utc>,
    out: &mut Vec<Notification>,
) {
    let temp = current.temperature;

    // At most one band fires.
    if temp >= EXTREME_HEAT_C {
        out.push(notification(
            "temperature-extreme-heat",
            Category::Temperature,
            Severity::Alert,
            "Extreme Heat Warning",
            format!(
                "Temperature is {temp}°C. Stay hydrated, avoid outdoor activities \
                 during peak hours, and check on vulnerable individuals."
            ),
            NotificationIcon::ThermometerSun,
            now,
        ));
    } else if temp >= HEAT_WARNING_C {
        out.push(notification(
            "temperature-heat",
            Category::Temperature,
            Severity::Warning,
            "Heat Advisory",
            format!("High temperature of {temp}°C. Consider lighter clothing and stay hydrated."),
            NotificationIcon::Thermometer,
            now,
        ));
    } else if temp <= COLD_WARNING_C {
        out.push(notification(
            "temperature-cold",
            Category::Temperature,
            Severity::Warning,
            "Cold Weather Alert",
            format!("Low temperature of {temp}°C. Bundle up and consider indoor activities."),
            NotificationIcon::ThermometerSnowflake,
            now,
        ));
    }

    // The swing check runs regardless of which band fired above.
    if let Some(tomorrow) = forecast.first() {
        let change = tomorrow.high - temp;
        if change.abs() >= SIGNIFICANT_CHANGE_C {
            let direction = if change > 0 { "rise" } else { "drop" };
            out.push(notification(
                "temperature-change",
                Category::Temperature,
                Severity::Info,
                "Significant Temperature Change",
                format!(
                    "Temperature will {direction} by {}°C tomorrow. Plan your activities accordingly.",
                    change.abs()
                ),
                NotificationIcon::TrendingUp,
                now,
            ));
        }
    }
}

fn analyze_precipitation(
    current: &WeatherReading,
    forecast: &[ForecastDay],
    now: DateTime<Utc>,
    out: &mut Vec<Notification>,
) {
    if current.condition.is_rainy() {
        out.push(notification(
            "precipitation-rain",
            Category::Precipitation,
            Severity::Info,
            "Rain Alert",
            "It's currently raining. Don't forget your umbrella!".to_string(),
            NotificationIcon::Umbrella,
            now,
        ));
    }

    // One warning per qualifying day, in forecast order.
    for (index, day) in forecast.iter().enumerate() {
        if day.precipitation_chance > HIGH_PRECIPITATION_PCT {
            let when = if index == 0 {
                "tomorrow".to_string()
            } else {
                format!("on {}", day.day_name)
            };
            out.push(notification(
                &format!("precipitation-forecast-{index}"),
                Category::Precipitation,
                Severity::Warning,
                "High Precipitation Chance",
                format!(
                    "{}% chance of rain {when}. Plan outdoor activities accordingly.",
                    day.precipitation_chance
                ),
                NotificationIcon::CloudRain,
                now,
            ));
        }
    }
}

fn analyze_wind(
    current: &WeatherReading,
    prefs: &UserPreferences,
    now: DateTime<Utc>,
    out: &mut Vec<Notification>,
) {
    // The reading is interpreted in the preferred wind unit when
    // normalizing to mph for the threshold checks.
    let wind_mph = match prefs.wind_unit {
        WindUnit::Kmh => f64::from(current.wind_speed) * KMH_TO_MPH,
        WindUnit::Mph => f64::from(current.wind_speed),
    };

    if wind_mph >= VERY_WINDY_MPH {
        out.push(notification(
            "wind-very-windy",
            Category::Wind,
            Severity::Alert,
            "High Wind Warning",
            format!(
                "Wind speed is {} mph. Avoid outdoor activities and secure loose objects.",
                wind_mph.round() as i32
            ),
            NotificationIcon::Wind,
            now,
        ));
    } else if wind_mph >= WINDY_MPH {
        out.push(notification(
            "wind-windy",
            Category::Wind,
            Severity::Warning,
            "Windy Conditions",
            format!(
                "Windy conditions with {} mph winds. Consider indoor activities.",
                wind_mph.round() as i32
            ),
            NotificationIcon::Wind,
            now,
        ));
    }
}

fn analyze_comfort(current: &WeatherReading, now: DateTime<Utc>, out: &mut Vec<Notification>) {
    if current.humidity > HIGH_HUMIDITY_PCT {
        out.push(notification(
            "comfort-humidity",
            Category::Comfort,
            Severity::Info,
            "High Humidity",
            format!(
                "Humidity is {}%. It may feel warmer than the actual temperature.",
                current.humidity
            ),
            NotificationIcon::Droplets,
            now,
        ));
    }

    if current.visibility < LOW_VISIBILITY_KM {
        out.push(notification(
            "comfort-visibility",
            Category::Comfort,
            Severity::Warning,
            "Reduced Visibility",
            format!(
                "Visibility is reduced to {} km. Drive carefully and use caution outdoors.",
                current.visibility
            ),
            NotificationIcon::EyeOff,
            now,
        ));
    }

    if current.temperature < COLD_CLOTHING_C {
        out.push(notification(
            "comfort-clothing-cold",
            Category::Comfort,
            Severity::Info,
            "Clothing Recommendation",
            "Wear warm clothing including a jacket, hat, and gloves.".to_string(),
            NotificationIcon::Shirt,
            now,
        ));
    } else if current.temperature > HOT_CLOTHING_C {
        out.push(notification(
            "comfort-clothing-hot",
            Category::Comfort,
            Severity::Info,
            "Clothing Recommendation",
            "Light, breathable clothing recommended. Don't forget sunscreen!".to_string(),
            NotificationIcon::Shirt,
            now,
        ));
    }
}

fn notification(
    id: &str,
    category: Category,
    severity: Severity,
    title: &str,
    message: String,
    icon: NotificationIcon,
    now: DateTime<Utc>,
) -> Notification {
    Notification {
        id: id.to_string(),
        category,
        severity,
        title: title.to_string(),
        message,
        icon,
        created_at: now,
        dismissed: false,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::NaiveDate;
    use skycast_weather::Condition;

    fn reading(temp: i32) -> WeatherReading {
        WeatherReading {
            city: "London".to_string(),
            country: "GB".to_string(),
            temperature: temp,
            feels_like: temp,
            condition: Condition::Clear,
            description: "clear sky".to_string(),
            humidity: 50,
            wind_speed: 10,
            visibility: 10.0,
            observed_at: Utc::now(),
            icon: "01d".to_string(),
        }
    }

    fn day(offset: u32, high: i32, precipitation: u8) -> ForecastDay {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap() + chrono::Days::new(u64::from(offset));
        ForecastDay {
            date,
            day_name: date.format("%a").to_string(),
            high,
            low: high - 6,
            condition: Condition::Clouds,
            description: "clouds".to_string(),
            precipitation_chance: precipitation,
            icon: "03d".to_string(),
        }
    }

    fn prefs() -> UserPreferences {
        UserPreferences::default()
    }

    #[test]
    fn test_extreme_heat_is_exclusive_alert() {
        let out = analyze(&reading(35), &[], &prefs());
        assert_eq!(out.len(), 2); // heat alert + hot-clothing recommendation
        assert_eq!(out[0].id, "temperature-extreme-heat");
        assert_eq!(out[0].severity, Severity::Alert);
        assert!(!out.iter().any(|n| n.id == "temperature-heat"));
        assert!(!out.iter().any(|n| n.id == "temperature-cold"));
    }

    #[test]
    fn test_heat_advisory_band() {
        let out = analyze(&reading(31), &[], &prefs());
        let heat: Vec<_> = out.iter().filter(|n| n.category == Category::Temperature).collect();
        assert_eq!(heat.len(), 1);
        assert_eq!(heat[0].title, "Heat Advisory");
        assert_eq!(heat[0].severity, Severity::Warning);
        assert!(heat[0].message.contains("31°C"));
    }

    #[test]
    fn test_cold_band_fires_at_threshold() {
        let out = analyze(&reading(5), &[], &prefs());
        assert!(out.iter().any(|n| n.id == "temperature-cold"));
    }

    #[test]
    fn test_mild_temperature_fires_no_band() {
        let out = analyze(&reading(18), &[], &prefs());
        assert!(out.iter().all(|n| n.category != Category::Temperature));
    }

    #[test]
    fn test_swing_fires_alongside_band() {
        // 35 °C now, high of 20 tomorrow: alert and swing co-fire.
        let out = analyze(&reading(35), &[day(0, 20, 0)], &prefs());
        assert!(out.iter().any(|n| n.id == "temperature-extreme-heat"));
        let swing = out.iter().find(|n| n.id == "temperature-change").unwrap();
        assert_eq!(swing.severity, Severity::Info);
        assert!(swing.message.contains("drop by 15°C"));
    }

    #[test]
    fn test_swing_direction_rise() {
        let out = analyze(&reading(8), &[day(0, 18, 0)], &prefs());
        let swing = out.iter().find(|n| n.id == "temperature-change").unwrap();
        assert!(swing.message.contains("rise by 10°C"));
    }

    #[test]
    fn test_empty_forecast_skips_swing() {
        let out = analyze(&reading(8), &[], &prefs());
        assert!(out.iter().all(|n| n.id != "temperature-change"));
    }

    #[test]
    fn test_rain_alert_from_condition() {
        let mut current = reading(18);
        current.condition = Condition::Rain;
        let out = analyze(&current, &[], &prefs());
        let rain = out.iter().find(|n| n.id == "precipitation-rain").unwrap();
        assert_eq!(rain.severity, Severity::Info);
        assert_eq!(rain.icon, NotificationIcon::Umbrella);
    }

    #[test]
    fn test_drizzle_does_not_fire_rain_alert() {
        let mut current = reading(18);
        current.condition = Condition::Drizzle;
        let out = analyze(&current, &[], &prefs());
        assert!(out.iter().all(|n| n.id != "precipitation-rain"));
    }

    #[test]
    fn test_high_precipitation_per_qualifying_day() {
        let forecast = vec![day(0, 18, 80), day(1, 18, 30), day(2, 18, 90)];
        let out = analyze(&reading(18), &forecast, &prefs());

        let precip: Vec<_> =
            out.iter().filter(|n| n.id.starts_with("precipitation-forecast")).collect();
        assert_eq!(precip.len(), 2);
        assert_eq!(precip[0].id, "precipitation-forecast-0");
        assert!(precip[0].message.contains("80% chance of rain tomorrow"));
        assert_eq!(precip[1].id, "precipitation-forecast-2");
        assert!(precip[1].message.contains("on Wed"));
    }

    #[test]
    fn test_precipitation_at_exactly_70_does_not_fire() {
        let out = analyze(&reading(18), &[day(0, 18, 70)], &prefs());
        assert!(out.iter().all(|n| !n.id.starts_with("precipitation-forecast")));
    }

    #[test]
    fn test_wind_thresholds_with_kmh_readings() {
        // 70 "km/h" * 0.621371 = 43.5 mph: alert band.
        let mut current = reading(18);
        current.wind_speed = 70;
        let out = analyze(&current, &[], &prefs());
        let wind = out.iter().find(|n| n.category == Category::Wind).unwrap();
        assert_eq!(wind.id, "wind-very-windy");
        assert_eq!(wind.severity, Severity::Alert);
        assert!(wind.message.contains("43 mph"));
    }

    #[test]
    fn test_wind_windy_band_is_exclusive() {
        // 45 km/h ≈ 28 mph: warning band only.
        let mut current = reading(18);
        current.wind_speed = 45;
        let out = analyze(&current, &[], &prefs());
        let wind: Vec<_> = out.iter().filter(|n| n.category == Category::Wind).collect();
        assert_eq!(wind.len(), 1);
        assert_eq!(wind[0].id, "wind-windy");
    }

    #[test]
    fn test_wind_mph_preference_skips_conversion() {
        let mut current = reading(18);
        current.wind_speed = 30;

        let mut p = prefs();
        p.wind_unit = crate::prefs::WindUnit::Mph;

        // 30 interpreted as mph clears the windy threshold directly.
        let out = analyze(&current, &[], &p);
        assert!(out.iter().any(|n| n.id == "wind-windy"));

        // The same reading interpreted as km/h (≈ 18.6 mph) stays quiet.
        let out = analyze(&current, &[], &prefs());
        assert!(out.iter().all(|n| n.category != Category::Wind));
    }

    #[test]
    fn test_comfort_trio_fires_together() {
        let mut current = reading(2);
        current.humidity = 85;
        current.visibility = 3.0;

        let out = analyze(&current, &[], &prefs());
        let comfort: Vec<_> = out.iter().filter(|n| n.category == Category::Comfort).collect();
        assert_eq!(comfort.len(), 3);
        assert_eq!(comfort[0].id, "comfort-humidity");
        assert_eq!(comfort[1].id, "comfort-visibility");
        assert_eq!(comfort[2].id, "comfort-clothing-cold");
        assert!(comfort[0].message.contains("85%"));
        assert!(comfort[1].message.contains("3 km"));
    }

    #[test]
    fn test_clothing_bands_are_exclusive() {
        let out = analyze(&reading(27), &[], &prefs());
        let clothing: Vec<_> =
            out.iter().filter(|n| n.id.starts_with("comfort-clothing")).collect();
        assert_eq!(clothing.len(), 1);
        assert_eq!(clothing[0].id, "comfort-clothing-hot");
    }

    #[test]
    fn test_disabled_family_emits_nothing() {
        let mut current = reading(18);
        current.wind_speed = 100;

        let mut p = prefs();
        p.notifications.wind = false;

        let out = analyze(&current, &[], &p);
        assert!(out.iter().all(|n| n.category != Category::Wind));
    }

    #[test]
    fn test_family_order_is_stable() {
        let mut current = reading(36);
        current.condition = Condition::Rain;
        current.humidity = 85;
        current.wind_speed = 70;

        let out = analyze(&current, &[day(0, 20, 90)], &prefs());
        let categories: Vec<Category> = out.iter().map(|n| n.category).collect();

        let mut sorted_by_family = categories.clone();
        sorted_by_family.sort_by_key(|c| match c {
            Category::Temperature => 0,
            Category::Precipitation => 1,
            Category::Wind => 2,
            Category::Comfort => 3,
        });
        assert_eq!(categories, sorted_by_family);
    }

    #[test]
    fn test_ids_unique_within_batch() {
        let mut current = reading(36);
        current.condition = Condition::Rain;
        current.humidity = 85;
        current.visibility = 2.0;
        current.wind_speed = 80;

        let forecast = vec![day(0, 20, 90), day(1, 19, 95), day(2, 18, 80)];
        let out = analyze(&current, &forecast, &prefs());

        let mut ids: Vec<&str> = out.iter().map(|n| n.id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
