//! Maps notification fields to renderable tokens.
//!
//! Pure lookups; every match is exhaustive with an explicit fallback arm
//! for unrecognized tags.

use crate::convert::display_time;
use crate::prefs::TimeFormat;
use crate::types::{Notification, NotificationIcon, Severity};

/// Glyph name for a notification's icon tag.
pub fn icon_glyph(icon: NotificationIcon) -> &'static str {
    match icon {
        NotificationIcon::ThermometerSun => "thermometer-sun",
        NotificationIcon::Thermometer => "thermometer",
        NotificationIcon::ThermometerSnowflake => "thermometer-snowflake",
        NotificationIcon::TrendingUp => "trending-up",
        NotificationIcon::Umbrella => "umbrella",
        NotificationIcon::CloudRain => "cloud-rain",
        NotificationIcon::Wind => "wind",
        NotificationIcon::Droplets => "droplets",
        NotificationIcon::EyeOff => "eye-off",
        NotificationIcon::Shirt => "shirt",
        NotificationIcon::Unknown => "bell",
    }
}

/// Glyph for the severity badge.
pub fn severity_glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Alert => "alert-circle",
        Severity::Warning => "alert-triangle",
        Severity::Info => "info",
    }
}

/// Color token for severity styling.
pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Alert => "red",
        Severity::Warning => "yellow",
        Severity::Info => "blue",
    }
}

/// Display-ready projection of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub glyph: &'static str,
    pub severity_glyph: &'static str,
    pub color: &'static str,
    pub title: String,
    pub message: String,
    pub timestamp: String,
}

pub fn render(notification: &Notification, time_format: TimeFormat) -> RenderedNotification {
    RenderedNotification {
        glyph: icon_glyph(notification.icon),
        severity_glyph: severity_glyph(notification.severity),
        color: severity_color(notification.severity),
        title: notification.title.clone(),
        message: notification.message.clone(),
        timestamp: display_time(&notification.created_at, time_format),
    }
}
