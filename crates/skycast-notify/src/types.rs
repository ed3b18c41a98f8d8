use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Temperature,
    Precipitation,
    Wind,
    Comfort,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Precipitation => "precipitation",
            Self::Wind => "wind",
            Self::Comfort => "comfort",
        }
    }
}

/// Ordinal urgency of a notification, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Alert,
}

/// Icon tag attached by the rules; drives presentation mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationIcon {
    ThermometerSun,
    Thermometer,
    ThermometerSnowflake,
    TrendingUp,
    Umbrella,
    CloudRain,
    Wind,
    Droplets,
    EyeOff,
    Shirt,
    /// Unrecognized tags deserialize here; presentation renders a bell.
    #[serde(other)]
    Unknown,
}

/// A derived advisory.
///
/// Created only by the rule engine, owned by the registry; dismissal is the
/// only mutation after construction. Ids are deterministic composites
/// (category + rule slug + disambiguating index), unique within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    /// Human-readable text embedding the literal triggering value.
    pub message: String,
    pub icon: NotificationIcon,
    pub created_at: DateTime<Utc>,
    pub dismissed: bool,
}
