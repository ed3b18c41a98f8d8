//! User preferences and their durable store.
//!
//! Preferences load once per session, merged field-by-field over defaults
//! (partial persisted blobs are valid), and persist in full on every
//! mutation. Read failures degrade silently to defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use skycast_core::KvStore;
use std::sync::Arc;

const PREFERENCES_KEY: &str = "weatherAppPreferences";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Kmh,
    Mph,
}

/// Clock style for rendered timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12")]
    TwelveHour,
    #[serde(rename = "24")]
    TwentyFourHour,
}

/// When the user wants advisory notifications. Informational only; the
/// rule engine does not gate on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationTiming {
    Morning,
    Evening,
    #[default]
    Both,
}

/// Per-category notification toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryToggles {
    pub temperature: bool,
    pub precipitation: bool,
    pub wind: bool,
    pub comfort: bool,
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            temperature: true,
            precipitation: true,
            wind: true,
            comfort: true,
        }
    }
}

/// The full preference set.
///
/// `#[serde(default)]` lets a partial persisted blob merge over defaults
/// field-by-field on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserPreferences {
    pub temperature_unit: TemperatureUnit,
    pub wind_unit: WindUnit,
    pub time_format: TimeFormat,
    pub notifications: CategoryToggles,
    pub notification_timing: NotificationTiming,
}

impl UserPreferences {
    /// Shallow-merge an update over these preferences.
    pub fn apply(&mut self, update: &PreferenceUpdate) {
        if let Some(value) = update.temperature_unit {
            self.temperature_unit = value;
        }
        if let Some(value) = update.wind_unit {
            self.wind_unit = value;
        }
        if let Some(value) = update.time_format {
            self.time_format = value;
        }
        if let Some(value) = update.notifications {
            self.notifications = value;
        }
        if let Some(value) = update.notification_timing {
            self.notification_timing = value;
        }
    }
}

/// Partial preference change; `None` fields keep their current values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceUpdate {
    pub temperature_unit: Option<TemperatureUnit>,
    pub wind_unit: Option<WindUnit>,
    pub time_format: Option<TimeFormat>,
    pub notifications: Option<CategoryToggles>,
    pub notification_timing: Option<NotificationTiming>,
}

/// Durable preference store over the key/value store.
pub struct PreferenceStore {
    kv: Arc<KvStore>,
    current: UserPreferences,
}

impl PreferenceStore {
    /// Open the store, restoring persisted preferences merged over
    /// defaults. Missing or corrupt data degrades to defaults without
    /// surfacing an error.
    pub fn load(kv: Arc<KvStore>) -> Self {
        let current = match kv.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding corrupt preferences: {e}");
                UserPreferences::default()
            }),
            Ok(None) => UserPreferences::default(),
            Err(e) => {
                tracing::warn!("Failed to read preferences: {e}");
                UserPreferences::default()
            }
        };

        Self { kv, current }
    }

    pub fn current(&self) -> &UserPreferences {
        &self.current
    }

    /// Merge the update into the in-memory preferences and write the full
    /// merged object back immediately. A failed write leaves the merged
    /// in-memory state intact.
    pub fn save(&mut self, update: &PreferenceUpdate) -> Result<()> {
        self.current.apply(update);
        let raw = serde_json::to_string(&self.current)?;
        self.kv.put(PREFERENCES_KEY, &raw)?;
        Ok(())
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
