//! Notification derivation core for Skycast.
//!
//! Transforms weather readings and forecasts into prioritized advisory
//! notifications, governed by user-configurable thresholds and preferences,
//! with dismissal tracking and preference persistence.

pub mod convert;
pub mod engine;
pub mod prefs;
pub mod presentation;
pub mod registry;
pub mod types;

pub use engine::analyze;
pub use prefs::{
    CategoryToggles, NotificationTiming, PreferenceStore, PreferenceUpdate, TemperatureUnit,
    TimeFormat, UserPreferences, WindUnit,
};
pub use presentation::{render, RenderedNotification};
pub use registry::NotificationRegistry;
pub use types::{Category, Notification, NotificationIcon, Severity};
