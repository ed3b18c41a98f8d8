//! Weather data access for Skycast.
//!
//! Canonical weather types, an OpenWeatherMap-compatible provider with
//! retry, and a durable cache over the core key/value store.

pub mod cache;
pub mod provider;
pub mod retry;
pub mod types;

pub use cache::{CachedBundle, WeatherCache, CACHE_TTL_MS};
pub use provider::WeatherProvider;
pub use types::*;
