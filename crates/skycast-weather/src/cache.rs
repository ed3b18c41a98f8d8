//! Durable weather cache and recent-search history.
//!
//! Both live in the core key/value store. The cache lets a cold start skip
//! a network round-trip when recent data exists; reads degrade silently to
//! a miss on missing or corrupt blobs.

use crate::types::{ForecastDay, WeatherReading};
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use skycast_core::KvStore;
use std::sync::Arc;

const WEATHER_CACHE_KEY: &str = "weatherCache";
const RECENT_SEARCHES_KEY: &str = "recentSearches";
const RECENT_SEARCH_LIMIT: usize = 5;

/// Cached data older than this reads as a miss.
pub const CACHE_TTL_MS: i64 = 15 * 60 * 1000;

/// Everything needed to restore the dashboard without a fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedBundle {
    pub weather: WeatherReading,
    pub forecast: Vec<ForecastDay>,
    pub city: String,
    /// Epoch milliseconds at store time.
    pub timestamp: i64,
}

pub struct WeatherCache {
    kv: Arc<KvStore>,
}

impl WeatherCache {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// Return the cached bundle while it is younger than [`CACHE_TTL_MS`].
    pub fn load(&self) -> Option<CachedBundle> {
        let raw = match self.kv.get(WEATHER_CACHE_KEY) {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!("Failed to read weather cache: {e}");
                return None;
            }
        };

        let bundle: CachedBundle = match serde_json::from_str(&raw) {
            Ok(bundle) => bundle,
            Err(e) => {
                tracing::warn!("Discarding corrupt weather cache: {e}");
                return None;
            }
        };

        let age_ms = Utc::now().timestamp_millis() - bundle.timestamp;
        if age_ms < CACHE_TTL_MS {
            Some(bundle)
        } else {
            tracing::debug!("Weather cache stale ({age_ms} ms old)");
            None
        }
    }

    /// Store a freshly fetched bundle, stamped with the current time.
    pub fn store(
        &self,
        weather: &WeatherReading,
        forecast: &[ForecastDay],
        city: &str,
    ) -> Result<()> {
        let bundle = CachedBundle {
            weather: weather.clone(),
            forecast: forecast.to_vec(),
            city: city.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };
        self.kv.put(WEATHER_CACHE_KEY, &serde_json::to_string(&bundle)?)?;
        Ok(())
    }

    /// Most-recently searched city names, newest first, at most five.
    pub fn recent_searches(&self) -> Vec<String> {
        let raw = match self.kv.get(RECENT_SEARCHES_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read recent searches: {e}");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding corrupt recent searches: {e}");
            Vec::new()
        })
    }

    /// Record a search. A re-searched city moves to the front rather than
    /// appearing twice.
    pub fn push_recent_search(&self, city: &str) -> Result<()> {
        let mut recent = self.recent_searches();
        recent.retain(|c| c != city);
        recent.insert(0, city.to_string());
        recent.truncate(RECENT_SEARCH_LIMIT);
        self.kv.put(RECENT_SEARCHES_KEY, &serde_json::to_string(&recent)?)?;
        Ok(())
    }
}

impl std::fmt::Debug for WeatherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::Condition;

    fn test_reading() -> WeatherReading {
        WeatherReading {
            city: "London".to_string(),
            country: "GB".to_string(),
            temperature: 18,
            feels_like: 20,
            condition: Condition::Clouds,
            description: "scattered clouds".to_string(),
            humidity: 65,
            wind_speed: 13,
            visibility: 10.0,
            observed_at: Utc::now(),
            icon: "02d".to_string(),
        }
    }

    fn cache() -> WeatherCache {
        WeatherCache::new(Arc::new(KvStore::open_in_memory().unwrap()))
    }

    #[test]
    fn test_store_then_load_fresh() {
        let cache = cache();
        cache.store(&test_reading(), &[], "London").unwrap();

        let bundle = cache.load().unwrap();
        assert_eq!(bundle.city, "London");
        assert_eq!(bundle.weather.temperature, 18);
        assert!(bundle.forecast.is_empty());
    }

    #[test]
    fn test_load_empty_store_is_miss() {
        assert!(cache().load().is_none());
    }

    #[test]
    fn test_stale_cache_is_miss() {
        let kv = Arc::new(KvStore::open_in_memory().unwrap());
        let cache = WeatherCache::new(kv.clone());

        let bundle = CachedBundle {
            weather: test_reading(),
            forecast: Vec::new(),
            city: "London".to_string(),
            timestamp: Utc::now().timestamp_millis() - CACHE_TTL_MS - 1,
        };
        kv.put(WEATHER_CACHE_KEY, &serde_json::to_string(&bundle).unwrap()).unwrap();

        assert!(cache.load().is_none());
    }

    #[test]
    fn test_corrupt_cache_is_silent_miss() {
        let kv = Arc::new(KvStore::open_in_memory().unwrap());
        kv.put(WEATHER_CACHE_KEY, "{not json").unwrap();

        let cache = WeatherCache::new(kv);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_recent_searches_most_recent_first() {
        let cache = cache();
        cache.push_recent_search("London").unwrap();
        cache.push_recent_search("Tokyo").unwrap();

        assert_eq!(cache.recent_searches(), vec!["Tokyo", "London"]);
    }

    #[test]
    fn test_recent_searches_dedupes_on_research() {
        let cache = cache();
        cache.push_recent_search("London").unwrap();
        cache.push_recent_search("Tokyo").unwrap();
        cache.push_recent_search("London").unwrap();

        assert_eq!(cache.recent_searches(), vec!["London", "Tokyo"]);
    }

    #[test]
    fn test_recent_searches_capped_at_five() {
        let cache = cache();
        for city in ["A", "B", "C", "D", "E", "F"] {
            cache.push_recent_search(city).unwrap();
        }

        let recent = cache.recent_searches();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0], "F");
        assert!(!recent.contains(&"A".to_string()));
    }

    #[test]
    fn test_corrupt_recent_searches_degrade_to_empty() {
        let kv = Arc::new(KvStore::open_in_memory().unwrap());
        kv.put(RECENT_SEARCHES_KEY, "42").unwrap();

        let cache = WeatherCache::new(kv);
        assert!(cache.recent_searches().is_empty());
    }
}
