//! Dashboard controller.
//!
//! Owns the provider, caches, preference store, and notification registry,
//! and drives the fetch -> analyze -> registry cycle. All mutation happens
//! from the single control-flow loop handling UI and timer events.

use std::sync::Arc;

use skycast_core::KvStore;
use skycast_notify::{
    analyze, Notification, NotificationRegistry, PreferenceStore, PreferenceUpdate,
    UserPreferences,
};
use skycast_weather::{
    ForecastDay, ProviderError, WeatherCache, WeatherProvider, WeatherReading,
};

pub struct Dashboard {
    provider: WeatherProvider,
    cache: WeatherCache,
    prefs: PreferenceStore,
    registry: NotificationRegistry,
    weather: Option<WeatherReading>,
    forecast: Vec<ForecastDay>,
    city: String,
}

impl Dashboard {
    pub fn new(provider: WeatherProvider, kv: Arc<KvStore>, default_city: &str) -> Self {
        Self {
            provider,
            cache: WeatherCache::new(kv.clone()),
            prefs: PreferenceStore::load(kv),
            registry: NotificationRegistry::new(),
            weather: None,
            forecast: Vec::new(),
            city: default_city.to_string(),
        }
    }

    /// Cold start: serve cached data when it is still fresh, otherwise
    /// fetch the default city.
    pub async fn start(&mut self) -> Result<(), ProviderError> {
        if let Some(bundle) = self.cache.load() {
            tracing::info!("Restoring cached weather for {}", bundle.city);
            self.city = bundle.city;
            self.weather = Some(bundle.weather);
            self.forecast = bundle.forecast;
            self.reanalyze();
            return Ok(());
        }

        let city = self.city.clone();
        self.load_city(&city).await
    }

    /// Fetch current conditions and the forecast jointly, then re-run
    /// analysis.
    ///
    /// If either fetch fails the previous weather state and notification
    /// set are left untouched; stale-but-valid data beats a cleared view.
    pub async fn load_city(&mut self, city: &str) -> Result<(), ProviderError> {
        let (weather, forecast) = match tokio::try_join!(
            self.provider.current_by_city(city),
            self.provider.forecast_by_city(city),
        ) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("Fetch for {city} failed, keeping previous state: {e}");
                return Err(e);
            }
        };

        // Cache and history writes are best-effort; a failed write never
        // fails the refresh.
        if let Err(e) = self.cache.store(&weather, &forecast, city) {
            tracing::warn!("Failed to cache weather data: {e}");
        }
        if let Err(e) = self.cache.push_recent_search(city) {
            tracing::warn!("Failed to record recent search: {e}");
        }

        self.city = city.to_string();
        self.weather = Some(weather);
        self.forecast = forecast;
        self.reanalyze();
        Ok(())
    }

    /// Fetch by coordinates (geolocation flow). The reading's own city
    /// name becomes the current city; no search-history entry is made.
    pub async fn load_coords(&mut self, lat: f64, lon: f64) -> Result<(), ProviderError> {
        let (weather, forecast) = match tokio::try_join!(
            self.provider.current_by_coords(lat, lon),
            self.provider.forecast_by_coords(lat, lon),
        ) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("Coordinate fetch failed, keeping previous state: {e}");
                return Err(e);
            }
        };

        let city = weather.city.clone();
        if let Err(e) = self.cache.store(&weather, &forecast, &city) {
            tracing::warn!("Failed to cache weather data: {e}");
        }

        self.city = city;
        self.weather = Some(weather);
        self.forecast = forecast;
        self.reanalyze();
        Ok(())
    }

    /// Refresh the currently shown city.
    pub async fn refresh(&mut self) -> Result<(), ProviderError> {
        let city = self.city.clone();
        self.load_city(&city).await
    }

    /// Persist a preference change and re-run analysis against the data
    /// already held.
    pub fn apply_preferences(&mut self, update: &PreferenceUpdate) {
        if let Err(e) = self.prefs.save(update) {
            tracing::warn!("Failed to persist preferences: {e}");
        }
        self.reanalyze();
    }

    pub fn dismiss(&mut self, id: &str) {
        self.registry.dismiss(id);
    }

    pub fn dismiss_all(&mut self) {
        self.registry.dismiss_all();
    }

    pub fn weather(&self) -> Option<&WeatherReading> {
        self.weather.as_ref()
    }

    pub fn forecast(&self) -> &[ForecastDay] {
        &self.forecast
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn preferences(&self) -> &UserPreferences {
        self.prefs.current()
    }

    pub fn active_notifications(&self) -> Vec<&Notification> {
        self.registry.active()
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.cache.recent_searches()
    }

    fn reanalyze(&mut self) {
        if let Some(weather) = &self.weather {
            let batch = analyze(weather, &self.forecast, self.prefs.current());
            self.registry.replace(batch);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use skycast_notify::CategoryToggles;
    use skycast_weather::retry::RetryConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_payload(city: &str, temp: f64, condition: &str) -> serde_json::Value {
        serde_json::json!({
            "name": city,
            "sys": { "country": "GB" },
            "main": { "temp": temp, "feels_like": temp, "humidity": 85 },
            "weather": [{ "main": condition, "description": condition.to_lowercase(), "icon": "01d" }],
            "wind": { "speed": 2.0 },
            "visibility": 10000,
            "dt": 1_772_409_600
        })
    }

    fn forecast_payload() -> serde_json::Value {
        serde_json::json!({
            "list": [{
                "dt": 1_772_496_000,
                "main": { "temp": 19.0 },
                "weather": [{ "main": "Clouds", "description": "clouds", "icon": "03d" }],
                "pop": 0.1
            }]
        })
    }

    async fn mock_weather(server: &MockServer, city: &str, temp: f64, condition: &str) {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_payload(city, temp, condition)))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("q", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload()))
            .mount(server)
            .await;
    }

    fn dashboard_for(server: &MockServer) -> Dashboard {
        let provider = WeatherProvider::new(&server.uri(), "test-key")
            .unwrap()
            .with_retry_config(RetryConfig::none());
        let kv = Arc::new(KvStore::open_in_memory().unwrap());
        Dashboard::new(provider, kv, "London")
    }

    #[tokio::test]
    async fn test_load_city_populates_state_and_notifications() {
        let server = MockServer::start().await;
        mock_weather(&server, "London", 18.0, "Rain").await;

        let mut dashboard = dashboard_for(&server);
        dashboard.load_city("London").await.unwrap();

        assert_eq!(dashboard.city(), "London");
        assert_eq!(dashboard.weather().unwrap().temperature, 18);
        assert_eq!(dashboard.forecast().len(), 1);

        // Rain + 85% humidity derive two advisories.
        let ids: Vec<&str> =
            dashboard.active_notifications().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["precipitation-rain", "comfort-humidity"]);

        assert_eq!(dashboard.recent_searches(), vec!["London"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_state() {
        let server = MockServer::start().await;
        mock_weather(&server, "London", 18.0, "Rain").await;

        let mut dashboard = dashboard_for(&server);
        dashboard.load_city("London").await.unwrap();
        let before = dashboard.active_notifications().len();

        // No mocks remain: every request now fails.
        server.reset().await;

        let result = dashboard.refresh().await;
        assert!(result.is_err());

        // Stale-but-valid state is preserved.
        assert_eq!(dashboard.weather().unwrap().temperature, 18);
        assert_eq!(dashboard.active_notifications().len(), before);
    }

    #[tokio::test]
    async fn test_start_serves_fresh_cache_without_network() {
        let server = MockServer::start().await;
        mock_weather(&server, "London", 18.0, "Rain").await;

        let kv = Arc::new(KvStore::open_in_memory().unwrap());
        {
            let provider = WeatherProvider::new(&server.uri(), "test-key")
                .unwrap()
                .with_retry_config(RetryConfig::none());
            let mut dashboard = Dashboard::new(provider, kv.clone(), "London");
            dashboard.load_city("London").await.unwrap();
        }

        // A provider pointed at a dead address proves no request is made.
        let provider = WeatherProvider::new("http://127.0.0.1:9", "test-key")
            .unwrap()
            .with_retry_config(RetryConfig::none());
        let mut dashboard = Dashboard::new(provider, kv, "Paris");
        dashboard.start().await.unwrap();

        assert_eq!(dashboard.city(), "London");
        assert!(dashboard.weather().is_some());
    }

    #[tokio::test]
    async fn test_load_coords_uses_reading_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "51.5"))
            .and(query_param("lon", "-0.12"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(current_payload("London", 18.0, "Rain")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("lat", "51.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload()))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        dashboard.load_coords(51.5, -0.12).await.unwrap();

        assert_eq!(dashboard.city(), "London");
        assert!(dashboard.weather().is_some());
        // Geolocation loads do not create a search-history entry.
        assert!(dashboard.recent_searches().is_empty());
    }

    #[tokio::test]
    async fn test_apply_preferences_reanalyzes_held_data() {
        let server = MockServer::start().await;
        mock_weather(&server, "London", 18.0, "Rain").await;

        let mut dashboard = dashboard_for(&server);
        dashboard.load_city("London").await.unwrap();
        assert!(dashboard
            .active_notifications()
            .iter()
            .any(|n| n.id == "precipitation-rain"));

        dashboard.apply_preferences(&PreferenceUpdate {
            notifications: Some(CategoryToggles {
                precipitation: false,
                ..CategoryToggles::default()
            }),
            ..Default::default()
        });

        assert!(dashboard
            .active_notifications()
            .iter()
            .all(|n| n.id != "precipitation-rain"));
        // The comfort advisory survives the re-run.
        assert!(dashboard
            .active_notifications()
            .iter()
            .any(|n| n.id == "comfort-humidity"));
    }

    #[tokio::test]
    async fn test_dismissals_thread_through_to_registry() {
        let server = MockServer::start().await;
        mock_weather(&server, "London", 18.0, "Rain").await;

        let mut dashboard = dashboard_for(&server);
        dashboard.load_city("London").await.unwrap();
        assert_eq!(dashboard.active_notifications().len(), 2);

        dashboard.dismiss("precipitation-rain");
        assert_eq!(dashboard.active_notifications().len(), 1);

        dashboard.dismiss("not-a-real-id");
        assert_eq!(dashboard.active_notifications().len(), 1);

        dashboard.dismiss_all();
        assert!(dashboard.active_notifications().is_empty());
    }
}
