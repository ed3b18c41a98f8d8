mod dashboard;
mod location;
mod render;
mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use dashboard::Dashboard;
use session::RefreshScheduler;
use skycast_core::{Config, KvStore};
use skycast_weather::WeatherProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skycast_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    tracing::info!("Skycast starting, config dir {}", config.config_dir.display());

    let api_key = config.weather.api_key.clone().unwrap_or_default();
    let provider = WeatherProvider::new(&config.weather.api_base_url, &api_key)
        .map_err(|e| anyhow::anyhow!("Failed to create weather provider: {e}"))?;

    std::fs::create_dir_all(&config.config_dir).context("Failed to create data directory")?;
    let kv = Arc::new(KvStore::open(config.db_path())?);

    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Some(pos) = args.iter().position(|a| a == "--search") {
        let query = args.get(pos + 1).map(String::as_str).unwrap_or("");
        search_cities(&provider, &kv, query).await;
        return Ok(());
    }

    let watch = args.iter().any(|a| a == "--watch");
    let here = args.iter().any(|a| a == "--here");
    let city = args.iter().find(|a| !a.starts_with("--")).cloned();

    let mut dashboard = Dashboard::new(provider, kv, &config.weather.default_city);

    let initial = if here {
        match location::current_position() {
            Ok((lat, lon)) => dashboard.load_coords(lat, lon).await,
            Err(e) => {
                // Unsupported geolocation gets its own message, distinct
                // from a fetch failure, then we fall back to the city path.
                let app_err = skycast_core::AppError::from(e);
                tracing::warn!("Geolocation unavailable: {app_err}");
                eprintln!("{}", app_err.user_message());
                dashboard.start().await
            }
        }
    } else if let Some(city) = &city {
        dashboard.load_city(city).await
    } else {
        dashboard.start().await
    };
    match initial {
        Ok(()) => print_dashboard(&dashboard),
        Err(e) => {
            tracing::error!("Initial load failed: {e}");
            eprintln!("{}", e.user_message());
        }
    }

    if watch {
        let refresh_minutes = config.weather.refresh_minutes.max(1);
        let (tx, mut rx) = mpsc::channel(1);
        let scheduler =
            RefreshScheduler::spawn(Duration::from_secs(u64::from(refresh_minutes) * 60), tx);
        tracing::info!("Refreshing every {refresh_minutes} minutes; ctrl-c to quit");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                Some(()) = rx.recv() => {
                    match dashboard.refresh().await {
                        Ok(()) => print_dashboard(&dashboard),
                        Err(e) => eprintln!("{}", e.user_message()),
                    }
                }
            }
        }

        // Graceful shutdown: the refresh task must not outlive the session.
        scheduler.shutdown().await;
    }

    Ok(())
}

async fn search_cities(provider: &WeatherProvider, kv: &Arc<KvStore>, query: &str) {
    let recent = skycast_weather::WeatherCache::new(kv.clone()).recent_searches();
    if !recent.is_empty() {
        println!("Recent: {}", recent.join(", "));
    }

    match provider.search_cities(query).await {
        Ok(matches) if matches.is_empty() => println!("No matching cities"),
        Ok(matches) => {
            for m in &matches {
                println!("{}, {} ({:.4}, {:.4})", m.name, m.country, m.lat, m.lon);
            }
        }
        Err(e) => eprintln!("{}", e.user_message()),
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    let prefs = dashboard.preferences();

    if let Some(reading) = dashboard.weather() {
        println!("{}", render::render_reading(reading, prefs));
    }

    let forecast = dashboard.forecast();
    if !forecast.is_empty() {
        println!("\nForecast:");
        println!("{}", render::render_forecast(forecast, prefs));
    }

    println!("\nNotifications:");
    println!("{}", render::render_notifications(&dashboard.active_notifications(), prefs));
}
