use std::env;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracker::{create_pool, print_banner, AppState, Config, Environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    let app_env = Environment::from_str(&env::var("APP_ENV").unwrap_or_default());
    let data_path = env::var("DATA_PATH")
        .unwrap_or_else(|_| app_env.default_data_path().to_string_lossy().to_string());

    let mut config = Config::new(app_env, &data_path);
    config.inference_url = env::var("INFERENCE_URL").ok().filter(|v| !v.is_empty());
    if let Ok(urls) = env::var("FEED_URLS") {
        config.feed_urls = urls
            .split(',')
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
    }
    if let Ok(secs) = env::var("FETCH_INTERVAL_SECS") {
        if let Ok(secs) = secs.parse::<u64>() {
            config.fetch_interval = std::time::Duration::from_secs(secs);
        }
    }

    std::fs::create_dir_all(&config.data_path)?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    let state = AppState::new(pool, config).await;

    // URLs on the command line are fetched once, inline, and the process
    // exits; without them the scheduler keeps the configured feeds fresh.
    let urls: Vec<String> = env::args().skip(1).collect();
    if !urls.is_empty() {
        for url in &urls {
            match state.pipeline.fetch_feed(url).await {
                Ok(summary) => {
                    tracing::info!("Fetched {}: {} new mentions", url, summary.created);
                }
                Err(e) => {
                    tracing::error!("Fetch failed for {}: {}", url, e);
                }
            }
        }
        return Ok(());
    }

    if state.config.feed_urls.is_empty() {
        tracing::warn!("No feeds configured; set FEED_URLS or pass URLs as arguments");
        return Ok(());
    }

    tracing::info!(
        "Watching {} feeds every {:?}",
        state.config.feed_urls.len(),
        state.config.fetch_interval
    );
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    Ok(())
}
