//! `weather-range` -- comfort-band watcher for an Ambient Weather station.
//!
//! Polls the station's feels-like temperature and logs every transition
//! into or out of the configured band. See [`weather_range::config`] for
//! the environment variables it reads; a `.env` file in the working
//! directory is honoured.

use weather_range::{AmbientClient, Config, RangeMonitor};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_range=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let client = AmbientClient::new(config.api_url.clone()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    tracing::info!(
        api_url = %config.api_url,
        range = %config.range,
        interval_secs = config.poll_interval.as_secs(),
        throttle_policy = ?config.throttle_policy,
        "Starting weather-range",
    );

    let monitor = RangeMonitor::from_config(client, &config);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    monitor
        .run_until(shutdown, |in_range| {
            if in_range {
                tracing::info!("Feels-like temperature entered the comfort range");
            } else {
                tracing::info!("Feels-like temperature left the comfort range");
            }
        })
        .await;
}
