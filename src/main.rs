use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use sundial_core::Config;
use sundial_protocol::WeatherSnapshot;
use sundial_relay::{PeerRegistry, WeatherPublisher, WeatherRelay, WeatherSource};
use sundial_weather::{face, icon_for_condition, WeatherCache};

/// Stand-in for the phone's weather sync layer.
struct CannedWeather(WeatherSnapshot);

impl WeatherSource for CannedWeather {
    fn current(&self) -> Option<WeatherSnapshot> {
        Some(self.0.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    sundial_core::init()?;
    let (config, _) = Config::load_validated()?;

    // One registry per device: each holds the mailboxes of the peers that
    // device can reach.
    let watch_peers = Arc::new(PeerRegistry::new());
    let phone_peers = Arc::new(PeerRegistry::new());
    let cache = Arc::new(WeatherCache::new());
    let shutdown = CancellationToken::new();

    let capacity = config.relay.mailbox_capacity;
    let watch_inbox = phone_peers.attach(config.relay.node_name.as_str(), capacity);
    let phone_inbox = watch_peers.attach("phone", capacity);

    let relay = WeatherRelay::new(
        watch_peers,
        Arc::clone(&cache),
        watch_inbox,
        shutdown.clone(),
    );
    let requests = relay.handle();
    let source = Arc::new(CannedWeather(WeatherSnapshot::new(800, "75", "60")));
    let publisher = WeatherPublisher::new(phone_peers, source, phone_inbox, shutdown.clone());

    let relay_task = tokio::spawn(relay.run());
    let publisher_task = tokio::spawn(publisher.run());
    let refresh_task = tokio::spawn(requests.clone().run_refresh(
        Duration::from_secs(u64::from(config.weather.refresh_minutes) * 60),
        shutdown.clone(),
    ));

    tracing::info!("sundial started");

    let mut updates = cache.subscribe();
    requests.request_weather();

    tokio::time::timeout(Duration::from_secs(2), updates.changed())
        .await
        .context("timed out waiting for weather")?
        .context("weather cache closed")?;

    let now = chrono::Local::now();
    println!("{}", face::time_text(&now));
    println!("{}", face::date_text(&now));
    match cache.read() {
        Some(snapshot) => println!(
            "{}  [{}]",
            face::weather_text(&snapshot),
            icon_for_condition(snapshot.condition_code).asset_name()
        ),
        None => println!("weather unavailable"),
    }

    // Graceful shutdown
    shutdown.cancel();
    relay_task.await??;
    publisher_task.await?;
    refresh_task.await?;
    cache.clear();

    Ok(())
}
