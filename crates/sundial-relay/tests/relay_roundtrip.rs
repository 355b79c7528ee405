//! End-to-end relay tests over in-process peers.
//!
//! Two registries model the two devices: each holds the mailboxes of the
//! peers that device can reach.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use sundial_protocol::{codec, Message, WeatherSnapshot, WEATHER_TODAY_PATH};
use sundial_relay::{PeerRegistry, WeatherPublisher, WeatherRelay, WeatherSource};
use sundial_weather::WeatherCache;

const WAIT: Duration = Duration::from_secs(5);

struct CannedWeather(Option<WeatherSnapshot>);

impl WeatherSource for CannedWeather {
    fn current(&self) -> Option<WeatherSnapshot> {
        self.0.clone()
    }
}

fn sample() -> WeatherSnapshot {
    WeatherSnapshot::new(800, "75", "60")
}

struct Pair {
    cache: Arc<WeatherCache>,
    shutdown: CancellationToken,
    relay: WeatherRelay,
    publisher: WeatherPublisher,
}

/// Wire a watch and a phone together through fresh registries.
fn wired_pair(source: CannedWeather) -> Pair {
    let watch_peers = Arc::new(PeerRegistry::new());
    let phone_peers = Arc::new(PeerRegistry::new());
    let cache = Arc::new(WeatherCache::new());
    let shutdown = CancellationToken::new();

    let watch_inbox = phone_peers.attach("watch", 8);
    let phone_inbox = watch_peers.attach("phone", 8);

    let relay = WeatherRelay::new(
        watch_peers,
        Arc::clone(&cache),
        watch_inbox,
        shutdown.clone(),
    );
    let publisher = WeatherPublisher::new(
        phone_peers,
        Arc::new(source),
        phone_inbox,
        shutdown.clone(),
    );

    Pair {
        cache,
        shutdown,
        relay,
        publisher,
    }
}

#[tokio::test]
async fn fetch_round_trip_updates_cache() {
    let pair = wired_pair(CannedWeather(Some(sample())));
    let requests = pair.relay.handle();
    let mut updates = pair.cache.subscribe();

    let relay_task = tokio::spawn(pair.relay.run());
    let publisher_task = tokio::spawn(pair.publisher.run());

    requests.request_weather();

    timeout(WAIT, updates.changed()).await.unwrap().unwrap();
    assert_eq!(pair.cache.read(), Some(sample()));

    pair.shutdown.cancel();
    relay_task.await.unwrap().unwrap();
    publisher_task.await.unwrap();
}

#[tokio::test]
async fn fetch_with_no_reachable_peers_completes() {
    let peers = Arc::new(PeerRegistry::new());
    let cache = Arc::new(WeatherCache::new());
    let (_tx, inbox) = mpsc::channel(8);
    let relay = WeatherRelay::new(peers, Arc::clone(&cache), inbox, CancellationToken::new());

    // No peers attached anywhere: the trigger is a silent no-op.
    relay.handle().request_weather();
    assert_eq!(cache.read(), None);
}

#[tokio::test]
async fn source_with_nothing_to_report_publishes_nothing() {
    let pair = wired_pair(CannedWeather(None));
    let requests = pair.relay.handle();

    let relay_task = tokio::spawn(pair.relay.run());
    let publisher_task = tokio::spawn(pair.publisher.run());

    requests.request_weather();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(pair.cache.read(), None);

    pair.shutdown.cancel();
    relay_task.await.unwrap().unwrap();
    publisher_task.await.unwrap();
}

#[tokio::test]
async fn unrecognized_paths_are_ignored_and_the_loop_stays_alive() {
    let cache = Arc::new(WeatherCache::new());
    let shutdown = CancellationToken::new();
    let (tx, inbox) = mpsc::channel(8);
    let relay = WeatherRelay::new(
        Arc::new(PeerRegistry::new()),
        Arc::clone(&cache),
        inbox,
        shutdown.clone(),
    );
    let relay_task = tokio::spawn(relay.run());

    tx.send(Message::data("/not-weather", b"junk".to_vec()))
        .await
        .unwrap();
    tx.send(Message::data(WEATHER_TODAY_PATH, codec::encode(&sample())))
        .await
        .unwrap();

    let mut updates = cache.subscribe();
    timeout(WAIT, updates.wait_for(|slot| slot.is_some()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cache.read(), Some(sample()));

    shutdown.cancel();
    relay_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn malformed_weather_payload_aborts_the_receive_loop() {
    let cache = Arc::new(WeatherCache::new());
    let (tx, inbox) = mpsc::channel(8);
    let relay = WeatherRelay::new(
        Arc::new(PeerRegistry::new()),
        Arc::clone(&cache),
        inbox,
        CancellationToken::new(),
    );
    let relay_task = tokio::spawn(relay.run());

    tx.send(Message::data(WEATHER_TODAY_PATH, b"not json".to_vec()))
        .await
        .unwrap();

    let result = timeout(WAIT, relay_task).await.unwrap().unwrap();
    assert!(result.is_err());
    assert_eq!(cache.read(), None);
}

#[tokio::test]
async fn later_publish_replaces_earlier_one() {
    let cache = Arc::new(WeatherCache::new());
    let shutdown = CancellationToken::new();
    let (tx, inbox) = mpsc::channel(8);
    let relay = WeatherRelay::new(
        Arc::new(PeerRegistry::new()),
        Arc::clone(&cache),
        inbox,
        shutdown.clone(),
    );
    let relay_task = tokio::spawn(relay.run());

    let first = WeatherSnapshot::new(800, "75", "60");
    let second = WeatherSnapshot::new(500, "58", "47");
    tx.send(Message::data(WEATHER_TODAY_PATH, codec::encode(&first)))
        .await
        .unwrap();
    tx.send(Message::data(WEATHER_TODAY_PATH, codec::encode(&second)))
        .await
        .unwrap();

    let mut updates = cache.subscribe();
    timeout(WAIT, updates.wait_for(|slot| slot.as_ref() == Some(&second)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cache.read(), Some(second));

    shutdown.cancel();
    relay_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn periodic_refresh_keeps_triggering() {
    let watch_peers = Arc::new(PeerRegistry::new());
    let mut phone_inbox = watch_peers.attach("phone", 8);
    let cache = Arc::new(WeatherCache::new());
    let shutdown = CancellationToken::new();
    let (_tx, inbox) = mpsc::channel(8);
    let relay = WeatherRelay::new(watch_peers, cache, inbox, shutdown.clone());

    let refresh = tokio::spawn(
        relay
            .handle()
            .run_refresh(Duration::from_millis(10), shutdown.clone()),
    );

    for _ in 0..3 {
        let message = timeout(WAIT, phone_inbox.recv()).await.unwrap().unwrap();
        assert!(message.payload.is_empty());
    }

    shutdown.cancel();
    refresh.await.unwrap();
}

#[tokio::test]
async fn zero_cadence_refresh_returns_immediately() {
    let relay = WeatherRelay::new(
        Arc::new(PeerRegistry::new()),
        Arc::new(WeatherCache::new()),
        mpsc::channel(8).1,
        CancellationToken::new(),
    );
    timeout(
        WAIT,
        relay
            .handle()
            .run_refresh(Duration::ZERO, CancellationToken::new()),
    )
    .await
    .unwrap();
}
