//! Phone side of the weather relay.
//!
//! [`WeatherPublisher`] answers `/fetch-weather-data` triggers by reading
//! current conditions from a [`WeatherSource`] and publishing them on
//! `/weather-today` to every reachable peer.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use sundial_protocol::{codec, Message, WeatherSnapshot, FETCH_WEATHER_PATH, WEATHER_TODAY_PATH};

use crate::peer::PeerRegistry;

/// Where the publisher gets its weather from.
///
/// Implementations read whatever the host keeps current (a sync layer, a
/// test fixture). `None` means there is nothing to publish yet.
pub trait WeatherSource: Send + Sync {
    fn current(&self) -> Option<WeatherSnapshot>;
}

/// Receive loop for the phone: turns fetch triggers into weather publishes.
pub struct WeatherPublisher {
    peers: Arc<PeerRegistry>,
    source: Arc<dyn WeatherSource>,
    inbox: mpsc::Receiver<Message>,
    shutdown: CancellationToken,
}

impl WeatherPublisher {
    pub fn new(
        peers: Arc<PeerRegistry>,
        source: Arc<dyn WeatherSource>,
        inbox: mpsc::Receiver<Message>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            peers,
            source,
            inbox,
            shutdown,
        }
    }

    /// Drive the receive loop until cancelled or all peers hang up.
    ///
    /// Triggers carry no payload, so nothing here can fail to decode;
    /// publish failures are logged and dropped like every other delivery.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("weather publisher stopped");
                    return;
                }
                inbound = self.inbox.recv() => match inbound {
                    Some(message) => self.answer(message),
                    None => {
                        tracing::info!("all peers hung up; weather publisher stopped");
                        return;
                    }
                },
            }
        }
    }

    fn answer(&self, message: Message) {
        if message.path != FETCH_WEATHER_PATH {
            tracing::trace!(path = %message.path, "ignoring message on unrecognized path");
            return;
        }
        tracing::debug!("weather fetch request accepted");

        let snapshot = match self.source.current() {
            Some(snapshot) => snapshot,
            None => {
                tracing::debug!("no weather available to publish");
                return;
            }
        };

        let payload = codec::encode(&snapshot);
        for peer in self.peers.reachable() {
            match peer.deliver(Message::data(WEATHER_TODAY_PATH, payload.clone())) {
                Ok(()) => tracing::debug!(peer = peer.id(), "weather data published"),
                Err(err) => {
                    tracing::warn!(peer = peer.id(), %err, "weather data dropped");
                }
            }
        }
    }
}
