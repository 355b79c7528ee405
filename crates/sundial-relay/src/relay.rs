//! Watch side of the weather relay.
//!
//! [`WeatherRelay`] runs the receive loop: decoded `/weather-today`
//! payloads are forwarded into the weather cache, everything else is
//! ignored. [`RelayHandle`] is the cheap sending half used to ask reachable
//! peers for fresh weather.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use sundial_protocol::{codec, DecodeError, FetchRequest, Message, WEATHER_TODAY_PATH};
use sundial_weather::WeatherCache;

use crate::peer::PeerRegistry;

/// Errors that abort the relay's receive loop.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A `/weather-today` payload failed to decode. There is no recovery:
    /// the receive path stops and the error is handed to whoever drives
    /// [`WeatherRelay::run`].
    #[error("malformed weather payload: {0}")]
    Decode(#[from] DecodeError),
}

/// Sending half of the relay: fire-and-forget weather triggers.
#[derive(Debug, Clone)]
pub struct RelayHandle {
    peers: Arc<PeerRegistry>,
}

impl RelayHandle {
    /// Ask every reachable peer for current weather.
    ///
    /// Best-effort and at-most-once per peer: delivery failures are logged,
    /// never returned, and zero reachable peers is not an error.
    pub fn request_weather(&self) {
        let peers = self.peers.reachable();
        if peers.is_empty() {
            tracing::debug!("weather fetch requested with no reachable peers");
            return;
        }
        for peer in peers {
            match peer.deliver(FetchRequest.into()) {
                Ok(()) => tracing::debug!(peer = peer.id(), "weather fetch requested"),
                Err(err) => {
                    tracing::warn!(peer = peer.id(), %err, "weather fetch trigger dropped");
                }
            }
        }
    }

    /// Re-issue the weather trigger on a fixed cadence until cancelled.
    ///
    /// A zero cadence disables periodic refresh and returns immediately.
    /// The first trigger fires one full period after this call, not at once.
    pub async fn run_refresh(self, every: Duration, shutdown: CancellationToken) {
        if every.is_zero() {
            tracing::info!("periodic weather refresh disabled");
            return;
        }
        let start = tokio::time::Instant::now() + every;
        let mut ticker = tokio::time::interval_at(start, every);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("weather refresh stopped");
                    return;
                }
                _ = ticker.tick() => self.request_weather(),
            }
        }
    }
}

/// Receive loop for the watch: owns the watch's mailbox and the cache.
pub struct WeatherRelay {
    peers: Arc<PeerRegistry>,
    cache: Arc<WeatherCache>,
    inbox: mpsc::Receiver<Message>,
    shutdown: CancellationToken,
}

impl WeatherRelay {
    pub fn new(
        peers: Arc<PeerRegistry>,
        cache: Arc<WeatherCache>,
        inbox: mpsc::Receiver<Message>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            peers,
            cache,
            inbox,
            shutdown,
        }
    }

    /// The sending half, usable from any task after `run` has consumed self.
    pub fn handle(&self) -> RelayHandle {
        RelayHandle {
            peers: Arc::clone(&self.peers),
        }
    }

    /// Drive the receive loop until cancelled or all peers hang up.
    ///
    /// Messages are dispatched on this task, one at a time, in mailbox
    /// order. A malformed `/weather-today` payload aborts the loop with
    /// [`RelayError::Decode`].
    pub async fn run(mut self) -> Result<(), RelayError> {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("weather relay stopped");
                    return Ok(());
                }
                inbound = self.inbox.recv() => match inbound {
                    Some(message) => self.dispatch(message)?,
                    None => {
                        tracing::info!("all peers hung up; weather relay stopped");
                        return Ok(());
                    }
                },
            }
        }
    }

    fn dispatch(&self, message: Message) -> Result<(), RelayError> {
        match message.path.as_str() {
            WEATHER_TODAY_PATH => {
                let snapshot = codec::decode(&message.payload).map_err(|err| {
                    tracing::error!(%err, "weather payload rejected");
                    err
                })?;
                tracing::debug!(condition = snapshot.condition_code, "weather data received");
                self.cache.update(snapshot);
                Ok(())
            }
            other => {
                tracing::trace!(path = other, "ignoring message on unrecognized path");
                Ok(())
            }
        }
    }
}
