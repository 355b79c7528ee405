//! Single-slot weather cache with change notification.

use tokio::sync::watch;

use sundial_protocol::WeatherSnapshot;

/// Observable cache for the latest weather snapshot.
///
/// Writers replace the slot wholesale; there is no merge and no history, so
/// last writer wins and no ordering is guaranteed between deliveries from
/// different peers. `update` may be called from any thread or task.
/// Observers obtained via [`subscribe`](WeatherCache::subscribe) are woken
/// on every replacement but only ever read the newest value; intermediate
/// snapshots can be skipped.
///
/// The cache is an owned, injectable object: create it at process start,
/// [`clear`](WeatherCache::clear) it at process end. Nothing outlives the
/// process.
#[derive(Debug)]
pub struct WeatherCache {
    slot: watch::Sender<Option<WeatherSnapshot>>,
}

impl WeatherCache {
    /// An empty cache: `read` reports no data until the first `update`.
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Replace the cached snapshot and notify observers.
    pub fn update(&self, snapshot: WeatherSnapshot) {
        tracing::debug!(condition = snapshot.condition_code, "weather cache updated");
        self.slot.send_replace(Some(snapshot));
    }

    /// The latest snapshot, or `None` if none has ever arrived.
    pub fn read(&self) -> Option<WeatherSnapshot> {
        self.slot.borrow().clone()
    }

    /// Register an observer.
    ///
    /// The receiver sees the value current at subscription time and is
    /// notified of every later replacement, on whatever task awaits it.
    pub fn subscribe(&self) -> watch::Receiver<Option<WeatherSnapshot>> {
        self.slot.subscribe()
    }

    /// Drop any cached snapshot, returning to the no-data state.
    pub fn clear(&self) {
        self.slot.send_replace(None);
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new()
    }
}
