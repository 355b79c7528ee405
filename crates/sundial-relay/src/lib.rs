//! Best-effort message relay between a watch and its phone companion.
//!
//! The relay is an at-most-once pipe over logical addresses: triggers go
//! watch -> phone on `/fetch-weather-data`, weather records come back
//! phone -> watch on `/weather-today`. There is no acknowledgement, retry,
//! or ordering guarantee; delivery failures are logged and dropped.

pub mod peer;
pub mod publisher;
pub mod relay;

pub use peer::{DeliveryError, PeerHandle, PeerRegistry};
pub use publisher::{WeatherPublisher, WeatherSource};
pub use relay::{RelayError, RelayHandle, WeatherRelay};
