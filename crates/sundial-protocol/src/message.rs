//! Relay envelope and logical addresses.

/// Trigger address: the watch asks the phone for current weather.
pub const FETCH_WEATHER_PATH: &str = "/fetch-weather-data";

/// Data address: the phone publishes the current weather record.
pub const WEATHER_TODAY_PATH: &str = "/weather-today";

/// A single relay message: a logical address plus an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub path: String,
    pub payload: Vec<u8>,
}

impl Message {
    /// A zero-payload trigger on the given address.
    pub fn trigger(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            payload: Vec::new(),
        }
    }

    /// A data message carrying an encoded payload.
    pub fn data(path: &str, payload: Vec<u8>) -> Self {
        Self {
            path: path.to_owned(),
            payload,
        }
    }
}

/// The watch's "send current weather now" signal.
///
/// Carries nothing: no identity, no retry token. Fire-and-forget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchRequest;

impl From<FetchRequest> for Message {
    fn from(_: FetchRequest) -> Self {
        Message::trigger(FETCH_WEATHER_PATH)
    }
}
