//! Wire protocol shared by the watch and its phone companion.
//!
//! Defines the weather snapshot record, the relay message envelope, and the
//! strict keyed-map codec used on the `/weather-today` address.

pub mod codec;
pub mod message;
pub mod types;

pub use codec::{decode, encode, DecodeError};
pub use message::{FetchRequest, Message, FETCH_WEATHER_PATH, WEATHER_TODAY_PATH};
pub use types::WeatherSnapshot;
