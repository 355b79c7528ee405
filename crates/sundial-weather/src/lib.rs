//! Weather state for the Sundial watch face.
//!
//! Holds the single most recent snapshot received from the phone and the
//! pure display helpers (icon selection, face text) that read it.

pub mod cache;
pub mod face;
pub mod icons;

pub use cache::WeatherCache;
pub use icons::{icon_for_condition, WeatherIcon};
