use serde::{Deserialize, Serialize};

/// The single weather record exchanged between phone and watch.
///
/// Immutable once constructed; the cache replaces it wholesale on each
/// update. `condition_code` follows the OpenWeatherMap condition taxonomy;
/// temperatures are pre-formatted display strings chosen by the producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub condition_code: i32,
    pub temp_high: String,
    pub temp_low: String,
}

impl WeatherSnapshot {
    pub fn new(condition_code: i32, temp_high: impl Into<String>, temp_low: impl Into<String>) -> Self {
        Self {
            condition_code,
            temp_high: temp_high.into(),
            temp_low: temp_low.into(),
        }
    }
}
