//! Keyed-map codec for the `/weather-today` payload.
//!
//! The wire format is a JSON object with the field names the companion
//! protocol uses: `weatherId` (integer), `tempHigh` (string), `tempLow`
//! (string). Decoding is strict: a missing or wrong-typed field fails the
//! whole payload. No versioning, no partial decode.

use serde_json::{Map, Value};

use crate::types::WeatherSnapshot;

pub const FIELD_WEATHER_ID: &str = "weatherId";
pub const FIELD_TEMP_HIGH: &str = "tempHigh";
pub const FIELD_TEMP_LOW: &str = "tempLow";

/// Why a weather payload failed to decode.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload is not a keyed map")]
    NotAMap,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Encode a snapshot into its wire payload. Total: cannot fail.
pub fn encode(snapshot: &WeatherSnapshot) -> Vec<u8> {
    let mut map = Map::with_capacity(3);
    map.insert(
        FIELD_WEATHER_ID.to_owned(),
        Value::from(snapshot.condition_code),
    );
    map.insert(
        FIELD_TEMP_HIGH.to_owned(),
        Value::from(snapshot.temp_high.as_str()),
    );
    map.insert(
        FIELD_TEMP_LOW.to_owned(),
        Value::from(snapshot.temp_low.as_str()),
    );
    Value::Object(map).to_string().into_bytes()
}

/// Decode a wire payload back into a snapshot.
pub fn decode(payload: &[u8]) -> Result<WeatherSnapshot, DecodeError> {
    let value: Value = serde_json::from_slice(payload)?;
    let map = value.as_object().ok_or(DecodeError::NotAMap)?;

    let condition_code = require(map, FIELD_WEATHER_ID)?
        .as_i64()
        .and_then(|id| i32::try_from(id).ok())
        .ok_or(DecodeError::WrongType {
            field: FIELD_WEATHER_ID,
            expected: "integer",
        })?;

    let temp_high = require_str(map, FIELD_TEMP_HIGH)?;
    let temp_low = require_str(map, FIELD_TEMP_LOW)?;

    Ok(WeatherSnapshot {
        condition_code,
        temp_high: temp_high.to_owned(),
        temp_low: temp_low.to_owned(),
    })
}

fn require<'a>(map: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, DecodeError> {
    map.get(field).ok_or(DecodeError::MissingField(field))
}

fn require_str<'a>(map: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, DecodeError> {
    require(map, field)?.as_str().ok_or(DecodeError::WrongType {
        field,
        expected: "string",
    })
}
