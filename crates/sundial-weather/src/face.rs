//! Text composition for the digital face.
//!
//! Pure formatting only. Actual drawing belongs to the host display layer.

use chrono::{Datelike, Timelike};

use sundial_protocol::WeatherSnapshot;

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// `H:MM`, 24-hour clock, no leading zero on the hour.
pub fn time_text(time: &impl Timelike) -> String {
    format!("{}:{:02}", time.hour(), time.minute())
}

/// `DDD, MMM d yyyy`, e.g. `SUN, JUL 4 2027`.
pub fn date_text(date: &impl Datelike) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{}, {} {} {}", weekday, month, date.day(), date.year())
}

/// High then low temperature, as drawn side by side on the face.
pub fn weather_text(snapshot: &WeatherSnapshot) -> String {
    format!("{} {}", snapshot.temp_high, snapshot.temp_low)
}
