use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in decimal degrees.
///
/// Range checking is left to the provider, which rejects out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both components rounded to five decimal places (roughly one metre).
    pub fn rounded(self) -> Self {
        fn round5(v: f64) -> f64 {
            (v * 100_000.0).round() / 100_000.0
        }
        Self::new(round5(self.latitude), round5(self.longitude))
    }

    pub fn latitude_param(&self) -> String {
        self.latitude.to_string()
    }

    pub fn longitude_param(&self) -> String {
        self.longitude.to_string()
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        // Radnor, PA.
        Self::new(40.0379, -75.3433)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Provider condition entry (`weather[0]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Category such as "Rain" or "Clear".
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub observed_at: Option<DateTime<Utc>>,
    /// `None` when the provider omitted the reading.
    pub temperature_f: Option<f64>,
    pub feels_like_f: Option<f64>,
    pub humidity_pct: u8,
    pub condition: Option<Condition>,
    /// Present whenever the provider reported a `rain` block, even without a volume.
    pub rain_mm_h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastPoint {
    pub time: DateTime<Utc>,
    pub temperature_f: f64,
    pub condition: Option<Condition>,
    /// Probability of precipitation, 0..=1.
    pub pop: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinutelyPrecipitationPoint {
    pub time: DateTime<Utc>,
    /// Intensity in mm/hour; absent upstream values are zero.
    pub precipitation_mm_h: f64,
}

/// Decoded forecast bundle as returned by the provider, before capping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBundle {
    pub timezone_offset_secs: i32,
    pub current: Option<CurrentConditions>,
    pub hourly: Vec<HourlyForecastPoint>,
    pub minutely: Vec<MinutelyPrecipitationPoint>,
}

/// Current weather for a named place (the `/data/2.5/weather` shape).
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceWeather {
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub temperature_f: Option<f64>,
    pub condition: Option<Condition>,
}

/// One snapshot operation's worth of data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub location_name: String,
    pub timezone_offset_secs: i32,
    pub current: Option<CurrentConditions>,
    pub hourly: Vec<HourlyForecastPoint>,
    pub minutely: Vec<MinutelyPrecipitationPoint>,
}

/// Round a temperature for display.
pub fn display_degrees(temp_f: f64) -> i64 {
    temp_f.round() as i64
}

/// Rounded degrees, or "--" for a missing reading.
pub fn degrees_label(temp_f: Option<f64>) -> String {
    temp_f.map_or_else(|| "--".to_string(), |t| display_degrees(t).to_string())
}

/// "12 AM", "1 AM" ... "12 PM", "1 PM" ... in the given UTC offset.
pub fn hour_label(time: DateTime<Utc>, offset_secs: i32) -> String {
    let hour = match FixedOffset::east_opt(offset_secs) {
        Some(offset) => time.with_timezone(&offset).hour(),
        None => time.hour(),
    };

    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{hour} AM"),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

/// "40% rain", or an em dash when there is no chance at all.
pub fn pop_label(pop: f64) -> String {
    let pct = pop * 100.0;
    if pct > 0.0 { format!("{}% rain", pct.round() as i64) } else { "\u{2014}".to_string() }
}

/// Marker caption for the map pin.
pub fn marker_caption(current: Option<&CurrentConditions>) -> String {
    match current.and_then(|c| c.condition.as_ref().map(|w| (c.temperature_f, w))) {
        Some((temp, cond)) => format!("{}°F, {}", degrees_label(temp), cond.description),
        None => "Loading...".to_string(),
    }
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
