//! Application state and its event transitions.
//!
//! Every change to what the user sees goes through [`AppState::apply`]. A
//! transition that needs I/O returns an [`Effect`]; whoever runs the effect
//! feeds the outcome back as another [`Event`].

use crate::{
    city::{ResolvedCity, suggest},
    classify::{Verdict, classify},
    error::{LocationError, WeatherError},
    model::{
        Coordinates, CurrentConditions, HourlyForecastPoint, MinutelyPrecipitationPoint, Snapshot,
    },
};

pub const FETCH_FAILED: &str = "Failed to fetch weather.";
pub const SEARCH_FAILED: &str = "Failed to search by city name.";
pub const CITY_NOT_FOUND: &str = "City not found";

/// Monotonic id of a snapshot operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

#[derive(Debug)]
pub enum Event {
    LocationResolved(Coordinates),
    LocationFailed(LocationError),
    CoordinatesSubmitted(Coordinates),
    SnapshotLoaded { generation: Generation, snapshot: Snapshot },
    SnapshotFailed { generation: Generation, error: WeatherError },
    CityQueryChanged(String),
    CitySearchSubmitted,
    SuggestionSelected(String),
    CityResolved(ResolvedCity),
    CitySearchFailed(WeatherError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchSnapshot { coords: Coordinates, generation: Generation },
    ResolveCity(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub coordinates: Coordinates,
    pub location_name: String,
    pub timezone_offset_secs: i32,
    pub current: Option<CurrentConditions>,
    pub hourly: Vec<HourlyForecastPoint>,
    pub minutely: Vec<MinutelyPrecipitationPoint>,
    /// The single user-visible error slot.
    pub error: Option<String>,
    pub city_query: String,
    pub suggestions: Vec<&'static str>,
    generation: Generation,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Coordinates::default())
    }
}

impl AppState {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            location_name: String::new(),
            timezone_offset_secs: 0,
            current: None,
            hourly: Vec::new(),
            minutely: Vec::new(),
            error: None,
            city_query: String::new(),
            suggestions: Vec::new(),
            generation: Generation::default(),
        }
    }

    /// Generation of the most recently started snapshot.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn show_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        classify(self.current.as_ref())
    }

    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::LocationResolved(coords) => Some(self.begin_snapshot(coords.rounded())),
            Event::LocationFailed(err) => {
                tracing::warn!(error = %err, "no device position");
                self.error = Some(err.to_string());
                None
            }
            Event::CoordinatesSubmitted(coords) => Some(self.begin_snapshot(coords)),
            Event::SnapshotLoaded { generation, snapshot } => {
                if self.is_stale(generation) {
                    return None;
                }
                self.location_name = snapshot.location_name;
                self.timezone_offset_secs = snapshot.timezone_offset_secs;
                self.current = snapshot.current;
                self.hourly = snapshot.hourly;
                self.minutely = snapshot.minutely;
                self.error = None;
                None
            }
            Event::SnapshotFailed { generation, error } => {
                if self.is_stale(generation) {
                    return None;
                }
                tracing::warn!(%error, "snapshot failed");
                self.clear_weather();
                self.error = Some(FETCH_FAILED.to_string());
                None
            }
            Event::CityQueryChanged(text) => {
                self.suggestions = suggest(&text);
                self.city_query = text;
                None
            }
            Event::CitySearchSubmitted => {
                let query = self.city_query.trim();
                (!query.is_empty()).then(|| Effect::ResolveCity(query.to_string()))
            }
            Event::SuggestionSelected(city) => {
                self.city_query = city.clone();
                self.suggestions.clear();
                (!city.trim().is_empty()).then(|| Effect::ResolveCity(city.trim().to_string()))
            }
            Event::CityResolved(city) => {
                self.location_name = city.name;
                self.error = None;
                self.suggestions.clear();
                Some(self.begin_snapshot(city.coordinates))
            }
            Event::CitySearchFailed(error) => {
                tracing::warn!(%error, "city search failed");
                let message = match &error {
                    WeatherError::Provider { .. } => {
                        error.provider_message().unwrap_or(CITY_NOT_FOUND)
                    }
                    _ => SEARCH_FAILED,
                };
                self.error = Some(message.to_string());
                None
            }
        }
    }

    fn begin_snapshot(&mut self, coords: Coordinates) -> Effect {
        self.coordinates = coords;
        self.generation = self.generation.next();
        Effect::FetchSnapshot { coords, generation: self.generation }
    }

    fn is_stale(&self, generation: Generation) -> bool {
        let stale = generation != self.generation;
        if stale {
            tracing::debug!(
                ?generation,
                latest = ?self.generation,
                "discarding stale snapshot result"
            );
        }
        stale
    }

    fn clear_weather(&mut self) {
        self.current = None;
        self.hourly.clear();
        self.minutely.clear();
        self.location_name.clear();
        self.timezone_offset_secs = 0;
    }
}
