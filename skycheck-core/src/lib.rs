//! Core library for the `skycheck` weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its OpenWeather implementation
//! - Snapshot fetching, city search and the "can we go outside" verdict
//! - Application state driven by discrete events
//!
//! It is used by `skycheck-cli`, but can also back other front ends.

pub mod city;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod location;
pub mod model;
pub mod precip;
pub mod provider;
pub mod session;
pub mod state;
pub mod tiles;

#[cfg(test)]
mod testing;

pub use city::{CITY_PRESETS, ResolvedCity, suggest};
pub use classify::{Verdict, classify};
pub use config::Config;
pub use error::{LocationError, WeatherError};
pub use location::{ConfiguredLocation, LocationSource};
pub use model::{
    Condition, Coordinates, CurrentConditions, HourlyForecastPoint, MinutelyPrecipitationPoint,
    Snapshot,
};
pub use provider::{WeatherProvider, provider_from_config};
pub use session::Session;
pub use state::{AppState, Event};
