use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, ForecastBundle, PlaceWeather},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Source of meteorological data. All requests use imperial units.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Combined current/hourly/minutely forecast for a coordinate.
    async fn fetch_bundle(&self, coords: Coordinates) -> Result<ForecastBundle, WeatherError>;

    /// Current conditions (and the place name) at a coordinate.
    async fn fetch_current_at(&self, coords: Coordinates) -> Result<PlaceWeather, WeatherError>;

    /// Current conditions for a free-text city name such as "London, GB".
    async fn fetch_current_by_city(&self, city: &str) -> Result<PlaceWeather, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;

    let provider = match config.base_url.as_deref() {
        Some(base_url) => {
            OpenWeatherProvider::with_base_url(api_key, base_url, config.request_timeout())?
        }
        None => OpenWeatherProvider::new(api_key, config.request_timeout())?,
    };

    Ok(Box::new(provider))
}
