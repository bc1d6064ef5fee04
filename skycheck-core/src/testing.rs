//! Canned provider for unit tests.

use async_trait::async_trait;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    error::WeatherError,
    model::{
        Condition, Coordinates, CurrentConditions, ForecastBundle, HourlyForecastPoint,
        PlaceWeather, unix_to_utc,
    },
    provider::WeatherProvider,
};

/// `None` entries answer with the error the real provider would give.
#[derive(Debug)]
pub(crate) struct FakeProvider {
    pub bundle: Option<ForecastBundle>,
    pub place_name: Option<String>,
    pub city: Option<PlaceWeather>,
    pub bundle_calls: Arc<AtomicUsize>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            bundle: Some(ForecastBundle::default()),
            place_name: Some("Radnor".to_string()),
            city: None,
            bundle_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn fetch_bundle(&self, _coords: Coordinates) -> Result<ForecastBundle, WeatherError> {
        self.bundle_calls.fetch_add(1, Ordering::SeqCst);
        self.bundle.clone().ok_or_else(|| WeatherError::Malformed("One Call JSON".into()))
    }

    async fn fetch_current_at(&self, coords: Coordinates) -> Result<PlaceWeather, WeatherError> {
        match &self.place_name {
            Some(name) => Ok(PlaceWeather {
                name: name.clone(),
                coordinates: Some(coords),
                temperature_f: None,
                condition: None,
            }),
            None => Err(WeatherError::Provider { code: 400, message: "wrong latitude".into() }),
        }
    }

    async fn fetch_current_by_city(&self, _city: &str) -> Result<PlaceWeather, WeatherError> {
        self.city.clone().ok_or_else(|| WeatherError::Provider {
            code: 404,
            message: "city not found".into(),
        })
    }
}

pub(crate) fn hourly_points(count: usize) -> Vec<HourlyForecastPoint> {
    (0..count)
        .map(|i| HourlyForecastPoint {
            time: unix_to_utc(1_700_006_400 + i as i64 * 3600).unwrap(),
            temperature_f: 50.0 + i as f64,
            condition: None,
            pop: 0.0,
        })
        .collect()
}

pub(crate) fn current(main: &str, temp: f64) -> CurrentConditions {
    CurrentConditions {
        observed_at: None,
        temperature_f: Some(temp),
        feels_like_f: Some(temp),
        humidity_pct: 50,
        condition: Some(Condition {
            main: main.to_string(),
            description: main.to_lowercase(),
            icon: "01d".to_string(),
        }),
        rain_mm_h: None,
    }
}
