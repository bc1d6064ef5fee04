use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::WeatherError,
    model::{
        Condition, Coordinates, CurrentConditions, ForecastBundle, HourlyForecastPoint,
        MinutelyPrecipitationPoint, PlaceWeather, unix_to_utc,
    },
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const UNITS: &str = "imperial";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, timeout: Option<Duration>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout)
    }

    /// Point the provider at another host, e.g. a mock server in tests.
    pub fn with_base_url(
        api_key: String,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, String), WeatherError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("units", UNITS), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        Ok((status, body))
    }

    async fn fetch_place(&self, query: &[(&str, &str)]) -> Result<PlaceWeather, WeatherError> {
        let (status, body) = self.get("/data/2.5/weather", query).await?;

        let parsed: OwPlaceResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(WeatherError::Provider {
                    code: status.as_u16(),
                    message: truncate_body(&body),
                });
            }
            Err(e) => {
                return Err(WeatherError::Malformed(format!("current weather JSON: {e}")));
            }
        };

        // `cod` is a number on success but a string on some errors.
        let code = parsed.cod.as_ref().and_then(parse_code).unwrap_or(status.as_u16());
        if code != 200 {
            let message = parsed.message.as_ref().and_then(|m| m.as_str()).unwrap_or_default();
            tracing::warn!(code, reason = message, "OpenWeather rejected current weather request");
            return Err(WeatherError::Provider { code, message: message.to_string() });
        }

        Ok(PlaceWeather {
            name: parsed.name.unwrap_or_default(),
            coordinates: parsed.coord.map(|c| Coordinates::new(c.lat, c.lon)),
            temperature_f: parsed.main.and_then(|m| m.temp),
            condition: first_condition(parsed.weather),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OcCurrent {
    dt: Option<i64>,
    temp: Option<f64>,
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: f64,
    weather: Option<Vec<OwCondition>>,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OcHourly {
    dt: Option<i64>,
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    pop: f64,
    weather: Option<Vec<OwCondition>>,
}

#[derive(Debug, Deserialize)]
struct OcMinutely {
    dt: Option<i64>,
    precipitation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OcResponse {
    #[serde(default)]
    timezone_offset: i32,
    current: Option<OcCurrent>,
    hourly: Option<Vec<OcHourly>>,
    minutely: Option<Vec<OcMinutely>>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwPlaceResponse {
    cod: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
    name: Option<String>,
    coord: Option<OwCoord>,
    main: Option<OwMain>,
    weather: Option<Vec<OwCondition>>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_bundle(&self, coords: Coordinates) -> Result<ForecastBundle, WeatherError> {
        tracing::debug!(%coords, "requesting One Call bundle");

        let (lat, lon) = (coords.latitude_param(), coords.longitude_param());
        let (status, body) =
            self.get("/data/3.0/onecall", &[("lat", lat.as_str()), ("lon", lon.as_str())]).await?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let parsed: OcResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Malformed(format!("One Call JSON: {e}")))?;

        Ok(normalize_bundle(parsed))
    }

    async fn fetch_current_at(&self, coords: Coordinates) -> Result<PlaceWeather, WeatherError> {
        tracing::debug!(%coords, "requesting current weather by coordinate");

        let (lat, lon) = (coords.latitude_param(), coords.longitude_param());
        self.fetch_place(&[("lat", lat.as_str()), ("lon", lon.as_str())]).await
    }

    async fn fetch_current_by_city(&self, city: &str) -> Result<PlaceWeather, WeatherError> {
        tracing::debug!(city, "requesting current weather by city name");

        self.fetch_place(&[("q", city)]).await
    }
}

fn normalize_bundle(raw: OcResponse) -> ForecastBundle {
    let current = raw.current.map(|c| CurrentConditions {
        observed_at: c.dt.and_then(unix_to_utc),
        temperature_f: c.temp,
        feels_like_f: c.feels_like,
        humidity_pct: c.humidity.round().clamp(0.0, 100.0) as u8,
        condition: first_condition(c.weather),
        rain_mm_h: c.rain.map(|r| r.one_hour.unwrap_or(0.0)),
    });

    let hourly = raw
        .hourly
        .unwrap_or_default()
        .into_iter()
        .filter_map(|h| {
            Some(HourlyForecastPoint {
                time: h.dt.and_then(unix_to_utc)?,
                temperature_f: h.temp,
                condition: first_condition(h.weather),
                pop: h.pop.clamp(0.0, 1.0),
            })
        })
        .collect();

    let minutely = raw
        .minutely
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| {
            Some(MinutelyPrecipitationPoint {
                time: m.dt.and_then(unix_to_utc)?,
                precipitation_mm_h: m.precipitation.unwrap_or(0.0),
            })
        })
        .collect();

    ForecastBundle { timezone_offset_secs: raw.timezone_offset, current, hourly, minutely }
}

fn first_condition(weather: Option<Vec<OwCondition>>) -> Option<Condition> {
    weather?.into_iter().next().map(|w| Condition {
        main: w.main,
        description: w.description,
        icon: w.icon,
    })
}

fn parse_code(value: &serde_json::Value) -> Option<u16> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn error_from_body(status: StatusCode, body: &str) -> WeatherError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| truncate_body(body));

    tracing::warn!(status = status.as_u16(), reason = %message, "OpenWeather request failed");
    WeatherError::Provider { code: status.as_u16(), message }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_sections_normalize_to_empty() {
        let raw: OcResponse =
            serde_json::from_value(json!({"current": null, "hourly": null, "minutely": null}))
                .unwrap();
        assert_eq!(normalize_bundle(raw), ForecastBundle::default());
    }

    #[test]
    fn current_rain_block_without_volume_still_counts() {
        let raw: OcResponse = serde_json::from_value(json!({
            "timezone_offset": -18000,
            "current": {
                "dt": 1_700_000_000,
                "temp": 50.2,
                "feels_like": 48.0,
                "humidity": 81,
                "weather": [{"main": "Clouds", "description": "overcast clouds", "icon": "04d"}],
                "rain": {}
            }
        }))
        .unwrap();

        let bundle = normalize_bundle(raw);
        let current = bundle.current.expect("current present");
        assert_eq!(bundle.timezone_offset_secs, -18000);
        assert_eq!(current.rain_mm_h, Some(0.0));
        assert_eq!(current.humidity_pct, 81);
        assert_eq!(current.condition.map(|c| c.main).as_deref(), Some("Clouds"));
    }

    #[test]
    fn missing_current_temperature_stays_unknown() {
        let raw: OcResponse = serde_json::from_value(json!({
            "current": {
                "dt": 1_700_000_000,
                "weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}]
            }
        }))
        .unwrap();

        let current = normalize_bundle(raw).current.expect("current present");
        assert_eq!(current.temperature_f, None);
        assert_eq!(current.feels_like_f, None);
        assert_eq!(crate::classify(Some(&current)), Some(crate::Verdict::Normal));
    }

    #[test]
    fn missing_precipitation_is_zero_and_undated_points_dropped() {
        let raw: OcResponse = serde_json::from_value(json!({
            "minutely": [
                {"dt": 1_700_000_000, "precipitation": 0.7},
                {"dt": 1_700_000_060},
                {"precipitation": 3.0}
            ],
            "hourly": [
                {"dt": 1_700_000_000, "temp": 40.0, "pop": 0.2, "weather": []},
                {"temp": 41.0}
            ]
        }))
        .unwrap();

        let bundle = normalize_bundle(raw);
        let intensities: Vec<f64> =
            bundle.minutely.iter().map(|m| m.precipitation_mm_h).collect();
        assert_eq!(intensities, vec![0.7, 0.0]);
        assert_eq!(bundle.hourly.len(), 1);
        assert_eq!(bundle.hourly[0].condition, None);
    }

    #[test]
    fn cod_accepts_numbers_and_strings() {
        assert_eq!(parse_code(&json!(200)), Some(200));
        assert_eq!(parse_code(&json!("404")), Some(404));
        assert_eq!(parse_code(&json!(null)), None);
    }

    #[test]
    fn error_body_message_is_extracted() {
        let err = error_from_body(
            StatusCode::UNAUTHORIZED,
            r#"{"cod":401,"message":"Invalid API key."}"#,
        );
        match err {
            WeatherError::Provider { code, message } => {
                assert_eq!(code, 401);
                assert_eq!(message, "Invalid API key.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
