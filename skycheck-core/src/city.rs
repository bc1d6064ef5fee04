//! City search: preset suggestions and name-to-coordinate resolution.

use crate::{
    error::WeatherError,
    model::{Coordinates, PlaceWeather},
    provider::WeatherProvider,
};

pub const CITY_PRESETS: &[&str] = &[
    "Philadelphia, US",
    "New York, US",
    "Los Angeles, US",
    "Chicago, US",
    "Houston, US",
    "London, GB",
    "Paris, FR",
    "Tokyo, JP",
    "Hanoi, VN",
    "Ho Chi Minh City, VN",
];

pub const MAX_SUGGESTIONS: usize = 6;

/// Presets containing `input`, case-insensitively. Blank input suggests nothing.
pub fn suggest(input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    CITY_PRESETS
        .iter()
        .copied()
        .filter(|city| city.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCity {
    pub name: String,
    pub coordinates: Coordinates,
}

impl TryFrom<PlaceWeather> for ResolvedCity {
    type Error = WeatherError;

    fn try_from(place: PlaceWeather) -> Result<Self, Self::Error> {
        let coordinates = place
            .coordinates
            .ok_or_else(|| WeatherError::Malformed("city lookup returned no coordinates".into()))?;

        Ok(Self { name: place.name, coordinates: coordinates.rounded() })
    }
}

/// Resolve free text to coordinates. Whitespace-only input yields `Ok(None)`.
pub async fn resolve_city(
    provider: &dyn WeatherProvider,
    query: &str,
) -> Result<Option<ResolvedCity>, WeatherError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(None);
    }

    let place = provider.fetch_current_by_city(query).await?;
    let city = ResolvedCity::try_from(place)?;
    tracing::debug!(query, name = %city.name, coords = %city.coordinates, "resolved city");

    Ok(Some(city))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProvider;

    #[test]
    fn lon_matches_london_case_insensitively() {
        assert_eq!(suggest("lon"), vec!["London, GB"]);
        assert_eq!(suggest("  LON "), vec!["London, GB"]);
    }

    #[test]
    fn no_match_and_blank_input_suggest_nothing() {
        assert!(suggest("zzz").is_empty());
        assert!(suggest("").is_empty());
        assert!(suggest("   ").is_empty());
    }

    #[test]
    fn suggestions_are_capped() {
        // Every preset carries a country code with a comma.
        let all = suggest(",");
        assert_eq!(all.len(), MAX_SUGGESTIONS);
        assert_eq!(all[0], "Philadelphia, US");
    }

    #[test]
    fn suggestions_keep_preset_order() {
        assert_eq!(suggest("vn"), vec!["Hanoi, VN", "Ho Chi Minh City, VN"]);
    }

    #[tokio::test]
    async fn blank_query_is_a_no_op() {
        let provider = FakeProvider::default();
        assert_eq!(resolve_city(&provider, "  ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn resolved_coordinates_are_rounded() {
        let provider = FakeProvider {
            city: Some(PlaceWeather {
                name: "London".into(),
                coordinates: Some(Coordinates::new(51.507_351_2, -0.127_758_3)),
                temperature_f: Some(55.0),
                condition: None,
            }),
            ..FakeProvider::default()
        };

        let city = resolve_city(&provider, "London, GB").await.unwrap().unwrap();
        assert_eq!(city.name, "London");
        assert_eq!(city.coordinates, Coordinates::new(51.50735, -0.12776));
    }

    #[tokio::test]
    async fn missing_coordinates_are_malformed() {
        let provider = FakeProvider {
            city: Some(PlaceWeather {
                name: "Atlantis".into(),
                coordinates: None,
                temperature_f: None,
                condition: None,
            }),
            ..FakeProvider::default()
        };

        let err = resolve_city(&provider, "Atlantis").await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[tokio::test]
    async fn provider_rejection_propagates() {
        let provider = FakeProvider::default();
        let err = resolve_city(&provider, "Nowhereville").await.unwrap_err();
        assert_eq!(err.provider_message(), Some("city not found"));
    }
}
