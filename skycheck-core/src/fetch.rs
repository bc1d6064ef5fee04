//! Snapshot operation: one forecast bundle plus the place name for a coordinate.

use crate::{
    error::WeatherError,
    model::{Coordinates, ForecastBundle, Snapshot},
    provider::WeatherProvider,
};

/// Hourly points kept from a bundle.
pub const HOURLY_LIMIT: usize = 48;

impl Snapshot {
    pub fn from_bundle(bundle: ForecastBundle, location_name: String) -> Self {
        let mut hourly = bundle.hourly;
        hourly.truncate(HOURLY_LIMIT);

        Self {
            location_name,
            timezone_offset_secs: bundle.timezone_offset_secs,
            current: bundle.current,
            hourly,
            minutely: bundle.minutely,
        }
    }
}

/// Issue the bundle and name lookups in parallel and combine them.
///
/// A provider rejection of the name lookup only blanks the name; any other
/// failure fails the whole snapshot. No retry is attempted.
pub async fn fetch_snapshot(
    provider: &dyn WeatherProvider,
    coords: Coordinates,
) -> Result<Snapshot, WeatherError> {
    let (bundle, place) =
        tokio::join!(provider.fetch_bundle(coords), provider.fetch_current_at(coords));

    let bundle = bundle?;
    let location_name = match place {
        Ok(place) => place.name,
        Err(err @ WeatherError::Provider { .. }) => {
            tracing::warn!(error = %err, "place name lookup failed; continuing without a name");
            String::new()
        }
        Err(err) => return Err(err),
    };

    Ok(Snapshot::from_bundle(bundle, location_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeProvider, hourly_points};

    #[tokio::test]
    async fn hourly_is_capped_at_48() {
        let provider = FakeProvider {
            bundle: Some(ForecastBundle { hourly: hourly_points(60), ..ForecastBundle::default() }),
            ..FakeProvider::default()
        };

        let snapshot = fetch_snapshot(&provider, Coordinates::default()).await.unwrap();
        assert_eq!(snapshot.hourly.len(), HOURLY_LIMIT);
        assert_eq!(snapshot.hourly[0], hourly_points(1)[0]);
        assert_eq!(snapshot.location_name, "Radnor");
    }

    #[tokio::test]
    async fn empty_bundle_is_not_an_error() {
        let provider =
            FakeProvider { bundle: Some(ForecastBundle::default()), ..FakeProvider::default() };

        let snapshot = fetch_snapshot(&provider, Coordinates::default()).await.unwrap();
        assert_eq!(snapshot.current, None);
        assert!(snapshot.hourly.is_empty());
        assert!(snapshot.minutely.is_empty());
    }

    #[tokio::test]
    async fn rejected_name_lookup_blanks_name() {
        let provider = FakeProvider {
            bundle: Some(ForecastBundle::default()),
            place_name: None,
            ..FakeProvider::default()
        };

        let snapshot = fetch_snapshot(&provider, Coordinates::default()).await.unwrap();
        assert_eq!(snapshot.location_name, "");
    }

    #[tokio::test]
    async fn bundle_failure_fails_snapshot() {
        let provider = FakeProvider { bundle: None, ..FakeProvider::default() };

        let err = fetch_snapshot(&provider, Coordinates::default()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }
}
