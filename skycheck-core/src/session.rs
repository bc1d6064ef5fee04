//! Runs [`AppState`] effects against a provider.

use crate::{
    city::resolve_city,
    fetch::fetch_snapshot,
    location::LocationSource,
    model::Coordinates,
    provider::WeatherProvider,
    state::{AppState, Effect, Event},
};

#[derive(Debug)]
pub struct Session {
    provider: Box<dyn WeatherProvider>,
    state: AppState,
}

impl Session {
    pub fn new(provider: Box<dyn WeatherProvider>, coordinates: Coordinates) -> Self {
        Self { provider, state: AppState::new(coordinates) }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Startup: ask for a position and, if one is granted, load a snapshot for it.
    pub async fn start(&mut self, location: &dyn LocationSource) {
        let event = match location.current_position().await {
            Ok(coords) => Event::LocationResolved(coords),
            Err(err) => Event::LocationFailed(err),
        };
        self.dispatch(event).await;
    }

    /// Apply `event` and run every follow-up effect to completion.
    pub async fn dispatch(&mut self, event: Event) {
        let mut next = self.state.apply(event);

        while let Some(effect) = next {
            next = match self.run(effect).await {
                Some(event) => self.state.apply(event),
                None => None,
            };
        }
    }

    async fn run(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::FetchSnapshot { coords, generation } => {
                Some(match fetch_snapshot(self.provider.as_ref(), coords).await {
                    Ok(snapshot) => Event::SnapshotLoaded { generation, snapshot },
                    Err(error) => Event::SnapshotFailed { generation, error },
                })
            }
            Effect::ResolveCity(query) => match resolve_city(self.provider.as_ref(), &query).await {
                Ok(Some(city)) => Some(Event::CityResolved(city)),
                Ok(None) => None,
                Err(error) => Some(Event::CitySearchFailed(error)),
            },
        }
    }
}
