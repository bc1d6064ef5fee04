use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use skycheck_core::{
    CITY_PRESETS, Config, ConfiguredLocation, Coordinates, Event, Session, WeatherError,
    provider_from_config, suggest,
    tiles::{MAX_ZOOM, Tile, TileLayer},
};

use crate::{prompt, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycheck", version, about = "Weather now, next hour and next two days")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct CoordArgs {
    /// Latitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,
}

impl CoordArgs {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.lat?, self.lon?))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional default location.
    Configure {
        #[command(flatten)]
        coords: CoordArgs,

        /// Never use the default location automatically.
        #[arg(long, conflicts_with = "allow_location")]
        deny_location: bool,

        /// Use the default location again after an earlier `--deny-location`.
        #[arg(long)]
        allow_location: bool,
    },

    /// Show weather for coordinates, or for the default location.
    Show {
        #[command(flatten)]
        coords: CoordArgs,
    },

    /// Look up a city by name and show its weather.
    Search {
        /// City name, e.g. "London, GB". Prompts with suggestions when omitted.
        city: Option<String>,
    },

    /// List preset cities matching the given text.
    Suggest { text: String },

    /// Print map overlay tile URLs around a location.
    Tiles {
        #[command(flatten)]
        coords: CoordArgs,

        /// Map zoom level.
        #[arg(
            long,
            default_value_t = 6,
            value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_ZOOM))
        )]
        zoom: u8,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { coords, deny_location, allow_location } => {
                let location = match (allow_location, deny_location) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                configure(coords, location)
            }
            Command::Show { coords } => show(coords).await,
            Command::Search { city } => search(city).await,
            Command::Suggest { text } => {
                let matches = suggest(&text);
                if matches.is_empty() {
                    println!("No matching cities.");
                }
                for city in matches {
                    println!("{city}");
                }
                Ok(())
            }
            Command::Tiles { coords, zoom } => tiles(coords, zoom),
        }
    }
}

fn configure(coords: CoordArgs, allow_location: Option<bool>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = prompt::api_key()?;
    if !key.trim().is_empty() {
        config.set_api_key(key);
    }
    apply_location_flags(&mut config, coords, allow_location);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Only flags the user passed change the stored location settings.
fn apply_location_flags(config: &mut Config, coords: CoordArgs, allow_location: Option<bool>) {
    if let Some(coords) = coords.coordinates() {
        config.default_location = Some(coords);
    }
    if let Some(allow) = allow_location {
        config.allow_location = allow;
    }
}

async fn show(coords: CoordArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut session = new_session(&config)?;

    match coords.coordinates() {
        Some(coords) => session.dispatch(Event::CoordinatesSubmitted(coords)).await,
        None => session.start(&ConfiguredLocation::from_config(&config)).await,
    }

    print!("{}", render::report(session.state()));
    Ok(())
}

async fn search(city: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut session = new_session(&config)?;

    let city = match city {
        Some(city) => city,
        None => prompt::city().context("City prompt failed")?,
    };

    if CITY_PRESETS.contains(&city.as_str()) {
        session.dispatch(Event::SuggestionSelected(city)).await;
    } else {
        session.dispatch(Event::CityQueryChanged(city)).await;
        session.dispatch(Event::CitySearchSubmitted).await;
    }

    print!("{}", render::report(session.state()));
    Ok(())
}

fn tiles(coords: CoordArgs, zoom: u8) -> anyhow::Result<()> {
    let config = Config::load()?;
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;

    let center = coords.coordinates().or(config.default_location).unwrap_or_default();
    let tile = Tile::containing(center, zoom);

    println!("Tiles at zoom {} for {center} (x={}, y={}):", tile.zoom, tile.x, tile.y);
    for layer in TileLayer::all() {
        println!("  {:<18} {}", layer.to_string(), layer.tile_url(tile, &api_key));
    }
    println!("Templates:");
    for layer in TileLayer::all() {
        println!("  {:<18} {}", layer.to_string(), layer.url_template(&api_key));
    }
    Ok(())
}

fn new_session(config: &Config) -> anyhow::Result<Session> {
    let provider = provider_from_config(config)?;
    tracing::debug!(default_location = ?config.default_location, "starting session");
    Ok(Session::new(provider, config.default_location.unwrap_or_default()))
}
