use std::fmt;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};

use skycast_core::{
    App, Config, Coordinates, LocationError, LocationSource, PlaceCandidate, PrefsStore, Units,
    WeatherService,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Search places worldwide and view their weather")]
pub struct Cli {
    /// Unit system for temperatures and wind speed.
    #[arg(long, value_enum, default_value_t = UnitsOpt::Metric, global = true)]
    pub units: UnitsOpt,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Search for a place and browse its forecast.
    Search {
        /// Place query, e.g. "Lagos,NG". Prompted for when omitted.
        query: Option<String>,
    },

    /// Show the forecast for a position, reverse-geocoding its name.
    Here {
        /// Latitude of the position.
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        /// Longitude of the position.
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },

    /// Browse, view, or remove saved places.
    Places,

    /// Toggle the persisted light/dark theme.
    Theme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitsOpt {
    Metric,
    Imperial,
}

impl From<UnitsOpt> for Units {
    fn from(opt: UnitsOpt) -> Self {
        match opt {
            UnitsOpt::Metric => Units::Metric,
            UnitsOpt::Imperial => Units::Imperial,
        }
    }
}

impl fmt::Display for UnitsOpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitsOpt::Metric => f.write_str("metric"),
            UnitsOpt::Imperial => f.write_str("imperial"),
        }
    }
}

/// Candidate wrapper so `Select` renders a friendly label.
struct PlaceOption(PlaceCandidate);

impl fmt::Display for PlaceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  [{:.3}, {:.3}]",
            self.0.label(),
            self.0.lat,
            self.0.lon
        )
    }
}

/// A position handed in on the command line, standing in for a platform
/// geolocation service.
struct FixedPosition(Coordinates);

#[async_trait::async_trait]
impl LocationSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let units = Units::from(self.units);

        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Search { query }) => {
                let mut app = build_app()?;
                sync_units(&mut app, units).await;
                search_session(&mut app, query).await
            }
            None => {
                let mut app = build_app()?;
                sync_units(&mut app, units).await;
                search_session(&mut app, None).await
            }
            Some(Command::Here { lat, lon }) => {
                let mut app = build_app()?;
                sync_units(&mut app, units).await;
                here(&mut app, lat, lon).await
            }
            Some(Command::Places) => {
                let mut app = build_app()?;
                sync_units(&mut app, units).await;
                places(&mut app).await
            }
            Some(Command::Theme) => {
                let mut app = build_app()?;
                let state = app.toggle_theme();
                println!("Theme is now {}.", state.theme);
                Ok(())
            }
        }
    }
}

fn build_app() -> anyhow::Result<App> {
    let config = Config::load().context("Failed to load configuration")?;
    let service = WeatherService::from_config(&config)?;
    let store = PrefsStore::open()?;
    Ok(App::new(service, store))
}

async fn sync_units(app: &mut App, units: Units) {
    if app.state().units != units {
        app.change_units(units).await;
    }
}

fn configure() -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let mut config = Config::load().context("Failed to load configuration")?;
    config.set_api_key(api_key);
    config.save()?;

    println!("Saved to {}.", Config::config_file_path()?.display());
    Ok(())
}

/// Search → pick a candidate → forecast → action loop.
async fn search_session(app: &mut App, query: Option<String>) -> anyhow::Result<()> {
    let mut query = match query {
        Some(q) => q,
        None => {
            let initial = app.state().query.clone();
            Text::new("Place to search:")
                .with_initial_value(&initial)
                .prompt()?
        }
    };

    loop {
        let state = app.search(&query).await;

        if let Some(error) = &state.error {
            println!("{error}");
        }
        if state.search_results.is_empty() {
            return Ok(());
        }

        let options: Vec<PlaceOption> = state
            .search_results
            .iter()
            .cloned()
            .map(PlaceOption)
            .collect();
        let picked = Select::new("Pick a place:", options).prompt()?;

        app.select(picked.0, false).await;
        render::state(app.state());

        match action_loop(app).await? {
            Next::NewSearch => {
                query = Text::new("Place to search:").prompt()?;
            }
            Next::Quit => return Ok(()),
        }
    }
}

enum Next {
    NewSearch,
    Quit,
}

/// Post-forecast actions on the currently selected place.
async fn action_loop(app: &mut App) -> anyhow::Result<Next> {
    const TOGGLE_UNITS: &str = "Toggle units";
    const SAVE_PLACE: &str = "Save place";
    const NEW_SEARCH: &str = "New search";
    const QUIT: &str = "Quit";

    loop {
        let choice = Select::new(
            "What next?",
            vec![TOGGLE_UNITS, SAVE_PLACE, NEW_SEARCH, QUIT],
        )
        .prompt()?;

        match choice {
            TOGGLE_UNITS => {
                let units = app.state().units.toggled();
                app.change_units(units).await;
                render::state(app.state());
            }
            SAVE_PLACE => {
                if let Some(place) = app.state().selected_place.clone() {
                    let state = app.save_place(place);
                    println!("Saved ({} of 12 slots used).", state.saved_places.len());
                }
            }
            NEW_SEARCH => return Ok(Next::NewSearch),
            _ => return Ok(Next::Quit),
        }
    }
}

/// The "use my location" flow. Without an explicit position the host has no
/// geolocation capability and the orchestrator reports it as such.
async fn here(app: &mut App, lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<()> {
    let position = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(FixedPosition(Coordinates { lat, lon })),
        _ => None,
    };

    let state = app
        .use_my_location(position.as_ref().map(|p| p as &dyn LocationSource))
        .await;

    if let Some(error) = &state.error {
        println!("{error}");
        if position.is_none() {
            println!("Hint: pass --lat and --lon to supply a position.");
        }
        return Ok(());
    }

    render::state(state);
    Ok(())
}

/// Browse saved places: view one, or remove entries.
async fn places(app: &mut App) -> anyhow::Result<()> {
    if app.state().saved_places.is_empty() {
        println!("No saved places yet. Save one from `skycast search`.");
        return Ok(());
    }

    let options: Vec<PlaceOption> = app
        .state()
        .saved_places
        .iter()
        .cloned()
        .map(PlaceOption)
        .collect();
    let picked = Select::new("Saved places:", options).prompt()?;

    let remove = Confirm::new("Remove this place instead of viewing it?")
        .with_default(false)
        .prompt()?;

    if remove {
        let state = app.remove_saved(&picked.0);
        println!("Removed. {} place(s) left.", state.saved_places.len());
        return Ok(());
    }

    app.select(picked.0, false).await;
    render::state(app.state());
    Ok(())
}
