//! Client orchestrator: UI-facing state, events, a pure reducer, and the
//! async controller that drives search → select → fetch → display → persist.
//!
//! Every issued search or forecast fetch carries a generation number;
//! completion events whose generation is no longer current are discarded,
//! so a superseded in-flight request can never overwrite newer state.

use std::mem;

use tracing::{info, warn};

use crate::location::{locate, LocationError, LocationSource};
use crate::model::{ForecastBundle, PlaceCandidate, SavedPlace, Theme, Units};
use crate::service::WeatherService;
use crate::store::PrefsStore;

/// Cap on the persisted saved-places list.
pub const MAX_SAVED: usize = 12;

/// Informational message for a successful search with zero matches.
pub const NO_RESULTS_MSG: &str = "No results found. Try: Lagos,NG or Abuja,NG";

const DEFAULT_QUERY: &str = "Abuja,NG";

/// Session state owned by the orchestrator. `theme` and `saved_places`
/// persist across sessions; everything else resets as the user acts.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub query: String,
    pub units: Units,
    pub theme: Theme,
    pub search_results: Vec<PlaceCandidate>,
    pub selected_place: Option<PlaceCandidate>,
    pub forecast: Option<ForecastBundle>,
    pub saved_places: Vec<SavedPlace>,
    pub loading: bool,
    pub error: Option<String>,
    /// Generation of the most recently issued request.
    pub generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            units: Units::default(),
            theme: Theme::default(),
            search_results: Vec::new(),
            selected_place: None,
            forecast: None,
            saved_places: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

/// Everything that can change the state. Started events stamp a new
/// generation; completion events echo the generation of the request that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SearchStarted {
        generation: u64,
        query: String,
    },
    SearchSucceeded {
        generation: u64,
        results: Vec<PlaceCandidate>,
    },
    SearchFailed {
        generation: u64,
        message: String,
    },
    FetchStarted {
        generation: u64,
        place: PlaceCandidate,
    },
    FetchSucceeded {
        generation: u64,
        forecast: Box<ForecastBundle>,
        save: bool,
    },
    FetchFailed {
        generation: u64,
        message: String,
    },
    UnitsChanged {
        units: Units,
    },
    ThemeSet {
        theme: Theme,
    },
    PlaceSaved {
        place: SavedPlace,
    },
    PlaceRemoved {
        place: SavedPlace,
    },
    /// A failure that did not come from an issued request, e.g. geolocation.
    ErrorRaised {
        message: String,
    },
}

/// Pure state transition. Completion events for a superseded generation
/// leave the state untouched.
#[must_use]
pub fn reduce(mut state: AppState, event: Event) -> AppState {
    match event {
        Event::SearchStarted { generation, query } => {
            state.generation = generation;
            state.query = query;
            state.loading = true;
            state.error = None;
            state.search_results.clear();
            state.selected_place = None;
            state.forecast = None;
        }
        Event::SearchSucceeded { generation, results } => {
            if generation == state.generation {
                state.loading = false;
                state.error = results.is_empty().then(|| NO_RESULTS_MSG.to_string());
                state.search_results = results;
            }
        }
        Event::SearchFailed { generation, message } => {
            if generation == state.generation {
                state.loading = false;
                state.error = Some(message);
            }
        }
        Event::FetchStarted { generation, place } => {
            state.generation = generation;
            state.loading = true;
            state.error = None;
            state.selected_place = Some(place);
            state.forecast = None;
        }
        Event::FetchSucceeded { generation, forecast, save } => {
            if generation == state.generation {
                state.loading = false;
                state.forecast = Some(*forecast);
                if save {
                    if let Some(place) = state.selected_place.clone() {
                        state.saved_places = insert_saved(state.saved_places, place);
                    }
                }
            }
        }
        Event::FetchFailed { generation, message } => {
            if generation == state.generation {
                state.loading = false;
                state.error = Some(message);
            }
        }
        Event::UnitsChanged { units } => {
            state.units = units;
        }
        Event::ThemeSet { theme } => {
            state.theme = theme;
        }
        Event::PlaceSaved { place } => {
            state.saved_places = insert_saved(state.saved_places, place);
        }
        Event::PlaceRemoved { place } => {
            state.saved_places.retain(|p| !p.same_spot(&place));
        }
        Event::ErrorRaised { message } => {
            state.loading = false;
            state.error = Some(message);
        }
    }
    state
}

/// Insert at the front unless the coordinates are already present; cap at
/// [`MAX_SAVED`] dropping the oldest.
fn insert_saved(mut places: Vec<SavedPlace>, place: SavedPlace) -> Vec<SavedPlace> {
    if places.iter().any(|p| p.same_spot(&place)) {
        return places;
    }
    places.insert(0, place);
    places.truncate(MAX_SAVED);
    places
}

/// Async controller owning the state, the service, and the preference store.
pub struct App {
    state: AppState,
    service: WeatherService,
    store: PrefsStore,
}

impl App {
    /// Build the controller, restoring persisted theme and saved places.
    #[must_use]
    pub fn new(service: WeatherService, store: PrefsStore) -> Self {
        let state = AppState {
            theme: store.load_theme(),
            saved_places: store.load_saved_places(),
            ..AppState::default()
        };
        Self { state, service, store }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn apply(&mut self, event: Event) {
        self.state = reduce(mem::take(&mut self.state), event);
    }

    fn next_generation(&self) -> u64 {
        self.state.generation + 1
    }

    /// Geocode a query and show the candidates.
    pub async fn search(&mut self, query: &str) -> &AppState {
        let generation = self.next_generation();
        self.apply(Event::SearchStarted {
            generation,
            query: query.to_string(),
        });

        match self.service.geocode(query).await {
            Ok(results) => {
                info!(query, count = results.len(), "search completed");
                self.apply(Event::SearchSucceeded { generation, results });
            }
            Err(err) => {
                self.apply(Event::SearchFailed {
                    generation,
                    message: err.to_string(),
                });
            }
        }

        &self.state
    }

    /// Fetch the forecast for a candidate under the current units, optionally
    /// saving the place on success.
    pub async fn select(&mut self, place: PlaceCandidate, auto_save: bool) -> &AppState {
        let generation = self.next_generation();
        let (lat, lon) = (place.lat, place.lon);
        self.apply(Event::FetchStarted { generation, place });

        match self.service.forecast(lat, lon, self.state.units).await {
            Ok(forecast) => {
                self.apply(Event::FetchSucceeded {
                    generation,
                    forecast: Box::new(forecast),
                    save: auto_save,
                });
                if auto_save {
                    self.persist_places();
                }
            }
            Err(err) => {
                self.apply(Event::FetchFailed {
                    generation,
                    message: err.to_string(),
                });
            }
        }

        &self.state
    }

    /// Resolve the user's position, reverse geocode it, and select the
    /// resulting place with auto-save. `None` means the host environment has
    /// no geolocation capability at all.
    pub async fn use_my_location(&mut self, source: Option<&dyn LocationSource>) -> &AppState {
        let Some(source) = source else {
            self.apply(Event::ErrorRaised {
                message: LocationError::Unsupported.to_string(),
            });
            return &self.state;
        };

        match locate(source).await {
            Ok(coords) => {
                let place = self.service.place_for_position(coords.lat, coords.lon).await;
                self.select(place, true).await
            }
            Err(err) => {
                self.apply(Event::ErrorRaised {
                    message: err.to_string(),
                });
                &self.state
            }
        }
    }

    /// Switch unit systems. With a place selected this refetches the
    /// forecast for the same coordinates; temperatures are never converted
    /// client-side.
    pub async fn change_units(&mut self, units: Units) -> &AppState {
        self.apply(Event::UnitsChanged { units });

        if let Some(place) = self.state.selected_place.clone() {
            self.select(place, false).await;
        }

        &self.state
    }

    pub fn save_place(&mut self, place: SavedPlace) -> &AppState {
        self.apply(Event::PlaceSaved { place });
        self.persist_places();
        &self.state
    }

    pub fn remove_saved(&mut self, place: &SavedPlace) -> &AppState {
        self.apply(Event::PlaceRemoved { place: place.clone() });
        self.persist_places();
        &self.state
    }

    pub fn toggle_theme(&mut self) -> &AppState {
        let theme = self.state.theme.toggled();
        self.apply(Event::ThemeSet { theme });
        if let Err(err) = self.store.save_theme(theme) {
            warn!(%err, "failed to persist theme preference");
        }
        &self.state
    }

    fn persist_places(&self) {
        if let Err(err) = self.store.save_places(&self.state.saved_places) {
            warn!(%err, "failed to persist saved places");
        }
    }
}
