//! Search orchestration: geocode, fetch weather, record history.
//!
//! [`Searcher`] owns the state a presentation layer renders from. Each entry
//! point runs to completion; `clear` and `delete_history` hand back the
//! resulting [`DisplayState`], searches report a [`SearchOutcome`] and leave
//! the new state in [`Searcher::state`]. Calls take `&mut self`, so searches
//! never overlap.

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    error::{HistoryError, SearchError},
    history::HistoryStore,
    model::{DisplayState, HistoryEntry, HistoryList, Location, WeatherSnapshot},
    provider::{Geocoder, WeatherSource},
};

/// Result of one search as seen by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success(WeatherSnapshot),
    Error(SearchError),
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success(_))
    }
}

#[derive(Debug)]
pub struct Searcher {
    geocoder: Box<dyn Geocoder>,
    weather: Box<dyn WeatherSource>,
    history: HistoryStore,

    location: Location,
    snapshot: Option<WeatherSnapshot>,
    error: Option<SearchError>,
    entries: HistoryList,
}

impl Searcher {
    /// Build a searcher, loading the persisted history up front.
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        weather: Box<dyn WeatherSource>,
        history: HistoryStore,
    ) -> Result<Self, HistoryError> {
        let entries = history.list()?;
        Ok(Self {
            geocoder,
            weather,
            history,
            location: Location::default(),
            snapshot: None,
            error: None,
            entries,
        })
    }

    pub fn state(&self) -> DisplayState {
        DisplayState {
            location: self.location.clone(),
            weather: self.snapshot.clone(),
            error_message: self.error.map(|e| e.to_string()).unwrap_or_default(),
            history: self.entries.clone(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Update the location being composed without searching.
    pub fn set_location(&mut self, location: Location) -> DisplayState {
        self.location = location;
        self.state()
    }

    /// Search for the location currently being composed.
    pub async fn search_current(&mut self) -> Result<SearchOutcome, HistoryError> {
        let location = self.location.clone();
        self.search(location).await
    }

    /// Run one lookup for `location`.
    ///
    /// User-facing failures come back as [`SearchOutcome::Error`] and blank
    /// the display. `Err` is reserved for the history store failing after a
    /// successful lookup; location, snapshot and error are left as they were.
    pub async fn search(&mut self, location: Location) -> Result<SearchOutcome, HistoryError> {
        match self.lookup(&location).await {
            Ok(snapshot) => {
                let entry = HistoryEntry::new(&location, Utc::now());
                self.entries = self.history.append(entry)?;

                info!(query = %location.query(), condition = %snapshot.condition, "search succeeded");
                self.location = location;
                self.snapshot = Some(snapshot.clone());
                self.error = None;
                Ok(SearchOutcome::Success(snapshot))
            }
            Err(err) => {
                info!(query = %location.query(), error = %err, "search failed");
                self.fail(err);
                Ok(SearchOutcome::Error(err))
            }
        }
    }

    /// Re-run a past search with live lookups.
    pub async fn search_from_history(
        &mut self,
        entry: &HistoryEntry,
    ) -> Result<SearchOutcome, HistoryError> {
        self.search(entry.location()).await
    }

    /// Blank the display and the in-progress location. History is untouched.
    pub fn clear(&mut self) -> DisplayState {
        self.reset();
        self.error = None;
        self.state()
    }

    /// Delete the history entry at `index`; out of range is a no-op.
    pub fn delete_history(&mut self, index: usize) -> Result<DisplayState, HistoryError> {
        self.entries = self.history.remove_at(index)?;
        Ok(self.state())
    }

    async fn lookup(&self, location: &Location) -> Result<WeatherSnapshot, SearchError> {
        if location.city.trim().is_empty() {
            return Err(SearchError::MissingCity);
        }

        let query = location.query();
        let coords = self.geocoder.resolve(&query).await.map_err(|e| {
            debug!(query = %query, error = ?e, "geocoding failed");
            SearchError::NotFound
        })?;

        self.weather.fetch_current(coords).await.map_err(|e| {
            debug!(lat = coords.lat, lon = coords.lon, error = ?e, "weather lookup failed");
            SearchError::LookupFailed
        })
    }

    fn fail(&mut self, err: SearchError) {
        self.reset();
        self.error = Some(err);
    }

    fn reset(&mut self) {
        self.snapshot = None;
        self.location = Location::default();
    }
}
