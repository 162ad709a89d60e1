//! Core library for the `citywx` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - OpenWeather geocoding and current-weather clients
//! - The persisted search history and the key-value slot behind it
//! - The search orchestrator that ties them together
//!
//! It is used by `citywx-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod model;
pub mod provider;
pub mod search;
pub mod store;

pub use config::Config;
pub use error::{HistoryError, SearchError, StoreError};
pub use history::{HISTORY_KEY, HistoryStore};
pub use model::{Coordinates, DisplayState, HistoryEntry, HistoryList, Location, WeatherSnapshot};
pub use provider::{Geocoder, OpenWeatherClient, WeatherSource};
pub use search::{SearchOutcome, Searcher};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Wire up a [`Searcher`] against OpenWeather and the on-disk history slot
/// described by `config`.
pub fn searcher_from_config(config: &Config) -> anyhow::Result<Searcher> {
    let client = OpenWeatherClient::from_config(config);
    let store = FileStore::new(config.data_dir()?);
    let searcher = Searcher::new(
        Box::new(client.clone()),
        Box::new(client),
        HistoryStore::new(Box::new(store)),
    )?;
    Ok(searcher)
}
