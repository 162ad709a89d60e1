use crate::model::{Coordinates, WeatherSnapshot};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Free-text place → coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// First candidate for `query`. Any failure, including no candidates, is an error.
    async fn resolve(&self, query: &str) -> anyhow::Result<Coordinates>;
}

/// Coordinates → current conditions.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current(&self, coords: Coordinates) -> anyhow::Result<WeatherSnapshot>;
}
