use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    Config,
    model::{Coordinates, WeatherSnapshot},
};

use super::{Geocoder, WeatherSource};

/// Geocoding candidates requested per lookup; only the first is used.
const GEOCODE_LIMIT: &str = "5";

/// OpenWeather geocoding + current-weather client.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    geocode_url: String,
    weather_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: impl Into<String>,
        geocode_url: impl Into<String>,
        weather_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            geocode_url: geocode_url.into(),
            weather_url: weather_url.into(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key(), config.geocode_url(), config.weather_url())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request to OpenWeather"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoCandidate {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    weather: Vec<OwCondition>,
    main: OwMain,
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn resolve(&self, query: &str) -> Result<Coordinates> {
        let candidates: Vec<OwGeoCandidate> = self
            .get_json(
                &self.geocode_url,
                &[
                    ("q", query),
                    ("limit", GEOCODE_LIMIT),
                    ("appid", self.api_key.as_str()),
                ],
                "geocoding",
            )
            .await?;

        debug!(query, candidates = candidates.len(), "geocoding response");

        let first = candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather geocoding returned no candidates for '{query}'"))?;

        Ok(Coordinates {
            lat: first.lat,
            lon: first.lon,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        let lat = coords.lat.to_string();
        let lon = coords.lon.to_string();

        let parsed: OwCurrentResponse = self
            .get_json(
                &self.weather_url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("units", "metric"),
                    ("appid", self.api_key.as_str()),
                ],
                "current weather",
            )
            .await?;

        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather current response contained no conditions"))?;

        Ok(WeatherSnapshot {
            condition: condition.main,
            description: condition.description,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            humidity: parsed.main.humidity,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
