use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// City/country pair being composed for a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    /// Two-letter country code, or empty for "any country".
    pub country: String,
}

impl Location {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        let city: String = city.into();
        let country: String = country.into();
        Self {
            city: city.trim().to_string(),
            country: country.trim().to_string(),
        }
    }

    /// Query text sent to the geocoder: `city,country`, or just `city`.
    pub fn query(&self) -> String {
        if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{},{}", self.city, self.country)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions from the most recent successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub condition: String,
    pub description: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
}

/// One past successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub city: String,
    pub country: String,
    #[serde(rename = "date")]
    pub searched_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(location: &Location, searched_at: DateTime<Utc>) -> Self {
        Self {
            city: location.city.clone(),
            country: location.country.clone(),
            searched_at,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.city.as_str(), self.country.as_str())
    }
}

pub type HistoryList = Vec<HistoryEntry>;

/// Everything the presentation layer needs to render after an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub location: Location,
    pub weather: Option<WeatherSnapshot>,
    /// Empty when there is nothing to report.
    pub error_message: String,
    pub history: HistoryList,
}
