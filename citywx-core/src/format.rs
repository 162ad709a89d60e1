use chrono::{DateTime, Local, TimeZone};

use crate::model::{DisplayState, HistoryEntry, WeatherSnapshot};

/// `City, CC` with the country upper-cased, `City` alone, or empty.
pub fn city_country(city: &str, country: &str) -> String {
    match (city.is_empty(), country.is_empty()) {
        (true, _) => String::new(),
        (false, true) => city.to_string(),
        (false, false) => format!("{}, {}", city, country.to_uppercase()),
    }
}

/// Weather panel: place label, headline and the detail table.
pub fn format_weather<Tz: TimeZone>(
    label: &str,
    weather: &WeatherSnapshot,
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut output = String::new();
    if !label.is_empty() {
        output.push_str(&format!("{label}\n"));
    }
    output.push_str(&format!(
        "{}\n  Description: {}\n  Temperature: {}\u{00b0}C ~ {}\u{00b0}C\n  Humidity: {}%\n  Time: {}\n",
        weather.condition,
        weather.description,
        weather.temp_min,
        weather.temp_max,
        weather.humidity,
        now.format("%Y-%m-%d %-I:%M:%S %p"),
    ));
    output
}

/// Numbered history list, 1-based as shown to the user.
pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No search history.\n".to_string();
    }

    let mut output = String::new();
    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!("{}\n", history_line(i, entry)));
    }
    output
}

pub fn history_line(index: usize, entry: &HistoryEntry) -> String {
    let at = entry.searched_at.with_timezone(&Local);
    format!(
        "{}. {}  {}",
        index + 1,
        city_country(&entry.city, &entry.country),
        at.format("%-I:%M:%S %p"),
    )
}

/// Full render of a display state: weather panel (if any), then the error.
pub fn format_display(state: &DisplayState) -> String {
    let mut output = String::new();
    if let Some(weather) = &state.weather {
        let label = city_country(&state.location.city, &state.location.country);
        output.push_str(&format_weather(&label, weather, &Local::now()));
    }
    if !state.error_message.is_empty() {
        output.push_str(&format!("{}\n", state.error_message));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use chrono::Utc;

    fn clouds() -> WeatherSnapshot {
        WeatherSnapshot {
            condition: "Clouds".into(),
            description: "overcast clouds".into(),
            temp_min: 10.0,
            temp_max: 14.5,
            humidity: 80.0,
        }
    }

    #[test]
    fn city_country_variants() {
        assert_eq!(city_country("London", "gb"), "London, GB");
        assert_eq!(city_country("London", ""), "London");
        assert_eq!(city_country("", "GB"), "");
    }

    #[test]
    fn weather_panel_layout() {
        let now = Utc.with_ymd_and_hms(2024, 7, 4, 15, 5, 9).unwrap();
        let text = format_weather("London, GB", &clouds(), &now);

        assert_eq!(
            text,
            "London, GB\nClouds\n  Description: overcast clouds\n  Temperature: 10\u{00b0}C ~ 14.5\u{00b0}C\n  Humidity: 80%\n  Time: 2024-07-04 3:05:09 PM\n"
        );
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(format_history(&[]), "No search history.\n");
    }

    #[test]
    fn history_lines_are_numbered_from_one() {
        let entries = vec![
            HistoryEntry::new(&Location::new("Rome", "it"), Utc::now()),
            HistoryEntry::new(&Location::new("Lima", ""), Utc::now()),
        ];
        let text = format_history(&entries);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("1. Rome, IT  "));
        assert!(lines[1].starts_with("2. Lima  "));
    }

    #[test]
    fn display_shows_only_error_when_blank() {
        let state = DisplayState {
            error_message: "Not Found".into(),
            ..DisplayState::default()
        };

        assert_eq!(format_display(&state), "Not Found\n");
    }

    #[test]
    fn display_with_weather_includes_label() {
        let state = DisplayState {
            location: Location::new("Oslo", "no"),
            weather: Some(clouds()),
            ..DisplayState::default()
        };

        let text = format_display(&state);
        assert!(text.starts_with("Oslo, NO\nClouds\n"));
    }
}
