use anyhow::{Context, Result, anyhow};
use citywx_core::{
    Config, DisplayState, Location, SearchOutcome, Searcher,
    format::{format_display, format_history, history_line},
    searcher_from_config,
};
use clap::{Parser, Subcommand};
use inquire::{CustomUserError, InquireError, Password, Select, Text, validator::Validation};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citywx", version, about = "Current weather by city, with search history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city.
    Search {
        /// City name.
        city: String,

        /// Optional two-letter country code.
        #[arg(long, short, default_value = "", value_parser = parse_country)]
        country: String,
    },

    /// List past searches.
    History,

    /// Re-run the search at a history position (1-based).
    Replay { position: usize },

    /// Delete the search at a history position (1-based).
    Delete { position: usize },

    /// Prompt-driven session: search, clear, replay and delete.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { city, country } => {
                let mut searcher = open_searcher()?;
                let outcome = searcher.search(Location::new(city, country)).await?;
                print_outcome(&searcher.state(), &outcome);
                Ok(())
            }
            Command::History => {
                let searcher = open_searcher()?;
                print!("{}", format_history(&searcher.state().history));
                Ok(())
            }
            Command::Replay { position } => {
                let mut searcher = open_searcher()?;
                let index = to_index(position)?;
                let entry = searcher
                    .state()
                    .history
                    .get(index)
                    .cloned()
                    .ok_or_else(|| anyhow!("No history entry at position {position}"))?;
                let outcome = searcher.search_from_history(&entry).await?;
                print_outcome(&searcher.state(), &outcome);
                Ok(())
            }
            Command::Delete { position } => {
                let mut searcher = open_searcher()?;
                let state = searcher.delete_history(to_index(position)?)?;
                print!("{}", format_history(&state.history));
                Ok(())
            }
            Command::Interactive => interactive(open_searcher()?).await,
        }
    }
}

/// Empty, or exactly two ASCII letters.
fn parse_country(value: &str) -> Result<String, String> {
    let value = value.trim();
    if is_valid_country(value) {
        Ok(value.to_string())
    } else {
        Err("country must be a two-letter code".to_string())
    }
}

fn is_valid_country(value: &str) -> bool {
    value.is_empty() || (value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()))
}

fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("History positions start at 1"))
}

fn load_config() -> Result<Config> {
    Ok(Config::load()?.with_env())
}

fn open_searcher() -> Result<Searcher> {
    let config = load_config()?;
    if !config.is_api_key_configured() {
        tracing::warn!(
            "No OpenWeather API key configured; set OPEN_WEATHER_KEY or run `citywx configure`"
        );
    }
    searcher_from_config(&config).context("Failed to open search history")
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;
    let key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_outcome(state: &DisplayState, outcome: &SearchOutcome) {
    print!("{}", format_display(state));
    if let SearchOutcome::Error(err) = outcome {
        tracing::debug!(%err, "search ended without weather");
    }
}

const SEARCH: &str = "Search";
const CLEAR: &str = "Clear";
const REPLAY: &str = "Search from history";
const DELETE: &str = "Delete from history";
const QUIT: &str = "Quit";

async fn interactive(mut searcher: Searcher) -> Result<()> {
    loop {
        let action = match Select::new("What next?", vec![SEARCH, CLEAR, REPLAY, DELETE, QUIT])
            .prompt()
        {
            Ok(action) => action,
            Err(e) if is_cancel(&e) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let state = match action {
            SEARCH => {
                let Some(location) = prompt_location(searcher.location())? else {
                    continue;
                };
                searcher.search(location).await?;
                searcher.state()
            }
            CLEAR => searcher.clear(),
            REPLAY => {
                let Some(index) = pick_history(&searcher.state(), "Search again:")? else {
                    continue;
                };
                let entry = searcher.state().history[index].clone();
                searcher.search_from_history(&entry).await?;
                searcher.state()
            }
            DELETE => {
                let Some(index) = pick_history(&searcher.state(), "Delete:")? else {
                    continue;
                };
                searcher.delete_history(index)?
            }
            _ => return Ok(()),
        };

        render(&state);
    }
}

fn render(state: &DisplayState) {
    let panel = format_display(state);
    if !panel.is_empty() {
        println!("{panel}");
    }
    println!("Search History");
    print!("{}", format_history(&state.history));
}

/// `None` when the user backs out of the prompt.
fn prompt_location(current: &Location) -> Result<Option<Location>> {
    let city = match Text::new("City:").with_initial_value(&current.city).prompt() {
        Ok(city) => city,
        Err(e) if is_cancel(&e) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let country = match Text::new("Country:")
        .with_initial_value(&current.country)
        .with_help_message("Two-letter code, blank for any")
        .with_validator(|value: &str| -> Result<Validation, CustomUserError> {
            if is_valid_country(value.trim()) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Country must be two letters".into()))
            }
        })
        .prompt()
    {
        Ok(country) => country,
        Err(e) if is_cancel(&e) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    Ok(Some(Location::new(city, country)))
}

fn pick_history(state: &DisplayState, message: &str) -> Result<Option<usize>> {
    if state.history.is_empty() {
        println!("No search history.");
        return Ok(None);
    }

    let labels: Vec<String> = state
        .history
        .iter()
        .enumerate()
        .map(|(i, entry)| history_line(i, entry))
        .collect();

    match Select::new(message, labels).raw_prompt() {
        Ok(choice) => Ok(Some(choice.index)),
        Err(e) if is_cancel(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_parses_city_and_country() {
        let cli = Cli::try_parse_from(["citywx", "search", "London", "--country", "gb"]).unwrap();
        match cli.command {
            Command::Search { city, country } => {
                assert_eq!(city, "London");
                assert_eq!(country, "gb");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_country_defaults_to_blank() {
        let cli = Cli::try_parse_from(["citywx", "search", "Lima"]).unwrap();
        assert!(matches!(cli.command, Command::Search { ref country, .. } if country.is_empty()));
    }

    #[test]
    fn search_rejects_long_country() {
        assert!(Cli::try_parse_from(["citywx", "search", "Paris", "-c", "FRA"]).is_err());
        assert!(Cli::try_parse_from(["citywx", "search", "Paris", "-c", "F1"]).is_err());
    }

    #[test]
    fn replay_and_delete_take_positions() {
        let cli = Cli::try_parse_from(["citywx", "replay", "2"]).unwrap();
        assert!(matches!(cli.command, Command::Replay { position: 2 }));

        let cli = Cli::try_parse_from(["citywx", "delete", "1"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { position: 1 }));
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert!(to_index(0).is_err());
    }

    #[test]
    fn country_validation() {
        assert!(is_valid_country(""));
        assert!(is_valid_country("jp"));
        assert!(!is_valid_country("J"));
        assert!(!is_valid_country("日本"));
    }
}
