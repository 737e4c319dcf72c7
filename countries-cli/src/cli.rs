use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use countries_core::{
    Config, Country, CountrySource, DetailView, Explorer, ProviderId, RestCountries, View,
    WeatherProvider, provider::default_provider_from_config,
};
use inquire::{MultiSelect, Password, Text};
use tracing::{info, warn};

use crate::render::{render_detail, render_summary};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "countries", version, about = "Country explorer with capital weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key for a weather provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,

        /// Make this provider the default even if another one is set.
        #[arg(long)]
        default: bool,
    },

    /// Show the countries matching a filter.
    Find {
        /// Case-insensitive part of the country's common name.
        filter: String,

        /// Expand a listed country by its code (repeatable), e.g. --show FIN.
        #[arg(long = "show", value_name = "CODE")]
        show: Vec<String>,
    },

    /// Interactive filter prompt.
    Browse,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { provider, default } => configure(&provider, default),
            Command::Find { filter, show } => find(&filter, &show).await,
            Command::Browse => browse().await,
        }
    }
}

fn configure(provider: &str, make_default: bool) -> Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    if make_default {
        config.set_default_provider(id);
    }
    config.save()?;

    println!(
        "Saved {id} credentials to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

struct Session {
    explorer: Explorer,
    weather: Option<Box<dyn WeatherProvider>>,
}

impl Session {
    async fn start() -> Result<Self> {
        let config = Config::load()?;

        let weather = match default_provider_from_config(&config) {
            Ok(provider) => Some(provider),
            Err(err) => {
                warn!("weather disabled: {err}");
                None
            }
        };

        let mut explorer = Explorer::new();
        let source = RestCountries::new(config.countries_url());
        explorer.load(source.all_countries().await?);
        info!(count = explorer.matches().len(), "countries loaded");

        Ok(Self { explorer, weather })
    }

    async fn print_detail(&self, country: &Country) {
        let mut detail = DetailView::new(country);
        if let Some(provider) = &self.weather {
            detail.load_weather(provider.as_ref()).await;
        }
        print!("{}", render_detail(&detail));
    }

    async fn print_view(&self) {
        let view = self.explorer.view();
        println!("{}", render_summary(&view));

        match view {
            View::Detail(country) => {
                println!();
                self.print_detail(country).await;
            }
            View::List(rows) => {
                for row in rows.iter().filter(|r| r.shown) {
                    println!();
                    self.print_detail(row.country).await;
                }
            }
            _ => {}
        }
    }
}

async fn find(filter: &str, show: &[String]) -> Result<()> {
    let mut session = Session::start().await?;
    session.explorer.set_filter(filter);

    for code in show {
        if !session.explorer.toggle(&code.to_uppercase()) {
            warn!(%code, "not among the current matches");
        }
    }

    session.print_view().await;
    Ok(())
}

async fn browse() -> Result<()> {
    let mut session = Session::start().await?;

    loop {
        let filter = Text::new("find countries")
            .with_initial_value(session.explorer.filter())
            .with_help_message("empty input or Esc quits")
            .prompt_skippable()
            .context("Failed to read filter")?;

        let Some(filter) = filter.filter(|f| !f.trim().is_empty()) else {
            return Ok(());
        };
        session.explorer.set_filter(filter);

        let codes: Vec<(String, String)> = match session.explorer.view() {
            View::List(rows) => rows
                .iter()
                .map(|r| (r.country.code.clone(), r.country.name.clone()))
                .collect(),
            _ => Vec::new(),
        };

        if !codes.is_empty() {
            let labels: Vec<String> = codes.iter().map(|(_, name)| name.clone()).collect();
            let picked = MultiSelect::new("show", labels)
                .prompt_skippable()
                .context("Failed to read selection")?
                .unwrap_or_default();

            for (code, name) in &codes {
                if picked.contains(name) {
                    session.explorer.toggle(code);
                }
            }
        }

        session.print_view().await;
    }
}
