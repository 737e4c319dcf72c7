//! Filter-driven view over the country list.
//!
//! The explorer holds the fetched list, the current filter text and which
//! rows of a short result list are expanded. [`Explorer::view`] turns that
//! state into what should be shown:
//!
//! - nothing matched: a "no matching country" message, or a loading
//!   indicator while the list is still being fetched
//! - more than [`MAX_LISTED`] matches: ask for a narrower filter
//! - 2..=[`MAX_LISTED`] matches: one row per country with its own toggle
//! - exactly one match: the full detail view
//!
//! Rows are keyed by country code so a toggle follows the country, not the
//! position it happens to occupy in the list.

use std::collections::HashSet;

use tracing::warn;

use crate::{
    model::{Country, WeatherSnapshot},
    provider::WeatherProvider,
};

pub const MAX_LISTED: usize = 10;

/// Countries whose common name contains `query`, ignoring case, in source order.
pub fn filter_countries<'a>(countries: &'a [Country], query: &str) -> Vec<&'a Country> {
    countries.iter().filter(|c| c.matches(query)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub country: &'a Country,
    pub shown: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Loading,
    NoMatch,
    TooMany(usize),
    List(Vec<Row<'a>>),
    Detail(&'a Country),
}

#[derive(Debug, Default)]
pub struct Explorer {
    countries: Option<Vec<Country>>,
    filter: String,
    shown: HashSet<String>,
}

impl Explorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the fetched list. Any expanded rows are collapsed.
    pub fn load(&mut self, countries: Vec<Country>) {
        self.countries = Some(countries);
        self.shown.clear();
    }

    pub fn is_loaded(&self) -> bool {
        self.countries.is_some()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Replace the filter; every row goes back to hidden.
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
        self.shown.clear();
    }

    pub fn matches(&self) -> Vec<&Country> {
        match &self.countries {
            Some(list) => filter_countries(list, &self.filter),
            None => Vec::new(),
        }
    }

    /// Flip the row for `code`. Returns false when no current match has that code.
    pub fn toggle(&mut self, code: &str) -> bool {
        if !self.matches().iter().any(|c| c.code == code) {
            return false;
        }
        if !self.shown.remove(code) {
            self.shown.insert(code.to_string());
        }
        true
    }

    pub fn is_shown(&self, code: &str) -> bool {
        self.shown.contains(code)
    }

    pub fn view(&self) -> View<'_> {
        let matches = self.matches();
        match matches.len() {
            0 if !self.is_loaded() => View::Loading,
            0 => View::NoMatch,
            1 => View::Detail(matches[0]),
            n if n > MAX_LISTED => View::TooMany(n),
            _ => View::List(
                matches
                    .into_iter()
                    .map(|country| Row {
                        country,
                        shown: self.is_shown(&country.code),
                    })
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherState {
    Loading,
    Loaded(WeatherSnapshot),
    Unavailable,
}

/// A country's detail view together with its capital's weather.
#[derive(Debug, Clone)]
pub struct DetailView<'a> {
    pub country: &'a Country,
    pub weather: WeatherState,
}

impl<'a> DetailView<'a> {
    pub fn new(country: &'a Country) -> Self {
        let weather = if country.capital_coords.is_some() {
            WeatherState::Loading
        } else {
            WeatherState::Unavailable
        };
        Self { country, weather }
    }

    /// Issue the single capital weather lookup. Failures are logged, not retried.
    pub async fn load_weather(&mut self, provider: &dyn WeatherProvider) {
        let Some(coords) = self.country.capital_coords else {
            self.weather = WeatherState::Unavailable;
            return;
        };

        self.weather = match provider.current_weather(&coords).await {
            Ok(snapshot) => WeatherState::Loaded(snapshot),
            Err(err) => {
                warn!(country = %self.country.name, error = %err, "capital weather lookup failed");
                WeatherState::Unavailable
            }
        };
    }
}
