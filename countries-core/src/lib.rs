//! Core library for the `countries` CLI.
//!
//! This crate defines:
//! - The country model and the restcountries source
//! - Abstraction over weather providers for capital conditions
//! - The filter-driven explorer view state
//! - Configuration & credentials handling

pub mod config;
pub mod countries;
pub mod explorer;
pub mod model;
pub mod provider;

pub use config::{Config, ProviderConfig};
pub use countries::{CountrySource, RestCountries};
pub use explorer::{DetailView, Explorer, MAX_LISTED, Row, View, WeatherState, filter_countries};
pub use model::{Coordinates, Country, WeatherSnapshot};
pub use provider::{ProviderId, WeatherProvider};

/// Shortens an error response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
