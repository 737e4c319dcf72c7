use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    model::{Coordinates, Country},
    truncate_body,
};

pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com";

const FIELDS: &str = "name,capital,capitalInfo,area,languages,flags,cca3";

#[async_trait]
pub trait CountrySource: Send + Sync + std::fmt::Debug {
    async fn all_countries(&self) -> Result<Vec<Country>>;
}

#[derive(Debug, Clone)]
pub struct RestCountries {
    base_url: String,
    http: Client,
}

impl RestCountries {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

impl Default for RestCountries {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRIES_URL)
    }
}

#[async_trait]
impl CountrySource for RestCountries {
    async fn all_countries(&self) -> Result<Vec<Country>> {
        let url = format!("{}/v3.1/all", self.base_url);
        debug!(%url, "fetching country list");

        let res = self
            .http
            .get(&url)
            .query(&[("fields", FIELDS)])
            .send()
            .await
            .context("Failed to send request to restcountries")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read restcountries response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "restcountries request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let countries = parse_countries(&body)?;
        debug!(count = countries.len(), "country list loaded");
        Ok(countries)
    }
}

pub fn parse_countries(body: &str) -> Result<Vec<Country>> {
    let parsed: Vec<RcCountry> =
        serde_json::from_str(body).context("Failed to parse restcountries JSON")?;

    Ok(parsed.into_iter().map(Country::from).collect())
}

#[derive(Debug, Deserialize)]
struct RcName {
    common: String,
}

#[derive(Debug, Default, Deserialize)]
struct RcCapitalInfo {
    #[serde(default)]
    latlng: Option<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct RcFlags {
    png: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RcCountry {
    name: RcName,
    cca3: String,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    capital_info: RcCapitalInfo,
    area: Option<f64>,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    flags: RcFlags,
}

impl From<RcCountry> for Country {
    fn from(rc: RcCountry) -> Self {
        let capital_coords = match rc.capital_info.latlng.as_deref() {
            Some([lat, lon, ..]) => Some(Coordinates {
                lat: *lat,
                lon: *lon,
            }),
            _ => None,
        };

        Country {
            code: rc.cca3,
            name: rc.name.common,
            capital: rc.capital.into_iter().next(),
            capital_coords,
            area_km2: rc.area,
            languages: rc.languages,
            flag_url: rc.flags.png,
        }
    }
}
