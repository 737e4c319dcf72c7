use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    model::{Coordinates, WeatherSnapshot},
    provider::unix_to_utc,
    truncate_body,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    localtime_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    wind_kph: f64,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

fn parse_current(body: &str) -> Result<WeatherSnapshot> {
    let parsed: WaResponse =
        serde_json::from_str(body).context("Failed to parse WeatherAPI current JSON")?;

    let ts = parsed.current.last_updated_epoch.or(parsed.location.localtime_epoch);
    let observation_time = ts.and_then(unix_to_utc).unwrap_or_else(Utc::now);

    Ok(WeatherSnapshot {
        provider: "weatherapi".to_string(),
        temperature_c: parsed.current.temp_c,
        wind_speed_mps: parsed.current.wind_kph / 3.6,
        condition: parsed.current.condition.text,
        icon: None,
        observation_time,
    })
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current_weather(&self, at: &Coordinates) -> Result<WeatherSnapshot> {
        let url = format!("{}/v1/current.json", self.base_url);
        let q = format!("{},{}", at.lat, at.lon);
        debug!(%q, "requesting WeatherAPI current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", q.as_str())])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (current)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read WeatherAPI current response body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "WeatherAPI current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_current(&body)
    }
}
