use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A country as served by the country source. Read-only snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-3 code, used as the stable row key.
    pub code: String,
    pub name: String,
    pub capital: Option<String>,
    pub capital_coords: Option<Coordinates>,
    pub area_km2: Option<f64>,
    /// Language code → language name, e.g. `fin` → `Finnish`.
    pub languages: BTreeMap<String, String>,
    pub flag_url: Option<String>,
}

impl Country {
    /// Case-insensitive substring match on the common name.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub provider: String,
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
    pub condition: String,
    /// OpenWeather icon code such as `10d`. Not every provider has one.
    pub icon: Option<String>,
    pub observation_time: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_ref()
            .map(|icon| format!("https://openweathermap.org/img/wn/{icon}@2x.png"))
    }
}
