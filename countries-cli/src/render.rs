use std::fmt;

use countries_core::{DetailView, View, WeatherState};

pub fn render_summary(view: &View<'_>) -> String {
    match view {
        View::Loading => "loading...".to_string(),
        View::NoMatch => "no matching country".to_string(),
        View::TooMany(n) => format!("Too many matches, specify another filter ({n})"),
        View::List(rows) => rows
            .iter()
            .map(|row| {
                let action = if row.shown { "hide" } else { "show" };
                format!("{} [{}] ({action})", row.country.name, row.country.code)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        View::Detail(country) => country.name.clone(),
    }
}

pub fn render_detail(detail: &DetailView<'_>) -> String {
    DetailText(detail).to_string()
}

struct DetailText<'a, 'b>(&'a DetailView<'b>);

impl fmt::Display for DetailText<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let country = self.0.country;
        let capital = country.capital.as_deref().unwrap_or("-");

        writeln!(f, "{}", country.name)?;
        writeln!(f, "capital {capital}")?;
        match country.area_km2 {
            Some(area) => writeln!(f, "area {area}")?,
            None => writeln!(f, "area -")?,
        }
        writeln!(f, "languages:")?;
        for name in country.languages.values() {
            writeln!(f, "  - {name}")?;
        }
        if let Some(flag) = &country.flag_url {
            writeln!(f, "flag {flag}")?;
        }

        match &self.0.weather {
            WeatherState::Loading => writeln!(f, "loading weather..."),
            WeatherState::Unavailable => writeln!(f, "weather unavailable"),
            WeatherState::Loaded(snap) => {
                writeln!(f, "Weather in {capital}")?;
                writeln!(f, "  temperature {} Celsius", snap.temperature_c)?;
                writeln!(f, "  {}", snap.condition)?;
                if let Some(icon) = snap.icon_url() {
                    writeln!(f, "  icon {icon}")?;
                }
                writeln!(f, "  wind {:.1} m/s", snap.wind_speed_mps)?;
                writeln!(
                    f,
                    "  observed {} ({})",
                    snap.observation_time.format("%Y-%m-%d %H:%M UTC"),
                    snap.provider
                )
            }
        }
    }
}
