use std::{env, fmt::Display, ops::RangeInclusive, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Result, anyhow};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3003;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
/// Costs bcrypt accepts.
pub const BCRYPT_COSTS: RangeInclusive<u32> = 4..=31;
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// HS256 signing secret for session tokens.
    pub secret: String,
    /// JSON snapshot of the document store; memory-only when absent.
    pub data_file: Option<PathBuf>,
    pub bcrypt_cost: u32,
    pub token_ttl: Duration,
    /// Mounts `POST /api/testing/reset`.
    pub testing: bool,
    /// Restrict deletion to the blog's owner.
    pub strict_ownership: bool,
}

impl Config {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            port: DEFAULT_PORT,
            secret: secret.into(),
            data_file: None,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            token_ttl: DEFAULT_TOKEN_TTL,
            testing: false,
            strict_ownership: false,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("SECRET must be set to sign session tokens"))?;

        Ok(Self {
            port: try_load(&lookup, "PORT", DEFAULT_PORT),
            secret,
            data_file: lookup("BLOGLIST_DATA_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            bcrypt_cost: try_load_in(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST, BCRYPT_COSTS),
            token_ttl: Duration::from_secs(try_load_in(
                &lookup,
                "TOKEN_TTL_SECS",
                DEFAULT_TOKEN_TTL.as_secs(),
                1..=MAX_TOKEN_TTL_SECS,
            )),
            testing: try_load(&lookup, "BLOGLIST_TESTING", false),
            strict_ownership: try_load(&lookup, "BLOGLIST_STRICT_OWNERSHIP", false),
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
    }
}

/// [`try_load`], falling back to `default` when the value is outside `range`.
fn try_load_in<F, T>(lookup: &F, key: &str, default: T, range: RangeInclusive<T>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display + PartialOrd + Copy,
    T::Err: Display,
{
    let value = try_load(lookup, key, default);
    if range.contains(&value) {
        return value;
    }
    warn!(
        "{key} value {value} is outside {}..={}, using default: {default}",
        range.start(),
        range.end()
    );
    default
}
