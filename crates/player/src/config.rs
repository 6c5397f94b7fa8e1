//! Runtime configuration read from the environment.
//!
//! `.env.local` and `.env` at the repository root are loaded first; real
//! environment variables take precedence over both.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::ui::interaction::InteractionMode;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HINT_TIMEOUT_SECS: u64 = 30;

const API_URL_VAR: &str = "FATESHEET_API_URL";
const INTERACTION_MODE_VAR: &str = "FATESHEET_INTERACTION_MODE";
const POINTER_ONLY_VAR: &str = "FATESHEET_POINTER_ONLY";
const GENERATION_TIMEOUT_VAR: &str = "FATESHEET_GENERATION_TIMEOUT_SECS";
const HINT_TIMEOUT_VAR: &str = "FATESHEET_HINT_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} must be one of {expected}, got {value:?}")]
    InvalidChoice {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub api_url: Url,
    pub interaction_mode: InteractionMode,
    /// Capability hint for `InteractionMode::Auto`: coarse pointer, no hover.
    pub pointer_only: bool,
    pub generation_timeout: Duration,
    pub hint_timeout: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            interaction_mode: InteractionMode::Auto,
            pointer_only: false,
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            hint_timeout: Duration::from_secs(DEFAULT_HINT_TIMEOUT_SECS),
        }
    }
}

impl PlayerConfig {
    /// Load `.env` files, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv_from_repo_root();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables take
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = match read(API_URL_VAR) {
            Some(raw) => parse_url(API_URL_VAR, &raw)?,
            None => default_api_url(),
        };

        let interaction_mode = match read(INTERACTION_MODE_VAR) {
            Some(raw) => raw
                .parse::<InteractionMode>()
                .map_err(|_| ConfigError::InvalidChoice {
                    var: INTERACTION_MODE_VAR,
                    expected: "auto|pointer|tap",
                    value: raw,
                })?,
            None => InteractionMode::Auto,
        };

        let pointer_only = match read(POINTER_ONLY_VAR) {
            Some(raw) => parse_bool(POINTER_ONLY_VAR, &raw)?,
            None => false,
        };

        Ok(Self {
            api_url,
            interaction_mode,
            pointer_only,
            generation_timeout: parse_timeout(
                GENERATION_TIMEOUT_VAR,
                read(GENERATION_TIMEOUT_VAR),
                DEFAULT_GENERATION_TIMEOUT_SECS,
            )?,
            hint_timeout: parse_timeout(
                HINT_TIMEOUT_VAR,
                read(HINT_TIMEOUT_VAR),
                DEFAULT_HINT_TIMEOUT_SECS,
            )?,
        })
    }
}

fn default_api_url() -> Url {
    // Constant input; a parse failure here would be a typo in DEFAULT_API_URL.
    Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!("default API URL is valid"))
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        var,
        value: raw.to_string(),
    };
    let url = Url::parse(raw).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(invalid()),
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidChoice {
            var,
            expected: "true|false",
            value: raw.to_string(),
        }),
    }
}

fn parse_timeout(
    var: &'static str,
    raw: Option<String>,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default_secs));
    };
    match u64::from_str(&raw) {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout { var, value: raw }),
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
