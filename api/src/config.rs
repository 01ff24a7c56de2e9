use std::path::PathBuf;

use chrono_tz::Tz;
use perra_core::{Lexicon, LexiconError};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_TIMEZONE: &str = "Europe/Moscow";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("failed to load lexicon from {path}: {source}")]
    Lexicon {
        path: PathBuf,
        #[source]
        source: LexiconError,
    },
}

/// Runtime settings, read from the environment (and `.env` in development).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub stats_path: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub timezone: Tz,
    pub require_https: bool,
    pub lexicon: Lexicon,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", "port number", DEFAULT_PORT)?;
        let max_upload_bytes = parse_or(
            &lookup,
            "PERRA_MAX_UPLOAD_BYTES",
            "byte count",
            DEFAULT_MAX_UPLOAD_BYTES,
        )?;

        let timezone_name =
            non_empty(&lookup, "PERRA_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::Invalid {
                var: "PERRA_TIMEZONE",
                expected: "IANA time zone",
                value: timezone_name.clone(),
            })?;

        let mut lexicon = match non_empty(&lookup, "PERRA_LEXICON_PATH") {
            Some(path) => {
                let path = PathBuf::from(path);
                Lexicon::from_json_file(&path)
                    .map_err(|source| ConfigError::Lexicon { path, source })?
            }
            None => Lexicon::default(),
        };
        if let Some(name) = non_empty(&lookup, "PERRA_DEFAULT_NAME") {
            lexicon.default_name = name;
        }

        Ok(Self {
            port,
            stats_path: non_empty(&lookup, "PERRA_STATS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("stats.json")),
            upload_dir: non_empty(&lookup, "PERRA_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes,
            timezone,
            require_https: lookup("PERRA_REQUIRE_HTTPS")
                .map(|v| v == "true")
                .unwrap_or(false),
            lexicon,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(
    lookup: &F,
    var: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match non_empty(lookup, var) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value,
        }),
        None => Ok(default),
    }
}
