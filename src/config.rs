use crate::services::GenerationLimits;
use anyhow::Context;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// CSV catalog loaded at startup, if any
    pub catalog_path: Option<String>,
    /// Used when a generate request does not say how many songs to use
    pub default_max_songs: usize,
    pub limits: GenerationLimits,
    /// How many generated results stay selectable
    pub generation_retention: usize,
    /// Allowed CORS origins (comma-separated). Use "*" for any origin.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let limits = GenerationLimits {
            max_songs: parse_or(&lookup, "MAX_SONGS_LIMIT", 6)?,
            max_catalog_tracks: parse_or(&lookup, "MAX_CATALOG_TRACKS", 64)?,
            max_style_positions: parse_or(&lookup, "MAX_STYLE_POSITIONS", 16)?,
            max_mixes: parse_or(&lookup, "MAX_MIXES", 200_000)?,
        };

        let default_max_songs = parse_or(&lookup, "DEFAULT_MAX_SONGS", 3.min(limits.max_songs))?;
        if default_max_songs > limits.max_songs {
            return Err(anyhow::anyhow!(
                "DEFAULT_MAX_SONGS ({}) must not exceed MAX_SONGS_LIMIT ({})",
                default_max_songs,
                limits.max_songs
            ));
        }

        let generation_retention: usize = parse_or(&lookup, "GENERATION_RETENTION", 16)?;
        if generation_retention == 0 {
            return Err(anyhow::anyhow!("GENERATION_RETENTION must be at least 1"));
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8000)?,
            catalog_path: lookup("CATALOG_PATH").filter(|p| !p.trim().is_empty()),
            default_max_songs,
            limits,
            generation_retention,
            cors_origins,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
