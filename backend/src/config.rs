//! Process configuration, read from the environment once at start-up.
//!
//! A `.env` file in the working directory is honoured when present. Durations
//! are given in whole seconds.

use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Worker backoff when no job is eligible.
    pub no_job_wait: Duration,
    /// Pause between two cleanup passes.
    pub cleanup_wait: Duration,
    pub delete_finished_age: Duration,
    pub delete_failed_age: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            no_job_wait: Duration::from_secs(10),
            cleanup_wait: Duration::from_secs(3600),
            delete_finished_age: Duration::from_secs(3600),
            delete_failed_age: Duration::from_secs(2 * 3600),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source, falling back to the
    /// defaults for anything unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Config {
            host: get("LISTEN_HOST").unwrap_or(defaults.host),
            port: match get("LISTEN_PORT") {
                Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "LISTEN_PORT",
                    expected: "a port number",
                    value,
                })?,
                None => defaults.port,
            },
            no_job_wait: seconds(get("NO_JOB_WAIT_SECS"), "NO_JOB_WAIT_SECS", defaults.no_job_wait)?,
            cleanup_wait: seconds(
                get("CLEANUP_WAIT_SECS"),
                "CLEANUP_WAIT_SECS",
                defaults.cleanup_wait,
            )?,
            delete_finished_age: seconds(
                get("DELETE_FINISHED_AGE_SECS"),
                "DELETE_FINISHED_AGE_SECS",
                defaults.delete_finished_age,
            )?,
            delete_failed_age: seconds(
                get("DELETE_FAILED_AGE_SECS"),
                "DELETE_FAILED_AGE_SECS",
                defaults.delete_failed_age,
            )?,
        })
    }
}

fn seconds(
    value: Option<String>,
    name: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid {
                name,
                expected: "a whole number of seconds",
                value,
            }),
        None => Ok(default),
    }
}
