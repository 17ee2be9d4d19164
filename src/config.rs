use std::env;

use derive_more::Display;

use crate::tree::{DepthLimit, NESTING_CEILING};

#[derive(Debug, Display, PartialEq)]
#[display(fmt = "invalid value {:?} for {}", value, key)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub depth_limit: DepthLimit,
    pub trash_grace_days: i64,
    pub purge_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8000,
            depth_limit: DepthLimit::default(),
            trash_grace_days: 30,
            purge_interval_secs: 3600,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let config = Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT", defaults.port)?,
            depth_limit: DepthLimit {
                max_depth: parse(&lookup, "MAX_FOLDER_DEPTH", defaults.depth_limit.max_depth)?,
                enforce: parse(&lookup, "ENFORCE_MAX_DEPTH", defaults.depth_limit.enforce)?,
            },
            trash_grace_days: parse(&lookup, "TRASH_GRACE_DAYS", defaults.trash_grace_days)?,
            purge_interval_secs: parse(
                &lookup,
                "PURGE_INTERVAL_SECS",
                defaults.purge_interval_secs,
            )?,
        };

        let max_depth = config.depth_limit.max_depth;
        if max_depth == 0 || max_depth > NESTING_CEILING {
            return Err(ConfigError { key: "MAX_FOLDER_DEPTH", value: max_depth.to_string() });
        }
        if config.purge_interval_secs == 0 {
            return Err(ConfigError { key: "PURGE_INTERVAL_SECS", value: "0".to_string() });
        }

        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => {
            let parsed = value.trim().parse();
            parsed.map_err(|_| ConfigError { key, value })
        }
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.depth_limit, DepthLimit { max_depth: 10, enforce: true });
        assert_eq!(config.trash_grace_days, 30);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("MAX_FOLDER_DEPTH", "4"),
            ("ENFORCE_MAX_DEPTH", "false"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.depth_limit, DepthLimit { max_depth: 4, enforce: false });
    }

    #[test]
    fn test_invalid_value() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();

        assert_eq!(err, ConfigError { key: "PORT", value: "eighty".to_string() });
        assert_eq!(err.to_string(), "invalid value \"eighty\" for PORT");
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(Config::from_lookup(lookup(&[("MAX_FOLDER_DEPTH", "0")])).is_err());
    }

    #[test]
    fn test_depth_above_ceiling_rejected() {
        let err = Config::from_lookup(lookup(&[("MAX_FOLDER_DEPTH", "257")])).unwrap_err();

        assert_eq!(err, ConfigError { key: "MAX_FOLDER_DEPTH", value: "257".to_string() });
        assert!(Config::from_lookup(lookup(&[("MAX_FOLDER_DEPTH", "256")])).is_ok());
    }
}
