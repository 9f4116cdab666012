//! Configuration management for the docdiff server

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Default request size ceiling (20 MiB)
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
    pub diff: DiffConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Largest accepted request body, in bytes
    pub max_request_bytes: usize,
}

/// Defaults for per-request comparison options
#[derive(Debug, Clone)]
pub struct DiffConfig {
    pub include_unchanged: bool,
    pub leading_summary: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            limits: LimitsConfig {
                max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            },
            diff: DiffConfig {
                include_unchanged: true,
                leading_summary: false,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let port_var = if lookup("PORT").is_some() {
            "PORT"
        } else {
            "SERVER_PORT"
        };

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var(&lookup, port_var, defaults.server.port)?,
            },
            limits: LimitsConfig {
                max_request_bytes: parse_var(
                    &lookup,
                    "MAX_REQUEST_BYTES",
                    defaults.limits.max_request_bytes,
                )?,
            },
            diff: DiffConfig {
                include_unchanged: parse_flag(
                    &lookup,
                    "DIFF_INCLUDE_UNCHANGED",
                    defaults.diff.include_unchanged,
                )?,
                leading_summary: parse_flag(
                    &lookup,
                    "DIFF_LEADING_SUMMARY",
                    defaults.diff.leading_summary,
                )?,
            },
        })
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

fn parse_flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.limits.max_request_bytes, 20_971_520);
        assert!(config.diff.include_unchanged);
        assert!(!config.diff.leading_summary);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_port_takes_precedence() {
        let config = config_from(&[("PORT", "9100"), ("SERVER_PORT", "9200")]).unwrap();
        assert_eq!(config.server.port, 9100);

        let config = config_from(&[("SERVER_PORT", "9200")]).unwrap();
        assert_eq!(config.server.port, 9200);
    }

    #[test]
    fn test_flags_and_limits() {
        let config = config_from(&[
            ("DIFF_INCLUDE_UNCHANGED", "false"),
            ("DIFF_LEADING_SUMMARY", "1"),
            ("MAX_REQUEST_BYTES", "1048576"),
        ])
        .unwrap();
        assert!(!config.diff.include_unchanged);
        assert!(config.diff.leading_summary);
        assert_eq!(config.limits.max_request_bytes, 1_048_576);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("PORT", "http")]).unwrap_err(),
            ConfigError::InvalidValue {
                name: "PORT",
                value: "http".to_string()
            }
        );
        assert!(config_from(&[("DIFF_LEADING_SUMMARY", "maybe")]).is_err());
    }
}
