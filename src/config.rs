//! Settings resolution for Pilot.
//! Each setting is looked up in the environment (`PILOT_<KEY>`), then in the
//! user's `config.json`, then in the built-in defaults. Settings are resolved
//! once per invocation from those explicit inputs; nothing is cached globally.

use crate::constants::ENV_PREFIX;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Keys understood by Pilot, with their built-in defaults.
pub fn defaults() -> IndexMap<&'static str, &'static str> {
    let editor = if cfg!(windows) { "notepad" } else { "nano" };
    IndexMap::from([("editor", editor), ("default_output_dir", ".")])
}

/// Environment variable that overrides `key`.
pub fn env_key(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_uppercase())
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    values: IndexMap<String, String>,
}

impl Settings {
    /// Merges defaults, user config and environment, in increasing precedence.
    ///
    /// # Arguments
    /// * `user_config` - Contents of the user's settings file
    /// * `env` - Environment lookup, usually `|k| std::env::var(k).ok()`
    pub fn resolve<F>(user_config: &Map<String, Value>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values: IndexMap<String, String> =
            defaults().into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

        for (key, value) in user_config {
            values.insert(key.clone(), value_to_string(value));
        }

        for (key, value) in values.iter_mut() {
            if let Some(env_value) = env(&env_key(key)) {
                debug!("Setting '{}' overridden by {}", key, env_key(key));
                *value = env_value;
            }
        }

        Self { values }
    }

    /// Resolves against the real process environment.
    pub fn from_env(user_config: &Map<String, Value>) -> Self {
        Self::resolve(user_config, |key| std::env::var(key).ok())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn editor(&self) -> &str {
        self.get("editor").unwrap_or("nano")
    }

    pub fn default_output_dir(&self) -> PathBuf {
        PathBuf::from(self.get("default_output_dir").unwrap_or("."))
    }

    /// All settings in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parses a `KEY=VALUE` variable override.
///
/// # Errors
/// * `Error::ConfigError` if there is no `=` or the key is empty
pub fn parse_variable(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::ConfigError(format!("expected KEY=VALUE, got '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_variable("a=b").unwrap(), ("a".to_string(), "b".to_string()));
        assert_eq!(parse_variable("url=x=y").unwrap(), ("url".to_string(), "x=y".to_string()));
        assert_eq!(parse_variable("empty=").unwrap(), ("empty".to_string(), String::new()));
        assert!(parse_variable("novalue").is_err());
        assert!(parse_variable("=value").is_err());
    }

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("editor"), "PILOT_EDITOR");
        assert_eq!(env_key("default_output_dir"), "PILOT_DEFAULT_OUTPUT_DIR");
    }
}
