use clap::ValueEnum;
use serde::{Deserialize, Deserializer};

/// Helper function to load and parse an environment variable.
/// Returns Ok(()) if the variable doesn't exist (keeps default).
pub fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), super::ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .trim()
            .parse()
            .map_err(|e| super::ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

/// Helper function to load a clap value enum, case-insensitively.
pub fn load_env_enum<T>(name: &str, target: &mut T) -> Result<(), super::ConfigError>
where
    T: ValueEnum,
{
    if let Ok(value) = std::env::var(name) {
        *target = T::from_str(value.trim(), true)
            .map_err(|e| super::ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

/// Helper function to load a string environment variable.
pub fn load_env_string(name: &str, target: &mut String) {
    if let Ok(value) = std::env::var(name) {
        *target = value;
    }
}

/// Helper function to load a comma-separated list environment variable.
pub fn load_env_list(name: &str, target: &mut Vec<String>) {
    if let Ok(value) = std::env::var(name) {
        *target = split_list(&value);
    }
}

/// Helper function to load an optional PathBuf environment variable.
pub fn load_env_path_opt(name: &str, target: &mut Option<std::path::PathBuf>) {
    if let Ok(value) = std::env::var(name) {
        *target = Some(std::path::PathBuf::from(value));
    }
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Deserializes a list given either as an array or as one comma-separated string.
pub fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrString {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match ListOrString::deserialize(deserializer)? {
        ListOrString::List(items) => items,
        ListOrString::Joined(value) => split_list(&value),
    })
}
