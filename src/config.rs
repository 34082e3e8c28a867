//! Balance table files
//!
//! A TOML file only needs the values it changes. Its tables are flattened to
//! the dotted keys of [`Balance::entries`] and laid over whatever table the
//! caller already has, so database overrides survive a partial file.

use std::path::Path;

use thiserror::Error;

use crate::balance::Balance;
use crate::error::CalcError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read balance file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("unknown balance key '{0}'")]
    UnknownKey(String),
    #[error("balance key '{0}' must be a number")]
    NotANumber(String),
    #[error(transparent)]
    Balance(#[from] CalcError),
}

/// Dotted keys and values named by a TOML document, in file order
pub fn parse_overrides(contents: &str) -> Result<Vec<(String, f64)>, ConfigError> {
    let table: toml::Table = toml::from_str(contents)?;
    let mut overrides = Vec::new();
    flatten("", &table, &mut overrides)?;

    let known = Balance::default();
    if let Some((key, _)) = overrides.iter().find(|(key, _)| known.get(key).is_none()) {
        return Err(ConfigError::UnknownKey(key.clone()));
    }
    Ok(overrides)
}

pub fn read_overrides<P: AsRef<Path>>(path: P) -> Result<Vec<(String, f64)>, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_overrides(&contents)
}

/// Apply overrides on top of `balance` and validate the result
pub fn apply_overrides(balance: &mut Balance, overrides: &[(String, f64)]) -> Result<(), ConfigError> {
    for (key, value) in overrides {
        if !balance.set(key, *value) {
            return Err(ConfigError::UnknownKey(key.clone()));
        }
    }
    balance.validate()?;
    Ok(())
}

pub fn to_toml(balance: &Balance) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(balance)?)
}

fn flatten(
    prefix: &str,
    table: &toml::Table,
    out: &mut Vec<(String, f64)>,
) -> Result<(), ConfigError> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match value {
            toml::Value::Table(inner) => flatten(&key, inner, out)?,
            toml::Value::Float(v) => out.push((key, *v)),
            toml::Value::Integer(v) => out.push((key, *v as f64)),
            _ => return Err(ConfigError::NotANumber(key)),
        }
    }
    Ok(())
}
