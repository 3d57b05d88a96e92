//! Configuration file upgrades: detect fields added by newer releases and
//! write their defaults back into an existing file.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Top-level keys present in the defaults but missing from the file.
/// Nested `endpoints` keys are reported as `endpoints.<name>`.
pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let current = read_mapping(path)?;
    let defaults = default_mapping()?;

    let mut missing = Vec::new();
    for (key, default_val) in &defaults {
        let name = key.as_str().unwrap_or_default();
        match current.get(key) {
            None => missing.push(name.to_string()),
            Some(Value::Mapping(nested)) => {
                if let Value::Mapping(default_nested) = default_val {
                    for nested_key in default_nested.keys() {
                        if !nested.contains_key(nested_key) {
                            missing.push(format!(
                                "{name}.{}",
                                nested_key.as_str().unwrap_or_default()
                            ));
                        }
                    }
                }
            }
            Some(_) => {}
        }
    }
    Ok(missing)
}

/// Add every missing field with its default value. Existing values are
/// never overwritten. Returns the names of the fields that were added.
pub fn complete_config_file(path: &Path) -> AppResult<Vec<String>> {
    let added = missing_fields(path)?;
    if added.is_empty() {
        return Ok(added);
    }

    let mut current = read_mapping(path)?;
    let defaults = default_mapping()?;

    for (key, default_val) in defaults {
        match current.get_mut(&key) {
            None => {
                current.insert(key, default_val);
            }
            Some(Value::Mapping(nested)) => {
                if let Value::Mapping(default_nested) = default_val {
                    for (nk, nv) in default_nested {
                        if !nested.contains_key(&nk) {
                            nested.insert(nk, nv);
                        }
                    }
                }
            }
            Some(_) => {}
        }
    }

    fs::write(path, serde_yaml::to_string(&Value::Mapping(current))?)?;
    Ok(added)
}

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&content)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
    }
}

fn default_mapping() -> AppResult<Mapping> {
    match serde_yaml::to_value(Config::default())? {
        Value::Mapping(map) => Ok(map),
        _ => Err(AppError::Config("default configuration is not a mapping".into())),
    }
}
