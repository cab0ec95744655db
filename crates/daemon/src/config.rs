// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: one TOML table per backend id, loaded from a fixed
//! ordered candidate path list. Unknown keys inside a backend table are
//! passed through opaquely rather than rejected.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found in any of: {0:?}")]
    NotFound(Vec<PathBuf>),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path} as TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not determine a home directory")]
    NoHomeDir,
}

/// Opaque per-backend config table, e.g. the `[kimi]` section.
pub type EngineConfig = serde_json::Value;

/// The loaded config file: which path it came from, plus one `EngineConfig`
/// per top-level TOML table (backend id).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub path: PathBuf,
    pub backends: BTreeMap<String, EngineConfig>,
}

impl Config {
    pub fn backend(&self, engine: &str) -> Option<&EngineConfig> {
        self.backends.get(engine)
    }
}

/// Candidate paths, checked in order: a local `./overseer.toml` first, then
/// the XDG config location.
fn candidate_paths() -> Result<Vec<PathBuf>, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(vec![
        PathBuf::from("overseer.toml"),
        dirs::config_dir()
            .unwrap_or_else(|| home.join(".config"))
            .join("overseer")
            .join("config.toml"),
    ])
}

fn legacy_path() -> Result<PathBuf, ConfigError> {
    Ok(dirs::home_dir().ok_or(ConfigError::NoHomeDir)?.join(".overseer.toml"))
}

/// Load configuration, migrating the legacy `~/.overseer.toml` location to
/// the XDG target on first run if the new target doesn't exist yet but the
/// legacy one does.
pub fn load() -> Result<Config, ConfigError> {
    let candidates = candidate_paths()?;
    migrate_legacy_if_needed(&candidates)?;
    load_from(&candidates)
}

fn migrate_legacy_if_needed(candidates: &[PathBuf]) -> Result<(), ConfigError> {
    let xdg_target = match candidates.last() {
        Some(path) => path,
        None => return Ok(()),
    };
    if xdg_target.exists() {
        return Ok(());
    }
    let legacy = legacy_path()?;
    if !legacy.exists() {
        return Ok(());
    }
    if let Some(parent) = xdg_target.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if std::fs::copy(&legacy, xdg_target).is_ok() {
        tracing::info!(from = %legacy.display(), to = %xdg_target.display(), "config.migrated_legacy_path");
    }
    Ok(())
}

fn load_from(candidates: &[PathBuf]) -> Result<Config, ConfigError> {
    for path in candidates {
        match std::fs::read_to_string(path) {
            Ok(raw) => return parse(path.clone(), &raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::Read { path: path.clone(), source: e }),
        }
    }
    Err(ConfigError::NotFound(candidates.to_vec()))
}

fn parse(path: PathBuf, raw: &str) -> Result<Config, ConfigError> {
    let value: toml::Value = toml::from_str(raw).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
    let mut backends = BTreeMap::new();
    if let toml::Value::Table(table) = value {
        for (key, value) in table {
            backends.insert(key, toml_to_json(value));
        }
    }
    Ok(Config { path, backends })
}

fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map(serde_json::Value::Number).unwrap_or(serde_json::Value::Null),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            serde_json::Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}

/// Load directly from an explicit path, skipping the candidate search.
/// Used by tests and by callers that already know where the file is.
pub fn load_path(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read { path: path.to_path_buf(), source: e })?;
    parse(path.to_path_buf(), &raw)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
