//! Layered configuration.
//!
//! Priority (highest first):
//! 1. `--db` flag or `TASKS_DB` environment variable
//! 2. TOML config file (`~/.config/taskdash/config.toml`, or `--config`)
//! 3. Compiled defaults
//!
//! A missing default config file is not an error. An explicit `--config` path
//! that doesn't exist is.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::storage::default_db_path;
use crate::view::{Filter, SortKey};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    view: ViewFileConfig,
}

/// `[storage]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    path: Option<PathBuf>,
}

/// `[view]` section. Keys use the same fail-open parsing as the CLI.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewFileConfig {
    filter: Option<String>,
    sort: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Location of the JSON task store.
    pub db_path: PathBuf,
    /// Filter applied when none is given.
    pub default_filter: Filter,
    /// Sort key applied when none is given.
    pub default_sort: SortKey,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: default_db_path(),
            default_filter: Filter::All,
            default_sort: SortKey::DueDate,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("taskdash");
        p.push("config.toml");
        p
    })
}

fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(ConfigFile::default()),
        },
    };
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
        path: path.clone(),
        source,
    })?;
    Ok(toml::from_str(&raw)?)
}

impl Config {
    /// Loads the config file and applies the `db` override on top.
    pub fn load(config_path: Option<&Path>, db: Option<PathBuf>) -> Result<Self, ConfigError> {
        let file = load_config_file(config_path)?;
        Ok(Self::resolve(db, &file))
    }

    fn resolve(db: Option<PathBuf>, file: &ConfigFile) -> Self {
        let defaults = Self::default();
        Config {
            db_path: db
                .or_else(|| file.storage.path.clone())
                .unwrap_or(defaults.db_path),
            default_filter: file
                .view
                .filter
                .as_deref()
                .map_or(defaults.default_filter, Filter::parse),
            default_sort: file
                .view
                .sort
                .as_deref()
                .map_or(defaults.default_sort, SortKey::parse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ConfigFile {
        toml::from_str(raw).unwrap_or_else(|e| panic!("config must parse: {e}"))
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = Config::resolve(None, &parse(""));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn file_values_apply() {
        let file = parse(
            r#"
            [storage]
            path = "/tmp/board.json"

            [view]
            filter = "overdue"
            sort = "priority"
            "#,
        );
        let cfg = Config::resolve(None, &file);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/board.json"));
        assert_eq!(cfg.default_filter, Filter::Overdue);
        assert_eq!(cfg.default_sort, SortKey::Priority);
    }

    #[test]
    fn db_override_beats_file() {
        let file = parse("[storage]\npath = \"/tmp/from-file.json\"\n");
        let cfg = Config::resolve(Some(PathBuf::from("/tmp/flag.json")), &file);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/flag.json"));
    }

    #[test]
    fn unknown_view_keys_fall_back() {
        let file = parse("[view]\nfilter = \"someday\"\nsort = \"created\"\n");
        let cfg = Config::resolve(None, &file);
        assert_eq!(cfg.default_filter, Filter::All);
        assert_eq!(cfg.default_sort, SortKey::DueDate);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/taskdash/config.toml")), None);
        assert!(matches!(err, Err(ConfigError::ReadFile { .. })));
    }
}
