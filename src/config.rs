// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, `config.toml`, environment, CLI.
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | `api_base_url` | `TUTORGPT_API_BASE` | resolved from the origin, else `http://localhost:5000` |
//! | `origin` | `TUTORGPT_ORIGIN` | built from `CODESPACE_NAME` + `GITHUB_CODESPACES_PORT_FORWARDING_DOMAIN` |
//! | `student_id` | `TUTORGPT_STUDENT_ID` | `student123` |
//! | `data_dir` | `TUTORGPT_DATA_DIR` | platform data dir |
//! | `request_timeout_secs` | | 120 |
//! | `durable_writes` | | `false` (fsync each stored value and its directory when `true`) |

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{codespace_origin, resolve_base_url, BaseUrlSource, DEFAULT_TIMEOUT};
use crate::chat::DEFAULT_STUDENT_ID;
use crate::store::WriteDurability;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STORAGE_DIR_NAME: &str = "storage";
pub const LOG_FILE_NAME: &str = "tutorgpt.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no home directory available; pass --data-dir")]
    NoProjectDirs,
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub origin: Option<String>,
    pub student_id: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub durable_writes: Option<bool>,
}

impl FileConfig {
    /// Reads `path`. A missing file is an error only when `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if !required && source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub api_base: Option<String>,
    pub origin: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorConfig {
    pub base_url: String,
    pub student_id: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    pub write_durability: WriteDurability,
}

impl TutorConfig {
    /// Loads `config.toml` (the default location, or `config_path` which must exist) and merges
    /// it with the process environment and `overrides`.
    pub fn load(overrides: &Overrides, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => FileConfig::load(path, true)?,
            None => match project_dirs() {
                Some(dirs) => FileConfig::load(&dirs.config_dir().join(CONFIG_FILE_NAME), false)?,
                None => FileConfig::default(),
            },
        };

        let env = |name: &str| std::env::var(name).ok();
        let default_data_dir = project_dirs().map(|dirs| dirs.data_dir().to_path_buf());
        Self::resolve(file, env, overrides, default_data_dir)
    }

    /// Merges the sources without touching the process environment or the filesystem.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
        default_data_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let env = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let explicit = overrides
            .api_base
            .clone()
            .or_else(|| env("TUTORGPT_API_BASE"))
            .or(file.api_base_url);
        let origin = overrides
            .origin
            .clone()
            .or_else(|| env("TUTORGPT_ORIGIN"))
            .or(file.origin)
            .or_else(|| {
                codespace_origin(
                    env("CODESPACE_NAME").as_deref(),
                    env("GITHUB_CODESPACES_PORT_FORWARDING_DOMAIN").as_deref(),
                )
            });
        let base_url = resolve_base_url(BaseUrlSource {
            explicit: explicit.as_deref(),
            origin: origin.as_deref(),
        });

        let student_id = overrides
            .student_id
            .clone()
            .or_else(|| env("TUTORGPT_STUDENT_ID"))
            .or(file.student_id)
            .unwrap_or_else(|| DEFAULT_STUDENT_ID.to_owned());

        let data_dir = overrides
            .data_dir
            .clone()
            .or_else(|| env("TUTORGPT_DATA_DIR").map(PathBuf::from))
            .or(file.data_dir)
            .or(default_data_dir)
            .ok_or(ConfigError::NoProjectDirs)?;

        let request_timeout = file
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let write_durability = if file.durable_writes.unwrap_or(false) {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };

        Ok(Self {
            base_url,
            student_id,
            data_dir,
            request_timeout,
            write_durability,
        })
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join(STORAGE_DIR_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "tutorgpt", "tutorgpt")
}
