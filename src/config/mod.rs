// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `.reed/config.toml` loading.
//!
//! Mirrors the schema loader's discipline (`crate::schema::loader`):
//! `serde` + `toml`, unknown keys rejected rather than silently ignored. A
//! missing file is not an error — `Config::default()` covers it.

use crate::error::{ReedError, ReedResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub versioning: VersioningConfig,
    pub concurrency: ConcurrencyConfig,
    pub indices: IndicesConfig,
    pub backup: BackupConfig,
    pub frames: FramesConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct VersioningConfig {
    pub max_versions: u32,
    pub auto_snapshot: bool,
    pub delta_chain_max: u32,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            max_versions: 0, // 0 = unbounded; retention is a maintenance concern, not enforced here
            auto_snapshot: true,
            delta_chain_max: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ConcurrencyConfig {
    pub lock_timeout_seconds: u64,
    pub queue_size: usize,
    pub merge_strategy: String,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            lock_timeout_seconds: 30,
            queue_size: 1000,
            merge_strategy: "last-write-wins".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct IndicesConfig {
    pub default_backend: String,
    pub auto_index_threshold: u32,
}

impl Default for IndicesConfig {
    fn default() -> Self {
        Self {
            default_backend: "hash".to_string(),
            auto_index_threshold: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct BackupConfig {
    pub retention_days: u32,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct FramesConfig {
    pub retention_days: u32,
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            versioning: VersioningConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            indices: IndicesConfig::default(),
            backup: BackupConfig::default(),
            frames: FramesConfig::default(),
        }
    }
}

impl Config {
    /// Loads `<base_path>/config.toml`, falling back to defaults when the
    /// file does not exist. Unknown top-level or nested keys are rejected.
    pub fn load(base_path: &Path) -> ReedResult<Self> {
        let path = base_path.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| ReedError::IoError {
            operation: format!("read config file '{}'", path.display()),
            reason: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ReedError::ConfigError {
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates cross-field constraints `serde` can't express on its own.
    fn validate(&self) -> ReedResult<()> {
        crate::database::types::IndexBackend::parse_config_str(&self.indices.default_backend)?;
        Ok(())
    }
}
