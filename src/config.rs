// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use config::{Environment, File};
use log::info;
use serde::{Deserialize, Serialize};

use crate::env_file::DEFAULT_ENV_FILE;
use crate::error::Result;
use crate::gate::{ConfigGate, LoadOutcome};
use crate::keys::{RequiredKeySet, SERVICE_KEY, SERVICE_URL};
use crate::source::{ConfigurationSource, Precedence};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

/// Settings for the gate itself: where overrides live and what is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Override files, loaded in order. Relative paths resolve against the project root.
    pub env_files: Vec<PathBuf>,
    pub required_keys: Vec<String>,
    pub precedence: Precedence,
    /// Treat an unreadable override file as fatal instead of skipping it.
    pub strict_env_files: bool,
    pub log: LogConfig,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> std::result::Result<Self, config::ConfigError> {
        let mut config_builder = config::Config::builder()
            .set_default("env_files", vec![DEFAULT_ENV_FILE])?
            .set_default("required_keys", vec![SERVICE_URL, SERVICE_KEY])?
            .set_default("precedence", "environment")?
            .set_default("strict_env_files", false)?
            // Log defaults
            .set_default("log.level", "info")?;

        if let Some(path) = config_path {
            config_builder = config_builder.add_source(File::with_name(path));
        }

        // e.g. `ENVGATE_REQUIRED_KEYS=SERVICE_URL,SERVICE_KEY`
        // or `ENVGATE_LOG__LEVEL=debug` for nested values
        config_builder = config_builder.add_source(
            Environment::with_prefix("ENVGATE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("env_files")
                .with_list_parse_key("required_keys")
                .try_parsing(true)
                .ignore_empty(true),
        );

        config_builder.build()?.try_deserialize()
    }

    pub fn required_key_set(&self) -> RequiredKeySet {
        self.required_keys.iter().cloned().collect()
    }

    /// Override file paths with relative entries joined onto `root`.
    pub fn env_file_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.env_files.iter().map(|file| root.join(file)).collect()
    }

    /// Renders the effective settings as TOML.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { level: "info".to_string() }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env_files: vec![PathBuf::from(DEFAULT_ENV_FILE)],
            required_keys: vec![SERVICE_URL.to_string(), SERVICE_KEY.to_string()],
            precedence: Precedence::Environment,
            strict_env_files: false,
            log: LogConfig::default(),
        }
    }
}

/// Loads every configured override file on top of the process environment.
///
/// Returns the gate still closed together with the per-file outcomes. In
/// strict mode the first unreadable file is returned as an error.
pub fn prepare(settings: &Settings, root: &Path) -> Result<(ConfigGate, Vec<LoadOutcome>)> {
    prepare_from(ConfigurationSource::from_env(), settings, root)
}

/// Same as [`prepare`], starting from an explicit base source.
pub fn prepare_from(
    base: ConfigurationSource,
    settings: &Settings,
    root: &Path,
) -> Result<(ConfigGate, Vec<LoadOutcome>)> {
    let mut gate = ConfigGate::new(base).with_precedence(settings.precedence);
    let mut outcomes = Vec::with_capacity(settings.env_files.len());
    for path in settings.env_file_paths(root) {
        let outcome = gate.load(path);
        let outcome = if settings.strict_env_files {
            outcome.into_result()?
        } else {
            outcome
        };
        outcomes.push(outcome);
    }
    Ok((gate, outcomes))
}

/// The full startup sequence: snapshot the environment, load overrides,
/// and open the gate on the configured required keys.
pub fn bootstrap(settings: &Settings, root: &Path) -> Result<ConfigurationSource> {
    bootstrap_from(ConfigurationSource::from_env(), settings, root)
}

pub fn bootstrap_from(
    base: ConfigurationSource,
    settings: &Settings,
    root: &Path,
) -> Result<ConfigurationSource> {
    let (gate, _) = prepare_from(base, settings, root)?;
    let source = gate.open(&settings.required_key_set())?;
    info!(
        "Configuration ready: {} required keys present",
        settings.required_keys.len()
    );
    Ok(source)
}
