// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration or checking the gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// A required key is absent or holds an empty string. Always fatal.
    #[error("Missing required configuration: {key} is not set or is empty")]
    MissingConfiguration { key: String },

    /// An override file exists but could not be read or parsed.
    #[error("Configuration source unreadable: {}: {reason}", .path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Settings or a report could not be rendered for output.
    #[error("Failed to render output: {0}")]
    Render(String),

    #[error("Failed to load gate settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    pub fn missing(key: impl Into<String>) -> Self {
        GateError::MissingConfiguration { key: key.into() }
    }

    /// Key named by a missing-configuration error, if that is what this is.
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            GateError::MissingConfiguration { key } => Some(key),
            _ => None,
        }
    }

    /// Whether this error must stop the process before dependent code runs.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GateError::SourceUnreadable { .. })
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
