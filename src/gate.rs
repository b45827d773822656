// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The configuration gate.
//!
//! A [`ConfigGate`] owns the configuration store while it is being
//! assembled. Override files are merged with [`ConfigGate::load`], and the
//! store is released to consumers only through [`ConfigGate::open`], which
//! fails on the first required key that is absent or empty. Code that holds
//! a [`ConfigurationSource`] obtained from `open` can therefore assume every
//! required key has a value.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::env_file;
use crate::error::{GateError, Result};
use crate::keys::RequiredKeySet;
use crate::source::{ConfigurationSource, Precedence};

/// What happened when an override file was loaded.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        path: PathBuf,
        applied: usize,
        kept: usize,
    },
    /// The file does not exist. Not an error.
    Missing { path: PathBuf },
    /// The file exists but could not be read or parsed; nothing was merged.
    Unreadable { path: PathBuf, error: GateError },
}

impl LoadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            LoadOutcome::Loaded { path, .. }
            | LoadOutcome::Missing { path }
            | LoadOutcome::Unreadable { path, .. } => path,
        }
    }

    /// Converts an unreadable outcome into its error, for strict callers.
    pub fn into_result(self) -> Result<LoadOutcome> {
        match self {
            LoadOutcome::Unreadable { error, .. } => Err(error),
            other => Ok(other),
        }
    }

    /// Short status used in reports: `loaded`, `missing` or `unreadable`.
    pub fn status(&self) -> &'static str {
        match self {
            LoadOutcome::Loaded { .. } => "loaded",
            LoadOutcome::Missing { .. } => "missing",
            LoadOutcome::Unreadable { .. } => "unreadable",
        }
    }
}

/// Presence of each required key, by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateReport {
    pub ready: bool,
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigGate {
    source: ConfigurationSource,
    precedence: Precedence,
}

impl ConfigGate {
    pub fn new(source: ConfigurationSource) -> Self {
        Self {
            source,
            precedence: Precedence::default(),
        }
    }

    /// Starts from a snapshot of the process environment.
    pub fn from_process_env() -> Self {
        Self::new(ConfigurationSource::from_env())
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn source(&self) -> &ConfigurationSource {
        &self.source
    }

    /// Merges the override file at `path` into the store.
    ///
    /// A missing file leaves the store untouched. An unreadable file is
    /// logged and reported but does not stop loading; only missing
    /// *required keys* are fatal.
    pub fn load(&mut self, path: impl AsRef<Path>) -> LoadOutcome {
        let path = path.as_ref().to_path_buf();
        match env_file::read_pairs(&path) {
            Ok(Some(pairs)) => {
                let stats = self.source.merge(pairs, self.precedence);
                info!(
                    "Loaded {} ({} applied, {} kept from environment)",
                    path.display(),
                    stats.applied,
                    stats.kept
                );
                LoadOutcome::Loaded {
                    path,
                    applied: stats.applied,
                    kept: stats.kept,
                }
            }
            Ok(None) => {
                debug!("Override file {} not present, skipping", path.display());
                LoadOutcome::Missing { path }
            }
            Err(error) => {
                warn!("Ignoring override file: {}", error);
                LoadOutcome::Unreadable { path, error }
            }
        }
    }

    /// Fails on the first key in `keys` that is absent or empty.
    pub fn assert_required(&self, keys: &RequiredKeySet) -> Result<()> {
        for key in keys.iter() {
            if self.source.get_non_empty(key).is_none() {
                return Err(GateError::missing(key));
            }
        }
        Ok(())
    }

    /// Every key in `keys` that is absent or empty, in declaration order.
    pub fn missing<'k>(&self, keys: &'k RequiredKeySet) -> Vec<&'k str> {
        keys.iter()
            .filter(|key| self.source.get_non_empty(key).is_none())
            .collect()
    }

    pub fn report(&self, keys: &RequiredKeySet) -> GateReport {
        let (present, missing): (Vec<&str>, Vec<&str>) = keys
            .iter()
            .partition(|key| self.source.get_non_empty(key).is_some());
        GateReport {
            ready: missing.is_empty(),
            present: present.into_iter().map(String::from).collect(),
            missing: missing.into_iter().map(String::from).collect(),
        }
    }

    /// Checks `keys` and, only if all are set, hands over the store.
    pub fn open(self, keys: &RequiredKeySet) -> Result<ConfigurationSource> {
        self.assert_required(keys)?;
        debug!("Configuration gate open ({} required keys)", keys.len());
        Ok(self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{SERVICE_KEY, SERVICE_URL};
    use std::fs;
    use tempfile::TempDir;

    fn gate_with(pairs: &[(&str, &str)]) -> ConfigGate {
        ConfigGate::new(pairs.iter().copied().collect())
    }

    #[test]
    fn test_assert_required_passes_when_all_set() {
        let gate = gate_with(&[(SERVICE_URL, "https://example.test"), (SERVICE_KEY, "abc123")]);
        assert!(gate.assert_required(&RequiredKeySet::service()).is_ok());
    }

    #[test]
    fn test_assert_required_reports_first_missing_key() {
        let gate = ConfigGate::default();
        let err = gate.assert_required(&RequiredKeySet::service()).unwrap_err();
        assert_eq!(err.missing_key(), Some(SERVICE_URL));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let gate = gate_with(&[(SERVICE_URL, "https://example.test"), (SERVICE_KEY, "")]);
        let err = gate.assert_required(&RequiredKeySet::service()).unwrap_err();
        assert_eq!(err.missing_key(), Some(SERVICE_KEY));
    }

    #[test]
    fn test_empty_key_set_always_passes() {
        assert!(ConfigGate::default().assert_required(&RequiredKeySet::new()).is_ok());
    }

    #[test]
    fn test_missing_lists_every_absent_key() {
        let gate = gate_with(&[(SERVICE_KEY, "abc123")]);
        let keys: RequiredKeySet = [SERVICE_URL, SERVICE_KEY, "OTHER"].into_iter().collect();
        assert_eq!(gate.missing(&keys), vec![SERVICE_URL, "OTHER"]);

        let report = gate.report(&keys);
        assert!(!report.ready);
        assert_eq!(report.present, vec![SERVICE_KEY.to_string()]);
        assert_eq!(report.missing, vec![SERVICE_URL.to_string(), "OTHER".to_string()]);
    }

    #[test]
    fn test_open_hands_over_source() {
        let gate = gate_with(&[(SERVICE_URL, "https://example.test"), (SERVICE_KEY, "abc123")]);
        let source = gate.open(&RequiredKeySet::service()).unwrap();
        assert_eq!(source.get(SERVICE_KEY), Some("abc123"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut gate = gate_with(&[("A", "1")]);
        let outcome = gate.load(dir.path().join(".env.local"));
        assert!(matches!(outcome, LoadOutcome::Missing { .. }));
        assert_eq!(outcome.status(), "missing");
        assert_eq!(gate.source().len(), 1);
    }

    #[test]
    fn test_load_unreadable_file_merges_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.local");
        fs::write(&path, "SERVICE_URL=https://example.test\n!!! broken\n").unwrap();

        let mut gate = ConfigGate::default();
        let outcome = gate.load(&path);
        assert_eq!(outcome.status(), "unreadable");
        assert!(gate.source().is_empty());
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_load_respects_precedence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.local");
        fs::write(&path, "SERVICE_URL=https://file.test\n").unwrap();

        let mut env_wins = gate_with(&[(SERVICE_URL, "https://env.test")]);
        env_wins.load(&path);
        assert_eq!(env_wins.source().get(SERVICE_URL), Some("https://env.test"));

        let mut file_wins = gate_with(&[(SERVICE_URL, "https://env.test")]).with_precedence(Precedence::File);
        match file_wins.load(&path) {
            LoadOutcome::Loaded { applied, kept, .. } => assert_eq!((applied, kept), (1, 0)),
            other => panic!("expected Loaded, got {:?}", other),
        }
        assert_eq!(file_wins.source().get(SERVICE_URL), Some("https://file.test"));
    }
}
