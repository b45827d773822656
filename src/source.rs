// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

/// Decides whether an override file may replace values already in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precedence {
    /// Existing non-empty values win; file values only fill absent or empty keys.
    #[default]
    Environment,
    /// File values replace whatever is already present.
    File,
}

/// Counts produced by [`ConfigurationSource::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Entries written into the store.
    pub applied: usize,
    /// Entries dropped because an existing value took precedence.
    pub kept: usize,
}

/// The merged key/value configuration available to the process.
///
/// Entries keep insertion order. Once handed out by the gate the store is
/// only read; nothing in this crate writes back to `std::env`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSource {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ConfigurationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        let mut source = Self::new();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => source.set(key, value),
                (key, _) => debug!("Skipping non UTF-8 environment variable {:?}", key),
            }
        }
        source
    }

    /// Returns the value for `key`, including empty values.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .and_then(|&i| self.entries.get(i))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value for `key` only when it is non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or replaces a value. A replaced key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => {
                if let Some(entry) = self.entries.get_mut(i) {
                    entry.1 = value;
                }
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Merges externally loaded pairs according to `precedence`.
    ///
    /// Under [`Precedence::Environment`] a pair is written only when the key
    /// is absent or empty *before* the merge started, so later duplicates in
    /// the same batch still replace earlier ones.
    pub fn merge<I, K, V>(&mut self, pairs: I, precedence: Precedence) -> MergeStats
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let protected: HashSet<String> = match precedence {
            Precedence::File => HashSet::new(),
            Precedence::Environment => self
                .entries
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, _)| key.clone())
                .collect(),
        };

        let mut stats = MergeStats::default();
        for (key, value) in pairs {
            let key = key.into();
            if protected.contains(&key) {
                debug!("Keeping existing value for {}", key);
                stats.kept += 1;
                continue;
            }
            self.set(key, value);
            stats.applied += 1;
        }
        stats
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigurationSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = ConfigurationSource::new();
        for (key, value) in iter {
            source.set(key, value);
        }
        source
    }
}
