// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Names of the keys that must be configured before dependent code runs.

/// Public endpoint of the backing service.
pub const SERVICE_URL: &str = "SERVICE_URL";
/// Service-role secret for the backing service.
pub const SERVICE_KEY: &str = "SERVICE_KEY";

/// An ordered, duplicate-free set of key names that must resolve to
/// non-empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredKeySet {
    keys: Vec<String>,
}

impl RequiredKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The service endpoint and secret, in that order.
    pub fn service() -> Self {
        [SERVICE_URL, SERVICE_KEY].into_iter().collect()
    }

    /// Adds a key unless it is already declared. Returns `false` for duplicates.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RequiredKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = RequiredKeySet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_keys_in_declaration_order() {
        let keys = RequiredKeySet::service();
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec![SERVICE_URL, SERVICE_KEY]);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let keys: RequiredKeySet = ["B", "A", "B", "A", "C"].into_iter().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut keys = RequiredKeySet::new();
        assert!(keys.is_empty());
        assert!(keys.insert("SERVICE_URL"));
        assert!(!keys.insert(String::from("SERVICE_URL")));
        assert!(keys.contains("SERVICE_URL"));
        assert!(!keys.contains("SERVICE_KEY"));
    }
}
