// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use url::Url;

use crate::error::{GateError, Result};
use crate::keys::{SERVICE_KEY, SERVICE_URL};
use crate::source::ConfigurationSource;

/// Typed view of the service endpoint and its service-role secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub url: Url,
    pub key: String,
}

impl ServiceCredentials {
    pub fn from_source(source: &ConfigurationSource) -> Result<Self> {
        let raw_url = source
            .get_non_empty(SERVICE_URL)
            .ok_or_else(|| GateError::missing(SERVICE_URL))?;
        let key = source
            .get_non_empty(SERVICE_KEY)
            .ok_or_else(|| GateError::missing(SERVICE_KEY))?;

        let url = Url::parse(raw_url).map_err(|e| GateError::InvalidValue {
            key: SERVICE_URL.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            url,
            key: key.to_string(),
        })
    }
}

// Never print the secret.
impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("url", &self.url.as_str())
            .field("key", &"***")
            .finish()
    }
}
