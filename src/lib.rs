// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Library core for envgate.
//!
//! Loads `.env`-style overrides on top of the process environment and refuses
//! to hand out configuration until every required key has a non-empty value.

// --- Modules ---
pub mod cli;
pub mod config;
pub mod credentials;
pub mod env_file;
pub mod error;
pub mod gate;
pub mod keys;
pub mod source;
pub mod test_helpers;

pub mod prelude {
    // Config
    pub use crate::config::{bootstrap, Settings};

    // Gate
    pub use crate::credentials::ServiceCredentials;
    pub use crate::error::{GateError, Result};
    pub use crate::gate::{ConfigGate, LoadOutcome};
    pub use crate::keys::{RequiredKeySet, SERVICE_KEY, SERVICE_URL};
    pub use crate::source::{ConfigurationSource, Precedence};
}
