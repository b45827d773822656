// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Test helpers module
//! Gates a test binary on its configuration before any dependent test runs.

use std::path::Path;
use std::sync::OnceLock;

use log::error;

use crate::cli::EXIT_MISSING_CONFIG;
use crate::config::{bootstrap, Settings};
use crate::error::Result;
use crate::source::ConfigurationSource;

static TEST_ENV: OnceLock<Result<ConfigurationSource>> = OnceLock::new();

/// Loads gate settings and overrides for the project at `root` and checks
/// the required keys.
pub fn bootstrap_test_env(root: &Path) -> Result<ConfigurationSource> {
    let settings = Settings::new(None)?;
    bootstrap(&settings, root)
}

/// Returns the gated configuration for this test process.
///
/// The bootstrap runs once, against the current directory (cargo runs tests
/// from the package root). If a required key is missing the whole test
/// process exits with [`EXIT_MISSING_CONFIG`], so no test ever runs against
/// an unset credential.
pub fn require_test_env() -> &'static ConfigurationSource {
    let outcome = TEST_ENV.get_or_init(|| {
        let root = std::env::current_dir()?;
        bootstrap_test_env(&root)
    });

    match outcome {
        Ok(source) => source,
        Err(e) => {
            error!("Test environment not configured: {}", e);
            eprintln!("Test environment not configured: {}", e);
            std::process::exit(EXIT_MISSING_CONFIG);
        }
    }
}
