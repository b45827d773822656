// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::process::exit;

use clap::Parser;
use env_logger::Env;
use envgate::cli::{exit_code_for, execute, Cli, EXIT_USAGE};
use log::error;

fn main() {
    let cli = Cli::parse();

    let settings = cli.settings().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {}", err);
        exit(EXIT_USAGE);
    });

    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log.level.as_str()))
        .target(env_logger::Target::Stderr)
        .init();

    let result = execute(&cli, &settings, &mut std::io::stdout().lock());

    match result {
        Ok(code) => exit(code),
        Err(err) => {
            error!("{}", err);
            eprintln!("envgate: {}", err);
            exit(exit_code_for(&err));
        }
    }
}
