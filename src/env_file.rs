// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `.env`-style override files.
//!
//! Files hold newline-separated `KEY=VALUE` entries. Lines whose first
//! non-blank character is `#` are comments and blank lines are skipped.
//! Everything after the first `=` is the value, taken literally: no quote
//! stripping, escapes or `$VAR` expansion. Nothing here ever touches the
//! process environment; pairs are handed back to the caller, which merges
//! them into a [`ConfigurationSource`].
//!
//! [`ConfigurationSource`]: crate::source::ConfigurationSource

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::error::{GateError, Result};

/// Conventional name of the local override file at a project root.
pub const DEFAULT_ENV_FILE: &str = ".env.local";

/// Why an override file could not be parsed.
///
/// Line content is deliberately left out so values never end up in logs.
#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: &'static str },

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Parses every entry from `reader`, in file order.
///
/// The whole input is parsed before anything is returned, so a malformed
/// line yields an error instead of a partial list.
pub fn parse_pairs<R: Read>(reader: R) -> std::result::Result<Vec<(String, String)>, EnvFileError> {
    let mut pairs = Vec::new();
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if let Some(pair) = parse_line(&line, index + 1)? {
            pairs.push(pair);
        }
    }
    Ok(pairs)
}

fn parse_line(line: &str, number: usize) -> std::result::Result<Option<(String, String)>, EnvFileError> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let malformed = |reason| EnvFileError::MalformedLine { line: number, reason };
    let (key, value) = trimmed.split_once('=').ok_or_else(|| malformed("expected KEY=VALUE"))?;
    let key = key.trim_end();
    if key.is_empty() {
        return Err(malformed("empty key"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(malformed("key contains whitespace"));
    }
    Ok(Some((key.to_string(), value.to_string())))
}

/// Reads the override file at `path`.
///
/// Returns `Ok(None)` when the file does not exist; an absent override file
/// is never an error.
pub fn read_pairs(path: &Path) -> Result<Option<Vec<(String, String)>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No override file at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(unreadable(path, e.to_string())),
    };

    let pairs = parse_pairs(file).map_err(|e| unreadable(path, e.to_string()))?;
    debug!("Parsed {} entries from {}", pairs.len(), path.display());
    Ok(Some(pairs))
}

fn unreadable(path: &Path, reason: String) -> GateError {
    GateError::SourceUnreadable {
        path: path.to_path_buf(),
        reason,
    }
}
