// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command line surface of the `envgate` binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use serde::Serialize;

use crate::config::{prepare, Settings};
use crate::error::{GateError, Result};
use crate::gate::{GateReport, LoadOutcome};
use crate::source::Precedence;

/// Configuration was complete (or the child exited successfully).
pub const EXIT_OK: i32 = 0;
/// A required key is missing.
pub const EXIT_MISSING_CONFIG: i32 = 1;
/// Settings, usage or strict-mode source errors.
pub const EXIT_USAGE: i32 = 2;
/// The child started by `run` was killed by a signal.
pub const EXIT_SIGNALED: i32 = 128;

#[derive(Parser, Debug)]
#[command(name = "envgate", version, about = "Check required configuration before running tests or services")]
pub struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "ENVGATE_CONFIG")]
    pub config: Option<String>,

    /// Override file to load; repeat to load several in order
    #[arg(long = "env-file", global = true)]
    pub env_files: Vec<PathBuf>,

    /// Key that must be set and non-empty; repeat for several
    #[arg(long = "require", global = true)]
    pub required_keys: Vec<String>,

    /// Whether override files may replace values already in the environment
    #[arg(long, global = true, value_enum)]
    pub precedence: Option<PrecedenceArg>,

    /// Project root that relative override files resolve against
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report which required keys are present or missing
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a command with the merged configuration once every required key is set
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Print the effective gate settings as TOML
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrecedenceArg {
    Environment,
    File,
}

impl From<PrecedenceArg> for Precedence {
    fn from(arg: PrecedenceArg) -> Self {
        match arg {
            PrecedenceArg::Environment => Precedence::Environment,
            PrecedenceArg::File => Precedence::File,
        }
    }
}

impl Cli {
    /// Loads settings and applies command line overrides on top.
    pub fn settings(&self) -> std::result::Result<Settings, config::ConfigError> {
        let mut settings = Settings::new(self.config.as_deref())?;
        if !self.env_files.is_empty() {
            settings.env_files = self.env_files.clone();
        }
        if !self.required_keys.is_empty() {
            settings.required_keys = self.required_keys.clone();
        }
        if let Some(precedence) = self.precedence {
            settings.precedence = precedence.into();
        }
        Ok(settings)
    }

    pub fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

#[derive(Debug, Serialize)]
struct FileStatus {
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    files: Vec<FileStatus>,
    #[serde(flatten)]
    gate: GateReport,
}

impl From<&LoadOutcome> for FileStatus {
    fn from(outcome: &LoadOutcome) -> Self {
        FileStatus {
            path: outcome.path().display().to_string(),
            status: outcome.status(),
            error: match outcome {
                LoadOutcome::Unreadable { error, .. } => Some(error.to_string()),
                _ => None,
            },
        }
    }
}

/// Executes the parsed command and returns the process exit code.
///
/// Output is flushed before returning; a failed flush is an error.
pub fn execute<W: Write>(cli: &Cli, settings: &Settings, out: &mut W) -> Result<i32> {
    let code = run_command(cli, settings, out)?;
    out.flush()?;
    Ok(code)
}

fn run_command<W: Write>(cli: &Cli, settings: &Settings, out: &mut W) -> Result<i32> {
    match &cli.command {
        Command::Settings => {
            let rendered = settings.to_toml().map_err(|e| GateError::Render(e.to_string()))?;
            write!(out, "{}", rendered)?;
            Ok(EXIT_OK)
        }
        Command::Check { json } => {
            let root = cli.root()?;
            let (gate, outcomes) = prepare(settings, &root)?;
            let report = gate.report(&settings.required_key_set());
            let ready = report.ready;
            let output = CheckOutput {
                files: outcomes.iter().map(FileStatus::from).collect(),
                gate: report,
            };
            if *json {
                let rendered =
                    serde_json::to_string_pretty(&output).map_err(|e| GateError::Render(e.to_string()))?;
                writeln!(out, "{}", rendered)?;
            } else {
                write_text_report(out, &output)?;
            }
            Ok(if ready { EXIT_OK } else { EXIT_MISSING_CONFIG })
        }
        Command::Run { command } => {
            let root = cli.root()?;
            let (gate, _) = prepare(settings, &root)?;
            let source = gate.open(&settings.required_key_set())?;

            let (program, args) = match command.split_first() {
                Some(split) => split,
                None => return Ok(EXIT_USAGE),
            };
            info!("Configuration ready, running {}", program);
            let status = ProcessCommand::new(program)
                .args(args)
                .current_dir(&root)
                .env_clear()
                .envs(source.iter())
                .status()?;
            Ok(status.code().unwrap_or_else(|| {
                error!("{} terminated by signal", program);
                EXIT_SIGNALED
            }))
        }
    }
}

fn write_text_report<W: Write>(out: &mut W, output: &CheckOutput) -> std::io::Result<()> {
    for file in &output.files {
        match &file.error {
            Some(e) => writeln!(out, "{:<10} {} ({})", file.status, file.path, e)?,
            None => writeln!(out, "{:<10} {}", file.status, file.path)?,
        }
    }
    for key in &output.gate.present {
        writeln!(out, "present    {}", key)?;
    }
    for key in &output.gate.missing {
        writeln!(out, "MISSING    {}", key)?;
    }
    if output.gate.ready {
        writeln!(out, "ready")
    } else {
        writeln!(out, "not ready: {} required key(s) missing", output.gate.missing.len())
    }
}

/// Maps an error surfaced by [`execute`] to an exit code.
pub fn exit_code_for(err: &GateError) -> i32 {
    match err {
        GateError::MissingConfiguration { .. } => EXIT_MISSING_CONFIG,
        _ => EXIT_USAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// Accepts writes but fails every flush, like a closed pipe.
    struct BrokenPipe(Vec<u8>);

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("envgate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_run_keeps_trailing_args() {
        let cli = parse(&["--require", "A", "run", "--", "cargo", "test", "--release"]);
        match cli.command {
            Command::Run { command } => assert_eq!(command, vec!["cargo", "test", "--release"]),
            other => panic!("expected run, got {:?}", other),
        }
        assert_eq!(cli.required_keys, vec!["A"]);
    }

    #[test]
    fn test_run_requires_a_command() {
        assert!(Cli::try_parse_from(["envgate", "run"]).is_err());
    }

    #[test]
    #[serial]
    fn test_check_text_report_names_missing_key() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("gate.env"), "ENVGATE_TEST_PRESENT=s3cr3t-value\n").unwrap();
        let root = dir.path().to_str().unwrap();

        let cli = parse(&[
            "--root", root,
            "--env-file", "gate.env",
            "--require", "ENVGATE_TEST_PRESENT",
            "--require", "ENVGATE_TEST_ABSENT_KEY",
            "check",
        ]);
        let settings = cli.settings().unwrap();

        let mut out = Vec::new();
        let code = execute(&cli, &settings, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(code, EXIT_MISSING_CONFIG);
        assert!(text.contains("present    ENVGATE_TEST_PRESENT"));
        assert!(text.contains("MISSING    ENVGATE_TEST_ABSENT_KEY"));
        assert!(!text.contains("s3cr3t-value"));
    }

    #[test]
    fn test_failed_flush_is_reported() {
        let cli = parse(&["settings"]);
        let mut out = BrokenPipe(Vec::new());
        let err = execute(&cli, &Settings::default(), &mut out).unwrap_err();

        assert!(matches!(err, GateError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(exit_code_for(&err), EXIT_USAGE);
        assert!(!out.0.is_empty());
    }

    #[test]
    fn test_settings_output_is_flushed_toml() {
        let cli = parse(&["settings"]);
        let mut out = Vec::new();
        assert_eq!(execute(&cli, &Settings::default(), &mut out).unwrap(), EXIT_OK);
        assert!(String::from_utf8(out).unwrap().contains("[log]"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&GateError::missing("A")), EXIT_MISSING_CONFIG);
        let unreadable = GateError::SourceUnreadable {
            path: PathBuf::from(".env.local"),
            reason: "bad".to_string(),
        };
        assert_eq!(exit_code_for(&unreadable), EXIT_USAGE);
        assert_eq!(exit_code_for(&GateError::Render("bad".to_string())), EXIT_USAGE);
    }
}
