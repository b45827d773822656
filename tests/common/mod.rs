// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// A scratch project root holding override files.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp project root"),
        }
    }

    pub fn with_env_local(content: &str) -> Self {
        let project = Self::new();
        project.write(".env.local", content);
        project
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write override file");
        path
    }

    pub fn root(&self) -> &std::path::Path {
        self.dir.path()
    }
}

/// Runs the built `envgate` binary from `project` with a controlled environment.
pub fn run_envgate(project: &TestProject, env: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_envgate"))
        .current_dir(project.root())
        .env_clear()
        .env("PATH", std::env::var("PATH").unwrap_or_default())
        .envs(env.iter().copied())
        .args(args)
        .output()
        .expect("Failed to run envgate binary")
}
