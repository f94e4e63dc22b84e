//! The external-process primitive for filesystem discovery and copying
//!
//! Directory creation, glob expansion, directory tests and copies are
//! delegated to `sh` so steal patterns get ordinary shell-glob
//! semantics. Every command runs with the project root as its working
//! directory, so relative paths in the documents resolve against the
//! project no matter where the tool is invoked from.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::Error;

/// Runs filesystem commands rooted at a project directory.
#[derive(Debug, Clone)]
pub struct Shell {
    root: PathBuf,
}

impl Shell {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn run(&self, command: &str) -> Result<std::process::Output, Error> {
        debug!(command, root = %self.root.display(), "executing");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.root)
            .output()?;
        Ok(output)
    }

    /// `mkdir -p`: create a directory and any missing ancestors.
    pub fn mkdir_p(&self, directory: &str) -> Result<(), Error> {
        let command = format!("mkdir -p {directory}");
        let output = self.run(&command)?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                status: output.status.to_string(),
            });
        }
        Ok(())
    }

    /// Expand a glob pattern to concrete paths via `ls -d`.
    ///
    /// A failing `ls` (typically: nothing matched) is an empty result,
    /// not an error; migration is opportunistic.
    pub fn glob(&self, pattern: &str) -> Result<Vec<String>, Error> {
        let output = self.run(&format!("ls -d {pattern}"))?;
        if !output.status.success() {
            debug!(pattern, "no matches");
            return Ok(Vec::new());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// `[ -d path ]`: whether the path names a directory.
    pub fn is_dir(&self, path: &str) -> bool {
        self.run(&format!("[ -d {path} ]"))
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Copy a path into a directory, recursively for directories.
    pub fn copy(&self, recursive: bool, source: &str, destination: &str) -> Result<(), Error> {
        let flag = if recursive { "-R " } else { "" };
        let command = format!("cp {flag}{source} {destination}");
        let output = self.run(&command)?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                status: output.status.to_string(),
            });
        }
        Ok(())
    }
}
