//! Thin wrappers around the external `git` binary

use std::io::ErrorKind;
use std::process::Command;

use crate::error::DiffError;
use crate::types::WordDiffMode;

/// Run `git diff` against `base` and return its stdout.
///
/// Flags match what the parsers expect: no color, whitespace-only changes
/// ignored, zero context lines, and optionally porcelain word diffing.
/// A missing git binary or a non-zero exit is fatal to the whole run.
pub fn run_git_diff(
    base: &str,
    mode: WordDiffMode,
    dir: Option<&str>,
) -> Result<String, DiffError> {
    let mut args = vec!["diff", "--no-color", "--ignore-all-space"];
    if mode == WordDiffMode::Porcelain {
        args.push("--word-diff=porcelain");
    }
    args.push("--unified=0");
    args.push(base);
    if let Some(dir) = dir {
        args.push("--");
        args.push(dir);
    }

    tracing::debug!(?args, "running git diff");
    let output = Command::new("git").args(&args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            DiffError::GitNotFound
        } else {
            DiffError::Io(e)
        }
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let msg = if stderr.is_empty() {
            "git diff failed".to_string()
        } else {
            stderr
        };
        Err(DiffError::GitFailed(msg))
    }
}

/// Absolute path of the repository working tree root.
///
/// Diff output names files relative to this directory, not to the cwd.
pub fn repo_root() -> Result<String, DiffError> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DiffError::GitNotFound
            } else {
                DiffError::Io(e)
            }
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(DiffError::GitFailed("not in a git repository".to_string()))
    }
}
