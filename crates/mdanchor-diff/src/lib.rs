//! Git diff invocation and parsing for mdanchor
//!
//! This crate turns raw `git diff` output into per-file change records with
//! line and column granularity. Two output formats are understood:
//!
//! - plain unified diffs (`--unified=0`), which yield whole-line spans
//! - word diffs (`--word-diff=porcelain`), which yield sub-line token spans
//!
//! The diff itself is always computed by the external `git` binary; this
//! crate only runs it and parses the text.

mod error;
mod git;
mod porcelain;
mod scan;
mod types;
mod unified;

pub use error::DiffError;
pub use git::{repo_root, run_git_diff};
pub use porcelain::parse_porcelain_diff;
pub use types::{FileDiff, LineChange, WordDiffMode};
pub use unified::parse_unified_diff;

/// Parse diff text in the format matching `mode`.
pub fn parse_diff(diff_text: &str, mode: WordDiffMode) -> Vec<FileDiff> {
    match mode {
        WordDiffMode::None => parse_unified_diff(diff_text),
        WordDiffMode::Porcelain => parse_porcelain_diff(diff_text),
    }
}
