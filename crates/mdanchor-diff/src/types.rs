//! Change record types shared by both diff parsers

use serde::{Deserialize, Serialize};

/// One changed region within one line of the new (target) revision.
///
/// `col_start`/`col_end` are 0-based half-open *character* offsets within the
/// line. `col_end == col_start` is a valid empty span (e.g. a trailing blank
/// line added). Character offsets are used because target files may contain
/// multibyte text; callers slicing a line must convert to byte offsets first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChange {
    /// 1-based line number in the target file.
    pub line_no: usize,
    pub col_start: usize,
    pub col_end: usize,
    /// Strictly increasing across one whole parse run, never reset per file,
    /// so anchor ids cannot collide across files in one build.
    pub anchor_no: u32,
}

/// One file's change summary.
///
/// `from_file` is absent for a pure addition, `to_file` for a deletion.
/// A rename or mode-only change carries both paths and no line changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub from_file: Option<String>,
    pub to_file: Option<String>,
    pub line_changes: Vec<LineChange>,
}

impl FileDiff {
    /// True when the file exists on both sides and has line-level detail.
    pub fn is_annotatable(&self) -> bool {
        self.from_file.is_some() && self.to_file.is_some() && !self.line_changes.is_empty()
    }
}

/// Which `git diff` output format to request and parse.
///
/// The two modes produce structurally different spans on purpose: unified
/// diffs report whole lines (`col_end` = line length), porcelain word diffs
/// report individual tokens. Callers pick the granularity they want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordDiffMode {
    None,
    Porcelain,
}

/// File extensions considered Markdown sources.
pub(crate) const MARKDOWN_EXTENSIONS: &[&str] = &[".md", ".markdown"];

pub(crate) fn is_markdown_path(path: &str) -> bool {
    MARKDOWN_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
