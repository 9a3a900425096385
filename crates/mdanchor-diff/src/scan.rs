//! File-boundary and path bookkeeping shared by both diff formats
//!
//! Both the unified and the porcelain parser see the same header lines
//! (`diff --git`, `---`/`+++`, `rename from`/`rename to`); only the hunk
//! bodies differ. `FileCollector` owns the per-run anchor counter and the
//! currently open file, and decides when a file is finalized.

use crate::types::{is_markdown_path, FileDiff, LineChange};

/// Parsed `@@ -old_start[,old_count] +new_start[,new_count] @@` header.
/// Omitted counts default to 1.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HunkHeader {
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
}

impl HunkHeader {
    /// Raw lines belonging to the hunk body, counting target-side lines only.
    pub fn budget(&self) -> usize {
        self.old_count.max(self.new_count)
    }
}

pub(crate) fn parse_hunk_header(re: &regex::Regex, line: &str) -> Option<HunkHeader> {
    let caps = re.captures(line)?;
    let count = |i: usize| {
        caps.get(i)
            .map_or(1, |m| m.as_str().parse().unwrap_or(1))
    };
    Some(HunkHeader {
        old_count: count(2),
        new_start: caps[3].parse().ok()?,
        new_count: count(4),
    })
}

pub(crate) const HUNK_HEADER_PATTERN: &str = r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@";

/// What the caller should do with the current file's remaining lines.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FileCheck {
    /// No path line seen yet for this file.
    NotReady,
    /// Both sides present and Markdown: scan hunks.
    Scan,
    /// Non-Markdown file, or already finalized: ignore the rest.
    Skip,
}

#[derive(Default)]
struct PendingFile {
    from_file: Option<String>,
    to_file: Option<String>,
    changes: Vec<LineChange>,
    emitted: bool,
    skip_rest: bool,
}

impl PendingFile {
    fn has_paths(&self) -> bool {
        self.from_file.is_some() || self.to_file.is_some()
    }
}

/// Accumulates `FileDiff`s across one parse run.
pub(crate) struct FileCollector {
    result: Vec<FileDiff>,
    pending: Option<PendingFile>,
    anchor_no: u32,
}

impl FileCollector {
    pub fn new() -> Self {
        Self {
            result: Vec::new(),
            pending: None,
            anchor_no: 0,
        }
    }

    /// `diff --git` seen: finalize the previous file and open a new one.
    pub fn on_boundary(&mut self) {
        self.flush_pending();
        self.pending = Some(PendingFile::default());
    }

    fn flush_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            if pending.has_paths() && !pending.emitted {
                self.result.push(FileDiff {
                    from_file: pending.from_file,
                    to_file: pending.to_file,
                    line_changes: pending.changes,
                });
            }
        }
    }

    /// `---` line: path in the old revision, `None` for `/dev/null`.
    pub fn set_from_file(&mut self, path: Option<String>) {
        if let Some(pending) = self.pending.as_mut() {
            pending.from_file = path;
        }
    }

    /// `+++` line: path in the new revision.
    pub fn set_to_file(&mut self, path: Option<String>) {
        if let Some(pending) = self.pending.as_mut() {
            pending.to_file = path;
        }
    }

    /// `rename from` / `rename to`: provisional paths for renames that carry
    /// no `---`/`+++` lines at all. Overridden by real path lines if present.
    pub fn set_rename_from(&mut self, path: String) {
        if let Some(pending) = self.pending.as_mut() {
            pending.from_file = Some(path);
        }
    }

    pub fn set_rename_to(&mut self, path: String) {
        if let Some(pending) = self.pending.as_mut() {
            pending.to_file = Some(path);
        }
    }

    /// True once the current file's remaining lines are known to be
    /// irrelevant (non-Markdown, or finalized early as an add/delete).
    pub fn is_skipping(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.skip_rest)
    }

    /// Decide what to do with the rest of the current file. Pure adds and
    /// deletes are finalized here, with no line-level detail, the first time
    /// a non-header line is reached.
    pub fn check_file(&mut self) -> FileCheck {
        let Some(pending) = self.pending.as_mut() else {
            return FileCheck::NotReady;
        };
        if pending.skip_rest {
            return FileCheck::Skip;
        }
        if !pending.has_paths() {
            return FileCheck::NotReady;
        }

        let non_markdown = |p: &Option<String>| p.as_deref().is_some_and(|p| !is_markdown_path(p));
        if non_markdown(&pending.from_file) || non_markdown(&pending.to_file) {
            // Keep the file for its add/rename/delete status, but do not
            // scan hunk bodies.
            pending.skip_rest = true;
            return FileCheck::Skip;
        }

        if pending.from_file.is_none() || pending.to_file.is_none() {
            pending.skip_rest = true;
            pending.emitted = true;
            let diff = FileDiff {
                from_file: pending.from_file.clone(),
                to_file: pending.to_file.clone(),
                line_changes: Vec::new(),
            };
            self.result.push(diff);
            return FileCheck::Skip;
        }

        FileCheck::Scan
    }

    /// Record one changed span, taking the next anchor number.
    pub fn push_change(&mut self, line_no: usize, col_start: usize, col_end: usize) {
        let anchor_no = self.anchor_no;
        self.anchor_no += 1;
        if let Some(pending) = self.pending.as_mut() {
            pending.changes.push(LineChange {
                line_no,
                col_start,
                col_end,
                anchor_no,
            });
        }
    }

    /// End of input: finalize any still-open file.
    pub fn finish(mut self) -> Vec<FileDiff> {
        self.flush_pending();
        self.result
    }
}

/// Extract the path from a `---`/`+++` line body (marker already stripped).
///
/// `Ok(Some(path))` for `a/...` or `b/...`, `Ok(None)` for `/dev/null`,
/// `Err(())` for anything else (malformed, logged by the caller).
pub(crate) fn strip_path_prefix(body: &str) -> Result<Option<String>, ()> {
    if body == "/dev/null" {
        Ok(None)
    } else if body.starts_with("a/") || body.starts_with("b/") {
        Ok(Some(body[2..].to_string()))
    } else {
        Err(())
    }
}
