//! One annotation run: diff once, then annotate file by file
//!
//! The session owns the parsed diff for the duration of a build. It supports
//! two deployment shapes recovered from doc-site integration: rewriting the
//! Markdown sources in place (with sidecar backups and a later restore), and
//! annotating already-loaded page text in memory via [`AnnotateSession::annotate_page`].
//!
//! Per-file problems (unreadable, not UTF-8, unwritable) are logged and the
//! file is skipped; a broken diff invocation aborts the whole run.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use mdanchor_diff::{parse_diff, repo_root, run_git_diff, FileDiff, WordDiffMode};
use mdanchor_mark::{
    classify_lines, embed, embed_list, render_change_list, splice_change_list, ChangeListEntry,
    FileEntry,
};

/// Sidecar extension for backups of rewritten files.
const BACKUP_SUFFIX: &str = ".mdanchor.orig";

#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    pub base: String,
    pub dir: Option<String>,
    pub change_list_file: Option<String>,
    pub mode: WordDiffMode,
}

#[derive(Debug, Default)]
pub struct AnnotateReport {
    pub files: Vec<FileReport>,
}

#[derive(Debug)]
pub struct FileReport {
    pub path: String,
    pub anchors: usize,
}

pub struct AnnotateSession {
    options: AnnotateOptions,
    root: PathBuf,
    changes: Vec<FileDiff>,
}

impl AnnotateSession {
    /// Run the diff once and parse it. Fails when git is unavailable, the
    /// diff command errors, or the cwd is not inside a repository.
    pub fn prepare(options: AnnotateOptions) -> Result<Self> {
        let root = repo_root().context("failed to locate the git repository root")?;
        let diff_text = run_git_diff(&options.base, options.mode, options.dir.as_deref())
            .context("failed to run git diff")?;
        let changes = parse_diff(&diff_text, options.mode);
        info!(files = changes.len(), "parsed diff");
        Ok(Self::from_parts(options, PathBuf::from(root), changes))
    }

    /// Assemble a session from pre-parsed changes. Used by tests and by
    /// hosts that run the diff themselves.
    pub fn from_parts(options: AnnotateOptions, root: PathBuf, changes: Vec<FileDiff>) -> Self {
        Self {
            options,
            root,
            changes,
        }
    }

    pub fn changes(&self) -> &[FileDiff] {
        &self.changes
    }

    /// Rewrite every changed Markdown file in place, wrapping changed spans
    /// in anchor tags, then write the change list. Each file is backed up
    /// to a sidecar first so [`AnnotateSession::restore`] can undo the run.
    pub fn annotate_in_place(&self, dry_run: bool) -> Result<AnnotateReport> {
        let mut report = AnnotateReport::default();
        let mut groups: Vec<FileEntry> = Vec::new();

        for file_diff in &self.changes {
            let Some(to_file) = file_diff.to_file.as_deref() else {
                // Deleted files have nothing to annotate.
                continue;
            };

            if file_diff.from_file.is_none() {
                groups.push(FileEntry {
                    path: to_file.to_string(),
                    is_new: true,
                    entries: Vec::new(),
                });
                continue;
            }
            if file_diff.line_changes.is_empty() {
                continue;
            }

            let path = self.root.join(to_file);
            let content = match read_utf8(&path) {
                Some(content) => content,
                None => continue,
            };

            let lines: Vec<&str> = content.lines().collect();
            let classified = classify_lines(&lines);
            let records = embed_list(&classified, file_diff, 0);
            let mut annotated = embed(&classified, file_diff, 0);
            if content.ends_with('\n') {
                annotated.push('\n');
            }

            if !dry_run {
                let backup = backup_path(&path);
                // An existing sidecar means a previous run was not restored;
                // keep it, it still holds the pristine text.
                if !backup.exists() {
                    if let Err(e) = fs::copy(&path, &backup) {
                        warn!("failed to back up {}: {e}, skipping", path.display());
                        continue;
                    }
                }
                if let Err(e) = fs::write(&path, &annotated) {
                    warn!("failed to write {}: {e}, skipping", path.display());
                    continue;
                }
            }

            groups.push(FileEntry {
                path: to_file.to_string(),
                is_new: false,
                entries: records.iter().map(ChangeListEntry::from_annotated).collect(),
            });
            report.files.push(FileReport {
                path: to_file.to_string(),
                anchors: records.len(),
            });
        }

        if let Some(change_list_file) = self.options.change_list_file.as_deref() {
            if !groups.is_empty() && !dry_run {
                self.write_change_list(change_list_file, &groups)?;
            }
        }

        Ok(report)
    }

    fn write_change_list(&self, change_list_file: &str, groups: &[FileEntry]) -> Result<()> {
        let path = if Path::new(change_list_file).is_absolute() {
            PathBuf::from(change_list_file)
        } else {
            self.root.join(change_list_file)
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = match fs::read_to_string(&path) {
            Ok(existing) => splice_change_list(&existing, groups),
            Err(_) => render_change_list(&self.options.base, groups),
        };
        fs::write(&path, content)
            .with_context(|| format!("failed to write change list {}", path.display()))?;
        info!("wrote change list {}", path.display());
        Ok(())
    }

    /// Undo a previous in-place run by moving sidecar backups over the
    /// annotated files. Returns the number of files restored.
    pub fn restore(&self) -> Result<usize> {
        let mut restored = 0;
        for file_diff in &self.changes {
            let Some(to_file) = file_diff.to_file.as_deref() else {
                continue;
            };
            let path = self.root.join(to_file);
            let backup = backup_path(&path);
            if !backup.exists() {
                continue;
            }
            match fs::rename(&backup, &path) {
                Ok(()) => restored += 1,
                Err(e) => warn!("failed to restore {}: {e}", path.display()),
            }
        }
        Ok(restored)
    }

    /// Annotate page text the host has already loaded (and possibly
    /// truncated), without touching the filesystem. `raw` is the unmodified
    /// file content, used to work out how many leading lines the host
    /// stripped before handing over `processed`.
    pub fn annotate_page(&self, to_file: &str, processed: &str, raw: &str) -> Option<String> {
        let file_diff = self
            .changes
            .iter()
            .find(|c| c.to_file.as_deref() == Some(to_file) && c.is_annotatable())?;
        let offset = leading_offset(processed, raw);
        let lines: Vec<&str> = processed.lines().collect();
        let classified = classify_lines(&lines);
        Some(embed(&classified, file_diff, offset))
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn read_utf8(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("failed to read {}: {e}, skipping", path.display());
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(content) => Some(content),
        Err(_) => {
            warn!("{} is not valid UTF-8, skipping", path.display());
            None
        }
    }
}

/// Count the leading lines of `raw` missing from `processed` (0 or
/// negative). The host's pipeline may strip front matter before the page
/// hook runs; line numbers from the diff refer to `raw`.
fn leading_offset(processed: &str, raw: &str) -> isize {
    let Some(first_line) = processed.lines().next() else {
        return 0;
    };
    let mut offset = 0isize;
    for line in raw.lines() {
        if line == first_line {
            return offset;
        }
        offset -= 1;
    }
    0
}
