//! Parser for word-level porcelain diff output (`--word-diff=porcelain`)
//!
//! Hunk bodies are streams of token lines: a leading space marks unchanged
//! context, `+`/`-` mark inserted/removed tokens, and a lone `~` terminates
//! one sub-line of the hunk. Inserted tokens yield sub-line spans, which is
//! the finer-grained counterpart to the whole-line spans of the unified
//! parser.

use regex::Regex;
use tracing::warn;

use crate::scan::{parse_hunk_header, strip_path_prefix, FileCheck, FileCollector, HUNK_HEADER_PATTERN};
use crate::types::FileDiff;

struct HunkScan {
    /// Target line number of the hunk's first sub-line.
    target_start: usize,
    /// `~` terminators expected before the hunk ends.
    budget: usize,
    /// `~` terminators consumed so far.
    sub_lines: usize,
    /// Running column cursor, in characters, advanced by context tokens.
    col: usize,
}

fn is_marker(line: &str) -> bool {
    line.starts_with("diff --git ") || line.starts_with("@@ ")
}

/// Parse porcelain word-diff text into per-file change records.
///
/// File boundaries, path extraction and the Markdown filter behave exactly
/// as in [`crate::parse_unified_diff`]; only the hunk bodies differ.
pub fn parse_porcelain_diff(diff_text: &str) -> Vec<FileDiff> {
    let hunk_re = Regex::new(HUNK_HEADER_PATTERN).unwrap();
    let mut collector = FileCollector::new();
    let mut hunk: Option<HunkScan> = None;

    for (idx, line) in diff_text.lines().enumerate() {
        if let Some(scan) = hunk.as_mut() {
            if is_marker(line) {
                hunk = None;
            } else {
                if line == "~" {
                    scan.sub_lines += 1;
                    if scan.sub_lines >= scan.budget {
                        hunk = None;
                    }
                } else if let Some(token) = line.strip_prefix('+') {
                    let col_end = scan.col + token.chars().count();
                    collector.push_change(scan.target_start + scan.sub_lines, scan.col, col_end);
                } else if let Some(token) = line.strip_prefix(' ') {
                    scan.col += token.chars().count();
                }
                // Removed tokens have no presence in the target text and do
                // not advance the column cursor.
                continue;
            }
        }

        if line.starts_with("diff --git ") {
            collector.on_boundary();
            continue;
        }

        if collector.is_skipping() {
            continue;
        }

        if let Some(body) = line.strip_prefix("--- ") {
            match strip_path_prefix(body) {
                Ok(path) => collector.set_from_file(path),
                Err(()) => warn!("unexpected line {}: {}", idx + 1, line),
            }
            continue;
        }
        if let Some(body) = line.strip_prefix("+++ ") {
            match strip_path_prefix(body) {
                Ok(path) => collector.set_to_file(path),
                Err(()) => warn!("unexpected line {}: {}", idx + 1, line),
            }
            continue;
        }
        if let Some(path) = line.strip_prefix("rename from ") {
            collector.set_rename_from(path.to_string());
            continue;
        }
        if let Some(path) = line.strip_prefix("rename to ") {
            collector.set_rename_to(path.to_string());
            continue;
        }

        match collector.check_file() {
            FileCheck::NotReady | FileCheck::Skip => continue,
            FileCheck::Scan => {}
        }

        if line.starts_with("@@ ") {
            match parse_hunk_header(&hunk_re, line) {
                Some(header) if header.budget() > 0 => {
                    hunk = Some(HunkScan {
                        target_start: header.new_start,
                        budget: header.budget(),
                        sub_lines: 0,
                        col: 0,
                    });
                }
                Some(_) => {}
                None => warn!("unexpected line {}: {}", idx + 1, line),
            }
        }
    }

    collector.finish()
}
