//! Parser for plain unified diff output (`--unified=0`)
//!
//! Every added line becomes one whole-line `LineChange` (`col_start` 0,
//! `col_end` = line length in characters). Removed lines have no position in
//! the target file and are ignored.

use regex::Regex;
use tracing::warn;

use crate::scan::{parse_hunk_header, strip_path_prefix, FileCheck, FileCollector, HUNK_HEADER_PATTERN};
use crate::types::FileDiff;

/// Running position inside one hunk body.
struct HunkScan {
    /// Line number in the target file of the next context or added line.
    target_line: usize,
    /// Target-side lines remaining; removed lines do not count.
    budget: usize,
    scanned: usize,
}

/// Lines that can never be hunk content and therefore close an open hunk.
fn is_marker(line: &str) -> bool {
    line.starts_with("diff --git ")
        || line.starts_with("@@ ")
        || line.starts_with("--- ")
        || line.starts_with("+++ ")
}

/// Parse unified diff text into per-file change records.
///
/// Tolerant of malformed lines: anything unrecognized is logged and skipped,
/// and parsing resumes at the next marker. Only files whose paths end in a
/// Markdown extension get line-level detail.
pub fn parse_unified_diff(diff_text: &str) -> Vec<FileDiff> {
    let hunk_re = Regex::new(HUNK_HEADER_PATTERN).unwrap();
    let mut collector = FileCollector::new();
    let mut hunk: Option<HunkScan> = None;

    for (idx, line) in diff_text.lines().enumerate() {
        if let Some(scan) = hunk.as_mut() {
            if is_marker(line) {
                // A header inside an unfinished hunk closes it; the line is
                // then processed normally below.
                hunk = None;
            } else {
                if let Some(rest) = line.strip_prefix('+') {
                    collector.push_change(scan.target_line, 0, rest.chars().count());
                    scan.target_line += 1;
                    scan.scanned += 1;
                } else if line.starts_with('-') || line.starts_with('\\') {
                    // Removed content has no target position; "\ No newline
                    // at end of file" markers carry no content at all.
                } else {
                    // Context line.
                    scan.target_line += 1;
                    scan.scanned += 1;
                }
                if scan.scanned >= scan.budget {
                    hunk = None;
                }
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
                        target_line: header.new_start,
                        budget: header.budget(),
                        scanned: 0,
                    });
                }
                Some(_) => {}
                None => warn!("unexpected line {}: {}", idx + 1, line),
            }
        }
    }

    collector.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_mixed_hunks() {
        let diff_text = "\
diff --git a/tests/_res/file1.md b/tests/_res/file1.md
index 79271ac..4b916cd 100644
--- a/tests/_res/file1.md
+++ b/tests/_res/file1.md
@@ -34 +33,0 @@ git status
-git add
@@ -35,0 +35 @@ git commit
+git log
@@ -42,0 +43 @@ Intented code block.
+    git log
@@ -53 +53,0 @@ Intented code block.
-    * nasted item2
@@ -69 +72 @@ Intented code block.
-Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.
+Lorem ipsum dolor sit amet, ADD WORDS consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.
@@ -72,0 +76,2 @@ Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliqu
+Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur.
+
";
        let changed = parse_unified_diff(diff_text);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].from_file.as_deref(), Some("tests/_res/file1.md"));
        assert_eq!(changed[0].to_file.as_deref(), Some("tests/_res/file1.md"));

        let changes = &changed[0].line_changes;
        assert_eq!(changes.len(), 5);

        assert_eq!(changes[0].anchor_no, 0);
        assert_eq!(changes[0].line_no, 35);
        assert_eq!(changes[0].col_start, 0);
        assert_eq!(changes[0].col_end, 7);

        assert_eq!(changes[1].anchor_no, 1);
        assert_eq!(changes[1].line_no, 43);
        assert_eq!(changes[1].col_end, 11);

        assert_eq!(changes[2].anchor_no, 2);
        assert_eq!(changes[2].line_no, 72);
        assert_eq!(changes[2].col_end, 133);

        assert_eq!(changes[3].anchor_no, 3);
        assert_eq!(changes[3].line_no, 76);
        assert_eq!(changes[3].col_end, 102);

        // Trailing blank line added: a zero-width span.
        assert_eq!(changes[4].anchor_no, 4);
        assert_eq!(changes[4].line_no, 77);
        assert_eq!(changes[4].col_start, 0);
        assert_eq!(changes[4].col_end, 0);
    }

    #[test]
    fn test_added_deleted_and_mode_only_files() {
        let diff_text = "\
diff --git a/tests/_res/file1.md b/tests/_res/file1.md
index 79271ac..4b916cd 100644
--- a/tests/_res/file1.md
+++ b/tests/_res/file1.md
@@ -34 +33,0 @@ git status
-git add
@@ -35,0 +35 @@ git commit
+git log
diff --git a/tests/_res/subdir/file2.md b/tests/_res/subdir/file2.md
new file mode 100644
index 0000000..cf6ad9e
--- /dev/null
+++ b/tests/_res/subdir/file2.md
@@ -0,0 +1,5 @@
+# file 2
+
+## 1
+
+ジョバンニはまっ赤かになってうなずきました。
diff --git a/tests/_res/subdir/file3-rm.md b/tests/_res/subdir/file3-rm.md
deleted file mode 100644
index c5a319c..0000000
--- a/tests/_res/subdir/file3-rm.md
+++ /dev/null
@@ -1,3 +0,0 @@
-# file 3
-
-吾輩わがはいは猫である。名前はまだ無い。
diff --git a/tests/_res/subdir/file4-mode.md b/tests/_res/subdir/file4-mode.md
old mode 100644
new mode 100755
";
        let changed = parse_unified_diff(diff_text);
        assert_eq!(changed.len(), 3);

        assert_eq!(changed[0].from_file.as_deref(), Some("tests/_res/file1.md"));
        assert_eq!(changed[0].line_changes.len(), 1);
        assert_eq!(changed[0].line_changes[0].anchor_no, 0);
        assert_eq!(changed[0].line_changes[0].line_no, 35);
        assert_eq!(changed[0].line_changes[0].col_end, 7);

        assert_eq!(changed[1].from_file, None);
        assert_eq!(
            changed[1].to_file.as_deref(),
            Some("tests/_res/subdir/file2.md")
        );
        assert!(changed[1].line_changes.is_empty());

        assert_eq!(
            changed[2].from_file.as_deref(),
            Some("tests/_res/subdir/file3-rm.md")
        );
        assert_eq!(changed[2].to_file, None);
        assert!(changed[2].line_changes.is_empty());
    }

    #[test]
    fn test_pure_rename_keeps_both_paths() {
        let diff_text = "\
diff --git a/docs/old.md b/docs/new.md
similarity index 100%
rename from docs/old.md
rename to docs/new.md
";
        let changed = parse_unified_diff(diff_text);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].from_file.as_deref(), Some("docs/old.md"));
        assert_eq!(changed[0].to_file.as_deref(), Some("docs/new.md"));
        assert!(changed[0].line_changes.is_empty());
    }

    #[test]
    fn test_non_markdown_file_has_no_line_detail() {
        let diff_text = "\
diff --git a/src/main.rs b/src/main.rs
index 1111111..2222222 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,0 +2 @@
+fn main() {}
diff --git a/docs/a.md b/docs/a.md
index 3333333..4444444 100644
--- a/docs/a.md
+++ b/docs/a.md
@@ -1,0 +2 @@
+hello
";
        let changed = parse_unified_diff(diff_text);
        assert_eq!(changed.len(), 2);
        assert_eq!(changed[0].to_file.as_deref(), Some("src/main.rs"));
        assert!(changed[0].line_changes.is_empty());
        // Anchors start at 0 because the non-markdown file produced none.
        assert_eq!(changed[1].line_changes[0].anchor_no, 0);
        assert_eq!(changed[1].line_changes[0].line_no, 2);
        assert_eq!(changed[1].line_changes[0].col_end, 5);
    }

    #[test]
    fn test_context_lines_advance_target_counter() {
        let diff_text = "\
diff --git a/docs/a.md b/docs/a.md
index 1111111..2222222 100644
--- a/docs/a.md
+++ b/docs/a.md
@@ -1,3 +1,4 @@
 first
-old second
+new second
 third
+fourth
";
        let changed = parse_unified_diff(diff_text);
        let changes = &changed[0].line_changes;
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].line_no, 2);
        assert_eq!(changes[1].line_no, 4);
    }

    #[test]
    fn test_malformed_hunk_header_is_skipped() {
        let diff_text = "\
diff --git a/docs/a.md b/docs/a.md
--- a/docs/a.md
+++ b/docs/a.md
@@ bogus @@
@@ -1,0 +2 @@
+ok
";
        let changed = parse_unified_diff(diff_text);
        assert_eq!(changed[0].line_changes.len(), 1);
        assert_eq!(changed[0].line_changes[0].line_no, 2);
    }

    #[test]
    fn test_crlf_input() {
        let diff_text = "diff --git a/a.md b/a.md\r\n--- a/a.md\r\n+++ b/a.md\r\n@@ -1,0 +2 @@\r\n+hi\r\n";
        let changed = parse_unified_diff(diff_text);
        assert_eq!(changed[0].line_changes.len(), 1);
        assert_eq!(changed[0].line_changes[0].col_end, 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_unified_diff("").is_empty());
    }
}
