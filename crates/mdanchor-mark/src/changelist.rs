//! Markdown change-list rendering
//!
//! The change list is itself a Markdown page: anchors grouped by file, each
//! entry a deep link to the anchor span embedded in the target document.
//! It can be written standalone or spliced into a marker-delimited region of
//! an existing page.

use chrono::NaiveDate;
use regex::Regex;

use crate::embed::AnnotatedChange;

/// Start/end of the generated region inside an existing change-list page.
pub const CHANGE_LIST_START: &str = "<!-- mdanchor: generated from here -->";
pub const CHANGE_LIST_END: &str = "<!-- mdanchor: end -->";

/// Labels longer than this many characters are cut and given an ellipsis.
const LABEL_MAX_CHARS: usize = 40;

/// One linked anchor in the change list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeListEntry {
    pub anchor_id: String,
    pub label: String,
}

impl ChangeListEntry {
    /// Label = the changed line's trimmed text, truncated; the anchor id
    /// itself when the line is blank.
    pub fn from_annotated(change: &AnnotatedChange) -> Self {
        let trimmed = change.original_line.trim();
        let label = if trimmed.is_empty() {
            change.anchor_id.clone()
        } else if trimmed.chars().count() > LABEL_MAX_CHARS {
            let cut: String = trimmed.chars().take(LABEL_MAX_CHARS).collect();
            format!("{cut}...")
        } else {
            trimmed.to_string()
        };
        Self {
            anchor_id: change.anchor_id.clone(),
            label,
        }
    }
}

/// One file's group of anchors. `is_new` marks pure additions, which have
/// no line-level anchors and are listed as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub is_new: bool,
    pub entries: Vec<ChangeListEntry>,
}

/// Render the full change-list document.
pub fn render_change_list(base: &str, files: &[FileEntry]) -> String {
    render_with_date(base, files, chrono::Local::now().date_naive())
}

fn render_with_date(base: &str, files: &[FileEntry], date: NaiveDate) -> String {
    let mut md = String::from("# Changes\n\n");
    md.push_str(&format!("* Generated on: {}\n", date.format("%Y-%m-%d")));
    md.push_str(&format!("* Base commit: {base}\n\n"));
    md.push_str(&render_groups(files));
    md
}

fn render_groups(files: &[FileEntry]) -> String {
    let mut md = String::new();
    for file in files {
        md.push_str(&format!("## [{}]({})\n\n", file.path, file.path));
        if file.is_new {
            md.push_str("* New\n");
        } else {
            for entry in &file.entries {
                md.push_str(&format!(
                    "* [{}]({}#{})\n",
                    entry.label, file.path, entry.anchor_id
                ));
            }
        }
        md.push('\n');
    }
    md
}

/// Replace the marker-delimited region of an existing page with freshly
/// rendered groups, or append the region when no markers are present.
pub fn splice_change_list(existing: &str, files: &[FileEntry]) -> String {
    let region = format!(
        "{}\n\n{}{}",
        CHANGE_LIST_START,
        render_groups(files),
        CHANGE_LIST_END
    );
    let pattern = format!(
        "{}.*?{}",
        regex::escape(CHANGE_LIST_START),
        regex::escape(CHANGE_LIST_END)
    );
    let re = Regex::new(&format!("(?s){pattern}")).unwrap();
    if re.is_match(existing) {
        re.replace(existing, region.as_str()).into_owned()
    } else {
        format!("{existing}\n{region}")
    }
}
