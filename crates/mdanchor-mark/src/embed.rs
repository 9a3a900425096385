//! Anchor embedding: wrapping changed spans in identifiable HTML spans
//!
//! One core routine drives both output shapes; `embed` returns the rewritten
//! document text, `embed_list` returns structured records for callers that
//! only need a change index. Keeping a single algorithm avoids the two
//! variants drifting apart.

use mdanchor_diff::FileDiff;
use regex::Regex;
use tracing::debug;

use crate::classify::{ClassifiedLine, LineRole};
use crate::{ANCHOR_CLASS, ANCHOR_ID_PREFIX};

/// One annotated line: the anchor id plus the before/after text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedChange {
    pub line_no: usize,
    pub original_line: String,
    pub tagged_line: String,
    pub anchor_id: String,
}

/// Anchor id for one change, stable across builds of the same diff.
pub fn anchor_id(anchor_no: u32) -> String {
    format!("{ANCHOR_ID_PREFIX}{anchor_no}")
}

/// Roles where injected markup would corrupt fencing, alignment, or rule
/// syntax. Changes landing on these lines are deliberately not wrapped.
fn skip_role(role: LineRole) -> bool {
    matches!(
        role,
        LineRole::Blank
            | LineRole::CodeBlock
            | LineRole::HorizontalRule
            | LineRole::Table
            | LineRole::Meta
    )
}

struct MarkupPrefixes {
    heading: Regex,
    bullet: Regex,
    ordered: Regex,
    quote: Regex,
}

impl MarkupPrefixes {
    fn new() -> Self {
        Self {
            heading: Regex::new(r"^#+ ").unwrap(),
            bullet: Regex::new(r"^\s*[*\-+] (\[[ xX]\] )?").unwrap(),
            ordered: Regex::new(r"^\s*\d+[.)] ").unwrap(),
            quote: Regex::new(r"^> ").unwrap(),
        }
    }

    /// Characters of leading block markup to skip so the structural marker
    /// itself is never highlighted.
    fn skip_chars(&self, line: &str) -> usize {
        for re in [&self.heading, &self.bullet, &self.ordered, &self.quote] {
            if let Some(m) = re.find(line) {
                return line[..m.end()].chars().count();
            }
        }
        0
    }
}

/// Byte offset of the `char_idx`-th character, clamped to the string length.
fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(b, _)| b)
}

fn annotate(
    classified: &[ClassifiedLine],
    file_diff: &FileDiff,
    line_no_offset: isize,
) -> (Vec<String>, Vec<AnnotatedChange>) {
    let prefixes = MarkupPrefixes::new();
    let mut out = Vec::with_capacity(classified.len());
    let mut anchors = Vec::new();

    // Changes anchored to content above the truncated view are discarded
    // before iteration begins.
    let mut changes = file_diff
        .line_changes
        .iter()
        .filter(|c| c.line_no as isize + line_no_offset > 0)
        .peekable();

    for (i, line) in classified.iter().enumerate() {
        let line_no = i + 1;

        // Consume stale changes (already passed, or a second change landing
        // on a line that was annotated once); each change is consumed
        // exactly once.
        while changes
            .peek()
            .is_some_and(|c| ((c.line_no as isize + line_no_offset) as usize) < line_no)
        {
            changes.next();
        }

        let Some(change) =
            changes.next_if(|c| (c.line_no as isize + line_no_offset) as usize == line_no)
        else {
            out.push(line.text.clone());
            continue;
        };

        if skip_role(line.role) {
            out.push(line.text.clone());
            continue;
        }

        let text = line.text.as_str();
        let total_chars = text.chars().count();
        let prefix = if change.col_start == 0 {
            prefixes.skip_chars(text)
        } else {
            0
        };
        // Clamp to the line so a stale diff can never slice out of bounds.
        let start = (change.col_start + prefix).min(total_chars);
        let end = change.col_end.clamp(start, total_chars);

        let bs = byte_offset(text, start);
        let be = byte_offset(text, end);
        let id = anchor_id(change.anchor_no);
        let tagged = format!(
            "{}<span id=\"{}\" class=\"{}\">{}</span>{}",
            &text[..bs],
            id,
            ANCHOR_CLASS,
            &text[bs..be],
            &text[be..]
        );
        debug!(anchor = %id, line = line_no, "embedded anchor");

        anchors.push(AnnotatedChange {
            line_no,
            original_line: text.to_string(),
            tagged_line: tagged.clone(),
            anchor_id: id,
        });
        out.push(tagged);
    }

    (out, anchors)
}

/// Rewrite a classified document, wrapping each changed span in an anchor
/// span. Lines with no pending change pass through verbatim.
///
/// `line_no_offset` compensates for lines the host pipeline stripped before
/// handing over the text (zero or negative).
pub fn embed(classified: &[ClassifiedLine], file_diff: &FileDiff, line_no_offset: isize) -> String {
    annotate(classified, file_diff, line_no_offset).0.join("\n")
}

/// Like [`embed`], but return the structured change records instead of the
/// rewritten text.
pub fn embed_list(
    classified: &[ClassifiedLine],
    file_diff: &FileDiff,
    line_no_offset: isize,
) -> Vec<AnnotatedChange> {
    annotate(classified, file_diff, line_no_offset).1
}
