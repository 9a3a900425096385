//! Markdown line classification and anchor embedding
//!
//! Given one file's parsed change records and the file's text, this crate
//! decides exactly which substring of which line to wrap in an anchor span.
//! Classification is a single forward pass that assigns every line a
//! structural role; embedding then refuses to touch roles where injected
//! markup would corrupt rendering (code blocks, tables, rules) and skips
//! past block-markup prefixes before wrapping.

mod changelist;
mod classify;
mod embed;

pub use changelist::{render_change_list, splice_change_list, ChangeListEntry, FileEntry};
pub use classify::{classify_lines, classify_lines_with_meta, ClassifiedLine, LineRole};
pub use embed::{anchor_id, embed, embed_list, AnnotatedChange};

/// Fixed CSS class carried by every injected span.
pub const ANCHOR_CLASS: &str = "mdanchor-diff";

/// Prefix of every anchor id; the anchor number is appended.
pub const ANCHOR_ID_PREFIX: &str = "mdanchor-anchor-";
