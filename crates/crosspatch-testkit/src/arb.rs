//! Proptest strategies and bounds for generated patch content.

use proptest::prelude::*;

/// Max files per generated patch.
pub const MAX_FILES: usize = 5;
/// Max hunks per generated file.
pub const MAX_HUNKS_PER_FILE: usize = 5;
/// Max lines per generated hunk.
pub const MAX_LINES_PER_HUNK: usize = 20;
/// Max generated line length in bytes.
pub const MAX_LINE_LENGTH: usize = 200;

/// Relative paths of 1-3 segments, avoiding VCS prefix collisions.
pub fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex("[c-z][a-z0-9_]{0,10}").expect("valid regex"),
        1..4,
    )
    .prop_map(|parts| parts.join("/"))
}

/// Plausible code lines that cannot be mistaken for diff markers.
pub fn line_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_(){}\\[\\];:,.<>=*/& ]{1,60}")
        .expect("valid regex")
        .prop_filter("must not start with a diff marker", |s| {
            !s.starts_with('+')
                && !s.starts_with('-')
                && !s.starts_with('@')
                && !s.starts_with(' ')
                && !s.starts_with('\\')
        })
}

/// A well-formed single-file patch: path, removed lines, added lines.
pub fn single_file_patch_strategy() -> impl Strategy<Value = String> {
    (
        path_strategy(),
        prop::collection::vec(line_strategy(), 0..4),
        prop::collection::vec(line_strategy(), 1..6),
    )
        .prop_map(|(path, removed, added)| render_patch(&path, &removed, &added))
}

/// Render a well-formed unified patch for one file.
pub fn render_patch(path: &str, removed: &[String], added: &[String]) -> String {
    let mut out = format!(
        "--- a/{path}\n+++ b/{path}\n@@ -1,{} +1,{} @@\n",
        removed.len(),
        added.len()
    );
    for l in removed {
        out.push_str(&format!("-{l}\n"));
    }
    for l in added {
        out.push_str(&format!("+{l}\n"));
    }
    out
}
