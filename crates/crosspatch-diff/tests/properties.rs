//! Property-based tests for crosspatch-diff.
//!
//! These verify parser determinism, hunk accounting against well-formed
//! input, and resilience against malformed sections.

use proptest::prelude::*;

use crosspatch_diff::parse_patch;
use crosspatch_types::ParseStatus;

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,12}").expect("valid regex"),
        1..4,
    )
    .prop_map(|parts| parts.join("/"))
    // The parser strips VCS "a/"/"b/" prefixes, so keep generated paths
    // from colliding with them.
    .prop_filter("path must not begin with a vcs prefix", |p| {
        !p.starts_with("a/") && !p.starts_with("b/")
    })
}

fn line_content_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_(){}\\[\\];:,.<>=*/& ]{0,60}")
        .expect("valid regex")
        .prop_filter("must not look like a diff marker", |s| {
            !s.starts_with('+')
                && !s.starts_with('-')
                && !s.starts_with('@')
                && !s.starts_with(' ')
                && !s.starts_with('\\')
                && !s.is_empty()
        })
}

fn make_patch(path: &str, removed: &[String], added: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- a/{path}\n+++ b/{path}\n"));
    out.push_str(&format!(
        "@@ -1,{} +1,{} @@\n",
        removed.len(),
        added.len()
    ));
    for l in removed {
        out.push_str(&format!("-{l}\n"));
    }
    for l in added {
        out.push_str(&format!("+{l}\n"));
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn parse_is_deterministic(
        path in path_strategy(),
        removed in prop::collection::vec(line_content_strategy(), 0..4),
        added in prop::collection::vec(line_content_strategy(), 1..5),
    ) {
        let text = make_patch(&path, &removed, &added);
        let first = parse_patch(&text);
        let second = parse_patch(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn hunk_body_matches_header_counts(
        path in path_strategy(),
        removed in prop::collection::vec(line_content_strategy(), 0..4),
        added in prop::collection::vec(line_content_strategy(), 1..5),
    ) {
        let text = make_patch(&path, &removed, &added);
        let patch = parse_patch(&text);

        prop_assert_eq!(patch.status, ParseStatus::Parsed);
        prop_assert_eq!(patch.files.len(), 1);

        let hunk = &patch.files[0].hunks[0];
        prop_assert_eq!(hunk.removed.len(), removed.len());
        prop_assert_eq!(hunk.added.len(), added.len());
        prop_assert_eq!(hunk.old_count as usize, removed.len());
        prop_assert_eq!(hunk.new_count as usize, added.len());
        prop_assert_eq!(&hunk.removed, &removed);
        prop_assert_eq!(&hunk.added, &added);
    }

    #[test]
    fn parse_never_panics_on_arbitrary_text(text in ".{0,400}") {
        let _ = parse_patch(&text);
    }

    #[test]
    fn malformed_section_does_not_hide_later_files(
        bad_path in path_strategy(),
        good_path in path_strategy(),
        content in line_content_strategy(),
    ) {
        prop_assume!(bad_path != good_path);

        let bad = format!(
            "--- a/{bad_path}\n+++ b/{bad_path}\n@@ bogus header\n+dropped\n"
        );
        let good = make_patch(&good_path, &[], std::slice::from_ref(&content));
        let patch = parse_patch(&format!("{bad}{good}"));

        prop_assert_eq!(patch.status, ParseStatus::Parsed);
        let good_section = patch
            .files
            .iter()
            .find(|f| f.path() == Some(good_path.as_str()));
        prop_assert!(good_section.is_some(), "good section should survive");
        prop_assert_eq!(
            &good_section.unwrap().hunks[0].added,
            &vec![content.clone()]
        );
    }

    #[test]
    fn touched_paths_never_carry_vcs_prefix(
        path in path_strategy(),
        content in line_content_strategy(),
    ) {
        let text = make_patch(&path, &[], std::slice::from_ref(&content));
        let patch = parse_patch(&text);

        for file in &patch.files {
            if let Some(p) = file.path() {
                prop_assert!(!p.starts_with("a/") && !p.starts_with("b/"));
            }
        }
    }
}
