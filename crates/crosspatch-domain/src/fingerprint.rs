//! Comparable fingerprints derived from parsed patches.
//!
//! A fingerprint is a pure function of (patch, strip level): normalized
//! touched paths, normalized added/removed line sets, raw size metrics and a
//! stable content digest. Recomputing from the same inputs always yields the
//! same value.

use std::collections::BTreeSet;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crosspatch_diff::ParsedPatch;

use crate::normalize::{normalize_line, normalize_path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    /// Normalized touched paths.
    pub paths: BTreeSet<String>,
    /// Normalized added lines (whitespace-only lines excluded).
    pub added: BTreeSet<String>,
    /// Normalized removed lines (whitespace-only lines excluded).
    pub removed: BTreeSet<String>,
    /// Raw added-line count, before normalization and dedup.
    pub added_total: u32,
    /// Raw removed-line count, before normalization and dedup.
    pub removed_total: u32,
    pub hunk_count: u32,
    /// Stable digest of the normalized content, for the exact-match fast
    /// path and cross-run diagnostics.
    pub digest: String,
}

impl Fingerprint {
    /// Content-less: nothing comparable survived parsing and normalization.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// Raw changed-line volume, the tie-break signal for matching.
    pub fn line_total(&self) -> u32 {
        self.added_total + self.removed_total
    }
}

/// Build the fingerprint for a parsed patch at a resolved strip level.
pub fn extract_fingerprint(patch: &ParsedPatch, strip_level: u32) -> Fingerprint {
    let mut paths = BTreeSet::new();
    let mut added = BTreeSet::new();
    let mut removed = BTreeSet::new();
    let mut added_total: u32 = 0;
    let mut removed_total: u32 = 0;
    let mut hunk_count: u32 = 0;

    for file in &patch.files {
        if let Some(p) = file.path() {
            let normalized = normalize_path(p, strip_level);
            if !normalized.is_empty() {
                paths.insert(normalized);
            }
        }
        for hunk in &file.hunks {
            hunk_count += 1;
            added_total += hunk.added.len() as u32;
            removed_total += hunk.removed.len() as u32;
            for line in &hunk.added {
                let normalized = normalize_line(line);
                if !normalized.is_empty() {
                    added.insert(normalized);
                }
            }
            for line in &hunk.removed {
                let normalized = normalize_line(line);
                if !normalized.is_empty() {
                    removed.insert(normalized);
                }
            }
        }
    }

    let digest = content_digest(&paths, &added, &removed);

    Fingerprint {
        paths,
        added,
        removed,
        added_total,
        removed_total,
        hunk_count,
        digest,
    }
}

/// SHA-256 over the canonical normalized content, truncated to 16 hex
/// characters (8 bytes). Equal digests mean equal normalized content sets.
fn content_digest(
    paths: &BTreeSet<String>,
    added: &BTreeSet<String>,
    removed: &BTreeSet<String>,
) -> String {
    let mut hasher = Sha256::new();
    for p in paths {
        hasher.update(b"p:");
        hasher.update(p.as_bytes());
        hasher.update(b"\n");
    }
    for l in added {
        hasher.update(b"+:");
        hasher.update(l.as_bytes());
        hasher.update(b"\n");
    }
    for l in removed {
        hasher.update(b"-:");
        hasher.update(l.as_bytes());
        hasher.update(b"\n");
    }
    let hash = hasher.finalize();
    hex::encode(&hash[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspatch_diff::parse_patch;

    const SIMPLE: &str = "\
--- a/src/foo.c
+++ b/src/foo.c
@@ -1,1 +1,2 @@
 int main(void)
+int x = 1;
";

    #[test]
    fn extracts_paths_and_line_sets() {
        let patch = parse_patch(SIMPLE);
        let fp = extract_fingerprint(&patch, 0);

        assert!(fp.paths.contains("src/foo.c"));
        assert!(fp.added.contains("int x = 1;"));
        assert!(fp.removed.is_empty());
        assert_eq!(fp.added_total, 1);
        assert_eq!(fp.removed_total, 0);
        assert_eq!(fp.hunk_count, 1);
        assert!(!fp.is_empty());
    }

    #[test]
    fn fingerprint_is_pure() {
        let patch = parse_patch(SIMPLE);
        assert_eq!(
            extract_fingerprint(&patch, 0),
            extract_fingerprint(&patch, 0)
        );
    }

    #[test]
    fn whitespace_noise_does_not_change_the_fingerprint_sets() {
        let noisy = "\
--- a/src/foo.c
+++ b/src/foo.c
@@ -1,1 +1,2 @@
 int main(void)
+int  x =  1;   \n";
        let a = extract_fingerprint(&parse_patch(SIMPLE), 0);
        let b = extract_fingerprint(&parse_patch(noisy), 0);

        assert_eq!(a.paths, b.paths);
        assert_eq!(a.added, b.added);
        assert_eq!(a.digest, b.digest);
    }

    #[test]
    fn strip_level_applies_to_every_path() {
        let nested = "\
--- a/pkg/src/foo.c
+++ b/pkg/src/foo.c
@@ -1,1 +1,2 @@
 int main(void)
+int x = 1;
";
        let fp = extract_fingerprint(&parse_patch(nested), 1);
        assert!(fp.paths.contains("src/foo.c"));
    }

    #[test]
    fn whitespace_only_lines_are_excluded_from_sets_but_counted() {
        let text = "\
--- a/f
+++ b/f
@@ -0,0 +1,2 @@
+real line
+    \n";
        let fp = extract_fingerprint(&parse_patch(text), 0);
        assert_eq!(fp.added.len(), 1);
        assert_eq!(fp.added_total, 2);
    }

    #[test]
    fn degraded_patch_yields_empty_fingerprint() {
        let patch = parse_patch("no diff here at all\n");
        let fp = extract_fingerprint(&patch, 0);
        assert!(fp.is_empty());
        assert_eq!(fp.hunk_count, 0);
        assert_eq!(fp.line_total(), 0);
    }

    #[test]
    fn digest_is_16_hex_chars_and_stable() {
        let fp = extract_fingerprint(&parse_patch(SIMPLE), 0);
        assert_eq!(fp.digest.len(), 16);
        assert!(fp.digest.chars().all(|c| c.is_ascii_hexdigit()));

        let again = extract_fingerprint(&parse_patch(SIMPLE), 0);
        assert_eq!(fp.digest, again.digest);
    }

    #[test]
    fn digest_differs_when_content_differs() {
        let other = "\
--- a/src/foo.c
+++ b/src/foo.c
@@ -1,1 +1,2 @@
 int main(void)
+int y = 2;
";
        let a = extract_fingerprint(&parse_patch(SIMPLE), 0);
        let b = extract_fingerprint(&parse_patch(other), 0);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn snapshot_digest_value() {
        let fp = extract_fingerprint(&parse_patch(SIMPLE), 0);
        // Pins the digest algorithm; a change here breaks cross-run
        // comparability of stored reports.
        insta::assert_snapshot!(fp.digest, @"5a6787a7ee04ba2a");
    }
}
