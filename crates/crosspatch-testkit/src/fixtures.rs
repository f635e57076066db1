//! Canned patch texts shared across test suites.

/// A single added line in `src/foo.c`.
pub const SIMPLE_ADD: &str = "\
--- a/src/foo.c
+++ b/src/foo.c
@@ -1,2 +1,3 @@
 int main(void)
 {
+int x = 1;
";

/// The same change as [`SIMPLE_ADD`], one directory deeper and with trailing
/// whitespace on the added line. After strip-level resolution the pair must
/// come out identical.
pub const SIMPLE_ADD_NESTED: &str = "\
--- a/pkg/src/foo.c
+++ b/pkg/src/foo.c
@@ -1,2 +1,3 @@
 int main(void)
 {
+int x = 1;  \n";

/// A change in an unrelated file with unrelated content.
pub const OTHER_FILE: &str = "\
--- a/lib/util.py
+++ b/lib/util.py
@@ -1,1 +1,2 @@
 import os
+import sys
";

/// A two-hunk change replacing a line and appending another in `src/foo.c`.
pub const REWORK: &str = "\
--- a/src/foo.c
+++ b/src/foo.c
@@ -1,2 +1,2 @@
-int x = 0;
+int x = 1;
 return x;
@@ -10,1 +10,2 @@
 void tail(void)
+int y = 2;
";

/// [`REWORK`] plus an extra file with additional lines: overlaps partially,
/// never identically.
pub const REWORK_SUPERSET: &str = "\
--- a/src/foo.c
+++ b/src/foo.c
@@ -1,2 +1,2 @@
-int x = 0;
+int x = 1;
 return x;
@@ -10,1 +10,2 @@
 void tail(void)
+int y = 2;
--- a/src/bar.c
+++ b/src/bar.c
@@ -0,0 +1,3 @@
+void helper(void) {}
+int unrelated_one = 8;
+int unrelated_two = 9;
";

/// Prose that no diff parser should accept.
pub const NOT_A_DIFF: &str = "This file describes the patch in prose.\nNo hunks anywhere.\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_look_like_diffs() {
        for text in [SIMPLE_ADD, SIMPLE_ADD_NESTED, OTHER_FILE, REWORK, REWORK_SUPERSET] {
            assert!(text.contains("@@"), "fixture missing hunk header");
            assert!(text.contains("+++ "), "fixture missing file header");
        }
        assert!(!NOT_A_DIFF.contains("@@"));
    }
}
