//! Fluent builders for constructing valid unified patch text in tests.
//!
//! # Bounds
//!
//! To keep tests fast, the following bounds are enforced:
//! - Max files per patch: 5
//! - Max hunks per file: 5
//! - Max lines per hunk: 20
//!
//! # Example
//!
//! ```rust
//! use crosspatch_testkit::PatchBuilder;
//!
//! let patch = PatchBuilder::new()
//!     .file("src/lib.rs")
//!         .hunk(1, 1, 1, 2)
//!             .context("fn existing() {}")
//!             .add_line("fn new_function() {}")
//!             .done()
//!         .done()
//!     .build();
//!
//! assert!(patch.contains("+fn new_function() {}"));
//! ```

use crate::arb::{MAX_FILES, MAX_HUNKS_PER_FILE, MAX_LINES_PER_HUNK};

/// A builder for constructing unified patch strings.
#[derive(Debug, Clone, Default)]
pub struct PatchBuilder {
    files: Vec<FileSection>,
}

impl PatchBuilder {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a file section and return its builder.
    ///
    /// # Panics
    ///
    /// Panics if MAX_FILES would be exceeded.
    pub fn file(self, path: &str) -> FileInProgress {
        assert!(
            self.files.len() < MAX_FILES,
            "Cannot add more than {MAX_FILES} files to a patch"
        );
        FileInProgress {
            patch: self,
            section: FileSection::new(path),
        }
    }

    /// Build the complete patch text.
    pub fn build(self) -> String {
        self.files
            .iter()
            .map(FileSection::render)
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Clone)]
struct FileSection {
    path: String,
    hunks: Vec<HunkSection>,
}

impl FileSection {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            hunks: Vec::new(),
        }
    }

    fn render(&self) -> String {
        let mut out = format!("--- a/{path}\n+++ b/{path}\n", path = self.path);
        for hunk in &self.hunks {
            out.push_str(&hunk.render());
        }
        out
    }
}

/// Helper for building a file section within a patch.
#[derive(Debug)]
pub struct FileInProgress {
    patch: PatchBuilder,
    section: FileSection,
}

impl FileInProgress {
    /// Add a hunk with explicit header ranges.
    pub fn hunk(self, old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> HunkInProgress {
        assert!(
            self.section.hunks.len() < MAX_HUNKS_PER_FILE,
            "Cannot add more than {MAX_HUNKS_PER_FILE} hunks to a file"
        );
        HunkInProgress {
            file: self,
            hunk: HunkSection {
                old_start,
                old_count,
                new_start,
                new_count,
                lines: Vec::new(),
            },
        }
    }

    /// Finish the file section.
    pub fn done(mut self) -> PatchBuilder {
        self.patch.files.push(self.section);
        self.patch
    }
}

#[derive(Debug, Clone)]
struct HunkSection {
    old_start: u32,
    old_count: u32,
    new_start: u32,
    new_count: u32,
    lines: Vec<String>,
}

impl HunkSection {
    fn render(&self) -> String {
        let mut out = format!(
            "@@ -{},{} +{},{} @@\n",
            self.old_start, self.old_count, self.new_start, self.new_count
        );
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Helper for building a hunk within a file section.
#[derive(Debug)]
pub struct HunkInProgress {
    file: FileInProgress,
    hunk: HunkSection,
}

impl HunkInProgress {
    /// Add a context line.
    pub fn context(mut self, line: &str) -> Self {
        self.push(format!(" {line}"));
        self
    }

    /// Add an added line.
    pub fn add_line(mut self, line: &str) -> Self {
        self.push(format!("+{line}"));
        self
    }

    /// Add a removed line.
    pub fn remove_line(mut self, line: &str) -> Self {
        self.push(format!("-{line}"));
        self
    }

    fn push(&mut self, line: String) {
        assert!(
            self.hunk.lines.len() < MAX_LINES_PER_HUNK,
            "Cannot add more than {MAX_LINES_PER_HUNK} lines to a hunk"
        );
        self.hunk.lines.push(line);
    }

    /// Finish the hunk.
    pub fn done(mut self) -> FileInProgress {
        self.file.section.hunks.push(self.hunk);
        self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_well_formed_patch() {
        let patch = PatchBuilder::new()
            .file("src/foo.c")
            .hunk(1, 1, 1, 2)
            .context("int main(void)")
            .add_line("int x = 1;")
            .done()
            .done()
            .build();

        assert!(patch.starts_with("--- a/src/foo.c\n+++ b/src/foo.c\n"));
        assert!(patch.contains("@@ -1,1 +1,2 @@\n"));
        assert!(patch.contains(" int main(void)\n"));
        assert!(patch.contains("+int x = 1;\n"));
    }

    #[test]
    fn multiple_files_render_in_order() {
        let patch = PatchBuilder::new()
            .file("one.c")
            .hunk(1, 0, 1, 1)
            .add_line("first")
            .done()
            .done()
            .file("two.c")
            .hunk(1, 0, 1, 1)
            .add_line("second")
            .done()
            .done()
            .build();

        let one = patch.find("one.c").expect("one.c present");
        let two = patch.find("two.c").expect("two.c present");
        assert!(one < two);
    }
}
