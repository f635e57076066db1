//! Path and line canonicalization.
//!
//! Ecosystems nest source trees to different depths and tools disagree on
//! casing and whitespace; everything compared downstream goes through here
//! first.

/// Backup suffixes that patch tooling appends to touched filenames.
const BACKUP_SUFFIXES: &[&str] = &["~", ".bak", ".orig", ".backup"];

/// Canonicalize a touched path for comparison.
///
/// Drops repeated VCS `a/`/`b/` prefix markers, collapses redundant
/// separators, strips the first `strip_level` segments (a path with fewer
/// segments collapses to its final one), lower-cases the remainder and
/// removes backup suffixes from the final segment.
///
/// Idempotent once applied: `normalize_path(&normalize_path(p, s), 0)`
/// returns the same string.
pub fn normalize_path(path: &str, strip_level: u32) -> String {
    let mut p = path.trim();
    while let Some(rest) = p.strip_prefix("a/").or_else(|| p.strip_prefix("b/")) {
        p = rest;
    }

    let segments: Vec<&str> = p
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    if segments.is_empty() {
        return String::new();
    }

    let kept: Vec<&str> = if (strip_level as usize) < segments.len() {
        segments[strip_level as usize..].to_vec()
    } else {
        vec![segments[segments.len() - 1]]
    };

    let mut out = kept.join("/").to_lowercase();
    if let Some(slash) = out.rfind('/') {
        let stripped = strip_backup_suffixes(&out[slash + 1..]);
        out.truncate(slash + 1);
        out.push_str(&stripped);
    } else {
        out = strip_backup_suffixes(&out);
    }
    out
}

fn strip_backup_suffixes(name: &str) -> String {
    let mut n = name;
    loop {
        let mut stripped = false;
        for suffix in BACKUP_SUFFIXES {
            if let Some(rest) = n.strip_suffix(suffix) {
                if !rest.is_empty() {
                    n = rest;
                    stripped = true;
                }
            }
        }
        if !stripped {
            break;
        }
    }
    n.to_string()
}

/// Canonicalize a changed line for set membership: trailing whitespace goes,
/// interior runs collapse to a single space. Returns an empty string for
/// whitespace-only lines, which callers skip.
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_segments() {
        assert_eq!(normalize_path("pkg/src/foo.c", 1), "src/foo.c");
        assert_eq!(normalize_path("pkg/src/foo.c", 2), "foo.c");
        assert_eq!(normalize_path("src/foo.c", 0), "src/foo.c");
    }

    #[test]
    fn over_stripping_keeps_final_segment() {
        assert_eq!(normalize_path("foo.c", 3), "foo.c");
        assert_eq!(normalize_path("src/foo.c", 5), "foo.c");
    }

    #[test]
    fn drops_vcs_prefixes_and_redundant_separators() {
        assert_eq!(normalize_path("a/src/foo.c", 0), "src/foo.c");
        assert_eq!(normalize_path("b/a/src/foo.c", 0), "src/foo.c");
        assert_eq!(normalize_path("src//./foo.c", 0), "src/foo.c");
    }

    #[test]
    fn lower_cases_and_strips_backup_suffixes() {
        assert_eq!(normalize_path("Src/Makefile.orig", 0), "src/makefile");
        assert_eq!(normalize_path("src/foo.c.bak", 0), "src/foo.c");
        assert_eq!(normalize_path("src/foo.c~", 0), "src/foo.c");
        assert_eq!(normalize_path("src/foo.c.orig.bak", 0), "src/foo.c");
    }

    #[test]
    fn backup_suffix_alone_is_kept() {
        // Never strip a name down to nothing.
        assert_eq!(normalize_path(".orig", 0), ".orig");
    }

    #[test]
    fn normalization_is_idempotent_once_applied() {
        for (path, strip) in [
            ("pkg/src/Foo.C", 1),
            ("a/deep/tree/file.h.orig", 2),
            ("b/one.txt", 0),
            ("x//y/./z.c~", 1),
        ] {
            let once = normalize_path(path, strip);
            assert_eq!(normalize_path(&once, 0), once, "path {path:?}");
        }
    }

    #[test]
    fn line_normalization_collapses_whitespace() {
        assert_eq!(normalize_line("int x = 1;   "), "int x = 1;");
        assert_eq!(normalize_line("\tint\t x   = 1;"), "int x = 1;");
        assert_eq!(normalize_line("   "), "");
        assert_eq!(normalize_line(""), "");
    }

    #[test]
    fn line_normalization_is_idempotent() {
        for line in ["  a   b\tc ", "plain", "", " \t "] {
            let once = normalize_line(line);
            assert_eq!(normalize_line(&once), once);
        }
    }
}
