//! Patch-collection loading.
//!
//! A collection is either the ordered content of a quilt-style series file
//! or, when no series exists, a sorted directory scan of `*.patch` and
//! `*.diff` files. File contents are read as raw bytes; decoding problems
//! are the parser's to degrade, not the loader's to fail on.

use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crosspatch_core::RawPatch;

/// Load one side's patch collection.
pub fn load_collection(dir: &Path, series: Option<&Path>) -> Result<Vec<RawPatch>> {
    match series {
        Some(series_path) => from_series(dir, series_path),
        None => scan_dir(dir),
    }
}

/// Read patches in the order listed by a series file.
///
/// Blank lines and `#` comments are skipped. A line may carry options after
/// the patch name (`fix.patch -p0`); only the first token names the file.
/// Entries whose file cannot be read are skipped with a warning so one
/// stray listing does not sink the package.
fn from_series(dir: &Path, series_path: &Path) -> Result<Vec<RawPatch>> {
    let text = std::fs::read_to_string(series_path)
        .with_context(|| format!("read series file '{}'", series_path.display()))?;

    let mut out = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(name) = line.split_whitespace().next() else {
            continue;
        };

        let path = dir.join(name);
        match std::fs::read(&path) {
            Ok(bytes) => out.push(RawPatch::new(name, bytes)),
            Err(e) => warn!(
                patch = name,
                error = %e,
                "series entry could not be read; skipping"
            ),
        }
    }

    debug!(count = out.len(), series = %series_path.display(), "loaded series collection");
    Ok(out)
}

/// Scan a directory for `*.patch` / `*.diff` files, sorted by name.
fn scan_dir(dir: &Path) -> Result<Vec<RawPatch>> {
    let globs = patch_globs();

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read patch directory '{}'", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !globs.is_match(name) {
            continue;
        }
        let bytes =
            std::fs::read(&path).with_context(|| format!("read patch '{}'", path.display()))?;
        out.push(RawPatch::new(name, bytes));
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = out.len(), dir = %dir.display(), "scanned patch directory");
    Ok(out)
}

fn patch_globs() -> GlobSet {
    let mut b = GlobSetBuilder::new();
    for pattern in ["*.patch", "*.diff"] {
        b.add(Glob::new(pattern).expect("static glob should compile"));
    }
    b.build().expect("globset build should succeed")
}
