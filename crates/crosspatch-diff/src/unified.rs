use serde::Serialize;
use tracing::debug;

use crosspatch_types::ParseStatus;

/// One contiguous change block within a file section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    /// Removed lines, in order, without the leading '-'.
    pub removed: Vec<String>,
    /// Added lines, in order, without the leading '+'.
    pub added: Vec<String>,
    /// Number of context lines seen in the hunk body.
    pub context: u32,
}

/// One per-file section of a patch.
///
/// A section with zero hunks (pure rename or mode change) still counts as a
/// touched path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    /// Old-side path, VCS prefix stripped; `None` for `/dev/null`.
    pub old_path: Option<String>,
    /// New-side path, VCS prefix stripped; `None` for `/dev/null`.
    pub new_path: Option<String>,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// The path this section touches: the new path, falling back to the old
    /// one for deletions.
    pub fn path(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }
}

/// A fully parsed patch. `status` records degradation instead of an error:
/// malformed or undecodable input yields zero files and participates in
/// matching as always-unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPatch {
    pub files: Vec<FileDiff>,
    pub status: ParseStatus,
}

impl ParsedPatch {
    pub fn malformed() -> Self {
        Self {
            files: Vec::new(),
            status: ParseStatus::Malformed,
        }
    }

    pub fn unreadable() -> Self {
        Self {
            files: Vec::new(),
            status: ParseStatus::Unreadable,
        }
    }

    pub fn hunk_count(&self) -> u32 {
        self.files.iter().map(|f| f.hunks.len() as u32).sum()
    }

    pub fn added_total(&self) -> u32 {
        self.files
            .iter()
            .flat_map(|f| &f.hunks)
            .map(|h| h.added.len() as u32)
            .sum()
    }

    pub fn removed_total(&self) -> u32 {
        self.files
            .iter()
            .flat_map(|f| &f.hunks)
            .map(|h| h.removed.len() as u32)
            .sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiffParseError {
    #[error("malformed hunk header: {0}")]
    MalformedHunkHeader(String),
}

/// Parse raw patch bytes, degrading non-UTF-8 content to `Unreadable`.
pub fn parse_patch_bytes(bytes: &[u8]) -> ParsedPatch {
    match std::str::from_utf8(bytes) {
        Ok(text) => parse_patch(text),
        Err(e) => {
            debug!("patch is not valid UTF-8 at byte {}", e.valid_up_to());
            ParsedPatch::unreadable()
        }
    }
}

/// Parse a unified diff into per-file sections with structured hunks.
///
/// Resilient by construction: a malformed hunk header skips that section and
/// parsing continues with the next file header. Only input with neither a
/// valid hunk header nor a recognizable file header anywhere is `Malformed`.
pub fn parse_patch(text: &str) -> ParsedPatch {
    let mut files: Vec<FileDiff> = Vec::new();
    let mut current: Option<FileDiff> = None;
    // Whether the current section already consumed its "--- " header line.
    // A git-style "diff --git" line pre-fills paths, and the following
    // "---"/"+++" pair refines them in place instead of opening a new section.
    let mut seen_old_header = false;

    // Countdown of body lines remaining in the open hunk. Classifying by
    // countdown (not by peeking for the next header) keeps removed lines that
    // happen to start with "--" from being mistaken for a file header.
    let mut rem_old: u32 = 0;
    let mut rem_new: u32 = 0;
    let mut in_hunk = false;

    for raw in text.lines() {
        if in_hunk {
            if raw.starts_with('\\') {
                // "\ No newline at end of file" does not consume a body line.
                continue;
            }

            let consumed = match raw.as_bytes().first().copied() {
                Some(b'+') => {
                    if rem_new > 0 {
                        if let Some(h) = last_hunk(&mut current) {
                            h.added.push(raw[1..].to_string());
                        }
                        rem_new -= 1;
                        true
                    } else {
                        false
                    }
                }
                Some(b'-') => {
                    if rem_old > 0 {
                        if let Some(h) = last_hunk(&mut current) {
                            h.removed.push(raw[1..].to_string());
                        }
                        rem_old -= 1;
                        true
                    } else {
                        false
                    }
                }
                Some(b' ') | None => {
                    // Context; diff tools may emit a fully empty line for
                    // blank context.
                    if rem_old > 0 || rem_new > 0 {
                        if let Some(h) = last_hunk(&mut current) {
                            h.context += 1;
                        }
                        rem_old = rem_old.saturating_sub(1);
                        rem_new = rem_new.saturating_sub(1);
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            };

            if rem_old == 0 && rem_new == 0 {
                in_hunk = false;
            }
            if consumed {
                continue;
            }
            // Unconsumed line ends the hunk body; fall through to headers.
            in_hunk = false;
        }

        if raw.starts_with("diff --git ") {
            flush(&mut files, current.take());
            current = parse_diff_git_line(raw);
            seen_old_header = false;
            continue;
        }

        if let Some(rest) = raw.strip_prefix("--- ") {
            let path = clean_header_path(rest);
            let refine = current
                .as_ref()
                .map(|f| !seen_old_header && f.hunks.is_empty())
                .unwrap_or(false);
            if refine {
                if let Some(f) = current.as_mut() {
                    f.old_path = path;
                }
            } else {
                flush(&mut files, current.take());
                current = Some(FileDiff {
                    old_path: path,
                    new_path: None,
                    hunks: Vec::new(),
                });
            }
            seen_old_header = true;
            continue;
        }

        if let Some(rest) = raw.strip_prefix("+++ ") {
            let path = clean_header_path(rest);
            if let Some(f) = current.as_mut() {
                f.new_path = path;
            } else {
                current = Some(FileDiff {
                    old_path: None,
                    new_path: path,
                    hunks: Vec::new(),
                });
            }
            continue;
        }

        if raw.starts_with("@@") {
            match parse_hunk_header(raw) {
                Ok(hdr) => {
                    let file = current.get_or_insert_with(|| FileDiff {
                        old_path: None,
                        new_path: None,
                        hunks: Vec::new(),
                    });
                    file.hunks.push(Hunk {
                        old_start: hdr.old_start,
                        old_count: hdr.old_count,
                        new_start: hdr.new_start,
                        new_count: hdr.new_count,
                        removed: Vec::new(),
                        added: Vec::new(),
                        context: 0,
                    });
                    rem_old = hdr.old_count;
                    rem_new = hdr.new_count;
                    in_hunk = rem_old > 0 || rem_new > 0;
                }
                Err(e) => {
                    // Skip this section's body; the next file header resumes.
                    debug!("skipping malformed hunk: {e}");
                }
            }
            continue;
        }

        // "Index:", "index", "similarity index", "rename from/to", mode lines,
        // binary markers and free-form commentary are all ignored.
    }

    flush(&mut files, current.take());

    if files.is_empty() {
        debug!("no recognizable diff content");
        return ParsedPatch::malformed();
    }

    ParsedPatch {
        files,
        status: ParseStatus::Parsed,
    }
}

fn flush(files: &mut Vec<FileDiff>, section: Option<FileDiff>) {
    if let Some(f) = section {
        // Header-less sections with no hunks carry no signal at all.
        if f.old_path.is_some() || f.new_path.is_some() || !f.hunks.is_empty() {
            files.push(f);
        }
    }
}

fn last_hunk(current: &mut Option<FileDiff>) -> Option<&mut Hunk> {
    current.as_mut().and_then(|f| f.hunks.last_mut())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HunkHeader {
    old_start: u32,
    old_count: u32,
    new_start: u32,
    new_count: u32,
}

fn parse_hunk_header(line: &str) -> Result<HunkHeader, DiffParseError> {
    // Formats:
    // @@ -1,2 +3,4 @@
    // @@ -1 +3 @@ optional section heading
    let mut it = line.split_whitespace();
    if it.next() != Some("@@") {
        return Err(DiffParseError::MalformedHunkHeader(line.to_string()));
    }

    let old = it
        .next()
        .and_then(|t| t.strip_prefix('-'))
        .ok_or_else(|| DiffParseError::MalformedHunkHeader(line.to_string()))?;
    let new = it
        .next()
        .and_then(|t| t.strip_prefix('+'))
        .ok_or_else(|| DiffParseError::MalformedHunkHeader(line.to_string()))?;

    let (old_start, old_count) = parse_range(old, line)?;
    let (new_start, new_count) = parse_range(new, line)?;

    Ok(HunkHeader {
        old_start,
        old_count,
        new_start,
        new_count,
    })
}

/// Parse "start,count" where an omitted count defaults to 1.
fn parse_range(s: &str, line: &str) -> Result<(u32, u32), DiffParseError> {
    let malformed = || DiffParseError::MalformedHunkHeader(line.to_string());

    match s.split_once(',') {
        Some((start, count)) => {
            let start = start.parse().map_err(|_| malformed())?;
            let count = count.parse().map_err(|_| malformed())?;
            Ok((start, count))
        }
        None => {
            let start = s.parse().map_err(|_| malformed())?;
            Ok((start, 1))
        }
    }
}

/// Start a section from "diff --git a/foo b/foo".
fn parse_diff_git_line(line: &str) -> Option<FileDiff> {
    let mut it = line.split_whitespace();
    if it.next()? != "diff" || it.next()? != "--git" {
        return None;
    }
    let old = it.next().and_then(clean_header_path_opt);
    let new = it.next().and_then(clean_header_path_opt);
    Some(FileDiff {
        old_path: old,
        new_path: new,
        hunks: Vec::new(),
    })
}

/// Clean a header path: drop the timestamp tab suffix, strip `a/`/`b/`
/// prefixes, normalize to forward slashes, map `/dev/null` to `None`.
fn clean_header_path(rest: &str) -> Option<String> {
    clean_header_path_opt(rest.split('\t').next().unwrap_or(rest))
}

fn clean_header_path_opt(p: &str) -> Option<String> {
    let p = p.trim();
    if p.is_empty() || p == "/dev/null" {
        return None;
    }
    let p = p.strip_prefix("a/").or_else(|| p.strip_prefix("b/")).unwrap_or(p);
    let normalized = p.replace('\\', "/");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
