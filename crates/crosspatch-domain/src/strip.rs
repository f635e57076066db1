//! Strip-level inference.
//!
//! The two ecosystems nest their source trees to different depths, so the
//! number of leading path components to discard must be inferred before any
//! path comparison. The resolver brute-forces small candidate levels per
//! side and keeps the pair that lines the most paths up.

use std::collections::BTreeSet;

use tracing::debug;

use crate::normalize::normalize_path;

/// Outcome of strip-level inference for one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripResolution {
    pub strip_a: u32,
    pub strip_b: u32,
    /// Set when both sides had paths but no candidate pair produced any
    /// overlap; the resolver then falls back to level 1 per unhinted side.
    pub ambiguous: bool,
}

/// Infer strip levels for both sides.
///
/// Hints pin a side to a known convention (quilt series are level 1) and
/// exclude it from the search. The search is joint: overlap is only
/// meaningful between one candidate set per side, so all `(level_a,
/// level_b)` pairs within the depth bound are tried and the pair with the
/// largest shared-path count wins. Ties prefer the least aggressive
/// stripping (smallest level sum, then smallest `level_a`).
pub fn resolve_strip_levels(
    paths_a: &[String],
    paths_b: &[String],
    hint_a: Option<u32>,
    hint_b: Option<u32>,
    max_depth: u32,
) -> StripResolution {
    if let (Some(a), Some(b)) = (hint_a, hint_b) {
        return StripResolution {
            strip_a: a,
            strip_b: b,
            ambiguous: false,
        };
    }

    // An empty side makes every candidate equally (un)informative; fall back
    // without flagging ambiguity, the caller reports the empty side itself.
    if paths_a.is_empty() || paths_b.is_empty() {
        return StripResolution {
            strip_a: hint_a.unwrap_or(1),
            strip_b: hint_b.unwrap_or(1),
            ambiguous: false,
        };
    }

    let candidates_a = candidate_levels(paths_a, hint_a, max_depth);
    let candidates_b = candidate_levels(paths_b, hint_b, max_depth);

    let sets_a: Vec<(u32, BTreeSet<String>)> = candidates_a
        .iter()
        .map(|&l| (l, normalized_set(paths_a, l)))
        .collect();
    let sets_b: Vec<(u32, BTreeSet<String>)> = candidates_b
        .iter()
        .map(|&l| (l, normalized_set(paths_b, l)))
        .collect();

    let mut best: Option<(usize, u32, u32)> = None;
    for (la, set_a) in &sets_a {
        for (lb, set_b) in &sets_b {
            let overlap = set_a.intersection(set_b).count();
            if overlap == 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_overlap, best_la, best_lb)) => {
                    let sum = la + lb;
                    let best_sum = best_la + best_lb;
                    overlap > best_overlap
                        || (overlap == best_overlap
                            && (sum < best_sum || (sum == best_sum && *la < best_la)))
                }
            };
            if better {
                best = Some((overlap, *la, *lb));
            }
        }
    }

    match best {
        Some((overlap, strip_a, strip_b)) => {
            debug!(overlap, strip_a, strip_b, "resolved strip levels");
            StripResolution {
                strip_a,
                strip_b,
                ambiguous: false,
            }
        }
        None => {
            debug!("no strip level pair produced overlap; defaulting to 1");
            StripResolution {
                strip_a: hint_a.unwrap_or(1),
                strip_b: hint_b.unwrap_or(1),
                ambiguous: true,
            }
        }
    }
}

fn candidate_levels(paths: &[String], hint: Option<u32>, max_depth: u32) -> Vec<u32> {
    if let Some(h) = hint {
        return vec![h];
    }
    let observed = paths
        .iter()
        .map(|p| p.split('/').filter(|s| !s.is_empty()).count() as u32)
        .max()
        .unwrap_or(0);
    (0..=observed.min(max_depth)).collect()
}

fn normalized_set(paths: &[String], level: u32) -> BTreeSet<String> {
    paths
        .iter()
        .map(|p| normalize_path(p, level))
        .filter(|p| !p.is_empty())
        .collect()
}
