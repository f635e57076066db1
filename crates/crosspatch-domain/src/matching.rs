//! Cross-collection patch alignment.
//!
//! Computes the full pairwise score matrix and accepts pairs greedily in
//! descending score order. Greedy is deliberate: per-package patch counts
//! are small, and it reproduces the source behavior deterministically.

use tracing::debug;

use crosspatch_types::{CategoryThresholds, MatchCategory, ScoreWeights};

use crate::fingerprint::Fingerprint;
use crate::score::score_pair;

/// One alignment slot. Indices refer to the input collections; at least one
/// side is always present, and a lone side is always `Unique` at score 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pairing {
    pub index_a: Option<usize>,
    pub index_b: Option<usize>,
    pub score: f64,
    pub category: MatchCategory,
}

/// Map an accepted pair score to its category.
///
/// Callers must reject scores below `thresholds.partial` before this point.
pub fn categorize(score: f64, thresholds: &CategoryThresholds) -> MatchCategory {
    if score >= thresholds.identical {
        MatchCategory::Identical
    } else if score >= thresholds.similar {
        MatchCategory::Similar
    } else if score >= thresholds.partial {
        MatchCategory::Partial
    } else {
        MatchCategory::Unique
    }
}

/// Align two fingerprint collections one-to-one-or-none.
///
/// Every input patch appears in exactly one returned slot: matched pairs in
/// side-A order first, then unmatched A patches, interleaved in A order,
/// then unmatched B patches in B order. Candidate pairs below the partial
/// threshold are rejected outright rather than forced into low-confidence
/// pairings.
pub fn align(
    side_a: &[Fingerprint],
    side_b: &[Fingerprint],
    weights: &ScoreWeights,
    thresholds: &CategoryThresholds,
) -> Vec<Pairing> {
    // Full |A|x|B| matrix, kept only above the rejection threshold.
    let mut candidates: Vec<(usize, usize, f64, u32)> = Vec::new();
    for (i, a) in side_a.iter().enumerate() {
        for (j, b) in side_b.iter().enumerate() {
            let score = score_pair(a, b, weights);
            if score >= thresholds.partial {
                let line_sum = a.line_total() + b.line_total();
                candidates.push((i, j, score, line_sum));
            }
        }
    }

    // Descending score; ties prefer the more substantial pair, then input
    // order, for a deterministic assignment.
    candidates.sort_by(|x, y| {
        y.2.total_cmp(&x.2)
            .then(y.3.cmp(&x.3))
            .then(x.0.cmp(&y.0))
            .then(x.1.cmp(&y.1))
    });

    let mut matched_a: Vec<Option<(usize, f64)>> = vec![None; side_a.len()];
    let mut matched_b: Vec<bool> = vec![false; side_b.len()];

    for (i, j, score, _) in candidates {
        if matched_a[i].is_none() && !matched_b[j] {
            matched_a[i] = Some((j, score));
            matched_b[j] = true;
            debug!(i, j, score, "accepted pair");
        }
    }

    let mut out = Vec::with_capacity(side_a.len() + side_b.len());
    for (i, slot) in matched_a.iter().enumerate() {
        match slot {
            Some((j, score)) => out.push(Pairing {
                index_a: Some(i),
                index_b: Some(*j),
                score: *score,
                category: categorize(*score, thresholds),
            }),
            None => out.push(Pairing {
                index_a: Some(i),
                index_b: None,
                score: 0.0,
                category: MatchCategory::Unique,
            }),
        }
    }
    for (j, taken) in matched_b.iter().enumerate() {
        if !taken {
            out.push(Pairing {
                index_a: None,
                index_b: Some(j),
                score: 0.0,
                category: MatchCategory::Unique,
            });
        }
    }

    out
}
