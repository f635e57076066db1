//! Pairwise similarity scoring between fingerprints.

use std::collections::BTreeSet;

use crosspatch_types::ScoreWeights;

use crate::fingerprint::Fingerprint;

/// Jaccard index |A∩B| / |A∪B|, defined as 1.0 when both sets are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Weighted similarity in [0,1]; symmetric, and 1.0 for a non-degenerate
/// fingerprint against itself.
///
/// A content-less fingerprint scores 0.0 against everything, itself
/// included: the per-subscore empty-vs-empty convention would otherwise
/// report two unparseable patches as identical.
pub fn score_pair(a: &Fingerprint, b: &Fingerprint, weights: &ScoreWeights) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Equal digests mean equal normalized content sets; skip the set math.
    if a.digest == b.digest {
        return 1.0;
    }

    let total = weights.sum();
    if total <= 0.0 {
        return 0.0;
    }

    let path_score = jaccard(&a.paths, &b.paths);
    let added_score = jaccard(&a.added, &b.added);
    let removed_score = jaccard(&a.removed, &b.removed);

    (weights.paths * path_score + weights.added * added_score + weights.removed * removed_score)
        / total
}
