//! Fuzz target for the similarity scorer.
//!
//! Checks symmetry, range and the content-less zero boundary on
//! fingerprints extracted from arbitrary patch text.

#![no_main]

use libfuzzer_sys::fuzz_target;

use crosspatch_diff::parse_patch_bytes;
use crosspatch_domain::{extract_fingerprint, score_pair};
use crosspatch_types::ScoreWeights;

fuzz_target!(|data: &[u8]| {
    let mid = data.len() / 2;
    let a = extract_fingerprint(&parse_patch_bytes(&data[..mid]), 0);
    let b = extract_fingerprint(&parse_patch_bytes(&data[mid..]), 1);

    let w = ScoreWeights::default();
    let ab = score_pair(&a, &b, &w);
    let ba = score_pair(&b, &a, &w);

    assert_eq!(ab, ba);
    assert!((0.0..=1.0).contains(&ab));

    let aa = score_pair(&a, &a, &w);
    if a.is_empty() {
        assert_eq!(aa, 0.0);
    } else {
        assert_eq!(aa, 1.0);
    }
});
