//! Fuzz target for strip-level inference.
//!
//! Validates that resolution is total and its outputs stay within the
//! search bound regardless of path shapes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use crosspatch_domain::resolve_strip_levels;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    paths_a: Vec<String>,
    paths_b: Vec<String>,
    hint_a: Option<u8>,
    hint_b: Option<u8>,
    max_depth: u8,
}

fuzz_target!(|input: FuzzInput| {
    if input.paths_a.iter().chain(&input.paths_b).any(|p| p.len() > 300) {
        return;
    }

    let max_depth = u32::from(input.max_depth % 8);
    let hint_a = input.hint_a.map(u32::from);
    let hint_b = input.hint_b.map(u32::from);

    let r = resolve_strip_levels(&input.paths_a, &input.paths_b, hint_a, hint_b, max_depth);

    if let Some(h) = hint_a {
        assert_eq!(r.strip_a, h);
    } else {
        assert!(r.strip_a <= max_depth.max(1));
    }
    if let Some(h) = hint_b {
        assert_eq!(r.strip_b, h);
    } else {
        assert!(r.strip_b <= max_depth.max(1));
    }
});
