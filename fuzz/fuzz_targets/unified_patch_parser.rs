#![no_main]

use libfuzzer_sys::fuzz_target;

use crosspatch_diff::parse_patch_bytes;

fuzz_target!(|data: &[u8]| {
    let first = parse_patch_bytes(data);
    // Parsing must be total and deterministic on arbitrary bytes.
    let second = parse_patch_bytes(data);
    assert_eq!(first, second);
});
