//! Domain logic: normalization, fingerprints, scoring and matching.
//!
//! This crate is designed to be I/O-free and highly testable.

pub mod fingerprint;
pub mod matching;
pub mod normalize;
pub mod score;
pub mod strip;

pub use fingerprint::{Fingerprint, extract_fingerprint};
pub use matching::{Pairing, align, categorize};
pub use normalize::{normalize_line, normalize_path};
pub use score::{jaccard, score_pair};
pub use strip::{StripResolution, resolve_strip_levels};
