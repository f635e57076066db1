//! Unified-diff parsing for crosspatch.
//!
//! Turns raw patch text into structured per-file hunks. Parsing never fails
//! hard: malformed or undecodable input degrades to a content-less
//! [`ParsedPatch`] carrying a diagnostic [`ParseStatus`].

pub mod unified;

pub use unified::{
    DiffParseError, FileDiff, Hunk, ParsedPatch, parse_patch, parse_patch_bytes,
};
