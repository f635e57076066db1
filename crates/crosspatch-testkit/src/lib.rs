//! Test support for crosspatch: fluent patch builders, canned fixtures,
//! proptest strategies and JSON-schema validation helpers.

pub mod arb;
pub mod fixtures;
pub mod patch_builder;
pub mod schema;

pub use patch_builder::PatchBuilder;
