//! Package-level comparison orchestration for crosspatch.
//!
//! Takes raw patch collections for one package per side, runs the domain
//! engine, and produces serializable reports plus markdown/CSV renderings.
//! Nothing here performs I/O; callers feed bytes in and write artifacts out.

pub mod batch;
pub mod compare;
pub mod csv;
pub mod render;

pub use batch::{PackageUnit, run_batch};
pub use compare::{ComparePlan, RawPatch, run_compare};
pub use csv::{render_csv_for_report, render_tsv_for_report};
pub use render::render_markdown_for_report;
