//! Parallel batch processing.
//!
//! Each (package, distro-pair) unit is independent: it owns its raw patch
//! bytes and produces its own report, so units fan out across a bounded
//! rayon pool with no shared mutable state. A degraded unit degrades only
//! its own report.

use rayon::prelude::*;
use tracing::info;

use crosspatch_types::PackageReport;

use crate::compare::{ComparePlan, RawPatch, run_compare};

/// One independent unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageUnit {
    pub plan: ComparePlan,
    pub side_a: Vec<RawPatch>,
    pub side_b: Vec<RawPatch>,
}

/// Run every unit on the rayon pool, preserving input order in the output.
pub fn run_batch(units: Vec<PackageUnit>) -> Vec<PackageReport> {
    info!(units = units.len(), "starting batch comparison");
    units
        .into_par_iter()
        .map(|unit| run_compare(&unit.plan, &unit.side_a, &unit.side_b))
        .collect()
}
