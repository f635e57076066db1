use tracing::{debug, info};

use crosspatch_diff::{ParsedPatch, parse_patch_bytes};
use crosspatch_domain::{align, extract_fingerprint, resolve_strip_levels};
use crosspatch_types::{
    CONDITION_AMBIGUOUS_STRIP_LEVEL, CONDITION_EMPTY_SIDE_A, CONDITION_EMPTY_SIDE_B,
    CategoryThresholds, DEFAULT_MAX_STRIP_DEPTH, MatchCategory, MatchRecord, MatchSummary,
    PackageReport, ParseStatus, REPORT_SCHEMA_V1, ScoreWeights, ToolMeta,
};

/// One patch file's raw content, exactly as the caller read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPatch {
    /// Source filename within its collection.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawPatch {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Everything needed to compare one package across one distro pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparePlan {
    pub package: String,
    pub distro_a: String,
    pub distro_b: String,
    /// Fixed strip level for side A; `None` infers it.
    pub strip_a: Option<u32>,
    /// Fixed strip level for side B; `None` infers it.
    pub strip_b: Option<u32>,
    pub max_strip_depth: u32,
    pub weights: ScoreWeights,
    pub thresholds: CategoryThresholds,
}

impl ComparePlan {
    pub fn new(
        package: impl Into<String>,
        distro_a: impl Into<String>,
        distro_b: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            distro_a: distro_a.into(),
            distro_b: distro_b.into(),
            strip_a: None,
            strip_b: None,
            max_strip_depth: DEFAULT_MAX_STRIP_DEPTH,
            weights: ScoreWeights::default(),
            thresholds: CategoryThresholds::default(),
        }
    }
}

/// Compare two patch collections for one package.
///
/// Infallible by design: malformed or undecodable patches degrade to
/// content-less fingerprints and deterministic `unique` classification, so
/// one bad file never poisons the package, and one bad package never aborts
/// a batch.
pub fn run_compare(plan: &ComparePlan, side_a: &[RawPatch], side_b: &[RawPatch]) -> PackageReport {
    let parsed_a = parse_side(&plan.distro_a, side_a);
    let parsed_b = parse_side(&plan.distro_b, side_b);

    let resolution = resolve_strip_levels(
        &touched_paths(&parsed_a),
        &touched_paths(&parsed_b),
        plan.strip_a,
        plan.strip_b,
        plan.max_strip_depth,
    );

    let prints_a: Vec<_> = parsed_a
        .iter()
        .map(|p| extract_fingerprint(p, resolution.strip_a))
        .collect();
    let prints_b: Vec<_> = parsed_b
        .iter()
        .map(|p| extract_fingerprint(p, resolution.strip_b))
        .collect();

    let pairings = align(&prints_a, &prints_b, &plan.weights, &plan.thresholds);

    let mut summary = MatchSummary::default();
    let mut matches = Vec::with_capacity(pairings.len());
    for pairing in pairings {
        match pairing.category {
            MatchCategory::Identical => summary.identical += 1,
            MatchCategory::Similar => summary.similar += 1,
            MatchCategory::Partial => summary.partial += 1,
            MatchCategory::Unique => {
                if pairing.index_a.is_some() {
                    summary.unique_a += 1;
                } else {
                    summary.unique_b += 1;
                }
            }
        }
        matches.push(MatchRecord {
            patch_a: pairing.index_a.map(|i| side_a[i].name.clone()),
            patch_b: pairing.index_b.map(|j| side_b[j].name.clone()),
            score: pairing.score,
            category: pairing.category,
            status_a: pairing.index_a.and_then(|i| degraded_status(&parsed_a[i])),
            status_b: pairing.index_b.and_then(|j| degraded_status(&parsed_b[j])),
        });
    }

    let mut conditions = Vec::new();
    if resolution.ambiguous {
        conditions.push(CONDITION_AMBIGUOUS_STRIP_LEVEL.to_string());
    }
    if side_a.is_empty() {
        conditions.push(CONDITION_EMPTY_SIDE_A.to_string());
    }
    if side_b.is_empty() {
        conditions.push(CONDITION_EMPTY_SIDE_B.to_string());
    }

    info!(
        package = %plan.package,
        identical = summary.identical,
        similar = summary.similar,
        partial = summary.partial,
        unique_a = summary.unique_a,
        unique_b = summary.unique_b,
        "compared patch collections"
    );

    PackageReport {
        schema: REPORT_SCHEMA_V1.to_string(),
        tool: ToolMeta {
            name: "crosspatch".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        package: plan.package.clone(),
        distro_a: plan.distro_a.clone(),
        distro_b: plan.distro_b.clone(),
        matches,
        summary,
        strip_a: resolution.strip_a,
        strip_b: resolution.strip_b,
        conditions,
    }
}

fn parse_side(distro: &str, patches: &[RawPatch]) -> Vec<ParsedPatch> {
    patches
        .iter()
        .map(|p| {
            let parsed = parse_patch_bytes(&p.bytes);
            if parsed.status.is_degraded() {
                debug!(distro, patch = %p.name, status = parsed.status.as_str(), "degraded patch");
            }
            parsed
        })
        .collect()
}

fn touched_paths(parsed: &[ParsedPatch]) -> Vec<String> {
    parsed
        .iter()
        .flat_map(|p| &p.files)
        .filter_map(|f| f.path())
        .map(|p| p.to_string())
        .collect()
}

fn degraded_status(patch: &ParsedPatch) -> Option<ParseStatus> {
    patch.status.is_degraded().then_some(patch.status)
}
