//! Data types (config + reports) for crosspatch.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Schema Identifiers ─────────────────────────────────────────
pub const REPORT_SCHEMA_V1: &str = "crosspatch.report.v1";
pub const BATCH_SCHEMA_V1: &str = "crosspatch.batch.v1";

// ── Frozen Vocabulary ──────────────────────────────────────────
// Package-level condition tokens (snake_case)
pub const CONDITION_AMBIGUOUS_STRIP_LEVEL: &str = "ambiguous_strip_level";
pub const CONDITION_EMPTY_SIDE_A: &str = "empty_side_a";
pub const CONDITION_EMPTY_SIDE_B: &str = "empty_side_b";

/// Outcome of parsing one patch file's diff text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Parsed,
    Malformed,
    Unreadable,
}

impl ParseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseStatus::Parsed => "parsed",
            ParseStatus::Malformed => "malformed",
            ParseStatus::Unreadable => "unreadable",
        }
    }

    /// Whether the patch degraded to a content-less fingerprint.
    pub fn is_degraded(self) -> bool {
        !matches!(self, ParseStatus::Parsed)
    }
}

/// Classification of one aligned patch pair (or lone patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Identical,
    Similar,
    Partial,
    Unique,
}

impl MatchCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchCategory::Identical => "identical",
            MatchCategory::Similar => "similar",
            MatchCategory::Partial => "partial",
            MatchCategory::Unique => "unique",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// One slot of the alignment: a patch from each side, either possibly absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchRecord {
    /// Source filename on side A, or null when the patch is unique to side B.
    pub patch_a: Option<String>,
    /// Source filename on side B, or null when the patch is unique to side A.
    pub patch_b: Option<String>,
    pub score: f64,
    pub category: MatchCategory,
    /// Parse status of the side-A patch; serialized only when degraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_a: Option<ParseStatus>,
    /// Parse status of the side-B patch; serialized only when degraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_b: Option<ParseStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct MatchSummary {
    pub identical: u32,
    pub similar: u32,
    pub partial: u32,
    pub unique_a: u32,
    pub unique_b: u32,
}

impl MatchSummary {
    pub fn total(&self) -> u32 {
        self.identical + self.similar + self.partial + self.unique_a + self.unique_b
    }
}

/// The full alignment result for one package across one distro pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PackageReport {
    /// Schema identifier, always "crosspatch.report.v1".
    pub schema: String,
    pub tool: ToolMeta,
    pub package: String,
    pub distro_a: String,
    pub distro_b: String,
    pub matches: Vec<MatchRecord>,
    pub summary: MatchSummary,
    /// Resolved strip level per side, for diagnostics.
    pub strip_a: u32,
    pub strip_b: u32,
    /// Non-fatal condition tokens (e.g. "ambiguous_strip_level").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

/// Totals for one batch run, written beside the per-package reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    /// Schema identifier, always "crosspatch.batch.v1".
    pub schema: String,
    pub tool: ToolMeta,
    /// ISO 8601 timestamp when the run started.
    pub started_at: String,
    /// ISO 8601 timestamp when the run ended.
    pub ended_at: String,
    pub duration_ms: u64,
    pub packages: u32,
    /// Category totals summed across every package.
    pub totals: MatchSummary,
}

// ============================================================================
// Configuration file (crosspatch.toml)
// ============================================================================

/// The on-disk configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub weights: ScoreWeights,

    #[serde(default)]
    pub thresholds: CategoryThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distro_a: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distro_b: Option<String>,

    /// Fixed strip level for side A; omit to infer per package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_a: Option<u32>,

    /// Fixed strip level for side B; omit to infer per package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_b: Option<u32>,

    /// Upper bound for strip-level inference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_strip_depth: Option<u32>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            distro_a: Some("fedora".to_string()),
            distro_b: Some("debian".to_string()),
            strip_a: None,
            strip_b: None,
            max_strip_depth: Some(DEFAULT_MAX_STRIP_DEPTH),
        }
    }
}

pub const DEFAULT_MAX_STRIP_DEPTH: u32 = 6;

/// Sub-score weights for the similarity metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreWeights {
    pub paths: f64,
    pub added: f64,
    pub removed: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        // Added lines carry the new behavior; paths and removed lines corroborate.
        Self {
            paths: 0.3,
            added: 0.4,
            removed: 0.3,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.paths + self.added + self.removed
    }
}

/// Score thresholds mapping a pair score to a category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryThresholds {
    /// Scores at or above this are identical.
    pub identical: f64,
    /// Scores at or above this (below identical) are similar.
    pub similar: f64,
    /// Scores at or above this (below similar) are partial; below is rejected.
    pub partial: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            identical: 0.95,
            similar: 0.8,
            partial: 0.5,
        }
    }
}

impl CategoryThresholds {
    /// Ordering sanity: 0 < partial <= similar <= identical <= 1.
    pub fn is_ordered(&self) -> bool {
        0.0 < self.partial
            && self.partial <= self.similar
            && self.similar <= self.identical
            && self.identical <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_category_as_str() {
        assert_eq!(ParseStatus::Parsed.as_str(), "parsed");
        assert_eq!(ParseStatus::Malformed.as_str(), "malformed");
        assert_eq!(ParseStatus::Unreadable.as_str(), "unreadable");

        assert_eq!(MatchCategory::Identical.as_str(), "identical");
        assert_eq!(MatchCategory::Similar.as_str(), "similar");
        assert_eq!(MatchCategory::Partial.as_str(), "partial");
        assert_eq!(MatchCategory::Unique.as_str(), "unique");
    }

    #[test]
    fn degraded_statuses() {
        assert!(!ParseStatus::Parsed.is_degraded());
        assert!(ParseStatus::Malformed.is_degraded());
        assert!(ParseStatus::Unreadable.is_degraded());
    }

    #[test]
    fn defaults_match_expected_values() {
        let defaults = Defaults::default();
        assert_eq!(defaults.distro_a.as_deref(), Some("fedora"));
        assert_eq!(defaults.distro_b.as_deref(), Some("debian"));
        assert_eq!(defaults.strip_a, None);
        assert_eq!(defaults.strip_b, None);
        assert_eq!(defaults.max_strip_depth, Some(6));

        let weights = ScoreWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-9);

        let thresholds = CategoryThresholds::default();
        assert!(thresholds.is_ordered());
    }

    #[test]
    fn thresholds_ordering_rejects_inversions() {
        let mut t = CategoryThresholds::default();
        t.partial = 0.9;
        t.similar = 0.6;
        assert!(!t.is_ordered());

        let mut t = CategoryThresholds::default();
        t.identical = 1.5;
        assert!(!t.is_ordered());

        let mut t = CategoryThresholds::default();
        t.partial = 0.0;
        assert!(!t.is_ordered());
    }

    #[test]
    fn match_record_statuses_omitted_when_absent() {
        let record = MatchRecord {
            patch_a: Some("fix-cve.patch".to_string()),
            patch_b: Some("0001-fix-cve.patch".to_string()),
            score: 1.0,
            category: MatchCategory::Identical,
            status_a: None,
            status_b: None,
        };

        let value = serde_json::to_value(&record).expect("serialize match record");
        let obj = value.as_object().expect("record should be object");
        assert!(!obj.contains_key("status_a"));
        assert!(!obj.contains_key("status_b"));
        assert_eq!(obj.get("category").and_then(|v| v.as_str()), Some("identical"));
    }

    #[test]
    fn report_serializes_wire_shape() {
        let report = PackageReport {
            schema: REPORT_SCHEMA_V1.to_string(),
            tool: ToolMeta {
                name: "crosspatch".to_string(),
                version: "0.1.0".to_string(),
            },
            package: "zlib".to_string(),
            distro_a: "fedora".to_string(),
            distro_b: "debian".to_string(),
            matches: vec![MatchRecord {
                patch_a: Some("a.patch".to_string()),
                patch_b: None,
                score: 0.0,
                category: MatchCategory::Unique,
                status_a: None,
                status_b: None,
            }],
            summary: MatchSummary {
                unique_a: 1,
                ..MatchSummary::default()
            },
            strip_a: 1,
            strip_b: 1,
            conditions: vec![],
        };

        let value = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(
            value.get("schema").and_then(|v| v.as_str()),
            Some("crosspatch.report.v1")
        );
        let matches = value.get("matches").and_then(|v| v.as_array()).expect("matches");
        assert!(matches[0].get("patch_b").expect("patch_b present").is_null());
        // Empty conditions are omitted entirely.
        assert!(value.get("conditions").is_none());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = ConfigFile::default();
        let text = toml::to_string_pretty(&cfg).expect("render toml");
        let back: ConfigFile = toml::from_str(&text).expect("parse toml");
        assert_eq!(back, cfg);
    }

    #[test]
    fn summary_total_counts_every_slot() {
        let summary = MatchSummary {
            identical: 2,
            similar: 1,
            partial: 1,
            unique_a: 3,
            unique_b: 4,
        };
        assert_eq!(summary.total(), 11);
    }
}
