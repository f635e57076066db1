//! CSV and TSV renderers for match records.
//!
//! One row per alignment slot, RFC 4180 escaping for CSV.

use crosspatch_types::{MatchRecord, PackageReport};

/// Column order shared by the CSV and TSV renderings.
const CSV_HEADER: &str = "package,distro_a,patch_a,distro_b,patch_b,score,category";

/// Render a package report as CSV (RFC 4180 compliant).
pub fn render_csv_for_report(report: &PackageReport) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for m in &report.matches {
        out.push_str(&render_csv_row(report, m));
    }
    out
}

/// Render a package report as TSV.
pub fn render_tsv_for_report(report: &PackageReport) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.replace(',', "\t"));
    out.push('\n');
    for m in &report.matches {
        out.push_str(&render_tsv_row(report, m));
    }
    out
}

fn render_csv_row(report: &PackageReport, m: &MatchRecord) -> String {
    format!(
        "{},{},{},{},{},{:.4},{}\n",
        escape_csv_field(&report.package),
        escape_csv_field(&report.distro_a),
        escape_csv_field(m.patch_a.as_deref().unwrap_or("")),
        escape_csv_field(&report.distro_b),
        escape_csv_field(m.patch_b.as_deref().unwrap_or("")),
        m.score,
        m.category.as_str()
    )
}

fn render_tsv_row(report: &PackageReport, m: &MatchRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{:.4}\t{}\n",
        escape_tsv_field(&report.package),
        escape_tsv_field(&report.distro_a),
        escape_tsv_field(m.patch_a.as_deref().unwrap_or("")),
        escape_tsv_field(&report.distro_b),
        escape_tsv_field(m.patch_b.as_deref().unwrap_or("")),
        m.score,
        m.category.as_str()
    )
}

/// Escape a field for CSV according to RFC 4180.
fn escape_csv_field(s: &str) -> String {
    let needs_quoting = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');
    if needs_quoting {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Escape a field for TSV with backslash notation.
fn escape_tsv_field(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\t', "\\t").replace('\n', "\\n")
}
