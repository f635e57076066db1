use crosspatch_types::{MatchRecord, PackageReport};

/// Render a package report as a markdown summary table.
pub fn render_markdown_for_report(report: &PackageReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "## crosspatch — {} ({} vs {})\n\n",
        escape_md(&report.package),
        escape_md(&report.distro_a),
        escape_md(&report.distro_b)
    ));

    out.push_str(&format!(
        "**{}** identical, **{}** similar, **{}** partial, **{}** unique to {}, **{}** unique to {} \
         (strip levels {}/{})\n\n",
        report.summary.identical,
        report.summary.similar,
        report.summary.partial,
        report.summary.unique_a,
        escape_md(&report.distro_a),
        report.summary.unique_b,
        escape_md(&report.distro_b),
        report.strip_a,
        report.strip_b
    ));

    if !report.conditions.is_empty() {
        out.push_str("**Conditions:**\n");
        for c in &report.conditions {
            out.push_str(&format!("- {c}\n"));
        }
        out.push('\n');
    }

    if report.matches.is_empty() {
        out.push_str("No patches on either side.\n");
        return out;
    }

    out.push_str(&format!(
        "| Category | Score | {} | {} |\n",
        escape_md(&report.distro_a),
        escape_md(&report.distro_b)
    ));
    out.push_str("|---|---|---|---|\n");

    for m in &report.matches {
        out.push_str(&render_match_row(m));
    }

    out.push('\n');
    out
}

fn render_match_row(m: &MatchRecord) -> String {
    format!(
        "| {} | {:.2} | {} | {} |\n",
        m.category.as_str(),
        m.score,
        render_side(m.patch_a.as_deref(), m.status_a.map(|s| s.as_str())),
        render_side(m.patch_b.as_deref(), m.status_b.map(|s| s.as_str())),
    )
}

fn render_side(name: Option<&str>, status: Option<&str>) -> String {
    match (name, status) {
        (Some(n), Some(s)) => format!("`{}` ({s})", escape_md(n)),
        (Some(n), None) => format!("`{}`", escape_md(n)),
        (None, _) => "—".to_string(),
    }
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('`', "\\`")
}
