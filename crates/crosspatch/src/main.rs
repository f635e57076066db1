use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{debug, info};

use crosspatch_core::{
    ComparePlan, PackageUnit, render_csv_for_report, render_markdown_for_report,
    render_tsv_for_report, run_batch, run_compare,
};
use crosspatch_types::{
    BATCH_SCHEMA_V1, BatchSummary, ConfigFile, DEFAULT_MAX_STRIP_DEPTH, MatchSummary,
    PackageReport, ToolMeta,
};

mod loader;

use loader::load_collection;

#[derive(Parser)]
#[command(name = "crosspatch")]
#[command(about = "Cross-distribution patch alignment", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one package's patch collections across two distributions.
    Compare(Box<CompareArgs>),

    /// Compare many packages from a manifest, in parallel.
    Batch(BatchArgs),

    /// Initialize a new crosspatch.toml configuration file.
    Init(InitArgs),

    /// Validate the configuration file (weights and thresholds).
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Source package name.
    #[arg(long)]
    package: String,

    /// Label for side A (defaults to config, else "fedora").
    #[arg(long)]
    distro_a: Option<String>,

    /// Label for side B (defaults to config, else "debian").
    #[arg(long)]
    distro_b: Option<String>,

    /// Directory containing side A's patch files.
    #[arg(long, value_name = "DIR")]
    patches_a: PathBuf,

    /// Directory containing side B's patch files.
    #[arg(long, value_name = "DIR")]
    patches_b: PathBuf,

    /// Ordered series file for side A (quilt convention).
    #[arg(long, value_name = "PATH")]
    series_a: Option<PathBuf>,

    /// Ordered series file for side B (quilt convention).
    #[arg(long, value_name = "PATH")]
    series_b: Option<PathBuf>,

    /// Fixed strip level for side A; omit to infer.
    #[arg(long)]
    strip_a: Option<u32>,

    /// Fixed strip level for side B; omit to infer.
    #[arg(long)]
    strip_b: Option<u32>,

    /// Path to a config file. If omitted, uses ./crosspatch.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the JSON report.
    #[arg(long, default_value = "artifacts/crosspatch/report.json")]
    out: PathBuf,

    /// Write a Markdown summary.
    ///
    /// If provided with no value, defaults to artifacts/crosspatch/summary.md
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "artifacts/crosspatch/summary.md"
    )]
    md: Option<PathBuf>,

    /// Write a CSV report.
    ///
    /// If provided with no value, defaults to artifacts/crosspatch/report.csv
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "artifacts/crosspatch/report.csv"
    )]
    csv: Option<PathBuf>,

    /// Write a TSV report.
    ///
    /// If provided with no value, defaults to artifacts/crosspatch/report.tsv
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "artifacts/crosspatch/report.tsv"
    )]
    tsv: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON manifest listing packages and their patch directories.
    ///
    /// Relative paths in the manifest resolve against its own directory.
    #[arg(long, value_name = "PATH")]
    manifest: PathBuf,

    /// Path to a config file. If omitted, uses ./crosspatch.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for per-package reports and the batch summary.
    #[arg(long, value_name = "DIR", default_value = "artifacts/crosspatch/batch")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Where to write the config file.
    #[arg(long, default_value = "crosspatch.toml")]
    out: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Path to a config file. If omitted, uses ./crosspatch.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// One package entry in a batch manifest.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    package: String,
    patches_a: PathBuf,
    patches_b: PathBuf,
    #[serde(default)]
    series_a: Option<PathBuf>,
    #[serde(default)]
    series_b: Option<PathBuf>,
    #[serde(default)]
    strip_a: Option<u32>,
    #[serde(default)]
    strip_b: Option<u32>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    match run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Compare(args) => {
            cmd_compare(*args)?;
            Ok(0)
        }
        Commands::Batch(args) => {
            cmd_batch(args)?;
            Ok(0)
        }
        Commands::Init(args) => {
            cmd_init(args)?;
            Ok(0)
        }
        Commands::Validate(args) => cmd_validate(args),
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_compare(args: CompareArgs) -> Result<()> {
    let config = load_config(args.config.clone())?;
    let plan = build_plan(
        &config,
        &args.package,
        args.distro_a.clone(),
        args.distro_b.clone(),
        args.strip_a,
        args.strip_b,
    );

    let side_a = load_collection(&args.patches_a, args.series_a.as_deref())?;
    let side_b = load_collection(&args.patches_b, args.series_b.as_deref())?;
    info!(
        package = %plan.package,
        patches_a = side_a.len(),
        patches_b = side_b.len(),
        "loaded patch collections"
    );

    let report = run_compare(&plan, &side_a, &side_b);

    let json = serde_json::to_string_pretty(&report).context("serialize report")?;
    write_artifact(&args.out, &json)?;

    if let Some(path) = &args.md {
        write_artifact(path, &render_markdown_for_report(&report))?;
    }
    if let Some(path) = &args.csv {
        write_artifact(path, &render_csv_for_report(&report))?;
    }
    if let Some(path) = &args.tsv {
        write_artifact(path, &render_tsv_for_report(&report))?;
    }

    println!("{}", summary_line(&report));
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> Result<()> {
    let config = load_config(args.config.clone())?;

    let manifest_text = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("read manifest '{}'", args.manifest.display()))?;
    let entries: Vec<ManifestEntry> = serde_json::from_str(&manifest_text)
        .with_context(|| format!("parse manifest '{}'", args.manifest.display()))?;
    let base = args.manifest.parent().unwrap_or(Path::new("."));

    let started_at = Utc::now();
    let start = Instant::now();

    let mut units = Vec::with_capacity(entries.len());
    for entry in &entries {
        let plan = build_plan(&config, &entry.package, None, None, entry.strip_a, entry.strip_b);
        // Per-unit isolation: a package whose directories cannot be read
        // degrades to empty collections instead of sinking the batch.
        let side_a = load_entry_side(base, &entry.patches_a, entry.series_a.as_deref(), &entry.package);
        let side_b = load_entry_side(base, &entry.patches_b, entry.series_b.as_deref(), &entry.package);
        units.push(PackageUnit {
            plan,
            side_a,
            side_b,
        });
    }

    let reports = run_batch(units);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output directory '{}'", args.out_dir.display()))?;

    let mut totals = MatchSummary::default();
    for report in &reports {
        totals.identical += report.summary.identical;
        totals.similar += report.summary.similar;
        totals.partial += report.summary.partial;
        totals.unique_a += report.summary.unique_a;
        totals.unique_b += report.summary.unique_b;

        let file = args.out_dir.join(format!("{}.json", safe_name(&report.package)));
        let json = serde_json::to_string_pretty(report).context("serialize report")?;
        write_artifact(&file, &json)?;
    }

    let ended_at = Utc::now();
    let summary = BatchSummary {
        schema: BATCH_SCHEMA_V1.to_string(),
        tool: tool_meta(),
        started_at: started_at.to_rfc3339(),
        ended_at: ended_at.to_rfc3339(),
        duration_ms: start.elapsed().as_millis() as u64,
        packages: reports.len() as u32,
        totals,
    };
    let summary_json = serde_json::to_string_pretty(&summary).context("serialize batch summary")?;
    write_artifact(&args.out_dir.join("summary.json"), &summary_json)?;

    println!(
        "{} package(s): {} identical, {} similar, {} partial, {}/{} unique",
        summary.packages,
        summary.totals.identical,
        summary.totals.similar,
        summary.totals.partial,
        summary.totals.unique_a,
        summary.totals.unique_b
    );
    Ok(())
}

fn load_entry_side(
    base: &Path,
    dir: &Path,
    series: Option<&Path>,
    package: &str,
) -> Vec<crosspatch_core::RawPatch> {
    let dir = resolve(base, dir);
    let series = series.map(|s| resolve(base, s));
    match load_collection(&dir, series.as_deref()) {
        Ok(patches) => patches,
        Err(e) => {
            tracing::warn!(package, error = %e, "collection unavailable; treating as empty");
            Vec::new()
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn cmd_init(args: InitArgs) -> Result<()> {
    if args.out.exists() && !args.force {
        bail!(
            "'{}' already exists; pass --force to overwrite",
            args.out.display()
        );
    }

    let text = toml::to_string_pretty(&ConfigFile::default()).context("render default config")?;
    write_artifact(&args.out, &text)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> Result<i32> {
    info!("Validating configuration file");

    let config_path = args.config.clone().or_else(|| {
        let p = PathBuf::from("crosspatch.toml");
        if p.exists() { Some(p) } else { None }
    });

    let Some(path) = config_path else {
        bail!("No configuration file found. Specify --config or create crosspatch.toml");
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let cfg: ConfigFile =
        toml::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))?;

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let w = &cfg.weights;
    if w.paths < 0.0 || w.added < 0.0 || w.removed < 0.0 {
        errors.push("weights must be non-negative".to_string());
    }
    if w.sum() <= 0.0 {
        errors.push("weights must sum to a positive value".to_string());
    } else if (w.sum() - 1.0).abs() > 1e-6 {
        warnings.push(format!(
            "weights sum to {} (scores are normalized, but 1.0 is conventional)",
            w.sum()
        ));
    }

    if !cfg.thresholds.is_ordered() {
        errors.push(format!(
            "thresholds must satisfy 0 < partial <= similar <= identical <= 1 \
             (got partial={}, similar={}, identical={})",
            cfg.thresholds.partial, cfg.thresholds.similar, cfg.thresholds.identical
        ));
    }

    if let Some(depth) = cfg.defaults.max_strip_depth {
        if depth > 16 {
            warnings.push(format!(
                "max_strip_depth {depth} is unusually deep; the search is quadratic in it"
            ));
        }
    }

    for warning in &warnings {
        println!("warning: {warning}");
    }
    if errors.is_empty() {
        println!("{} is valid", path.display());
        Ok(0)
    } else {
        for error in &errors {
            println!("error: {error}");
        }
        Ok(1)
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ConfigFile> {
    let path = match path {
        Some(p) => p,
        None => {
            let default = PathBuf::from("crosspatch.toml");
            if !default.exists() {
                return Ok(ConfigFile::default());
            }
            default
        }
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let cfg =
        toml::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

fn build_plan(
    config: &ConfigFile,
    package: &str,
    distro_a: Option<String>,
    distro_b: Option<String>,
    strip_a: Option<u32>,
    strip_b: Option<u32>,
) -> ComparePlan {
    let defaults = &config.defaults;
    let mut plan = ComparePlan::new(
        package,
        distro_a
            .or_else(|| defaults.distro_a.clone())
            .unwrap_or_else(|| "fedora".to_string()),
        distro_b
            .or_else(|| defaults.distro_b.clone())
            .unwrap_or_else(|| "debian".to_string()),
    );
    plan.strip_a = strip_a.or(defaults.strip_a);
    plan.strip_b = strip_b.or(defaults.strip_b);
    plan.max_strip_depth = defaults.max_strip_depth.unwrap_or(DEFAULT_MAX_STRIP_DEPTH);
    plan.weights = config.weights;
    plan.thresholds = config.thresholds;
    plan
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "crosspatch".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn summary_line(report: &PackageReport) -> String {
    format!(
        "{}: {} identical, {} similar, {} partial, {}/{} unique ({}/{})",
        report.package,
        report.summary.identical,
        report.summary.similar,
        report.summary.partial,
        report.summary.unique_a,
        report.summary.unique_b,
        report.distro_a,
        report.distro_b
    )
}

/// Replace path separators so a package name is safe as a file name.
fn safe_name(package: &str) -> String {
    package.replace(['/', '\\'], "_")
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
    }
    std::fs::write(path, content).with_context(|| format!("write '{}'", path.display()))?;
    info!(path = %path.display(), "wrote artifact");
    Ok(())
}
