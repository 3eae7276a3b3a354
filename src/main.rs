//! trackchanges - CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trackchanges::batch::{load_manifest, run_batch};
use trackchanges::changelog::patches_from_spec;
use trackchanges::config::{resolve_checkout_dir, resolve_committer};
use trackchanges::error::ManifestError;
use trackchanges::record::{record_changes, DummyReason, PackageUpdate, RecordOutcome, RecordSettings};
use trackchanges::report::{report_changes, Outcome, OutcomeCounts};
use trackchanges::SystemClock;

/// Record package updates in CHANGES files from upstream git history.
#[derive(Parser, Debug)]
#[command(name = "trackchanges")]
#[command(about = "Record package updates in CHANGES files from upstream git history")]
#[command(version)]
struct Cli {
    /// Log progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prepend an entry for one package update
    Record(RecordArgs),

    /// Record every package listed in a JSON manifest and print a summary
    Batch(BatchArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
struct CommonArgs {
    /// Directory holding upstream checkouts (defaults to TRACKCHANGES_CHECKOUT_DIR)
    #[arg(long)]
    checkout_dir: Option<PathBuf>,

    /// Committer identity for the entry header (defaults to TRACKCHANGES_COMMITTER or git config)
    #[arg(long)]
    committer: Option<String>,
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// The .changes file to update
    changes_file: PathBuf,

    /// Previous package version
    #[arg(long)]
    from: String,

    /// New package version
    #[arg(long)]
    to: String,

    /// Upstream repository name inside the checkout directory
    #[arg(long)]
    upstream_repo: String,

    /// Release nature written in the entry, e.g. bugfix or feature
    #[arg(long, default_value = "bugfix")]
    changetype: String,

    /// Release kind: plasma, frameworks, applications or other
    #[arg(long, default_value = "applications")]
    kind: String,

    /// Revision to use when the tag for --to does not exist
    #[arg(long)]
    branch: Option<String>,

    /// Patch applied by the previous package revision (repeatable)
    #[arg(long = "previous-patch", conflicts_with = "previous_spec")]
    previous_patches: Vec<String>,

    /// Patch applied by the current package revision (repeatable)
    #[arg(long = "current-patch", conflicts_with = "current_spec")]
    current_patches: Vec<String>,

    /// RPM spec file of the previous revision to read patches from
    #[arg(long)]
    previous_spec: Option<PathBuf>,

    /// RPM spec file of the current revision to read patches from
    #[arg(long)]
    current_spec: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON manifest listing the package updates
    manifest: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Record(args) => run_record(args),
        Command::Batch(args) => run_batch_command(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn settings(common: CommonArgs) -> Result<RecordSettings> {
    let committer =
        resolve_committer(common.committer.as_deref()).context("Failed to determine committer")?;

    Ok(RecordSettings {
        checkout_dir: resolve_checkout_dir(common.checkout_dir),
        committer,
    })
}

/// Patch names from repeated flags or a spec file; `None` when neither was given.
fn patch_set(names: Vec<String>, spec: Option<&Path>) -> Result<Option<Vec<String>>, ManifestError> {
    if let Some(path) = spec {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::SpecReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(Some(patches_from_spec(&content)));
    }

    Ok((!names.is_empty()).then_some(names))
}

fn run_record(args: RecordArgs) -> Result<()> {
    let previous_patches = patch_set(args.previous_patches, args.previous_spec.as_deref())?;
    let current_patches = patch_set(args.current_patches, args.current_spec.as_deref())?;

    let update = PackageUpdate {
        changes_file: args.changes_file,
        upstream_repo: args.upstream_repo,
        version_from: args.from,
        version_to: args.to,
        changetype: args.changetype,
        kind: args.kind,
        branch: args.branch,
        previous_patches,
        current_patches,
    };
    let settings = settings(args.common)?;

    let outcome = record_changes(&update, &settings, &SystemClock).with_context(|| {
        format!("Failed to record changes in {}", update.changes_file.display())
    })?;

    match outcome {
        RecordOutcome::Recorded { range } => println!(
            "✓ Recorded {} -> {} ({}..{}) in {}",
            update.version_from,
            update.version_to,
            range.from,
            range.to,
            update.changes_file.display()
        ),
        RecordOutcome::Dummy(DummyReason::NoCheckoutDir) => println!(
            "No checkout directory supplied for {}; recorded a plain update entry",
            update.upstream_repo
        ),
        RecordOutcome::Dummy(DummyReason::MissingCheckout(path)) => println!(
            "Missing checkout for {} at {}; recorded a plain update entry",
            update.upstream_repo,
            path.display()
        ),
    }

    Ok(())
}

fn run_batch_command(args: BatchArgs) -> Result<()> {
    let updates = load_manifest(&args.manifest).context("Failed to load manifest")?;
    let settings = settings(args.common)?;

    if !args.json {
        println!("Processing {} packages...", updates.len());
    }

    let counts = run_batch(&updates, &settings, &SystemClock);

    if args.json {
        let json = serde_json::to_string_pretty(&counts).context("Failed to serialize summary")?;
        println!("{}", json);
    } else {
        report_changes(&counts);
    }

    exit_status(&counts);
    Ok(())
}

/// Exit non-zero when any package failed, so scripts notice.
fn exit_status(counts: &OutcomeCounts) {
    if counts.count(Outcome::FailedSkipped) > 0 {
        std::process::exit(1);
    }
}

