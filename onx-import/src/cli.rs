//! Définition et implémentation des commandes CLI
//!
//! - `import`: fichiers KML/GPX vers les couches d'un projet
//! - `selftest`: cas fixes du classifieur

use std::path::PathBuf;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use clap::{Args, Subcommand};
use tracing::info;

use crate::import::import_onx;
use crate::options::{ImportOptions, TracksTarget};
use crate::report::write_report;
use crate::selftest;
use crate::store::ProjectStore;

#[derive(Subcommand)]
pub enum Commands {
    /// Import onX export files into a project's layers
    Import(ImportArgs),

    /// Run the fixed classifier self-test cases (no file I/O)
    Selftest,
}

/// Arguments de la commande import
#[derive(Args)]
pub struct ImportArgs {
    /// Project directory (layer documents live under data/)
    #[arg(short, long)]
    pub project: PathBuf,

    /// Input files (.kml / .gpx)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Active user recorded as imported_by/created_by
    #[arg(short, long)]
    pub user: String,

    /// Target layer for GPS tracks without a recognized name
    #[arg(long, value_enum, default_value_t = TracksTarget::Trails)]
    pub tracks_target: TracksTarget,

    /// IANA time zone applied to GPX hunt timestamps
    #[arg(long, default_value = "America/New_York")]
    pub time_zone: String,

    /// Disable folder/keyword/geometry heuristics (exact prefixes only)
    #[arg(long)]
    pub no_heuristics: bool,

    /// Import Point features only
    #[arg(long)]
    pub only_points: bool,
}

/// Exécute la commande import
pub fn cmd_import(args: &ImportArgs) -> Result<()> {
    let store = ProjectStore::new(&args.project);
    let opts = ImportOptions {
        input_files: args.files.clone(),
        tracks_target: args.tracks_target,
        time_zone: args.time_zone.clone(),
        use_heuristics: !args.no_heuristics,
        only_points: args.only_points,
        active_user: args.user.clone(),
        import_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    info!(
        project = %args.project.display(),
        files = args.files.len(),
        user = args.user.as_str(),
        "Starting onX import"
    );

    let report = import_onx(&opts, &store);
    let relative = write_report(&store, &report, &opts.import_timestamp)?;

    report.display();
    println!("Report: {}", relative);

    Ok(())
}

/// Exécute la commande selftest
pub fn cmd_selftest() -> Result<()> {
    let outcome = selftest::run();
    println!("{} passed, {} failed", outcome.passed, outcome.failures.len());
    for failure in &outcome.failures {
        println!("  FAIL {}", failure);
    }
    if !outcome.failures.is_empty() {
        anyhow::bail!("{} self-test case(s) failed", outcome.failures.len());
    }
    Ok(())
}
