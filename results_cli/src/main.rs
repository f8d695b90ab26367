//! # Results CLI
//!
//! Runs a member results extraction against a JSON model snapshot and prints
//! the report.
//!
//! ```text
//! results_cli run model.json [--settings run.json] [--subdivisions 5] [--reduced]
//! results_cli demo demo.json
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use results_core::channel::Channel;
use results_core::extraction::{run_extraction, AbortFlag, ExtractionReport};
use results_core::logging::TracingLogger;
use results_core::model::{LoadingCase, LoadingKind, Member, MemberConstruction, Span, SpanReleases};
use results_core::settings::ExtractionSettings;
use results_core::snapshot::{ModelSnapshot, ResultPoint, SnapshotLoading};

#[derive(Parser)]
#[command(name = "results_cli", about = "Extract span extrema and lift envelopes from solved member results")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an extraction against a model snapshot
    Run {
        /// Model snapshot (JSON)
        snapshot: PathBuf,

        /// Extraction settings (JSON); flags below override it
        #[arg(long)]
        settings: Option<PathBuf>,

        /// 0 = nothing, 1 = maxima only, 2+ = maxima and stations
        #[arg(long)]
        subdivisions: Option<usize>,

        /// Query live-load-reduced values
        #[arg(long)]
        reduced: bool,

        /// Report lift positions from the lift start
        #[arg(long)]
        offset_lift_positions: bool,

        /// Write the JSON report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a small demo snapshot
    Demo {
        /// Destination file
        path: PathBuf,
    },
}

fn load_settings(
    path: Option<&Path>,
    subdivisions: Option<usize>,
    reduced: bool,
    offset_lift_positions: bool,
) -> Result<ExtractionSettings> {
    let mut settings = match path {
        Some(path) => ExtractionSettings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => ExtractionSettings::default(),
    };
    if let Some(subdivisions) = subdivisions {
        settings.subdivisions = subdivisions;
    }
    settings.reduced |= reduced;
    settings.offset_lift_positions |= offset_lift_positions;
    settings.validate()?;
    Ok(settings)
}

/// Two-storey timber column, moment-continuous at level 2, under D+L.
fn demo_snapshot() -> ModelSnapshot {
    let member = Member::new("C1", MemberConstruction::TimberColumn)
        .with_span(
            Span::new(0, "C1-1", 3048.0)
                .with_section("6x6 DF-L No.1")
                .with_rotation(90.0)
                .with_start_releases(SpanReleases::pinned())
                .with_end_releases(SpanReleases::fixed()),
        )
        .with_span(
            Span::new(1, "C1-2", 2438.4)
                .with_section("6x6 DF-L No.1")
                .with_rotation(90.0)
                .with_start_releases(SpanReleases::fixed())
                .with_end_releases(SpanReleases::pinned()),
        );
    let loading = LoadingCase::new("D+L", LoadingKind::Combination);

    let results = SnapshotLoading::default()
        .with_series(
            Channel::MomentMajor.query(false),
            vec![
                ResultPoint::new(0, 1524.0, 6.8e6).maximum(),
                ResultPoint::new(1, 1219.2, -4.1e6).minimum(),
            ],
        )
        .with_series(
            Channel::Axial.query(false),
            vec![
                ResultPoint::new(0, 0.0, -92_000.0).minimum(),
                ResultPoint::new(1, 2438.4, -41_000.0).maximum(),
            ],
        );

    let (member_id, loading_id) = (member.id, loading.id);
    ModelSnapshot::new()
        .with_member(member)
        .with_loading(loading)
        .with_results(member_id, loading_id, results)
}

fn print_summary(report: &ExtractionReport) {
    eprintln!("═══════════════════════════════════════");
    eprintln!("  EXTRACTION SUMMARY");
    eprintln!("═══════════════════════════════════════");
    eprintln!(
        "  Loadings solved: {} cases, {} combinations, {} envelopes",
        report.loading_summary.solved_cases,
        report.loading_summary.solved_combinations,
        report.loading_summary.solved_envelopes
    );
    eprintln!("  Span rows:    {}", report.span_rows.len());
    eprintln!("  Station rows: {}", report.station_rows.len());
    eprintln!("  Lift rows:    {}", report.lift_rows.len());
    eprintln!();
    for lift in &report.lift_rows {
        let moment = &lift.extrema[&Channel::MomentMajor];
        let axial = &lift.extrema[&Channel::Axial];
        eprintln!(
            "  {} {} {} [{}]: M = {:.2} k-ft @ {:.2} ft, P = {:.2} k @ {:.2} ft",
            lift.lift_name,
            lift.included_spans,
            lift.section.as_deref().unwrap_or("-"),
            lift.loading_name,
            moment.governing_value,
            moment.governing_position,
            axial.governing_value,
            axial.governing_position,
        );
    }
    eprintln!("═══════════════════════════════════════");
    eprintln!("  Completed in {:.3} seconds", report.elapsed_seconds);
    eprintln!("═══════════════════════════════════════");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Demo { path } => {
            demo_snapshot()
                .save_json_file(&path)
                .with_context(|| format!("writing demo snapshot to {}", path.display()))?;
            tracing::info!("Demo snapshot written to {}", path.display());
        }
        Command::Run {
            snapshot,
            settings,
            subdivisions,
            reduced,
            offset_lift_positions,
            output,
        } => {
            let settings = load_settings(settings.as_deref(), subdivisions, reduced, offset_lift_positions)?;
            let model = ModelSnapshot::from_json_file(&snapshot)
                .with_context(|| format!("loading snapshot {}", snapshot.display()))?;

            let report = run_extraction(&model, &settings, &AbortFlag::new(), &TracingLogger).await?;
            print_summary(&report);

            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json).with_context(|| format!("writing report to {}", path.display()))?;
                    tracing::info!("Saved to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
