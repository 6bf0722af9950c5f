//! Identify command - resolve the landmark a capture is aimed at.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use skylens::engine::{SightOptions, Sighting, TargetingEngine};
use skylens::sources::{build_sources, CandidateSource, CandidateSourceType};

use super::common::resolve_tap;
use super::scene::Scene;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the identify command.
pub struct IdentifyArgs {
    pub scene: PathBuf,
    pub config: Option<PathBuf>,
    pub tap_x: Option<f64>,
    pub tap_y: Option<f64>,
    pub coverage: Option<f64>,
    pub radius: Option<f64>,
    pub max: Option<usize>,
    pub offline: bool,
}

/// Run the identify command.
pub fn run(args: IdentifyArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("identify");

    let scene = Scene::load(&args.scene)?;
    let metadata = scene.metadata()?;
    let tap = resolve_tap(args.tap_x, args.tap_y)?;

    let config = runner.config().clone();
    let mut sources = build_sources(&config, scene.vision_source())?;
    if args.offline {
        sources.retain(|s| {
            !matches!(
                s,
                CandidateSourceType::Registry(_) | CandidateSourceType::FlightFeed(_)
            )
        });
    }
    let engine = TargetingEngine::new(config);

    println!("SkyLens v{}", skylens::VERSION);
    println!("{}", "=".repeat(40));
    println!();
    println!("Scene:    {}", args.scene.display());
    println!(
        "Position: {:.6}, {:.6} (±{:.0} m)",
        metadata.position().latitude(),
        metadata.position().longitude(),
        metadata.accuracy_m()
    );
    println!(
        "Camera:   heading {:.1}°, fov {:.1}°, zoom {:.1}x",
        metadata.heading_deg(),
        metadata.fov_deg(),
        metadata.zoom()
    );
    if let Some(tap) = tap {
        println!("Tap:      {:.0}, {:.0}", tap.x, tap.y);
    }
    if args.offline {
        println!("Mode:     offline (network sources skipped)");
    }
    print_source_list(&sources);
    println!();

    let options = SightOptions {
        tap,
        coverage_pct: args.coverage,
        radius_m: args.radius,
        max_results: args.max,
    };

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let sighting =
        runtime.block_on(engine.sight_stationary(&metadata, &options, &sources, &cancel))?;

    print_sighting(&sighting);
    Ok(())
}

fn print_source_list(sources: &[CandidateSourceType]) {
    if sources.is_empty() {
        println!("Sources:  none (fix only; configure a registry or catalog)");
    } else {
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        println!("Sources:  {}", names.join(", "));
    }
}

fn print_sighting(sighting: &Sighting) {
    println!(
        "Target fix: {:.6}, {:.6}",
        sighting.fix.position.latitude(),
        sighting.fix.position.longitude()
    );
    println!("  Bearing:    {:.1}°", sighting.fix.bearing_deg);
    println!("  Distance:   ~{:.0} m", sighting.fix.distance_m);
    println!("  Confidence: {:.2}", sighting.fix.confidence);
    println!();

    if sighting.candidates.is_empty() {
        println!("No candidates found.");
        return;
    }

    println!("Candidates ({}):", sighting.candidates.len());
    for (rank, candidate) in sighting.candidates.iter().enumerate() {
        let distance = candidate
            .distance_m()
            .map(|d| format!("{:.0} m", d))
            .unwrap_or_else(|| "distance unknown".to_string());
        println!(
            "  {}. {} [{}] {}",
            rank + 1,
            candidate.name(),
            candidate.provenance(),
            distance
        );
    }
}
