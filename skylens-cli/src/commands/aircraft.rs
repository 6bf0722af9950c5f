//! Aircraft command - identify aircraft visible in a skyward capture.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use skylens::candidate::CandidateKind;
use skylens::engine::{SightOptions, Sighting, TargetingEngine};
use skylens::sources::{build_sources, CandidateSourceType};

use super::scene::Scene;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the aircraft command.
pub struct AircraftArgs {
    pub scene: PathBuf,
    pub config: Option<PathBuf>,
    pub radius: Option<f64>,
    pub max: Option<usize>,
    /// Disable first-match auto-detection and rank every feed result.
    pub no_auto: bool,
}

/// Run the aircraft command.
pub fn run(args: AircraftArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("aircraft");

    let scene = Scene::load(&args.scene)?;
    let metadata = scene.metadata()?;

    let config = runner.config().clone();

    // Aerial identification consults live feeds only; landmark sources
    // have nothing to say about the sky.
    let mut sources = build_sources(&config, None)?;
    sources.retain(|s| matches!(s, CandidateSourceType::FlightFeed(_)));
    if sources.is_empty() {
        return Err(CliError::Config(
            "No flight feed configured. Set [flightfeed] url in config.ini.".to_string(),
        ));
    }

    let engine = TargetingEngine::new(config);

    println!("SkyLens v{}", skylens::VERSION);
    println!("{}", "=".repeat(40));
    println!();
    println!("Scene:    {}", args.scene.display());
    println!(
        "Position: {:.6}, {:.6}",
        metadata.position().latitude(),
        metadata.position().longitude()
    );
    println!(
        "Camera:   heading {:.1}°, pitch {:.1}°, fov {:.1}°",
        metadata.heading_deg(),
        metadata.pitch_deg(),
        metadata.fov_deg()
    );
    println!(
        "Mode:     {}",
        if args.no_auto {
            "ranked (all feed results)"
        } else {
            "auto-detect (first live match wins)"
        }
    );
    println!();

    let options = SightOptions {
        radius_m: args.radius,
        max_results: args.max,
        ..SightOptions::default()
    };

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let sighting = runtime.block_on(engine.sight_mobile(
        &metadata,
        &options,
        !args.no_auto,
        &sources,
        &cancel,
    ))?;

    print_aircraft(&sighting);
    Ok(())
}

fn print_aircraft(sighting: &Sighting) {
    if sighting.candidates.is_empty() {
        println!("No aircraft found along the camera bearing.");
        return;
    }

    println!("Aircraft ({}):", sighting.candidates.len());
    for (rank, candidate) in sighting.candidates.iter().enumerate() {
        let distance = candidate
            .distance_m()
            .map(|d| format!("{:.0} m out", d))
            .unwrap_or_else(|| "distance unknown".to_string());

        match candidate.kind() {
            CandidateKind::Mobile {
                altitude_m,
                heading_deg,
                ground_speed_mps,
            } => {
                let track = heading_deg
                    .map(|h| format!(", track {:.0}°", h))
                    .unwrap_or_default();
                let speed = ground_speed_mps
                    .map(|s| format!(", {:.0} m/s", s))
                    .unwrap_or_default();
                println!(
                    "  {}. {} at {:.0} m altitude, {}{}{}",
                    rank + 1,
                    candidate.name(),
                    altitude_m,
                    distance,
                    track,
                    speed
                );
            }
            CandidateKind::Stationary { .. } => {
                println!("  {}. {} ({})", rank + 1, candidate.name(), distance);
            }
        }
    }

    println!();
    println!(
        "Projected fix: {:.6}, {:.6} (bearing {:.1}°, ~{:.0} m)",
        sighting.fix.position.latitude(),
        sighting.fix.position.longitude(),
        sighting.fix.bearing_deg,
        sighting.fix.distance_m
    );
}
