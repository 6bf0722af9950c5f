//! Fix command - project a capture to a target fix without querying sources.
//!
//! Runs the optical pipeline only: tap-to-bearing projection, heuristic
//! distance estimation, and the forward-projected fix. Useful for checking
//! what the camera geometry says before any identification.

use std::path::PathBuf;

use skylens::engine::{SightError, TargetingEngine};

use super::common::resolve_tap;
use super::scene::Scene;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the fix command.
pub struct FixArgs {
    pub scene: PathBuf,
    pub config: Option<PathBuf>,
    pub tap_x: Option<f64>,
    pub tap_y: Option<f64>,
    pub coverage: Option<f64>,
}

/// Run the fix command.
pub fn run(args: FixArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("fix");

    let scene = Scene::load(&args.scene)?;
    let metadata = scene.metadata()?;
    let tap = resolve_tap(args.tap_x, args.tap_y)?;

    let engine = TargetingEngine::new(runner.config().clone());

    let bearing_deg = engine
        .target_bearing(tap, &metadata)
        .map_err(SightError::from)?;
    let distance_m = engine
        .estimate_distance(metadata.zoom(), metadata.fov_deg(), args.coverage)
        .map_err(SightError::from)?;
    let fix = engine
        .target_fix(&metadata, bearing_deg, distance_m)
        .map_err(SightError::from)?;

    println!("SkyLens v{}", skylens::VERSION);
    println!("{}", "=".repeat(40));
    println!();
    println!("Scene:    {}", args.scene.display());
    println!(
        "Position: {:.6}, {:.6}",
        metadata.position().latitude(),
        metadata.position().longitude()
    );
    match tap {
        Some(tap) => println!("Tap:      {:.0}, {:.0}", tap.x, tap.y),
        None => println!("Tap:      frame center"),
    }
    println!();
    println!("Bearing:  {:.1}°", bearing_deg);
    println!("Distance: ~{:.0} m (optical estimate)", distance_m);
    println!(
        "Fix:      {:.6}, {:.6} (confidence {:.2})",
        fix.position.latitude(),
        fix.position.longitude(),
        fix.confidence
    );

    Ok(())
}
