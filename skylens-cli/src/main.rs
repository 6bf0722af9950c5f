//! SkyLens CLI - Command-line interface
//!
//! This binary provides a command-line interface to the SkyLens library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod runner;

use commands::aircraft::AircraftArgs;
use commands::config::ConfigCommands;
use commands::fix::FixArgs;
use commands::identify::IdentifyArgs;

#[derive(Parser)]
#[command(name = "skylens")]
#[command(version)]
#[command(about = "Point a camera at the world and find out what it sees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the landmark a captured scene is aimed at
    Identify {
        /// Scene file (JSON capture with camera state and recognizer output)
        scene: PathBuf,

        /// Config file to use instead of ~/.skylens/config.ini
        #[arg(long)]
        config: Option<PathBuf>,

        /// Horizontal tap coordinate in frame pixels
        #[arg(long)]
        tap_x: Option<f64>,

        /// Vertical tap coordinate in frame pixels
        #[arg(long)]
        tap_y: Option<f64>,

        /// Fraction of frame height the subject fills, in percent
        #[arg(long)]
        coverage: Option<f64>,

        /// Search radius in meters
        #[arg(long)]
        radius: Option<f64>,

        /// Maximum candidates to return
        #[arg(long)]
        max: Option<usize>,

        /// Skip network sources and use only local ones
        #[arg(long)]
        offline: bool,
    },

    /// Identify aircraft visible in a skyward capture
    Aircraft {
        /// Scene file (JSON capture with camera state)
        scene: PathBuf,

        /// Config file to use instead of ~/.skylens/config.ini
        #[arg(long)]
        config: Option<PathBuf>,

        /// Search radius in meters
        #[arg(long)]
        radius: Option<f64>,

        /// Maximum aircraft to return
        #[arg(long)]
        max: Option<usize>,

        /// Rank every feed result instead of stopping at the first live match
        #[arg(long)]
        no_auto: bool,
    },

    /// Project a capture to a target fix without querying sources
    Fix {
        /// Scene file (JSON capture with camera state)
        scene: PathBuf,

        /// Config file to use instead of ~/.skylens/config.ini
        #[arg(long)]
        config: Option<PathBuf>,

        /// Horizontal tap coordinate in frame pixels
        #[arg(long)]
        tap_x: Option<f64>,

        /// Vertical tap coordinate in frame pixels
        #[arg(long)]
        tap_y: Option<f64>,

        /// Fraction of frame height the subject fills, in percent
        #[arg(long)]
        coverage: Option<f64>,
    },

    /// Initialize the configuration file
    Init,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Identify {
            scene,
            config,
            tap_x,
            tap_y,
            coverage,
            radius,
            max,
            offline,
        } => commands::identify::run(IdentifyArgs {
            scene,
            config,
            tap_x,
            tap_y,
            coverage,
            radius,
            max,
            offline,
        }),
        Commands::Aircraft {
            scene,
            config,
            radius,
            max,
            no_auto,
        } => commands::aircraft::run(AircraftArgs {
            scene,
            config,
            radius,
            max,
            no_auto,
        }),
        Commands::Fix {
            scene,
            config,
            tap_x,
            tap_y,
            coverage,
        } => commands::fix::run(FixArgs {
            scene,
            config,
            tap_x,
            tap_y,
            coverage,
        }),
        Commands::Init => commands::init::run(),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
