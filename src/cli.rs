use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossfader")]
#[command(author, version, about = "Cross-fade transition composition builder")]
pub struct Cli {
    /// Path to project file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the composition of a project and print it
    Build {
        /// Project file (uses --config or the default locations if not specified)
        project: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the track, audio mix and video stage layout of a project
    Debug {
        /// Project file (uses --config or the default locations if not specified)
        project: Option<PathBuf>,
    },

    /// Play a project on a headless player and print the time display
    Simulate {
        /// Project file (uses --config or the default locations if not specified)
        project: Option<PathBuf>,

        /// Seconds of playback between observer ticks
        #[arg(long, default_value = "0.5")]
        step: f64,
    },

    /// Write a sample project file
    Init {
        /// Where to write the project
        #[arg(required = true)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Change the transition settings of a project file in place
    Transition {
        /// Project file to edit
        #[arg(required = true)]
        project: PathBuf,

        /// New transition duration in seconds
        #[arg(long)]
        secs: Option<f64>,

        /// Turn transitions off
        #[arg(long, conflicts_with = "enable")]
        disable: bool,

        /// Turn transitions on
        #[arg(long)]
        enable: bool,
    },

    /// Validate a project file
    Validate {
        /// Project file to validate (uses default if not specified)
        project: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
