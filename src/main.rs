mod cli;

use crossfader::{
    config::{self, ClipConfig, ProjectConfig},
    editor::{Editor, PlayerItem},
    loader::{self, ManifestLoader},
    playback::{HeadlessPlayer, PlaybackController},
};
use crossfader_common::{time::DEFAULT_TIMESCALE, MediaTime};
use crossfader_composition::InstructionKind;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

/// Upper bound on simulation ticks so a tiny step cannot spin forever.
const MAX_SIMULATION_TICKS: usize = 100_000;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "crossfader=trace,crossfader_composition=trace,crossfader_common=debug".to_string()
        } else {
            "crossfader=info,crossfader_composition=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build { project, json } => {
            let path = project.or(cli.config);
            build_project(path.as_deref(), json)
        }
        Commands::Debug { project } => {
            let path = project.or(cli.config);
            debug_project(path.as_deref())
        }
        Commands::Simulate { project, step } => {
            let path = project.or(cli.config);
            simulate_project(path.as_deref(), step)
        }
        Commands::Init { path, force } => init_project(&path, force),
        Commands::Transition {
            project,
            secs,
            disable,
            enable,
        } => set_transition(&project, secs, disable, enable),
        Commands::Validate { project } => {
            let path = project.or(cli.config);
            validate_project(path.as_deref())
        }
        Commands::Version => {
            println!("crossfader {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Load the project and its clips, then build a player item.
fn prepare(path: Option<&Path>) -> Result<(ProjectConfig, Option<PlayerItem>)> {
    let config = config::load_config_or_default(path)?;

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(loader::load_clips(
        Arc::new(ManifestLoader::new()),
        &config.clips,
    ));
    for failure in &outcome.failures {
        eprintln!("Skipped clip {}: {}", failure.index + 1, failure.error);
    }

    let editor = Editor::from_project(&config, &outcome)?;
    let item = editor.build_for_playback()?;
    Ok((config, item))
}

fn build_project(path: Option<&Path>, json: bool) -> Result<()> {
    let (_, item) = prepare(path)?;
    let Some(item) = item else {
        println!("No clips to compose.");
        return Ok(());
    };
    let built = &item.composition;

    if json {
        let json_str = serde_json::to_string_pretty(built)?;
        println!("{}", json_str);
        return Ok(());
    }

    println!("Duration: {}", built.duration());
    println!("Transition: {}", built.plan.transition_duration);

    println!("\nPlacements: {}", built.plan.len());
    for entry in &built.plan.entries {
        println!(
            "  [{}] slot {} source {} -> {}",
            entry.clip_index, entry.slot, entry.source_range, entry.placement
        );
    }

    println!(
        "\nVideo instructions: {}",
        built.video_composition.instructions.len()
    );
    for instruction in &built.video_composition.instructions {
        let kind = match instruction.kind() {
            InstructionKind::PassThrough => "pass-through",
            InstructionKind::Transition => "transition",
        };
        let layers: Vec<String> = instruction
            .layers
            .iter()
            .map(|layer| match layer.opacity_ramp {
                Some(ramp) => format!(
                    "{} ({:.1} -> {:.1})",
                    layer.track, ramp.start_opacity, ramp.end_opacity
                ),
                None => layer.track.to_string(),
            })
            .collect();
        println!(
            "  {} {} layers [{}]",
            instruction.time_range,
            kind,
            layers.join(", ")
        );
    }

    println!("\nAudio ramps: {}", built.audio_mix.ramps.len());
    for ramp in &built.audio_mix.ramps {
        println!(
            "  slot {} {} {:.1} -> {:.1}",
            ramp.track, ramp.time_range, ramp.start_volume, ramp.end_volume
        );
    }

    Ok(())
}

fn debug_project(path: Option<&Path>) -> Result<()> {
    let (_, item) = prepare(path)?;
    match item {
        Some(item) => print!("{}", item.debug_info().render_text()),
        None => println!("No clips to compose."),
    }
    Ok(())
}

fn simulate_project(path: Option<&Path>, step: f64) -> Result<()> {
    if !(step.is_finite() && step > 0.0) {
        anyhow::bail!("Step must be a positive number of seconds, got {}", step);
    }
    let step = MediaTime::from_secs_f64(step, DEFAULT_TIMESCALE)?;
    if !step.is_positive() {
        anyhow::bail!("Step is shorter than the editor timescale");
    }

    let (config, item) = prepare(path)?;
    let Some(item) = item else {
        println!("No clips to compose.");
        return Ok(());
    };

    let mut controller = PlaybackController::new(HeadlessPlayer::new(), config.render.scrubber_width);
    controller.set_item(Some(item));
    if let Some(interval) = controller.observer_interval() {
        tracing::info!("Time observer interval: {:.4}s", interval);
    }

    controller.toggle_play_pause();
    for _ in 0..MAX_SIMULATION_TICKS {
        controller.player_mut().advance(step);
        if let Some(snapshot) = controller.tick() {
            println!("{} {:.3}", snapshot.time_label, snapshot.scrubber_value);
        }
        if !controller.is_playing() {
            break;
        }
    }

    println!("Reached end at {}", controller.time_label());
    Ok(())
}

fn init_project(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("Project file already exists: {:?} (use --force to overwrite)", path);
    }

    let mut project = ProjectConfig::default();
    for (file, secs) in [("sample_clip1.m4v", 10.0), ("sample_clip2.mov", 10.0)] {
        let mut clip = ClipConfig::new(file, secs);
        clip.width = Some(1280);
        clip.height = Some(720);
        project.clips.push(clip);
    }

    config::save_config(path, &project)?;
    println!("Wrote sample project to {}", path.display());
    Ok(())
}

fn set_transition(path: &Path, secs: Option<f64>, disable: bool, enable: bool) -> Result<()> {
    let mut project = config::load_config(path)?;
    if let Some(secs) = secs {
        project.transition.duration_secs = secs;
    }
    if disable {
        project.transition.enabled = false;
    } else if enable {
        project.transition.enabled = true;
    }
    config::validate_config(&project)?;

    config::update_transition(path, &project.transition)
        .with_context(|| format!("Failed to update {:?}", path))?;
    println!(
        "Transition {} ({}s)",
        if project.transition.enabled { "enabled" } else { "disabled" },
        project.transition.duration_secs
    );
    Ok(())
}

fn validate_project(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating project: {:?}", p);
            let project = config::load_config(p)?;
            println!("✓ Project is valid");
            println!(
                "  Transition: {} ({}s)",
                if project.transition.enabled { "enabled" } else { "disabled" },
                project.transition.duration_secs
            );
            println!("  Frame rate: {}", project.render.frame_rate);
            println!("  Clips: {}", project.clips.len());
            println!(
                "    Composable: {}",
                project.clips.iter().filter(|c| c.composable).count()
            );
        }
        None => {
            println!("No project file specified, using defaults");
            let project = ProjectConfig::default();
            println!("Default project:");
            println!(
                "  Transition: {}s, frame rate {}",
                project.transition.duration_secs, project.render.frame_rate
            );
        }
    }

    Ok(())
}
