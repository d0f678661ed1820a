pub mod persist;
mod types;

pub use persist::{save_config, update_transition};
pub use types::*;

use anyhow::{Context, Result};
use crossfader_common::paths::is_video_file;
use std::path::Path;

/// Load a project from a TOML file
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {:?}", path))?;

    let config: ProjectConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse project file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load a project from the default locations or return an empty project
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<ProjectConfig> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./crossfader.toml", "~/.config/crossfader/project.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(ProjectConfig::default())
}

/// Validate a project
pub fn validate_config(config: &ProjectConfig) -> Result<()> {
    let transition = config.transition.duration_secs;
    if !transition.is_finite() || transition < 0.0 {
        anyhow::bail!("Transition duration must be a non-negative number, got {}", transition);
    }

    if config.render.frame_rate == 0 {
        anyhow::bail!("Frame rate cannot be 0");
    }

    if !(config.render.scrubber_width.is_finite() && config.render.scrubber_width > 0.0) {
        anyhow::bail!(
            "Scrubber width must be positive, got {}",
            config.render.scrubber_width
        );
    }

    let defaults = &config.defaults;
    if !defaults.range_start_secs.is_finite() || defaults.range_start_secs < 0.0 {
        anyhow::bail!("Default range start must be a non-negative number");
    }
    if !defaults.range_duration_secs.is_finite() || defaults.range_duration_secs <= 0.0 {
        anyhow::bail!("Default range duration must be positive");
    }

    for clip in &config.clips {
        let name = clip.display_name();
        if !clip.duration_secs.is_finite() || clip.duration_secs < 0.0 {
            anyhow::bail!("Clip '{}' has an invalid duration: {}", name, clip.duration_secs);
        }
        for value in [clip.range_start_secs, clip.range_duration_secs].into_iter().flatten() {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("Clip '{}' has an invalid selected range", name);
            }
        }
        if !is_video_file(&clip.path) {
            tracing::warn!("Clip path does not look like a video file: {:?}", clip.path);
        }
    }

    Ok(())
}
