//! Project persistence using toml_edit to preserve formatting and comments.

use super::{ProjectConfig, TransitionConfig};
use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::{value, DocumentMut};

/// Write the whole project to a TOML file
pub fn save_config(path: &Path, config: &ProjectConfig) -> Result<()> {
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize project")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write project file: {:?}", path))?;

    Ok(())
}

/// Rewrite just the transition settings of a project file
pub fn update_transition(path: &Path, transition: &TransitionConfig) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {:?}", path))?;

    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("Failed to parse project file: {:?}", path))?;

    doc["transition"]["enabled"] = value(transition.enabled);
    doc["transition"]["duration_secs"] = value(transition.duration_secs);

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write project file: {:?}", path))?;

    Ok(())
}
