//! Asynchronous clip loading.
//!
//! Every clip of a project is loaded on its own task through a [`ClipLoader`].
//! [`load_clips`] waits for all of them before returning, so the builder
//! always sees the complete set. Clips that fail to load are left out of the
//! edit and reported in [`LoadOutcome::failures`].

use std::sync::Arc;

use async_trait::async_trait;
use crossfader_common::{time::DEFAULT_TIMESCALE, MediaTime};
use crossfader_composition::ClipInfo;
use thiserror::Error;

use crate::config::ClipConfig;

/// Why a clip could not be loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("clip '{0}' is not composable")]
    NotComposable(String),

    #[error("clip '{name}' has an invalid duration: {reason}")]
    InvalidDuration { name: String, reason: String },

    #[error("clip '{name}' source file not found: {path}")]
    SourceMissing { name: String, path: String },

    #[error("load task for clip '{name}' failed: {reason}")]
    Task { name: String, reason: String },
}

/// Source of clip metadata.
#[async_trait]
pub trait ClipLoader: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Load the metadata of one clip.
    async fn load(&self, clip: &ClipConfig) -> Result<ClipInfo, LoadError>;
}

/// Builds clips from the metadata written in the project file.
#[derive(Debug, Clone, Default)]
pub struct ManifestLoader {
    require_source: bool,
}

impl ManifestLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail clips whose source file does not exist.
    pub fn require_source(mut self, require: bool) -> Self {
        self.require_source = require;
        self
    }
}

#[async_trait]
impl ClipLoader for ManifestLoader {
    fn name(&self) -> &'static str {
        "manifest"
    }

    async fn load(&self, clip: &ClipConfig) -> Result<ClipInfo, LoadError> {
        let name = clip.display_name();

        if self.require_source && tokio::fs::metadata(&clip.path).await.is_err() {
            return Err(LoadError::SourceMissing {
                name,
                path: clip.path.display().to_string(),
            });
        }

        if !clip.composable {
            return Err(LoadError::NotComposable(name));
        }

        let duration = MediaTime::from_secs_f64(clip.duration_secs, DEFAULT_TIMESCALE).map_err(
            |e| LoadError::InvalidDuration {
                name: name.clone(),
                reason: e.to_string(),
            },
        )?;
        if !duration.is_positive() {
            return Err(LoadError::InvalidDuration {
                name,
                reason: format!("{duration} is not positive"),
            });
        }

        let mut info = ClipInfo::new(name, duration);
        info.has_video = clip.video;
        info.has_audio = clip.audio;
        info.natural_size = clip.natural_size();
        Ok(info)
    }
}

/// A successfully loaded clip and its position in the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedClip {
    pub index: usize,
    pub info: ClipInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub index: usize,
    pub error: LoadError,
}

/// Result of loading a whole manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    /// Loaded clips, in manifest order.
    pub clips: Vec<LoadedClip>,
    pub failures: Vec<LoadFailure>,
}

impl LoadOutcome {
    pub fn infos(&self) -> Vec<ClipInfo> {
        self.clips.iter().map(|clip| clip.info.clone()).collect()
    }
}

/// Load all `clips` concurrently and wait for every task to finish.
pub async fn load_clips(loader: Arc<dyn ClipLoader>, clips: &[ClipConfig]) -> LoadOutcome {
    let handles: Vec<_> = clips
        .iter()
        .cloned()
        .map(|clip| {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load(&clip).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;

    let mut outcome = LoadOutcome::default();
    for (index, (result, config)) in results.into_iter().zip(clips).enumerate() {
        let result = result.unwrap_or_else(|e| {
            Err(LoadError::Task {
                name: config.display_name(),
                reason: e.to_string(),
            })
        });
        match result {
            Ok(info) => outcome.clips.push(LoadedClip { index, info }),
            Err(error) => {
                tracing::warn!("Skipping clip {}: {}", index, error);
                outcome.failures.push(LoadFailure { index, error });
            }
        }
    }

    tracing::debug!(
        loader = loader.name(),
        loaded = outcome.clips.len(),
        failed = outcome.failures.len(),
        "Clip loading finished"
    );

    outcome
}
