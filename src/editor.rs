//! The editor session.
//!
//! [`Editor`] owns the current clips, their selected ranges and the
//! transition settings. Every call to [`Editor::build_for_playback`] runs the
//! composition builder from scratch on the current inputs.

use anyhow::{Context, Result};
use crossfader_common::{time::DEFAULT_TIMESCALE, MediaTime, TimeRange};
use crossfader_composition::{
    ClipInfo, CompositionDebugInfo, TransitionComposition, TransitionCompositionBuilder,
};
use uuid::Uuid;

use crate::config::ProjectConfig;
use crate::loader::LoadOutcome;

/// Transition settings as the user sets them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSettings {
    pub enabled: bool,
    pub duration_secs: f64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: 2.0,
        }
    }
}

impl TransitionSettings {
    /// Requested duration at the editor timescale, `None` when disabled.
    pub fn requested(&self) -> Result<Option<MediaTime>> {
        if !self.enabled {
            return Ok(None);
        }
        let duration = MediaTime::from_secs_f64(self.duration_secs, DEFAULT_TIMESCALE)
            .with_context(|| format!("Invalid transition duration: {}", self.duration_secs))?;
        Ok(Some(duration))
    }
}

/// A built composition ready to hand to a player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerItem {
    pub id: Uuid,
    pub composition: TransitionComposition,
}

impl PlayerItem {
    pub fn new(composition: TransitionComposition) -> Self {
        Self {
            id: Uuid::new_v4(),
            composition,
        }
    }

    pub fn duration(&self) -> MediaTime {
        self.composition.duration()
    }

    pub fn debug_info(&self) -> CompositionDebugInfo {
        CompositionDebugInfo::from_composition(&self.composition)
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    clips: Vec<ClipInfo>,
    ranges: Vec<TimeRange>,
    transition: TransitionSettings,
    frame_rate: u32,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            clips: Vec::new(),
            ranges: Vec::new(),
            transition: TransitionSettings::default(),
            frame_rate: 30,
        }
    }

    /// Editor for the loaded clips of a project.
    ///
    /// Ranges are resolved against the manifest entry each clip came from.
    pub fn from_project(config: &ProjectConfig, loaded: &LoadOutcome) -> Result<Self> {
        let mut editor = Self::new();
        editor.set_transition(TransitionSettings {
            enabled: config.transition.enabled,
            duration_secs: config.transition.duration_secs,
        });
        editor.set_frame_rate(config.render.frame_rate);

        for clip in &loaded.clips {
            let manifest = config
                .clips
                .get(clip.index)
                .with_context(|| format!("Loaded clip {} is not in the project", clip.index))?;
            let (start, duration) = manifest.selected_range_secs(&config.defaults);
            let range = TimeRange::new(
                MediaTime::from_secs_f64(start, DEFAULT_TIMESCALE)?,
                MediaTime::from_secs_f64(duration, DEFAULT_TIMESCALE)?,
            );
            editor.clips.push(clip.info.clone());
            editor.ranges.push(range);
        }

        Ok(editor)
    }

    pub fn clips(&self) -> &[ClipInfo] {
        &self.clips
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn transition(&self) -> TransitionSettings {
        self.transition
    }

    pub fn set_clips(&mut self, clips: Vec<ClipInfo>) {
        self.clips = clips;
    }

    pub fn set_ranges(&mut self, ranges: Vec<TimeRange>) {
        self.ranges = ranges;
    }

    pub fn set_transition(&mut self, transition: TransitionSettings) {
        self.transition = transition;
    }

    pub fn set_frame_rate(&mut self, frame_rate: u32) {
        self.frame_rate = frame_rate;
    }

    /// Run the builder on the current inputs.
    pub fn build_composition(&self) -> Result<TransitionComposition> {
        let frame_duration = MediaTime::from_frame_rate(self.frame_rate)
            .context("Frame rate cannot be 0")?;
        let builder = TransitionCompositionBuilder::new()
            .requested_transition(self.transition.requested()?)
            .frame_duration(frame_duration);

        let composition = builder
            .build(&self.clips, &self.ranges)
            .context("Failed to build composition")?;
        Ok(composition)
    }

    /// Build a fresh player item, or `None` when there is nothing to play.
    pub fn build_for_playback(&self) -> Result<Option<PlayerItem>> {
        if self.clips.is_empty() {
            return Ok(None);
        }
        let composition = self.build_composition()?;
        tracing::info!(
            "Built player item: {} clips, {} long",
            self.clips.len(),
            composition.duration()
        );
        Ok(Some(PlayerItem::new(composition)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClipConfig;
    use crate::loader::LoadedClip;

    fn secs(s: i64) -> MediaTime {
        MediaTime::from_secs(s)
    }

    #[test]
    fn test_empty_editor_has_nothing_to_play() {
        assert!(Editor::new().build_for_playback().unwrap().is_none());
    }

    #[test]
    fn test_transition_settings() {
        let settings = TransitionSettings {
            enabled: true,
            duration_secs: 1.5,
        };
        assert_eq!(settings.requested().unwrap(), Some(MediaTime::new(3, 2).unwrap()));

        let disabled = TransitionSettings {
            enabled: false,
            duration_secs: 1.5,
        };
        assert_eq!(disabled.requested().unwrap(), None);
    }

    #[test]
    fn test_rebuild_reflects_new_settings() {
        let mut editor = Editor::new();
        editor.set_clips(vec![ClipInfo::new("a", secs(5)), ClipInfo::new("b", secs(5))]);
        editor.set_ranges(vec![TimeRange::new(secs(0), secs(5)); 2]);

        let item = editor.build_for_playback().unwrap().unwrap();
        assert_eq!(item.duration(), secs(8));

        editor.set_transition(TransitionSettings {
            enabled: false,
            duration_secs: 2.0,
        });
        let item = editor.build_for_playback().unwrap().unwrap();
        assert_eq!(item.duration(), secs(10));
    }

    #[test]
    fn test_from_project_uses_manifest_ranges() {
        let mut config = ProjectConfig::default();
        config.clips.push(ClipConfig::new("a.mov", 10.0));
        let mut second = ClipConfig::new("b.mov", 10.0);
        second.range_start_secs = Some(4.0);
        second.range_duration_secs = Some(6.0);
        config.clips.push(second);

        let loaded = LoadOutcome {
            clips: vec![LoadedClip {
                index: 1,
                info: ClipInfo::new("b.mov", secs(10)),
            }],
            failures: Vec::new(),
        };

        let editor = Editor::from_project(&config, &loaded).unwrap();
        assert_eq!(editor.ranges(), &[TimeRange::new(secs(4), secs(6))]);
    }

    #[test]
    fn test_zero_frame_rate_is_an_error() {
        let mut editor = Editor::new();
        editor.set_clips(vec![ClipInfo::new("a", secs(5))]);
        editor.set_frame_rate(0);
        assert!(editor.build_for_playback().is_err());
    }
}
