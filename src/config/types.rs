use crossfader_common::paths::clip_display_name;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub transition: TransitionConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub clips: Vec<ClipConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransitionConfig {
    /// Cross-fade between adjacent clips
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requested cross-fade length; clamped to half the shortest clip range
    #[serde(default = "default_transition_secs")]
    pub duration_secs: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: default_transition_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_transition_secs() -> f64 {
    2.0
}

/// Selected range used for clips that do not set their own.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub range_start_secs: f64,

    #[serde(default = "default_range_secs")]
    pub range_duration_secs: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            range_start_secs: 0.0,
            range_duration_secs: default_range_secs(),
        }
    }
}

fn default_range_secs() -> f64 {
    5.0
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Scrubber width in points; sets the playback observer interval and seek tolerance
    #[serde(default = "default_scrubber_width")]
    pub scrubber_width: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            scrubber_width: default_scrubber_width(),
        }
    }
}

fn default_frame_rate() -> u32 {
    30
}

fn default_scrubber_width() -> f64 {
    320.0
}

/// One clip of the project manifest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClipConfig {
    /// Display name; derived from the file name when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub path: PathBuf,

    /// Natural duration of the clip
    pub duration_secs: f64,

    #[serde(default = "default_true")]
    pub video: bool,

    #[serde(default = "default_true")]
    pub audio: bool,

    /// Clips that cannot be composed are skipped at load time
    #[serde(default = "default_true")]
    pub composable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_start_secs: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_duration_secs: Option<f64>,
}

impl ClipConfig {
    pub fn new(path: impl Into<PathBuf>, duration_secs: f64) -> Self {
        Self {
            name: None,
            path: path.into(),
            duration_secs,
            video: true,
            audio: true,
            composable: true,
            width: None,
            height: None,
            range_start_secs: None,
            range_duration_secs: None,
        }
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| clip_display_name(&self.path))
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    /// Selected range as `(start, duration)` seconds.
    ///
    /// A defaulted duration is shortened to what the clip has left after the
    /// start; explicit values are used as given.
    pub fn selected_range_secs(&self, defaults: &DefaultsConfig) -> (f64, f64) {
        let start = self.range_start_secs.unwrap_or(defaults.range_start_secs);
        let duration = match self.range_duration_secs {
            Some(duration) => duration,
            None => defaults
                .range_duration_secs
                .min(self.duration_secs - start),
        };
        (start, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_project_defaults() {
        let config: ProjectConfig = toml::from_str(
            r#"
            [[clips]]
            path = "clips/beach.mov"
            duration_secs = 12.0
            "#,
        )
        .unwrap();

        assert!(config.transition.enabled);
        assert_eq!(config.transition.duration_secs, 2.0);
        assert_eq!(config.render.frame_rate, 30);
        let clip = &config.clips[0];
        assert!(clip.video && clip.audio && clip.composable);
        assert_eq!(clip.display_name(), "beach.mov");
        assert_eq!(clip.selected_range_secs(&config.defaults), (0.0, 5.0));
    }

    #[test]
    fn test_default_range_shortened_to_clip() {
        let clip = ClipConfig::new("short.mov", 3.0);
        let defaults = DefaultsConfig {
            range_start_secs: 1.0,
            range_duration_secs: 5.0,
        };
        assert_eq!(clip.selected_range_secs(&defaults), (1.0, 2.0));
    }

    #[test]
    fn test_explicit_range_kept() {
        let mut clip = ClipConfig::new("a.mov", 10.0);
        clip.range_start_secs = Some(2.5);
        clip.range_duration_secs = Some(4.0);
        clip.name = Some("Opening".to_string());
        assert_eq!(clip.selected_range_secs(&DefaultsConfig::default()), (2.5, 4.0));
        assert_eq!(clip.display_name(), "Opening");
    }

    #[test]
    fn test_natural_size_needs_both_dimensions() {
        let mut clip = ClipConfig::new("a.mov", 10.0);
        clip.width = Some(1920);
        assert_eq!(clip.natural_size(), None);
        clip.height = Some(1080);
        assert_eq!(clip.natural_size(), Some((1920, 1080)));
    }
}
