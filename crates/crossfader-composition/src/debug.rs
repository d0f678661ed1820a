//! Inspection data for a built composition.
//!
//! [`CompositionDebugInfo`] flattens a [`TransitionComposition`] into plain
//! numbers and strings: track segments, audio volume polylines and video
//! compositing stages. [`CompositionDebugInfo::render_text`] prints it.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crossfader_common::{MediaKind, MediaTime, TimeRange, TrackSlot};

use crate::audio_mix::AudioMix;
use crate::builder::TransitionComposition;
use crate::composition::{Composition, TrackSegment};
use crate::instruction::VideoComposition;

/// A `(seconds, value)` point of a volume or opacity curve.
pub type CurvePoint = (f64, f64);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentInfo {
    /// Range on the composition timeline.
    pub target: TimeRange,
    /// Range in the clip, absent for gaps.
    pub source: Option<TimeRange>,
    pub empty: bool,
    pub media_kind: MediaKind,
    /// `"<start> - <end>: \"<clip>\" (v|a)"` over the source range.
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackDebugInfo {
    pub slot: TrackSlot,
    pub kind: MediaKind,
    pub segments: Vec<SegmentInfo>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioMixDebugInfo {
    pub slot: TrackSlot,
    pub points: Vec<CurvePoint>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct StageInfo {
    pub time_range: TimeRange,
    /// Slot ids, top layer first.
    pub layer_names: Vec<String>,
    /// Opacity curve per layer name; only set for stages with several layers.
    pub opacity_ramps: Option<BTreeMap<String, Vec<CurvePoint>>>,
}

/// Snapshot of a composition for display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositionDebugInfo {
    /// At least one second.
    pub duration: MediaTime,
    pub tracks: Vec<TrackDebugInfo>,
    pub audio_mix_tracks: Vec<AudioMixDebugInfo>,
    pub stages: Vec<StageInfo>,
}

impl CompositionDebugInfo {
    pub fn from_composition(built: &TransitionComposition) -> Self {
        let duration = MediaTime::from_secs(1).max(built.composition.duration());
        Self {
            duration,
            tracks: harvest_tracks(&built.composition),
            audio_mix_tracks: harvest_audio_mix(&built.audio_mix, duration),
            stages: harvest_stages(&built.video_composition),
        }
    }

    /// Multi-line text rendering.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Duration: {}", self.duration);

        let _ = writeln!(out, "Tracks:");
        for track in &self.tracks {
            let _ = writeln!(out, "  {} track {}", track.kind, track.slot);
            for segment in &track.segments {
                match &segment.description {
                    Some(description) => {
                        let _ = writeln!(out, "    {} {}", segment.target, description);
                    }
                    None => {
                        let _ = writeln!(out, "    {} (empty)", segment.target);
                    }
                }
            }
        }

        let _ = writeln!(out, "Audio mix:");
        for input in &self.audio_mix_tracks {
            let _ = writeln!(out, "  track {}: {}", input.slot, format_curve(&input.points));
        }

        let _ = writeln!(out, "Video stages:");
        for stage in &self.stages {
            let _ = writeln!(
                out,
                "  {} layers [{}]",
                stage.time_range,
                stage.layer_names.join(", ")
            );
            if let Some(ramps) = &stage.opacity_ramps {
                for name in &stage.layer_names {
                    if let Some(points) = ramps.get(name).filter(|points| !points.is_empty()) {
                        let _ = writeln!(out, "    opacity {}: {}", name, format_curve(points));
                    }
                }
            }
        }
        out
    }
}

fn format_curve(points: &[CurvePoint]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("({x:.2}, {y:.2})"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe(segment: &TrackSegment, kind: MediaKind) -> Option<String> {
    let source = segment.source.as_ref()?;
    Some(format!(
        "{:.1} - {:.1}: \"{}\" ({})",
        source.range.start.as_secs_f64(),
        source.range.end().as_secs_f64(),
        source.clip_name,
        kind.tag()
    ))
}

fn harvest_tracks(composition: &Composition) -> Vec<TrackDebugInfo> {
    composition
        .tracks
        .iter()
        .map(|track| TrackDebugInfo {
            slot: track.slot,
            kind: track.kind,
            segments: track
                .segments
                .iter()
                .map(|segment| SegmentInfo {
                    target: segment.target,
                    source: segment.source.as_ref().map(|source| source.range),
                    empty: segment.is_empty(),
                    media_kind: track.kind,
                    description: describe(segment, track.kind),
                })
                .collect(),
        })
        .collect()
}

/// Volume polyline per slot: starts at full volume at zero, follows each
/// ramp, and holds the last level until `duration`.
fn harvest_audio_mix(audio_mix: &AudioMix, duration: MediaTime) -> Vec<AudioMixDebugInfo> {
    audio_mix
        .input_parameters()
        .into_iter()
        .map(|input| {
            let mut points: Vec<CurvePoint> = vec![(0.0, 1.0)];
            let mut level = 1.0;
            for ramp in &input.ramps {
                let start = ramp.time_range.start.as_secs_f64();
                let end = ramp.time_range.end().as_secs_f64();
                if points.last().is_some_and(|(x, _)| start > *x) {
                    points.push((start, level));
                }
                let head = (start, f64::from(ramp.start_volume));
                if points.last() != Some(&head) {
                    points.push(head);
                }
                level = f64::from(ramp.end_volume);
                points.push((end, level));
            }
            let total = duration.as_secs_f64();
            if points.last().is_some_and(|(x, _)| total > *x) {
                points.push((total, level));
            }
            AudioMixDebugInfo {
                slot: input.track,
                points,
            }
        })
        .collect()
}

fn harvest_stages(video_composition: &VideoComposition) -> Vec<StageInfo> {
    video_composition
        .instructions
        .iter()
        .map(|instruction| {
            let layer_names: Vec<String> = instruction
                .layers
                .iter()
                .map(|layer| layer.track.to_string())
                .collect();

            let opacity_ramps = (instruction.layers.len() > 1).then(|| {
                instruction
                    .layers
                    .iter()
                    .map(|layer| {
                        let mut points = Vec::new();
                        if let Some(ramp) = layer.opacity_ramp {
                            let start = ramp.time_range.start;
                            if start.is_positive() {
                                points.push((start.as_secs_f64(), f64::from(ramp.start_opacity)));
                            }
                            points.push((
                                ramp.time_range.end().as_secs_f64(),
                                f64::from(ramp.end_opacity),
                            ));
                        }
                        (layer.track.to_string(), points)
                    })
                    .collect()
            });

            StageInfo {
                time_range: instruction.time_range,
                layer_names,
                opacity_ramps,
            }
        })
        .collect()
}
