//! Transition timeline builder.
//!
//! The builder is split into independent steps so callers can stop at any
//! stage: [`build_plan`] places the clips, [`video_instructions`] and
//! [`audio_ramps`] derive the mixing instructions from a plan, and
//! [`apply_to_sink`] writes the clip ranges into any [`CompositionSink`].
//! [`TransitionCompositionBuilder::build`] runs all of them.

use crossfader_common::{MediaKind, MediaTime, TimeRange, TrackSlot};

use crate::audio_mix::{AudioMix, VolumeRamp};
use crate::clip::MediaClip;
use crate::composition::{Composition, CompositionSink, SegmentSource};
use crate::error::{Error, Result};
use crate::instruction::{VideoComposition, VideoInstruction};
use crate::plan::{PlacementEntry, PlacementPlan};

/// Default frame duration (30 fps).
pub const DEFAULT_FRAME_DURATION: MediaTime = match MediaTime::from_frame_rate(30) {
    Some(t) => t,
    None => MediaTime::ZERO,
};

/// Everything produced for one build.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionComposition {
    pub plan: PlacementPlan,
    pub composition: Composition,
    pub video_composition: VideoComposition,
    pub audio_mix: AudioMix,
}

impl TransitionComposition {
    /// Length of the output timeline.
    pub fn duration(&self) -> MediaTime {
        self.plan.duration
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }
}

/// Builder for cross-fade compositions.
#[derive(Debug, Clone)]
pub struct TransitionCompositionBuilder {
    transition: Option<MediaTime>,
    frame_duration: MediaTime,
    render_size: Option<(u32, u32)>,
}

impl Default for TransitionCompositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionCompositionBuilder {
    /// Create a builder with transitions disabled.
    pub fn new() -> Self {
        Self {
            transition: None,
            frame_duration: DEFAULT_FRAME_DURATION,
            render_size: None,
        }
    }

    /// Request a transition duration.
    pub fn transition_duration(mut self, duration: MediaTime) -> Self {
        self.transition = Some(duration);
        self
    }

    /// Request a transition duration, `None` disabling transitions.
    pub fn requested_transition(mut self, duration: Option<MediaTime>) -> Self {
        self.transition = duration;
        self
    }

    pub fn frame_duration(mut self, frame_duration: MediaTime) -> Self {
        self.frame_duration = frame_duration;
        self
    }

    /// Override the render size; otherwise the first clip's natural size is used.
    pub fn render_size(mut self, width: u32, height: u32) -> Self {
        self.render_size = Some((width, height));
        self
    }

    /// Compute only the placement plan.
    pub fn plan<C: MediaClip>(&self, clips: &[C], ranges: &[TimeRange]) -> Result<PlacementPlan> {
        build_plan(clips, ranges, self.transition)
    }

    /// Build the composition, video composition and audio mix.
    pub fn build<C: MediaClip>(
        &self,
        clips: &[C],
        ranges: &[TimeRange],
    ) -> Result<TransitionComposition> {
        let plan = build_plan(clips, ranges, self.transition)?;
        let render_size = self
            .render_size
            .or_else(|| clips.first().and_then(|clip| clip.natural_size()));

        let mut composition = Composition::new();
        composition.natural_size = render_size;
        apply_to_sink(&plan, clips, &mut composition)?;

        let video_composition = VideoComposition {
            instructions: video_instructions(&plan),
            frame_duration: self.frame_duration,
            render_size,
        };
        if !plan.is_empty() {
            video_composition.check_coverage(plan.duration)?;
        }

        let audio_mix = AudioMix {
            ramps: audio_ramps(&plan),
        };

        tracing::debug!(
            clips = plan.len(),
            instructions = video_composition.instructions.len(),
            ramps = audio_mix.ramps.len(),
            duration = %plan.duration,
            "Built transition composition"
        );

        Ok(TransitionComposition {
            plan,
            composition,
            video_composition,
            audio_mix,
        })
    }
}

/// Place `clips` on alternating slots, overlapping neighbours by the
/// effective transition.
///
/// `ranges[i]` selects the part of clip `i` to use. Missing ranges default to
/// the whole clip; extra ranges are ignored.
pub fn build_plan<C: MediaClip>(
    clips: &[C],
    ranges: &[TimeRange],
    requested: Option<MediaTime>,
) -> Result<PlacementPlan> {
    if clips.is_empty() {
        return Ok(PlacementPlan::empty());
    }
    if let Some(requested) = requested {
        if requested.is_negative() {
            return Err(Error::InvalidTransition(format!(
                "requested duration {requested} is negative"
            )));
        }
    }

    let ranges = resolve_ranges(clips, ranges);
    for (index, (clip, range)) in clips.iter().zip(&ranges).enumerate() {
        validate_clip(index, clip, range)?;
    }

    let count = clips.len();
    let transition = effective_transition(&ranges, requested);
    tracing::debug!(
        clips = count,
        requested = ?requested,
        effective = %transition,
        "Clamped transition duration"
    );

    let mut entries: Vec<PlacementEntry> = Vec::with_capacity(count);
    let mut start = MediaTime::ZERO;
    let mut end = MediaTime::ZERO;
    for (index, range) in ranges.iter().enumerate() {
        if !entries.is_empty() {
            start = end.checked_sub(transition)?;
        }
        end = start.checked_add(range.duration)?;
        let placement = TimeRange::new(start, range.duration);

        let has_previous = index > 0;
        let has_next = index + 1 < count;
        let head = if has_previous { transition } else { MediaTime::ZERO };
        let tail = if has_next { transition } else { MediaTime::ZERO };
        let pass_through =
            TimeRange::try_from_start_end(start.checked_add(head)?, end.checked_sub(tail)?)?;

        let overlap = !transition.is_zero();
        let incoming_transition = entries
            .last()
            .and_then(|previous| previous.outgoing_transition);
        let outgoing_transition = if has_next && overlap {
            Some(TimeRange::new(end.checked_sub(transition)?, transition))
        } else {
            None
        };

        entries.push(PlacementEntry {
            clip_index: index,
            slot: TrackSlot::for_clip(index),
            source_range: *range,
            placement,
            pass_through,
            incoming_transition,
            outgoing_transition,
        });
    }

    let duration = end;

    Ok(PlacementPlan {
        entries,
        transition_duration: transition,
        duration,
    })
}

/// Pass-through and transition instructions in timeline order.
///
/// Zero-length windows produce no instruction.
pub fn video_instructions(plan: &PlacementPlan) -> Vec<VideoInstruction> {
    let mut instructions = Vec::with_capacity(plan.len() * 2);
    for (index, entry) in plan.entries.iter().enumerate() {
        if !entry.pass_through.is_empty() {
            instructions.push(VideoInstruction::pass_through(entry.slot, entry.pass_through));
        }
        if let (Some(window), Some(next)) = (entry.outgoing_transition, plan.entries.get(index + 1)) {
            instructions.push(VideoInstruction::transition(entry.slot, next.slot, window));
        }
    }
    instructions
}

/// Volume ramps for every transition window.
pub fn audio_ramps(plan: &PlacementPlan) -> Vec<VolumeRamp> {
    let mut ramps = Vec::new();
    for (index, entry) in plan.entries.iter().enumerate() {
        let (Some(window), Some(next)) = (entry.outgoing_transition, plan.entries.get(index + 1)) else {
            continue;
        };
        ramps.push(VolumeRamp {
            track: entry.slot,
            time_range: window,
            start_volume: 1.0,
            end_volume: 0.0,
        });
        ramps.push(VolumeRamp {
            track: next.slot,
            time_range: window,
            start_volume: 0.0,
            end_volume: 1.0,
        });
        if !next.pass_through.is_empty() {
            ramps.push(VolumeRamp {
                track: next.slot,
                time_range: next.pass_through,
                start_volume: 1.0,
                end_volume: 1.0,
            });
        }
    }
    ramps
}

/// Insert each placed clip's video and audio range into `sink`.
pub fn apply_to_sink<C: MediaClip, S: CompositionSink + ?Sized>(
    plan: &PlacementPlan,
    clips: &[C],
    sink: &mut S,
) -> Result<()> {
    for entry in &plan.entries {
        let clip = clips.get(entry.clip_index).ok_or_else(|| {
            Error::invalid_range(entry.clip_index, "placement references a clip that was not supplied")
        })?;
        for kind in [MediaKind::Video, MediaKind::Audio] {
            let source = SegmentSource {
                clip: clip.id(),
                clip_name: clip.name().to_string(),
                range: entry.source_range,
            };
            sink.insert_time_range(entry.slot, kind, source, entry.placement.start)?;
        }
    }
    Ok(())
}

fn resolve_ranges<C: MediaClip>(clips: &[C], ranges: &[TimeRange]) -> Vec<TimeRange> {
    if ranges.len() > clips.len() {
        tracing::warn!(
            clips = clips.len(),
            ranges = ranges.len(),
            "More selected ranges than clips, ignoring the extra ranges"
        );
    } else if ranges.len() < clips.len() {
        tracing::warn!(
            clips = clips.len(),
            ranges = ranges.len(),
            "Fewer selected ranges than clips, using whole clips for the rest"
        );
    }

    clips
        .iter()
        .enumerate()
        .map(|(index, clip)| {
            ranges
                .get(index)
                .copied()
                .unwrap_or_else(|| TimeRange::new(MediaTime::ZERO, clip.duration()))
        })
        .collect()
}

fn validate_clip<C: MediaClip>(index: usize, clip: &C, range: &TimeRange) -> Result<()> {
    for kind in [MediaKind::Video, MediaKind::Audio] {
        if !clip.has_track(kind) {
            return Err(Error::MissingTrack {
                clip_index: index,
                kind,
            });
        }
    }
    if !range.duration.is_positive() {
        return Err(Error::invalid_range(
            index,
            format!("duration {} is not positive", range.duration),
        ));
    }
    if range.start.is_negative() {
        return Err(Error::invalid_range(
            index,
            format!("start {} is negative", range.start),
        ));
    }
    let end = range.checked_end()?;
    if end > clip.duration() {
        return Err(Error::invalid_range(
            index,
            format!("end {} is past the clip duration {}", end, clip.duration()),
        ));
    }
    Ok(())
}

/// `min(requested, shortest range / 2)`, or zero with fewer than two clips.
fn effective_transition(ranges: &[TimeRange], requested: Option<MediaTime>) -> MediaTime {
    let Some(requested) = requested else {
        return MediaTime::ZERO;
    };
    if ranges.len() < 2 {
        return MediaTime::ZERO;
    }
    ranges
        .iter()
        .map(|range| range.duration.half())
        .min()
        .map_or(MediaTime::ZERO, |limit| requested.min(limit))
}
