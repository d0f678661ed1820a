//! Video compositing instructions.
//!
//! A pass-through instruction shows one track slot at full opacity. A
//! transition instruction stacks the incoming slot, fading in from 0 to 1,
//! over the outgoing slot at full opacity. Layer order is top first.

use crossfader_common::{MediaTime, TimeRange, TrackSlot};

use crate::error::{Error, Result};

/// Linear interpolation between `a` and `b` at `t` in [0, 1].
#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fraction of `range` elapsed at `t`, clamped to [0, 1].
pub(crate) fn progress(range: &TimeRange, t: MediaTime) -> f32 {
    if range.is_empty() || t <= range.start {
        return 0.0;
    }
    if t >= range.end() {
        return 1.0;
    }
    let elapsed = (t - range.start).as_secs_f64();
    (elapsed / range.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
}

/// Linear opacity change over a time range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct OpacityRamp {
    pub start_opacity: f32,
    pub end_opacity: f32,
    pub time_range: TimeRange,
}

impl OpacityRamp {
    /// Opacity at `t`; held at the endpoints outside the range.
    pub fn value_at(&self, t: MediaTime) -> f32 {
        lerp(self.start_opacity, self.end_opacity, progress(&self.time_range, t))
    }
}

/// One track slot's contribution to an instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerInstruction {
    pub track: TrackSlot,
    pub opacity_ramp: Option<OpacityRamp>,
}

impl LayerInstruction {
    /// A layer shown at constant full opacity.
    pub fn opaque(track: TrackSlot) -> Self {
        Self {
            track,
            opacity_ramp: None,
        }
    }

    /// A layer whose opacity ramps over `time_range`.
    pub fn ramped(track: TrackSlot, start_opacity: f32, end_opacity: f32, time_range: TimeRange) -> Self {
        Self {
            track,
            opacity_ramp: Some(OpacityRamp {
                start_opacity,
                end_opacity,
                time_range,
            }),
        }
    }

    pub fn opacity_at(&self, t: MediaTime) -> f32 {
        self.opacity_ramp.map_or(1.0, |ramp| ramp.value_at(t))
    }
}

/// Whether an instruction shows one clip or blends two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum InstructionKind {
    PassThrough,
    Transition,
}

/// Layers to composite during a time range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoInstruction {
    pub time_range: TimeRange,
    /// Top layer first.
    pub layers: Vec<LayerInstruction>,
}

impl VideoInstruction {
    pub fn pass_through(track: TrackSlot, time_range: TimeRange) -> Self {
        Self {
            time_range,
            layers: vec![LayerInstruction::opaque(track)],
        }
    }

    /// Cross-fade from `outgoing` to `incoming`: incoming on top fading in.
    pub fn transition(outgoing: TrackSlot, incoming: TrackSlot, time_range: TimeRange) -> Self {
        Self {
            time_range,
            layers: vec![
                LayerInstruction::ramped(incoming, 0.0, 1.0, time_range),
                LayerInstruction::opaque(outgoing),
            ],
        }
    }

    pub fn kind(&self) -> InstructionKind {
        if self.layers.len() > 1 {
            InstructionKind::Transition
        } else {
            InstructionKind::PassThrough
        }
    }
}

/// Everything a renderer needs to composite the video tracks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoComposition {
    pub instructions: Vec<VideoInstruction>,
    pub frame_duration: MediaTime,
    pub render_size: Option<(u32, u32)>,
}

impl VideoComposition {
    /// Instruction active at `t`.
    pub fn instruction_at(&self, t: MediaTime) -> Option<&VideoInstruction> {
        self.instructions.iter().find(|i| i.time_range.contains(t))
    }

    /// Verify the instructions tile `[0, total)` in order with no gaps,
    /// overlaps or empty ranges.
    pub fn check_coverage(&self, total: MediaTime) -> Result<()> {
        let mut cursor = MediaTime::ZERO;
        for (i, instruction) in self.instructions.iter().enumerate() {
            let range = instruction.time_range;
            if range.start != cursor {
                return Err(Error::coverage(format!(
                    "instruction {i} starts at {} but previous coverage ends at {cursor}",
                    range.start
                )));
            }
            if range.is_empty() {
                return Err(Error::coverage(format!("instruction {i} is empty")));
            }
            cursor = range.end();
        }
        if cursor != total {
            return Err(Error::coverage(format!(
                "instructions end at {cursor}, timeline ends at {total}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: i64) -> MediaTime {
        MediaTime::from_secs(s)
    }

    #[test]
    fn test_opacity_ramp_values() {
        let layer = LayerInstruction::ramped(TrackSlot::Secondary, 0.0, 1.0, TimeRange::new(secs(3), secs(2)));
        assert_eq!(layer.opacity_at(secs(2)), 0.0);
        assert_eq!(layer.opacity_at(secs(3)), 0.0);
        assert!((layer.opacity_at(secs(4)) - 0.5).abs() < 1e-6);
        assert_eq!(layer.opacity_at(secs(5)), 1.0);
        assert_eq!(LayerInstruction::opaque(TrackSlot::Primary).opacity_at(secs(4)), 1.0);
    }

    #[test]
    fn test_transition_layer_order() {
        let range = TimeRange::new(secs(3), secs(2));
        let instruction = VideoInstruction::transition(TrackSlot::Primary, TrackSlot::Secondary, range);
        assert_eq!(instruction.kind(), InstructionKind::Transition);
        assert_eq!(instruction.layers[0].track, TrackSlot::Secondary);
        assert!(instruction.layers[0].opacity_ramp.is_some());
        assert_eq!(instruction.layers[1].track, TrackSlot::Primary);
        assert!(instruction.layers[1].opacity_ramp.is_none());
    }

    #[test]
    fn test_check_coverage() {
        let composition = VideoComposition {
            instructions: vec![
                VideoInstruction::pass_through(TrackSlot::Primary, TimeRange::new(secs(0), secs(3))),
                VideoInstruction::pass_through(TrackSlot::Secondary, TimeRange::new(secs(3), secs(2))),
            ],
            frame_duration: MediaTime::new(1, 30).unwrap(),
            render_size: None,
        };
        assert!(composition.check_coverage(secs(5)).is_ok());
        assert!(composition.check_coverage(secs(6)).is_err());
        assert_eq!(
            composition.instruction_at(secs(3)).map(|i| i.layers[0].track),
            Some(TrackSlot::Secondary)
        );
    }

    #[test]
    fn test_check_coverage_detects_gap() {
        let composition = VideoComposition {
            instructions: vec![
                VideoInstruction::pass_through(TrackSlot::Primary, TimeRange::new(secs(0), secs(3))),
                VideoInstruction::pass_through(TrackSlot::Secondary, TimeRange::new(secs(4), secs(1))),
            ],
            frame_duration: MediaTime::new(1, 30).unwrap(),
            render_size: None,
        };
        assert!(matches!(composition.check_coverage(secs(5)), Err(Error::Coverage(_))));
    }
}
