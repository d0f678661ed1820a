//! Audio volume ramps.
//!
//! Every transition window gets a fade-out on the outgoing slot, a fade-in on
//! the incoming slot, and a constant 1.0 ramp across the incoming clip's next
//! pass-through window so no renderer keeps interpolating past the fade-in.

use crossfader_common::{MediaTime, TimeRange, TrackSlot};

use crate::instruction::{lerp, progress};

/// Linear volume change on one track slot over a time range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeRamp {
    pub track: TrackSlot,
    pub time_range: TimeRange,
    pub start_volume: f32,
    pub end_volume: f32,
}

impl VolumeRamp {
    /// Volume at `t`; held at the endpoints outside the range.
    pub fn value_at(&self, t: MediaTime) -> f32 {
        lerp(self.start_volume, self.end_volume, progress(&self.time_range, t))
    }
}

/// All ramps of a single track slot, in time order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioMixInputParameters {
    pub track: TrackSlot,
    pub ramps: Vec<VolumeRamp>,
}

impl AudioMixInputParameters {
    /// Volume at `t`: 1.0 before the first ramp, interpolated inside a
    /// ramp, and held at the last ramp's end volume between ramps.
    pub fn volume_at(&self, t: MediaTime) -> f32 {
        self.ramps
            .iter()
            .rev()
            .find(|ramp| ramp.time_range.start <= t)
            .map_or(1.0, |ramp| ramp.value_at(t))
    }
}

/// Volume ramps for the whole composition, in emission order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioMix {
    pub ramps: Vec<VolumeRamp>,
}

impl AudioMix {
    pub fn is_empty(&self) -> bool {
        self.ramps.is_empty()
    }

    /// Ramps grouped per slot; slots without ramps are omitted.
    pub fn input_parameters(&self) -> Vec<AudioMixInputParameters> {
        TrackSlot::ALL
            .iter()
            .filter_map(|slot| self.input(*slot))
            .collect()
    }

    /// Ramps of one slot, sorted by start time.
    pub fn input(&self, slot: TrackSlot) -> Option<AudioMixInputParameters> {
        let mut ramps: Vec<VolumeRamp> = self
            .ramps
            .iter()
            .filter(|ramp| ramp.track == slot)
            .copied()
            .collect();
        if ramps.is_empty() {
            return None;
        }
        ramps.sort_by(|a, b| a.time_range.start.cmp(&b.time_range.start));
        Some(AudioMixInputParameters { track: slot, ramps })
    }

    /// Volume of `slot` at `t`; 1.0 for a slot without ramps.
    pub fn volume_at(&self, slot: TrackSlot, t: MediaTime) -> f32 {
        self.input(slot).map_or(1.0, |input| input.volume_at(t))
    }
}
