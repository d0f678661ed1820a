//! Placement plan.
//!
//! One [`PlacementEntry`] per clip, in clip order, describing where the clip's
//! selected range lands on the output timeline and how that span splits into
//! a pass-through window and its transition overlaps.

use crossfader_common::{MediaTime, TimeRange, TrackSlot};

/// Where a single clip lands on the output timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementEntry {
    /// Index of the clip in the input list.
    pub clip_index: usize,
    /// Output track slot (`clip_index mod 2`).
    pub slot: TrackSlot,
    /// Selected range in the clip's own timeline.
    pub source_range: TimeRange,
    /// Span covered on the output timeline.
    pub placement: TimeRange,
    /// Window where this clip plays alone at full weight.
    pub pass_through: TimeRange,
    /// Overlap with the previous clip, if any.
    pub incoming_transition: Option<TimeRange>,
    /// Overlap with the next clip, if any.
    pub outgoing_transition: Option<TimeRange>,
}

/// Ordered placements of every clip plus the effective transition.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementPlan {
    pub entries: Vec<PlacementEntry>,
    /// Transition duration after clamping.
    pub transition_duration: MediaTime,
    /// Length of the output timeline.
    pub duration: MediaTime,
}

impl PlacementPlan {
    /// A plan with no clips.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Output range `[0, duration)`.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(MediaTime::ZERO, self.duration)
    }

    /// Transition windows between adjacent clips, in timeline order.
    pub fn transitions(&self) -> impl Iterator<Item = TimeRange> + '_ {
        self.entries.iter().filter_map(|e| e.outgoing_transition)
    }

    /// Entries whose placement covers `t`. Two entries during a transition.
    pub fn entries_at(&self, t: MediaTime) -> Vec<&PlacementEntry> {
        self.entries
            .iter()
            .filter(|e| e.placement.contains(t))
            .collect()
    }

    /// The entry that is on top at `t`: the incoming clip inside a transition.
    pub fn entry_at(&self, t: MediaTime) -> Option<&PlacementEntry> {
        self.entries.iter().rev().find(|e| e.placement.contains(t))
    }
}
