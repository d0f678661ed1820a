//! Track and segment timeline.
//!
//! A [`Composition`] holds up to four tracks, one per (media kind, slot)
//! pair. Each track is an ordered list of segments; an empty segment fills
//! any gap between the previous segment and the next inserted one.

use crossfader_common::{ClipId, MediaKind, MediaTime, TimeRange, TrackSlot};

use crate::error::{Error, Result};

/// The piece of a clip a segment plays.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentSource {
    pub clip: ClipId,
    pub clip_name: String,
    /// Range in the clip's own timeline.
    pub range: TimeRange,
}

/// A span of a track: either clip media or an empty gap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSegment {
    /// Range on the composition timeline.
    pub target: TimeRange,
    pub source: Option<SegmentSource>,
}

impl TrackSegment {
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositionTrack {
    pub slot: TrackSlot,
    pub kind: MediaKind,
    pub segments: Vec<TrackSegment>,
}

impl CompositionTrack {
    fn new(slot: TrackSlot, kind: MediaKind) -> Self {
        Self {
            slot,
            kind,
            segments: Vec::new(),
        }
    }

    /// End of the last segment, or zero for an empty track.
    pub fn end(&self) -> MediaTime {
        self.segments
            .last()
            .map_or(MediaTime::ZERO, |segment| segment.target.end())
    }

    /// Segments carrying clip media.
    pub fn media_segments(&self) -> impl Iterator<Item = &TrackSegment> {
        self.segments.iter().filter(|segment| !segment.is_empty())
    }
}

/// Receives source ranges from the builder.
pub trait CompositionSink {
    /// Place `source` on the `kind` track of `slot`, starting at `at`.
    fn insert_time_range(
        &mut self,
        slot: TrackSlot,
        kind: MediaKind,
        source: SegmentSource,
        at: MediaTime,
    ) -> Result<()>;
}

/// The in-memory composition shipped with the builder.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Composition {
    /// Sorted by (kind, slot).
    pub tracks: Vec<CompositionTrack>,
    pub natural_size: Option<(u32, u32)>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, slot: TrackSlot, kind: MediaKind) -> Option<&CompositionTrack> {
        self.tracks
            .iter()
            .find(|track| track.slot == slot && track.kind == kind)
    }

    /// Tracks of one media kind, in slot order.
    pub fn tracks_of(&self, kind: MediaKind) -> impl Iterator<Item = &CompositionTrack> {
        self.tracks.iter().filter(move |track| track.kind == kind)
    }

    /// The furthest track end.
    pub fn duration(&self) -> MediaTime {
        self.tracks
            .iter()
            .map(CompositionTrack::end)
            .max()
            .unwrap_or(MediaTime::ZERO)
    }

    fn track_mut(&mut self, slot: TrackSlot, kind: MediaKind) -> &mut CompositionTrack {
        let index = match self
            .tracks
            .binary_search_by(|track| (track.kind, track.slot).cmp(&(kind, slot)))
        {
            Ok(index) => index,
            Err(index) => {
                self.tracks.insert(index, CompositionTrack::new(slot, kind));
                index
            }
        };
        &mut self.tracks[index]
    }
}

impl CompositionSink for Composition {
    fn insert_time_range(
        &mut self,
        slot: TrackSlot,
        kind: MediaKind,
        source: SegmentSource,
        at: MediaTime,
    ) -> Result<()> {
        let track = self.track_mut(slot, kind);
        let track_end = track.end();
        if at < track_end {
            return Err(Error::TrackOverlap {
                slot,
                kind,
                at,
                track_end,
            });
        }
        if at > track_end {
            track.segments.push(TrackSegment {
                target: TimeRange::from_start_end(track_end, at),
                source: None,
            });
        }
        track.segments.push(TrackSegment {
            target: TimeRange::new(at, source.range.duration),
            source: Some(source),
        });
        Ok(())
    }
}
