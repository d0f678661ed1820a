//! Core type definitions for media kinds and output track slots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media carried by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Picture track.
    Video,
    /// Sound track.
    Audio,
}

impl MediaKind {
    /// One-letter tag used in debug descriptions (`v` / `a`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Video => "v",
            Self::Audio => "a",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// One of the two reusable output tracks that host alternating clips.
///
/// Consecutive clips land on different slots so their transition overlap can
/// be composited without re-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSlot {
    /// Slot 0: hosts even-indexed clips.
    Primary,
    /// Slot 1: hosts odd-indexed clips.
    Secondary,
}

impl TrackSlot {
    /// Both slots in index order.
    pub const ALL: [TrackSlot; 2] = [TrackSlot::Primary, TrackSlot::Secondary];

    /// Slot assigned to clip `clip_index` (`clip_index mod 2`).
    pub fn for_clip(clip_index: usize) -> Self {
        if clip_index % 2 == 0 {
            Self::Primary
        } else {
            Self::Secondary
        }
    }

    /// The opposite slot.
    pub fn other(&self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }

    /// Numeric index (0 or 1).
    pub fn index(&self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

impl fmt::Display for TrackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
