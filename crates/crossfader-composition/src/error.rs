//! Error types for crossfader-composition.

use crossfader_common::{MediaKind, MediaTime, TrackSlot};
use thiserror::Error;

/// Result type for crossfader-composition operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for crossfader-composition operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A selected range is empty, negative, or reaches past the clip.
    #[error("Invalid range for clip {clip_index}: {reason}")]
    InvalidRange { clip_index: usize, reason: String },

    /// A clip lacks the video or audio track the composition needs.
    #[error("Clip {clip_index} has no usable {kind} track")]
    MissingTrack { clip_index: usize, kind: MediaKind },

    /// The requested transition duration is negative.
    #[error("Invalid transition duration: {0}")]
    InvalidTransition(String),

    /// Inserting media would overlap media already on the track.
    #[error("Insert at {at} on {kind} track {slot} overlaps media ending at {track_end}")]
    TrackOverlap {
        slot: TrackSlot,
        kind: MediaKind,
        at: MediaTime,
        track_end: MediaTime,
    },

    /// Video instructions do not tile the output timeline.
    #[error("Instruction coverage broken: {0}")]
    Coverage(String),

    /// Time value error from the common crate.
    #[error(transparent)]
    Common(#[from] crossfader_common::Error),
}

impl Error {
    /// Create an invalid range error.
    pub fn invalid_range(clip_index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            clip_index,
            reason: reason.into(),
        }
    }

    /// Create a coverage error.
    pub fn coverage(msg: impl Into<String>) -> Self {
        Self::Coverage(msg.into())
    }
}
