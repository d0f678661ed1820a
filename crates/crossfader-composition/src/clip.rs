//! Clip source interface.
//!
//! The builder only needs a clip's identity, its natural duration and which
//! tracks it carries. Anything that can answer those questions can be
//! composed; [`ClipInfo`] is the plain-data implementation.

use crossfader_common::{ClipId, MediaKind, MediaTime};

/// A source media item contributing video and audio to the timeline.
pub trait MediaClip {
    /// Stable identifier referenced by composition segments.
    fn id(&self) -> ClipId;

    /// Human-readable name used in debug descriptions.
    fn name(&self) -> &str;

    /// Natural duration of the clip's own timeline.
    fn duration(&self) -> MediaTime;

    /// Whether the clip carries a usable track of `kind`.
    fn has_track(&self, kind: MediaKind) -> bool;

    /// Natural frame size of the video track, when known.
    fn natural_size(&self) -> Option<(u32, u32)> {
        None
    }
}

impl<T: MediaClip + ?Sized> MediaClip for &T {
    fn id(&self) -> ClipId {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn duration(&self) -> MediaTime {
        (**self).duration()
    }

    fn has_track(&self, kind: MediaKind) -> bool {
        (**self).has_track(kind)
    }

    fn natural_size(&self) -> Option<(u32, u32)> {
        (**self).natural_size()
    }
}

/// Loaded clip metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipInfo {
    pub id: ClipId,
    pub name: String,
    pub duration: MediaTime,
    pub has_video: bool,
    pub has_audio: bool,
    pub natural_size: Option<(u32, u32)>,
}

impl ClipInfo {
    /// A clip with both a video and an audio track.
    pub fn new(name: impl Into<String>, duration: MediaTime) -> Self {
        Self {
            id: ClipId::new(),
            name: name.into(),
            duration,
            has_video: true,
            has_audio: true,
            natural_size: None,
        }
    }

    pub fn with_natural_size(mut self, width: u32, height: u32) -> Self {
        self.natural_size = Some((width, height));
        self
    }

    pub fn without_video(mut self) -> Self {
        self.has_video = false;
        self
    }

    pub fn without_audio(mut self) -> Self {
        self.has_audio = false;
        self
    }
}

impl MediaClip for ClipInfo {
    fn id(&self) -> ClipId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn duration(&self) -> MediaTime {
        self.duration
    }

    fn has_track(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Video => self.has_video,
            MediaKind::Audio => self.has_audio,
        }
    }

    fn natural_size(&self) -> Option<(u32, u32)> {
        self.natural_size
    }
}
