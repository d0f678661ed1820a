//! Typed ID wrappers for type safety across crossfader.
//!
//! Clips are referenced from composition track segments by ID so a segment
//! never holds on to the clip itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a source clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(Uuid);

impl ClipId {
    /// Generate a new random clip ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ClipId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ClipId> for Uuid {
    fn from(id: ClipId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
