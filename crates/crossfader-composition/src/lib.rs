//! Crossfader-Composition: two-track cross-fade composition building
//!
//! This crate turns an ordered list of clips, their selected ranges and a
//! requested transition duration into everything a player needs to render a
//! cross-faded edit.
//!
//! # Modules
//!
//! - `clip` - The clip source interface (`MediaClip`) and a plain `ClipInfo`
//! - `plan` - Placement plan: where each clip lands and which parts overlap
//! - `composition` - Track/segment timeline and the `CompositionSink` trait
//! - `instruction` - Video compositing instructions and opacity ramps
//! - `audio_mix` - Audio volume ramps
//! - `builder` - The transition timeline builder
//! - `debug` - Data harvest of a built composition for inspection
//!
//! # Architecture
//!
//! Clips alternate between two output track slots so consecutive clips can
//! overlap. The builder runs in one pass:
//!
//! 1. Validate every clip (tracks present, range inside the clip)
//! 2. Clamp the transition to half the shortest selected range
//! 3. Place clips, each overlapping its predecessor by the transition
//! 4. Emit pass-through and transition video instructions in timeline order
//! 5. Emit matching audio ramps for every transition window
//!
//! The builder is a pure function of its inputs; calling it twice with the
//! same clips yields equal outputs.

pub mod audio_mix;
pub mod builder;
pub mod clip;
pub mod composition;
pub mod debug;
pub mod error;
pub mod instruction;
pub mod plan;

pub use audio_mix::{AudioMix, AudioMixInputParameters, VolumeRamp};
pub use builder::{TransitionComposition, TransitionCompositionBuilder};
pub use clip::{ClipInfo, MediaClip};
pub use composition::{Composition, CompositionSink, CompositionTrack, SegmentSource, TrackSegment};
pub use debug::CompositionDebugInfo;
pub use error::{Error, Result};
pub use instruction::{InstructionKind, LayerInstruction, OpacityRamp, VideoComposition, VideoInstruction};
pub use plan::{PlacementEntry, PlacementPlan};
