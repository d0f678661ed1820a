//! Crossfader-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across crossfader:
//!
//! - **Media Time**: Exact rational time values and half-open time ranges
//! - **Typed IDs**: Type-safe UUID wrapper for clips
//! - **Core Types**: Media kinds and the two alternating output track slots
//! - **Path Utilities**: Functions to detect media files by extension
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use crossfader_common::{ClipId, MediaTime, TimeRange, TrackSlot, Result};
//!
//! // Exact time arithmetic
//! let five = MediaTime::from_secs(5);
//! let two = MediaTime::new(1200, 600)?;
//! assert_eq!(five - two, MediaTime::from_secs(3));
//!
//! // Half-open ranges
//! let range = TimeRange::new(MediaTime::ZERO, five);
//! assert!(range.contains(MediaTime::from_secs(4)));
//! assert!(!range.contains(five));
//!
//! // Clip i lands on slot i mod 2
//! assert_eq!(TrackSlot::for_clip(3), TrackSlot::Secondary);
//!
//! let _id = ClipId::new();
//! # Ok::<(), crossfader_common::Error>(())
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod time;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use time::{MediaTime, TimeRange};
pub use types::*;
