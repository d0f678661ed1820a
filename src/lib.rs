//! Crossfader - cross-fade transition compositions for two-track timelines
//!
//! This library crate exposes the application layer for integration testing:
//! project files, clip loading, the editor session and playback control.

pub mod config;
pub mod editor;
pub mod loader;
pub mod playback;
