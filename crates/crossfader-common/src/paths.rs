//! Path utilities for clip source files.
//!
//! Clips are referenced by path in project files. These helpers recognise
//! video containers by extension and derive display names for clips that
//! were not given one explicitly.

use std::path::Path;

/// Container extensions that carry both a video and an audio track.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "mkv", "webm", "avi", "ts"];

/// Check if a path has a video container extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use crossfader_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("sample_clip1.m4v")));
/// assert!(is_video_file(Path::new("/clips/sample_clip2.MOV")));
/// assert!(!is_video_file(Path::new("notes.txt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Get the list of video container extensions.
#[must_use]
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}

/// Display name for a clip: the last path component, or `None` for paths
/// without one (empty, root, `..`).
///
/// ```
/// use std::path::Path;
/// use crossfader_common::paths::clip_display_name;
///
/// assert_eq!(clip_display_name(Path::new("/clips/intro.mov")).as_deref(), Some("intro.mov"));
/// assert_eq!(clip_display_name(Path::new("")), None);
/// ```
pub fn clip_display_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
