//! Playback of built compositions.
//!
//! - `events` - typed callback registry for player notifications
//! - `player` - the `PlayerSink` trait and a clock-free `HeadlessPlayer`
//! - `controller` - play/pause, scrubbing and time display

pub mod controller;
pub mod events;
pub mod player;

pub use controller::{PlaybackController, PlaybackSnapshot};
pub use events::{ItemStatus, PlayerEvent, PlayerEvents, SubscriptionId};
pub use player::{HeadlessPlayer, PlayerSink};
