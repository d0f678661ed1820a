//! Transport controls for a [`PlayerSink`].
//!
//! The controller keeps the play/pause toggle, the scrubber and the time
//! label in step with the player. It learns about rate, status and
//! end-of-item changes through [`PlayerEvents`] callbacks registered on
//! construction and removed on drop.

use std::sync::Arc;

use crossfader_common::MediaTime;
use parking_lot::Mutex;

use super::events::{ItemStatus, PlayerEvents, SubscriptionId};
use super::player::PlayerSink;
use crate::editor::PlayerItem;

/// Timescale for seek targets and tolerances (nanoseconds).
const SEEK_TIMESCALE: i64 = 1_000_000_000;

/// `MM:SS` for `seconds`, rounded to the nearest second.
pub fn format_time_label(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds } else { 0.0 };
    let total = seconds.round() as i64;
    let minutes = total / 60;
    format!("{:02}:{:02}", minutes, total - minutes * 60)
}

/// Scrubber position in [0, 1]; 0 while the duration is unknown.
pub fn scrubber_position(current_secs: f64, duration_secs: Option<f64>) -> f32 {
    match duration_secs {
        Some(duration) if duration.is_finite() && duration > 0.0 => (current_secs / duration) as f32,
        _ => 0.0,
    }
}

/// Periodic observer interval: half a scrubber point, at most one second.
pub fn observer_interval(duration_secs: f64, width: f64) -> f64 {
    (0.5 * duration_secs / width).min(1.0)
}

/// Seek tolerance while scrubbing: one scrubber point.
pub fn scrub_tolerance(duration_secs: f64, width: f64) -> f64 {
    duration_secs / width
}

/// What the periodic observer refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub time_label: String,
    pub scrubber_value: f32,
    pub playing: bool,
}

#[derive(Debug, Default)]
struct ControllerState {
    playing: bool,
    seek_to_zero_before_playing: bool,
    rate_to_restore: f32,
    scrub_in_flight: bool,
    last_scrub_value: f32,
    status: Option<ItemStatus>,
}

pub struct PlaybackController<P: PlayerSink> {
    player: P,
    scrubber_width: f64,
    state: Arc<Mutex<ControllerState>>,
    events: Arc<PlayerEvents>,
    subscriptions: Vec<SubscriptionId>,
    time_observer: Option<f64>,
}

impl<P: PlayerSink> PlaybackController<P> {
    pub fn new(player: P, scrubber_width: f64) -> Self {
        let state = Arc::new(Mutex::new(ControllerState::default()));
        let events = player.events();

        let rate_state = Arc::clone(&state);
        let on_rate = events.on_rate_changed(move |old, new| {
            if old != new {
                let mut state = rate_state.lock();
                state.playing = new != 0.0 || state.rate_to_restore != 0.0;
            }
        });

        let status_state = Arc::clone(&state);
        let on_status = events.on_status_changed(move |status| {
            if status == ItemStatus::Failed {
                tracing::error!("Player item failed to load");
            }
            status_state.lock().status = Some(status);
        });

        let end_state = Arc::clone(&state);
        let on_end = events.on_reached_end(move || {
            end_state.lock().seek_to_zero_before_playing = true;
        });

        let mut controller = Self {
            player,
            scrubber_width,
            state,
            events,
            subscriptions: vec![on_rate, on_status, on_end],
            time_observer: None,
        };
        controller.add_time_observer();
        controller
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Hand a new item to the player if it differs from the current one.
    pub fn set_item(&mut self, item: Option<PlayerItem>) {
        let current = self.player.current_item().map(|item| item.id);
        if current == item.as_ref().map(|item| item.id) {
            return;
        }
        self.remove_time_observer();
        self.player.replace_current_item(item);
        self.add_time_observer();
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    /// Last item status reported by the player.
    pub fn last_status(&self) -> Option<ItemStatus> {
        self.state.lock().status
    }

    pub fn toggle_play_pause(&mut self) {
        let (playing, seek_to_zero) = {
            let mut state = self.state.lock();
            state.playing = !state.playing;
            let seek_to_zero = state.playing && state.seek_to_zero_before_playing;
            if seek_to_zero {
                state.seek_to_zero_before_playing = false;
            }
            (state.playing, seek_to_zero)
        };

        if playing {
            if seek_to_zero {
                self.player.seek(MediaTime::ZERO, MediaTime::ZERO);
            }
            self.player.play();
        } else {
            self.player.pause();
        }
    }

    pub fn begin_scrubbing(&mut self) {
        {
            let mut state = self.state.lock();
            state.seek_to_zero_before_playing = false;
            state.rate_to_restore = self.player.rate();
        }
        self.player.set_rate(0.0);
        self.remove_time_observer();
    }

    /// Scrubber moved to `value` in [0, 1].
    pub fn scrub(&mut self, value: f32) {
        let in_flight = {
            let mut state = self.state.lock();
            state.last_scrub_value = value;
            state.scrub_in_flight
        };
        if !in_flight {
            self.scrub_to(value);
        }
    }

    pub fn end_scrubbing(&mut self) {
        let (in_flight, last_value) = {
            let state = self.state.lock();
            (state.scrub_in_flight, state.last_scrub_value)
        };
        if in_flight {
            self.scrub_to(last_value);
        }
        self.add_time_observer();

        let restore = std::mem::take(&mut self.state.lock().rate_to_restore);
        self.player.set_rate(restore);
    }

    /// Completion of a seek the player reported as still pending.
    ///
    /// Sinks whose `seek` returns false must route their completion here,
    /// otherwise scrubs are coalesced until [`Self::end_scrubbing`].
    pub fn seek_finished(&mut self) {
        self.state.lock().scrub_in_flight = false;
    }

    pub fn time_label(&self) -> String {
        format_time_label(self.player.current_time().as_secs_f64())
    }

    pub fn scrubber_value(&self) -> f32 {
        scrubber_position(
            self.player.current_time().as_secs_f64(),
            self.duration_secs(),
        )
    }

    /// Interval of the installed periodic observer, if any.
    pub fn observer_interval(&self) -> Option<f64> {
        self.time_observer
    }

    pub fn scrub_tolerance(&self) -> Option<f64> {
        self.duration_secs()
            .map(|duration| scrub_tolerance(duration, self.scrubber_width))
    }

    /// Install the periodic observer once the item is ready to play.
    pub fn add_time_observer(&mut self) -> Option<f64> {
        if self.time_observer.is_some() {
            return self.time_observer;
        }
        if self.player.item_status() != ItemStatus::ReadyToPlay {
            return None;
        }
        let interval = observer_interval(self.duration_secs()?, self.scrubber_width);
        tracing::debug!(interval, "Installed playback time observer");
        self.time_observer = Some(interval);
        self.time_observer
    }

    pub fn remove_time_observer(&mut self) {
        self.time_observer = None;
    }

    /// Observer tick: the values to display, or `None` without an observer.
    pub fn tick(&self) -> Option<PlaybackSnapshot> {
        self.time_observer?;
        Some(PlaybackSnapshot {
            time_label: self.time_label(),
            scrubber_value: self.scrubber_value(),
            playing: self.is_playing(),
        })
    }

    fn duration_secs(&self) -> Option<f64> {
        self.player
            .item_duration()
            .map(|duration| duration.as_secs_f64())
            .filter(|duration| duration.is_finite())
    }

    fn scrub_to(&mut self, value: f32) {
        let Some(duration) = self.duration_secs() else {
            return;
        };
        let time = duration * f64::from(value);
        let tolerance = scrub_tolerance(duration, self.scrubber_width);
        let (Ok(to), Ok(tolerance)) = (
            MediaTime::from_secs_f64(time, SEEK_TIMESCALE),
            MediaTime::from_secs_f64(tolerance, SEEK_TIMESCALE),
        ) else {
            tracing::warn!("Ignoring scrub to {}", value);
            return;
        };

        self.state.lock().scrub_in_flight = true;
        let finished = self.player.seek(to, tolerance);
        if finished {
            self.state.lock().scrub_in_flight = false;
            tracing::trace!("Scrubbed to {}", self.time_label());
        }
    }
}

impl<P: PlayerSink> Drop for PlaybackController<P> {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.events.unsubscribe(id);
        }
    }
}
