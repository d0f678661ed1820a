use crossfader_common::{time::DEFAULT_TIMESCALE, MediaTime};
use std::sync::Arc;

use super::events::{ItemStatus, PlayerEvent, PlayerEvents};
use crate::editor::PlayerItem;

/// Something that plays [`PlayerItem`]s.
pub trait PlayerSink {
    /// Swap the current item; `None` clears it.
    fn replace_current_item(&mut self, item: Option<PlayerItem>);

    fn current_item(&self) -> Option<&PlayerItem>;

    fn rate(&self) -> f32;

    fn set_rate(&mut self, rate: f32);

    fn play(&mut self) {
        self.set_rate(1.0);
    }

    fn pause(&mut self) {
        self.set_rate(0.0);
    }

    /// Move the playhead to `to`, accepting anything within `tolerance`.
    /// Returns true if the seek finished immediately; otherwise the owner
    /// reports completion through `PlaybackController::seek_finished`.
    fn seek(&mut self, to: MediaTime, tolerance: MediaTime) -> bool;

    fn current_time(&self) -> MediaTime;

    fn item_status(&self) -> ItemStatus;

    /// Duration of the current item once it is ready to play.
    fn item_duration(&self) -> Option<MediaTime> {
        match self.item_status() {
            ItemStatus::ReadyToPlay => self.current_item().map(PlayerItem::duration),
            _ => None,
        }
    }

    fn events(&self) -> Arc<PlayerEvents>;
}

/// A player without a clock: time only moves through [`HeadlessPlayer::advance`].
#[derive(Debug)]
pub struct HeadlessPlayer {
    item: Option<PlayerItem>,
    status: ItemStatus,
    rate: f32,
    position_secs: f64,
    events: Arc<PlayerEvents>,
}

impl Default for HeadlessPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlayer {
    pub fn new() -> Self {
        Self {
            item: None,
            status: ItemStatus::Unknown,
            rate: 0.0,
            position_secs: 0.0,
            events: Arc::new(PlayerEvents::new()),
        }
    }

    /// Move the playhead by `delta` at the current rate.
    ///
    /// Playback stops at the end of the item and emits `ReachedEnd`.
    pub fn advance(&mut self, delta: MediaTime) {
        if self.rate == 0.0 || self.status != ItemStatus::ReadyToPlay {
            return;
        }
        let Some(duration) = self.item_duration().map(|d| d.as_secs_f64()) else {
            return;
        };

        let target = self.position_secs + delta.as_secs_f64() * f64::from(self.rate);
        if target >= duration {
            self.position_secs = duration;
            self.set_rate(0.0);
            self.events.emit(PlayerEvent::ReachedEnd);
        } else {
            self.position_secs = target.max(0.0);
        }
    }

    /// Mark the current item as unplayable.
    pub fn fail_current_item(&mut self) {
        self.set_status(ItemStatus::Failed);
    }

    fn set_status(&mut self, status: ItemStatus) {
        if self.status != status {
            self.status = status;
            self.events.emit(PlayerEvent::StatusChanged { status });
        }
    }
}

impl PlayerSink for HeadlessPlayer {
    fn replace_current_item(&mut self, item: Option<PlayerItem>) {
        self.position_secs = 0.0;
        let status = if item.is_some() {
            ItemStatus::ReadyToPlay
        } else {
            ItemStatus::Unknown
        };
        self.item = item;
        self.status = status;
        self.events.emit(PlayerEvent::StatusChanged { status });
    }

    fn current_item(&self) -> Option<&PlayerItem> {
        self.item.as_ref()
    }

    fn rate(&self) -> f32 {
        self.rate
    }

    fn set_rate(&mut self, rate: f32) {
        let old = self.rate;
        self.rate = rate;
        if old != rate {
            self.events.emit(PlayerEvent::RateChanged { old, new: rate });
        }
    }

    fn seek(&mut self, to: MediaTime, _tolerance: MediaTime) -> bool {
        let end = self.item_duration().map_or(0.0, |d| d.as_secs_f64());
        self.position_secs = to.as_secs_f64().clamp(0.0, end);
        true
    }

    fn current_time(&self) -> MediaTime {
        MediaTime::from_secs_f64(self.position_secs, DEFAULT_TIMESCALE).unwrap_or(MediaTime::ZERO)
    }

    fn item_status(&self) -> ItemStatus {
        self.status
    }

    fn events(&self) -> Arc<PlayerEvents> {
        Arc::clone(&self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Editor;
    use crossfader_common::TimeRange;
    use crossfader_composition::ClipInfo;
    use parking_lot::Mutex;

    fn secs(s: i64) -> MediaTime {
        MediaTime::from_secs(s)
    }

    fn item() -> PlayerItem {
        let mut editor = Editor::new();
        editor.set_clips(vec![ClipInfo::new("a", secs(5)), ClipInfo::new("b", secs(5))]);
        editor.set_ranges(vec![TimeRange::new(secs(0), secs(5)); 2]);
        editor.build_for_playback().unwrap().unwrap()
    }

    #[test]
    fn test_replace_item_sets_status() {
        let mut player = HeadlessPlayer::new();
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let statuses_clone = Arc::clone(&statuses);
        player
            .events()
            .on_status_changed(move |status| statuses_clone.lock().push(status));

        assert_eq!(player.item_duration(), None);
        player.replace_current_item(Some(item()));
        assert_eq!(player.item_status(), ItemStatus::ReadyToPlay);
        assert_eq!(player.item_duration(), Some(secs(8)));

        player.replace_current_item(None);
        assert_eq!(*statuses.lock(), vec![ItemStatus::ReadyToPlay, ItemStatus::Unknown]);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut player = HeadlessPlayer::new();
        player.replace_current_item(Some(item()));
        let mut events = player.events().subscribe();

        player.advance(secs(1));
        assert_eq!(player.current_time(), MediaTime::ZERO);

        player.play();
        player.advance(secs(3));
        assert_eq!(player.current_time(), secs(3));

        player.advance(secs(10));
        assert_eq!(player.current_time(), secs(8));
        assert_eq!(player.rate(), 0.0);

        assert_eq!(events.try_recv().unwrap(), PlayerEvent::RateChanged { old: 0.0, new: 1.0 });
        assert_eq!(events.try_recv().unwrap(), PlayerEvent::RateChanged { old: 1.0, new: 0.0 });
        assert_eq!(events.try_recv().unwrap(), PlayerEvent::ReachedEnd);
    }

    #[test]
    fn test_seek_clamps_to_item() {
        let mut player = HeadlessPlayer::new();
        player.replace_current_item(Some(item()));
        assert!(player.seek(secs(20), MediaTime::ZERO));
        assert_eq!(player.current_time(), secs(8));
        player.seek(secs(2), MediaTime::ZERO);
        assert_eq!(player.current_time(), secs(2));
    }

    #[test]
    fn test_failed_item_has_no_duration() {
        let mut player = HeadlessPlayer::new();
        player.replace_current_item(Some(item()));
        player.fail_current_item();
        assert_eq!(player.item_status(), ItemStatus::Failed);
        assert_eq!(player.item_duration(), None);
    }
}
