//! Navigation and bounded playback over a loaded cue sequence.
//!
//! The controller is the only writer of [`PlayerState`]. Every navigation
//! step seeks the media surface to a cue start and arms a bounded-stop watch
//! that pauses playback once the host reports a position at or past the cue
//! end. At most one watch exists; arming a new one replaces the old one
//! before anything else happens, so a superseded watch can never pause a
//! newer cue.

use anyhow::Result;
use std::path::Path;

use crate::{
    formats,
    media::MediaSurface,
    model::{Cue, PlayerState},
    source::SubtitleSource,
    store::{self, StateStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No cues loaded.
    Empty,
    /// Cues loaded, no watch armed.
    Idle,
    /// A bounded-stop watch is armed for the current cue.
    Watching,
}

/// What an observer is being told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    CuesLoaded,
    CurrentChanged,
    SentenceListToggled,
    VideoLockToggled,
    TextBlurToggled,
    NotesChanged,
    PlaybackToggled,
    /// The active watch paused playback at its cue end.
    PlaybackBounded,
}

/// Receives a read-only view after each change. Observers cannot reach the
/// controller from here, so notifications never re-enter navigation.
pub trait PlayerObserver {
    fn on_change(&mut self, state: &PlayerState, change: Change);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedWatch {
    pub id: u64,
    pub cue_index: usize,
    pub end_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WatchOutcome {
    /// No watch is armed.
    Unwatched,
    Running,
    /// The watch fired, paused the surface and was disarmed.
    Stopped(BoundedWatch),
}

pub struct Controller<M, S> {
    state: PlayerState,
    media: M,
    store: S,
    storage_key: String,
    watch: Option<BoundedWatch>,
    next_watch_id: u64,
    observers: Vec<Box<dyn PlayerObserver>>,
}

impl<M: MediaSurface, S: StateStore> Controller<M, S> {
    pub fn new(media: M, store: S, storage_key: impl Into<String>) -> Self {
        Self {
            state: PlayerState::default(),
            media,
            store,
            storage_key: storage_key.into(),
            watch: None,
            next_watch_id: 1,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn PlayerObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_empty() {
            Phase::Empty
        } else if self.watch.is_some() {
            Phase::Watching
        } else {
            Phase::Idle
        }
    }

    pub fn active_watch(&self) -> Option<BoundedWatch> {
        self.watch
    }

    /// Points the surface at `default_media`, then restores the stored session
    /// or, when there is none, loads `default_subtitles` from `source`.
    pub fn bootstrap(
        &mut self,
        source: &dyn SubtitleSource,
        default_media: &str,
        default_subtitles: &str,
    ) -> Result<()> {
        self.load_media(default_media);
        if self.restore() {
            return Ok(());
        }
        tracing::info!(subtitles = default_subtitles, "no saved session, loading defaults");
        self.load_subtitles(source, default_subtitles)?;
        Ok(())
    }

    /// Primes state from the store. Absent or unreadable blobs leave the
    /// state alone and return `false`.
    pub fn restore(&mut self) -> bool {
        let blob = match self.store.get(&self.storage_key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "state store unreadable");
                return false;
            }
        };

        let restored = match store::decode_state(&blob) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring corrupt saved state");
                return false;
            }
        };

        self.cancel_watch();
        self.state = restored;
        self.media.set_native_controls(!self.state.is_video_locked);
        tracing::info!(
            cues = self.state.cues.len(),
            current_index = self.state.current_index_signed(),
            "restored saved session"
        );
        self.notify(Change::CuesLoaded);
        true
    }

    /// Replaces the cue sequence wholesale and selects the first cue.
    pub fn load(&mut self, cues: Vec<Cue>) {
        self.cancel_watch();
        self.state.current_index = if cues.is_empty() { None } else { Some(0) };
        self.state.cues = cues;
        tracing::info!(cues = self.state.cues.len(), "cues loaded");
        self.notify(Change::CuesLoaded);
        self.persist();
    }

    /// Fetches and parses `name`, then loads it. On any failure the current
    /// cues and selection are kept.
    pub fn load_subtitles(&mut self, source: &dyn SubtitleSource, name: &str) -> Result<usize> {
        let parsed = source.fetch_text(name).and_then(|raw| parse_named(name, &raw));
        let cues = match parsed {
            Ok(cues) => cues,
            Err(e) => {
                tracing::error!(source = name, error = %e, "failed to load subtitles");
                return Err(e);
            }
        };

        let count = cues.len();
        self.load(cues);
        Ok(count)
    }

    pub fn load_media(&mut self, name: &str) {
        self.cancel_watch();
        self.media.load_source(name);
        self.media.set_native_controls(!self.state.is_video_locked);
    }

    /// Selects the cue at `index`, saturating at both ends, and plays it.
    pub fn go_to(&mut self, index: i64) {
        if self.state.is_empty() {
            return;
        }

        let last = self.state.cues.len() as i64 - 1;
        let target = index.clamp(0, last) as usize;

        self.cancel_watch();
        self.state.current_index = Some(target);
        tracing::debug!(requested = index, index = target, "go to cue");
        self.notify(Change::CurrentChanged);
        self.persist();
        self.play_current();
    }

    pub fn next(&mut self) {
        self.go_to(self.state.current_index_signed() + 1);
    }

    pub fn previous(&mut self) {
        self.go_to(self.state.current_index_signed() - 1);
    }

    /// Plays the current cue from its start and arms the bounded stop.
    pub fn play_current(&mut self) {
        let Some(index) = self.state.current_index else {
            return;
        };
        let Some(cue) = self.state.cues.get(index) else {
            return;
        };
        let (start, end) = (cue.start_seconds, cue.end_seconds);

        self.cancel_watch();
        self.media.seek(start);
        self.media.play();

        let watch = BoundedWatch {
            id: self.next_watch_id,
            cue_index: index,
            end_seconds: end,
        };
        self.next_watch_id += 1;
        self.watch = Some(watch);
        tracing::debug!(watch = watch.id, index, start, end, "watch armed");
    }

    /// Feeds a position report from the surface into the armed watch.
    pub fn on_time_update(&mut self, position: f64) -> WatchOutcome {
        let Some(watch) = self.watch else {
            return WatchOutcome::Unwatched;
        };
        if position < watch.end_seconds {
            return WatchOutcome::Running;
        }

        self.media.pause();
        self.watch = None;
        tracing::debug!(watch = watch.id, position, "watch fired");
        self.notify(Change::PlaybackBounded);
        WatchOutcome::Stopped(watch)
    }

    pub fn cancel_watch(&mut self) -> Option<BoundedWatch> {
        let cancelled = self.watch.take();
        if let Some(w) = cancelled {
            tracing::trace!(watch = w.id, "watch cancelled");
        }
        cancelled
    }

    pub fn toggle_sentence_list_visible(&mut self) {
        self.state.sentence_list_visible = !self.state.sentence_list_visible;
        self.notify(Change::SentenceListToggled);
        self.persist();
    }

    pub fn toggle_video_lock(&mut self) {
        self.state.is_video_locked = !self.state.is_video_locked;
        self.media.set_native_controls(!self.state.is_video_locked);
        self.notify(Change::VideoLockToggled);
        self.persist();
    }

    pub fn toggle_text_blur(&mut self) {
        self.state.text_blurred = !self.state.text_blurred;
        self.notify(Change::TextBlurToggled);
    }

    /// Plain play/pause; an armed watch stays armed.
    pub fn toggle_playback(&mut self) {
        if self.media.is_paused() {
            self.media.play();
        } else {
            self.media.pause();
        }
        self.notify(Change::PlaybackToggled);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.state.notes = notes.into();
        self.notify(Change::NotesChanged);
        self.persist();
    }

    fn notify(&mut self, change: Change) {
        for observer in self.observers.iter_mut() {
            observer.on_change(&self.state, change);
        }
    }

    fn persist(&mut self) {
        let result = store::encode_state(&self.state)
            .and_then(|blob| self.store.set(&self.storage_key, &blob));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist player state");
        }
    }
}

fn parse_named(name: &str, raw: &str) -> Result<Vec<Cue>> {
    let is_json = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        formats::json::parse_json(raw)
    } else {
        Ok(formats::srt::parse_srt(raw))
    }
}
