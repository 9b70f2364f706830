//! Playback controller: "now playing" state bound to a media resource.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  PlaybackController (caller)                    │
//! │   Transport operations mutate PlayerState synchronously        │
//! └──────────────┬──────────────────────────────────▲───────────────┘
//!                │ set_source / play / pause        │ crossbeam channel
//!                ▼                                  │ (generation-tagged)
//! ┌─────────────────────────────────────────────────┴───────────────┐
//! │                        MediaResource                            │
//! │         progress / metadata-ready / ended events               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every time the current song is (re)assigned the controller drops the old
//! subscription, bumps its binding generation and subscribes again under the
//! new one. [`PlaybackController::pump_events`] applies only events tagged
//! with the live generation, so nothing a previous song reports can reach the
//! state of the current one.
//!
//! Start requests run as detached tasks on the ambient tokio runtime. Their
//! failures are logged and otherwise ignored; `is_playing` is not rolled back.

pub mod media;
pub mod simulated;
mod state;

pub use media::{
    EventSink, Generation, MediaError, MediaEvent, MediaEventKind, MediaResource, SubscriptionId,
};
pub use simulated::SimulatedMedia;
pub use state::{DEFAULT_VOLUME, PlaybackStatus, PlayerState, format_duration};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::model::Song;

/// Owns the player state and the single media resource.
pub struct PlaybackController<M: MediaResource> {
    media: M,
    state: PlayerState,
    /// Binding generation of the current song
    generation: Generation,
    subscription: Option<SubscriptionId>,
    events_tx: Sender<MediaEvent>,
    events_rx: Receiver<MediaEvent>,
    /// Start requested, no report from the source yet
    loading: bool,
}

impl<M: MediaResource> PlaybackController<M> {
    pub fn new(media: M) -> Self {
        let (events_tx, events_rx) = unbounded();
        let mut controller = Self {
            media,
            state: PlayerState::default(),
            generation: 0,
            subscription: None,
            events_tx,
            events_rx,
            loading: false,
        };
        controller.apply_volume();
        controller
    }

    // ========================================================================
    // Transport operations
    // ========================================================================

    /// Replace the playlist and select `start_index` without starting playback.
    ///
    /// An empty playlist clears the index. An out-of-range index on a
    /// non-empty playlist is kept but selects no song.
    pub fn set_playlist(&mut self, songs: Vec<Song>, start_index: usize) {
        let current = songs.get(start_index).cloned();
        if !songs.is_empty() && current.is_none() {
            tracing::warn!(
                start_index,
                len = songs.len(),
                "Playlist start index out of range"
            );
        }

        self.state.current_index = if songs.is_empty() {
            None
        } else {
            Some(start_index)
        };
        tracing::debug!(len = songs.len(), index = ?self.state.current_index, "Playlist set");
        self.state.playlist = songs;
        self.state.current_song = current;
        self.rebind();
    }

    /// Play `song`, or resume the current song when `None`.
    ///
    /// A song outside the playlist becomes current without moving
    /// `current_index`.
    pub fn play(&mut self, song: Option<&Song>) {
        match song {
            Some(song) => {
                match self.state.playlist.iter().position(|s| s.id == song.id) {
                    Some(index) => self.state.current_index = Some(index),
                    None => tracing::debug!(id = %song.id, "Playing song outside the playlist"),
                }
                tracing::info!(title = %song.title, artist = %song.artist, "Now playing");
                self.state.current_song = Some(song.clone());
                self.state.is_playing = true;
                self.state.current_time = 0.0;
                self.rebind();
            }
            None => {
                if self.state.current_song.is_none() {
                    tracing::debug!("Resume ignored, nothing loaded");
                    return;
                }
                self.state.is_playing = true;
                self.request_start();
            }
        }
    }

    pub fn pause(&mut self) {
        self.media.pause();
        self.state.is_playing = false;
        self.loading = false;
    }

    pub fn toggle_play_pause(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play(None);
        }
    }

    /// Move the position. The resource's later reports correct the value.
    pub fn seek_to(&mut self, seconds: f64) {
        self.media.set_current_time(seconds);
        self.state.current_time = seconds;
    }

    /// Set the volume. Callers supply values in 0.0 - 1.0.
    pub fn set_volume(&mut self, volume: f32) {
        self.state.volume = volume;
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.state.is_muted = !self.state.is_muted;
        self.apply_volume();
    }

    /// Advance to the next playlist slot, wrapping to the start.
    pub fn play_next(&mut self) {
        let Some(index) = self.state.current_index else {
            return;
        };
        let len = self.state.playlist.len();
        if len == 0 {
            return;
        }
        self.select((index + 1) % len);
    }

    /// Go back one playlist slot, wrapping to the end.
    pub fn play_previous(&mut self) {
        let Some(index) = self.state.current_index else {
            return;
        };
        let len = self.state.playlist.len();
        if len == 0 {
            return;
        }
        let previous = if index == 0 { len - 1 } else { index - 1 };
        self.select(previous);
    }

    fn select(&mut self, index: usize) {
        self.state.current_index = Some(index);
        self.state.current_song = self.state.playlist.get(index).cloned();
        self.state.current_time = 0.0;
        if let Some(song) = &self.state.current_song {
            tracing::info!(index, title = %song.title, "Switched track");
        }
        self.rebind();
    }

    // ========================================================================
    // Media events
    // ========================================================================

    /// Apply pending media events in arrival order. Events from superseded
    /// bindings are discarded. Returns how many were applied.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if event.generation != self.generation {
                tracing::trace!(
                    generation = event.generation,
                    live = self.generation,
                    "Dropped stale media event"
                );
                continue;
            }
            self.apply_event(event.kind);
            applied += 1;
        }
        applied
    }

    fn apply_event(&mut self, kind: MediaEventKind) {
        match kind {
            MediaEventKind::Progress {
                current_time,
                duration,
            } => {
                self.state.current_time = current_time;
                self.state.duration = duration;
                self.loading = false;
            }
            MediaEventKind::MetadataReady { duration } => {
                self.state.duration = duration;
                self.loading = false;
            }
            MediaEventKind::Ended => {
                tracing::debug!("Track ended, advancing");
                self.play_next();
            }
        }
    }

    // ========================================================================
    // Resource binding
    // ========================================================================

    /// Point the resource at the current song and replace the subscription.
    fn rebind(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.media.unsubscribe(id);
        }
        self.generation += 1;

        let Some(song) = &self.state.current_song else {
            self.media.set_source(None);
            self.loading = false;
            return;
        };
        let url = song.audio_url.clone();

        let sink = EventSink::new(self.generation, self.events_tx.clone());
        self.subscription = Some(self.media.subscribe(sink));
        self.media.set_source(url.as_deref());
        self.apply_volume();

        if self.state.is_playing {
            self.request_start();
        } else {
            self.loading = false;
        }
    }

    fn apply_volume(&mut self) {
        self.media.set_volume(self.state.effective_volume());
    }

    /// Fire off a start request on the ambient runtime.
    fn request_start(&mut self) {
        self.loading = true;
        let start = self.media.play();
        let title = self
            .state
            .current_song
            .as_ref()
            .map(|s| s.title.clone())
            .unwrap_or_default();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = start.await {
                        tracing::warn!(error = %e, title = %title, "Playback start failed");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(title = %title, "No async runtime, start request dropped");
            }
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> PlayerState {
        self.state.clone()
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.state.current_song.as_ref()
    }

    pub fn status(&self) -> PlaybackStatus {
        match (&self.state.current_song, self.state.is_playing) {
            (None, _) => PlaybackStatus::Stopped,
            (Some(_), true) if self.loading => PlaybackStatus::Loading,
            (Some(_), true) => PlaybackStatus::Playing,
            (Some(_), false) => PlaybackStatus::Paused,
        }
    }

    /// Generation of the live binding.
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl<M: MediaResource> Drop for PlaybackController<M> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.media.unsubscribe(id);
        }
    }
}
