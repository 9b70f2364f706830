//! Test utilities and fixtures for tunedeck tests.
//!
//! Song factories, [`MemoryRepository`] for store tests, and
//! [`RecordingMedia`], a media resource that records every call and lets a
//! test emit events through the live subscription or through one that has
//! already been replaced.
//!
//! # Example
//!
//! ```ignore
//! use tunedeck::test_utils::{RecordingMedia, mock_playlist};
//!
//! let media = RecordingMedia::new();
//! let mut controller = PlaybackController::new(media.clone());
//! controller.set_playlist(mock_playlist(3), 0);
//! media.emit(MediaEventKind::Ended);
//! controller.pump_events();
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::model::{NewSong, Song};
use crate::player::{EventSink, MediaError, MediaEventKind, MediaResource, SubscriptionId};
use crate::repository::{SongRepository, decode, default_catalog, encode};

/// Creates a mock Song with sensible defaults.
///
/// The audio url is `mock://<id>`. Customize using struct update syntax:
///
/// ```ignore
/// let song = Song {
///     year: 1971,
///     ..mock_song("a", "Imagine")
/// };
/// ```
pub fn mock_song(id: &str, title: &str) -> Song {
    Song {
        id: id.to_string(),
        title: title.to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        duration: 180,
        genre: "Test".to_string(),
        year: 2000,
        cover_url: None,
        audio_url: Some(format!("mock://{}", id)),
    }
}

/// Creates a NewSong the way the add form fills in defaults.
pub fn mock_new_song(title: &str, artist: &str, album: &str) -> NewSong {
    NewSong {
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        duration: 180,
        genre: "Unknown".to_string(),
        year: chrono::Datelike::year(&chrono::Utc::now()),
        cover_url: None,
        audio_url: None,
    }
}

/// Creates `n` songs with ids `"1"..="n"`.
pub fn mock_playlist(n: usize) -> Vec<Song> {
    (1..=n)
        .map(|i| mock_song(&i.to_string(), &format!("Track {}", i)))
        .collect()
}

// ============================================================================
// In-memory repository
// ============================================================================

/// Repository holding the blob in memory, counting writes.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    blob: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw blob, as if previously stored.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
            saves: Mutex::new(0),
        }
    }

    /// The raw stored blob.
    pub fn blob(&self) -> Option<String> {
        self.blob.lock().clone()
    }

    /// Number of saves performed.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl SongRepository for MemoryRepository {
    fn load(&self) -> Vec<Song> {
        match self.blob.lock().as_deref().map(decode) {
            Some(Ok(songs)) => songs,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Stored library unreadable, using default catalog");
                default_catalog()
            }
            None => default_catalog(),
        }
    }

    fn save(&self, songs: &[Song]) {
        match encode(songs) {
            Ok(blob) => {
                *self.blob.lock() = Some(blob);
                *self.saves.lock() += 1;
            }
            Err(e) => tracing::error!(error = %e, "Failed to save library"),
        }
    }
}

// ============================================================================
// Recording media resource
// ============================================================================

/// A call made on [`RecordingMedia`].
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    SetSource(Option<String>),
    Play,
    Pause,
    SetCurrentTime(f64),
    SetVolume(f32),
    Subscribe(SubscriptionId),
    Unsubscribe(SubscriptionId),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<MediaCall>,
    live: Vec<(SubscriptionId, EventSink)>,
    retired: Vec<EventSink>,
    next_id: u64,
    current_time: f64,
    volume: f32,
    fail_play: bool,
}

/// Scriptable media resource. Clones share the same recorder.
#[derive(Clone, Default)]
pub struct RecordingMedia {
    inner: Arc<Mutex<Recorder>>,
}

impl RecordingMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resource whose start requests are all rejected.
    pub fn failing() -> Self {
        let media = Self::new();
        media.inner.lock().fail_play = true;
        media
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.inner.lock().calls.clone()
    }

    /// The most recent source set, if any was set.
    pub fn last_source(&self) -> Option<Option<String>> {
        self.inner
            .lock()
            .calls
            .iter()
            .rev()
            .find_map(|call| match call {
                MediaCall::SetSource(source) => Some(source.clone()),
                _ => None,
            })
    }

    pub fn play_count(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| **c == MediaCall::Play)
            .count()
    }

    pub fn volume(&self) -> f32 {
        self.inner.lock().volume
    }

    pub fn active_subscriptions(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Emit through every live subscription.
    pub fn emit(&self, kind: MediaEventKind) {
        for (_, sink) in &self.inner.lock().live {
            sink.emit(kind);
        }
    }

    /// Emit through the most recently replaced subscription, as a late event
    /// from a previous source would arrive.
    pub fn emit_stale(&self, kind: MediaEventKind) {
        if let Some(sink) = self.inner.lock().retired.last() {
            sink.emit(kind);
        }
    }
}

impl MediaResource for RecordingMedia {
    fn set_source(&mut self, url: Option<&str>) {
        let mut recorder = self.inner.lock();
        recorder.current_time = 0.0;
        recorder
            .calls
            .push(MediaCall::SetSource(url.map(str::to_string)));
    }

    fn play(&mut self) -> BoxFuture<'static, Result<(), MediaError>> {
        let mut recorder = self.inner.lock();
        recorder.calls.push(MediaCall::Play);
        let result = if recorder.fail_play {
            Err(MediaError::Rejected("scripted failure".to_string()))
        } else {
            Ok(())
        };
        futures::future::ready(result).boxed()
    }

    fn pause(&mut self) {
        self.inner.lock().calls.push(MediaCall::Pause);
    }

    fn current_time(&self) -> f64 {
        self.inner.lock().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut recorder = self.inner.lock();
        recorder.current_time = seconds;
        recorder.calls.push(MediaCall::SetCurrentTime(seconds));
    }

    fn volume(&self) -> f32 {
        self.inner.lock().volume
    }

    fn set_volume(&mut self, volume: f32) {
        let mut recorder = self.inner.lock();
        recorder.volume = volume;
        recorder.calls.push(MediaCall::SetVolume(volume));
    }

    fn subscribe(&mut self, sink: EventSink) -> SubscriptionId {
        let mut recorder = self.inner.lock();
        recorder.next_id += 1;
        let id = SubscriptionId(recorder.next_id);
        recorder.live.push((id, sink));
        recorder.calls.push(MediaCall::Subscribe(id));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        let mut recorder = self.inner.lock();
        if let Some(pos) = recorder.live.iter().position(|(sub, _)| *sub == id) {
            let (_, sink) = recorder.live.remove(pos);
            recorder.retired.push(sink);
        }
        recorder.calls.push(MediaCall::Unsubscribe(id));
    }
}
