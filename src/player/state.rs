//! Player state types.

use crate::model::Song;

/// Volume a fresh player starts at.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Current playback status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Loading,
    Playing,
    Paused,
}

impl PlaybackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

/// "Now playing" state owned by the playback controller.
///
/// `current_song` and `playlist` hold copies taken when they were set, so
/// removing a song from the library leaves them untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub current_song: Option<Song>,
    pub is_playing: bool,
    /// Position in seconds
    pub current_time: f64,
    /// Length of the current source in seconds (0 until known)
    pub duration: f64,
    /// Volume level (0.0 - 1.0)
    pub volume: f32,
    pub is_muted: bool,
    pub playlist: Vec<Song>,
    /// Slot in `playlist`; `None` when no playlist is set
    pub current_index: Option<usize>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_song: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
            is_muted: false,
            playlist: Vec::new(),
            current_index: None,
        }
    }
}

impl PlayerState {
    /// Get position as a fraction (0.0 - 1.0).
    pub fn progress_fraction(&self) -> f64 {
        if self.duration <= 0.0 {
            0.0
        } else {
            self.current_time / self.duration
        }
    }

    /// Volume actually applied to the output.
    pub fn effective_volume(&self) -> f32 {
        if self.is_muted { 0.0 } else { self.volume }
    }

    /// Format position as M:SS.
    pub fn position_str(&self) -> String {
        format_duration(self.current_time)
    }

    /// Format duration as M:SS.
    pub fn duration_str(&self) -> String {
        format_duration(self.duration)
    }
}

/// Format seconds as M:SS or H:MM:SS. Fractions are truncated.
pub fn format_duration(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
