//! Core data models for the song catalog.
//!
//! Defines the catalog entry [`Song`] and the view parameters applied to the
//! catalog: [`FilterSpec`], [`SortSpec`] and [`GroupSpec`].
//!
//! # Persisted Format
//!
//! Songs are serialized as JSON objects with camelCase keys:
//! - `id`, `title`, `artist`, `album`, `genre` - strings
//! - `duration` - whole seconds
//! - `year` - release year
//! - `coverUrl`, `audioUrl` - optional, omitted when absent

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A catalog entry with playable metadata.
///
/// Songs are never edited in place. A change is a full replacement under
/// the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Opaque unique id, assigned at creation
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Duration in seconds
    pub duration: u32,
    pub genre: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// A song that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: u32,
    pub genre: String,
    pub year: i32,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
}

impl NewSong {
    /// Attach an id, producing a catalog entry.
    pub fn with_id(self, id: impl Into<String>) -> Song {
        Song {
            id: id.into(),
            title: self.title,
            artist: self.artist,
            album: self.album,
            duration: self.duration,
            genre: self.genre,
            year: self.year,
            cover_url: self.cover_url,
            audio_url: self.audio_url,
        }
    }
}

/// Filter over the catalog. An empty string places no constraint on that
/// dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Case-insensitive substring matched against title, artist and album
    pub search: String,
    /// Exact album match
    pub album: String,
    /// Exact artist match
    pub artist: String,
    /// Exact genre match
    pub genre: String,
}

impl FilterSpec {
    /// Whether any dimension constrains the view.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || !self.album.is_empty()
            || !self.artist.is_empty()
            || !self.genre.is_empty()
    }

    /// Merge a partial update. Dimensions left as `None` keep their value.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(album) = update.album {
            self.album = album;
        }
        if let Some(artist) = update.artist {
            self.artist = artist;
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
    }
}

/// A partial [`FilterSpec`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub search: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
}

impl FilterUpdate {
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            search: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn album(value: impl Into<String>) -> Self {
        Self {
            album: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn artist(value: impl Into<String>) -> Self {
        Self {
            artist: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn genre(value: impl Into<String>) -> Self {
        Self {
            genre: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Field the derived view is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Title,
    Artist,
    Album,
    Year,
    Duration,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Ordering of the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// The sort selected by clicking `field`: flips to descending when
    /// `field` is already sorted ascending, otherwise starts ascending.
    pub fn toggled(self, field: SortField) -> Self {
        let direction = if self.field == field && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { field, direction }
    }
}

/// Field the derived view is bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupField {
    #[default]
    None,
    Album,
    Artist,
    Genre,
    Year,
}

/// Grouping of the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupSpec {
    pub field: GroupField,
}

impl GroupSpec {
    pub fn new(field: GroupField) -> Self {
        Self { field }
    }
}

// ============================================================================
// Text names (CLI arguments, log fields)
// ============================================================================

/// Error for an unrecognized field or direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

impl ParseNameError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Artist => "artist",
            SortField::Album => "album",
            SortField::Year => "year",
            SortField::Duration => "duration",
        }
    }
}

impl FromStr for SortField {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "artist" => Ok(SortField::Artist),
            "album" => Ok(SortField::Album),
            "year" => Ok(SortField::Year),
            "duration" => Ok(SortField::Duration),
            _ => Err(ParseNameError::new("sort field", s)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ParseNameError::new("sort direction", s)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GroupField {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupField::None => "none",
            GroupField::Album => "album",
            GroupField::Artist => "artist",
            GroupField::Genre => "genre",
            GroupField::Year => "year",
        }
    }
}

impl FromStr for GroupField {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(GroupField::None),
            "album" => Ok(GroupField::Album),
            "artist" => Ok(GroupField::Artist),
            "genre" => Ok(GroupField::Genre),
            "year" => Ok(GroupField::Year),
            _ => Err(ParseNameError::new("group field", s)),
        }
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
