//! Summary statistics and facet lists over the catalog.

use std::collections::BTreeSet;
use std::collections::HashSet;

use crate::model::Song;

/// Aggregate counts for a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub total_songs: usize,
    pub total_artists: usize,
    pub total_albums: usize,
    /// Sum of song durations in seconds
    pub total_duration: u64,
}

impl LibraryStats {
    pub fn from_songs(songs: &[Song]) -> Self {
        let artists: HashSet<&str> = songs.iter().map(|s| s.artist.as_str()).collect();
        let albums: HashSet<&str> = songs.iter().map(|s| s.album.as_str()).collect();
        Self {
            total_songs: songs.len(),
            total_artists: artists.len(),
            total_albums: albums.len(),
            total_duration: songs.iter().map(|s| u64::from(s.duration)).sum(),
        }
    }
}

/// Format a total running time as `"{h}h {m}m"` or `"{m}m"`.
pub fn format_total_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Distinct values available as filter choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub albums: Vec<String>,
    pub artists: Vec<String>,
    pub genres: Vec<String>,
}

/// Collect the sorted distinct albums, artists and genres of `songs`.
pub fn facets(songs: &[Song]) -> Facets {
    let distinct = |pick: fn(&Song) -> &str| -> Vec<String> {
        songs
            .iter()
            .map(pick)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    };

    Facets {
        albums: distinct(|s| s.album.as_str()),
        artists: distinct(|s| s.artist.as_str()),
        genres: distinct(|s| s.genre.as_str()),
    }
}
