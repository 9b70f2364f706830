//! Built-in catalog used when no library has been stored.

use crate::model::Song;

const COVER_BASE: &str = "https://images.unsplash.com";
const AUDIO_BASE: &str = "https://www.soundhelix.com/examples/mp3";

struct Entry {
    id: &'static str,
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    duration: u32,
    genre: &'static str,
    year: i32,
    cover: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "1",
        title: "Bohemian Rhapsody",
        artist: "Queen",
        album: "A Night at the Opera",
        duration: 355,
        genre: "Rock",
        year: 1975,
        cover: "photo-1493225457124-a3eb161ffa5f",
    },
    Entry {
        id: "2",
        title: "Stairway to Heaven",
        artist: "Led Zeppelin",
        album: "Led Zeppelin IV",
        duration: 482,
        genre: "Rock",
        year: 1971,
        cover: "photo-1478737270239-2f02b77fc618",
    },
    Entry {
        id: "3",
        title: "Hotel California",
        artist: "Eagles",
        album: "Hotel California",
        duration: 391,
        genre: "Rock",
        year: 1976,
        cover: "photo-1506905925346-21bda4d32df4",
    },
    Entry {
        id: "4",
        title: "Imagine",
        artist: "John Lennon",
        album: "Imagine",
        duration: 183,
        genre: "Pop",
        year: 1971,
        cover: "photo-1514320291840-2e0a9bf2a9ae",
    },
    Entry {
        id: "5",
        title: "Billie Jean",
        artist: "Michael Jackson",
        album: "Thriller",
        duration: 294,
        genre: "Pop",
        year: 1982,
        cover: "photo-1548502632-6b93092aad0b",
    },
    Entry {
        id: "6",
        title: "Smells Like Teen Spirit",
        artist: "Nirvana",
        album: "Nevermind",
        duration: 301,
        genre: "Grunge",
        year: 1991,
        cover: "photo-1571019613454-1cb2f99b2d8b",
    },
    Entry {
        id: "7",
        title: "Sweet Child O' Mine",
        artist: "Guns N' Roses",
        album: "Appetite for Destruction",
        duration: 356,
        genre: "Rock",
        year: 1987,
        cover: "photo-1488590528505-98d2b5aba04b",
    },
    Entry {
        id: "8",
        title: "Like a Rolling Stone",
        artist: "Bob Dylan",
        album: "Highway 61 Revisited",
        duration: 369,
        genre: "Folk Rock",
        year: 1965,
        cover: "photo-1493225457124-a3eb161ffa5f",
    },
    Entry {
        id: "9",
        title: "Purple Haze",
        artist: "Jimi Hendrix",
        album: "Are You Experienced",
        duration: 167,
        genre: "Psychedelic Rock",
        year: 1967,
        cover: "photo-1511735111819-9a3f7709049c",
    },
    Entry {
        id: "10",
        title: "Good Vibrations",
        artist: "The Beach Boys",
        album: "Smiley Smile",
        duration: 219,
        genre: "Pop Rock",
        year: 1966,
        cover: "photo-1493225457124-a3eb161ffa5f",
    },
    Entry {
        id: "11",
        title: "Yesterday",
        artist: "The Beatles",
        album: "Help!",
        duration: 125,
        genre: "Pop",
        year: 1965,
        cover: "photo-1506905925346-21bda4d32df4",
    },
    Entry {
        id: "12",
        title: "What's Going On",
        artist: "Marvin Gaye",
        album: "What's Going On",
        duration: 233,
        genre: "Soul",
        year: 1971,
        cover: "photo-1514320291840-2e0a9bf2a9ae",
    },
];

/// The default catalog: twelve well-known songs with full metadata.
///
/// Each entry streams one of the SoundHelix sample tracks, numbered after
/// the song id.
pub fn default_catalog() -> Vec<Song> {
    ENTRIES
        .iter()
        .map(|e| Song {
            id: e.id.to_string(),
            title: e.title.to_string(),
            artist: e.artist.to_string(),
            album: e.album.to_string(),
            duration: e.duration,
            genre: e.genre.to_string(),
            year: e.year,
            cover_url: Some(format!("{}/{}?w=300&h=300&fit=crop", COVER_BASE, e.cover)),
            audio_url: Some(format!("{}/SoundHelix-Song-{}.mp3", AUDIO_BASE, e.id)),
        })
        .collect()
}
