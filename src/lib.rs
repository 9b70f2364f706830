//! tunedeck - a song library browser with a simulated player.
//!
//! The library store keeps the song collection and its filtered, sorted and
//! grouped view; the playback controller drives a media resource through a
//! playlist. The `cli` module is the presentation layer over both.

pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod model;
pub mod player;
pub mod repository;
#[cfg(test)]
pub mod test_utils;
