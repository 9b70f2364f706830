//! Library browsing and editing commands.

use std::fmt::Write as _;

use super::{AddArgs, Context, ViewArgs};
use crate::error::{Error, Result};
use crate::library::stats::format_total_duration;
use crate::library::{LibraryStats, SongGroup};
use crate::model::{GroupField, NewSong, Song};
use crate::player::format_duration;
use crate::repository::default_catalog;

/// Length used when none is given, in seconds.
const DEFAULT_DURATION_SECS: u32 = 180;
const DEFAULT_GENRE: &str = "Unknown";

/// List the filtered, sorted and grouped library.
pub fn cmd_list(ctx: &Context, view: &ViewArgs) -> anyhow::Result<()> {
    let mut store = ctx.open_store();
    view.apply(&mut store);

    if store.filtered_songs().is_empty() {
        if store.state().filters.is_active() {
            println!("No songs match the current filters.");
        } else {
            println!("The library is empty. Use `add` or `reset`.");
        }
        return Ok(());
    }

    let show_headers = store.state().group_by.field != GroupField::None;
    print!("{}", render_groups(&store.grouped_view(), show_headers));
    println!();
    println!("{}", render_stats(&store.stats()));
    Ok(())
}

/// Validate the typed fields and add the song.
pub fn cmd_add(ctx: &Context, args: &AddArgs) -> anyhow::Result<()> {
    let new_song = build_new_song(args, current_year())?;
    let mut store = ctx.open_store();
    let song = store.add_song(new_song);
    println!("Added {} ({} - {})", song.id, song.artist, song.title);
    Ok(())
}

/// Remove a song by id.
pub fn cmd_remove(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let mut store = ctx.open_store();
    let Some(song) = store.find(id).cloned() else {
        return Err(Error::not_found(id).into());
    };
    store.delete_song(id);
    println!("Removed {} ({} - {})", song.id, song.artist, song.title);
    Ok(())
}

/// Print statistics of the filtered view.
pub fn cmd_stats(ctx: &Context, view: &ViewArgs) -> anyhow::Result<()> {
    let mut store = ctx.open_store();
    view.apply(&mut store);
    println!("{}", render_stats(&store.stats()));
    Ok(())
}

/// Print the available filter values.
pub fn cmd_facets(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store();
    let facets = store.facets();
    for (label, values) in [
        ("Albums", &facets.albums),
        ("Artists", &facets.artists),
        ("Genres", &facets.genres),
    ] {
        println!("{} ({})", label, values.len());
        for value in values {
            println!("  {}", value);
        }
    }
    Ok(())
}

/// Replace the stored collection with the built-in catalog.
pub fn cmd_reset(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store();
    store.set_songs(default_catalog());
    println!(
        "Library reset to {} songs at {}",
        store.songs().len(),
        ctx.repository.blob_path().display()
    );
    Ok(())
}

// ============================================================================
// Input and output helpers
// ============================================================================

fn current_year() -> i32 {
    chrono::Datelike::year(&chrono::Utc::now())
}

/// Turn typed fields into a [`NewSong`], applying defaults.
///
/// Title, artist and album are required. Minutes are converted to whole
/// seconds; blank optional fields fall back to their defaults.
pub fn build_new_song(args: &AddArgs, current_year: i32) -> Result<NewSong> {
    let required = |name: &str, value: &str| -> Result<String> {
        let value = value.trim();
        if value.is_empty() {
            Err(Error::validation(format!("{} is required", name)))
        } else {
            Ok(value.to_string())
        }
    };
    let optional = |value: &Option<String>| -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let duration = match args.minutes {
        Some(minutes) if minutes.is_finite() && minutes > 0.0 => (minutes * 60.0).round() as u32,
        Some(minutes) if minutes < 0.0 || !minutes.is_finite() => {
            return Err(Error::validation(format!("invalid length: {} minutes", minutes)));
        }
        _ => DEFAULT_DURATION_SECS,
    };

    Ok(NewSong {
        title: required("title", &args.title)?,
        artist: required("artist", &args.artist)?,
        album: required("album", &args.album)?,
        duration,
        genre: optional(&args.genre).unwrap_or_else(|| DEFAULT_GENRE.to_string()),
        year: args.year.unwrap_or(current_year),
        cover_url: optional(&args.cover_url),
        audio_url: optional(&args.audio_url),
    })
}

fn render_song(out: &mut String, song: &Song) {
    let _ = writeln!(
        out,
        "  {:<16} {:<28} {:<20} {:<24} {:>4} {:>7}",
        song.id,
        song.title,
        song.artist,
        song.album,
        song.year,
        format_duration(f64::from(song.duration))
    );
}

/// Render groups as text, with a header line per group when requested.
pub fn render_groups(groups: &[SongGroup], show_headers: bool) -> String {
    let mut out = String::new();
    for group in groups {
        if show_headers {
            let _ = writeln!(out, "{} ({})", group.key, group.songs.len());
        }
        for song in &group.songs {
            render_song(&mut out, song);
        }
    }
    out
}

/// One-line summary of a view.
pub fn render_stats(stats: &LibraryStats) -> String {
    format!(
        "{} songs, {} artists, {} albums, {} total",
        stats.total_songs,
        stats.total_artists,
        stats.total_albums,
        format_total_duration(stats.total_duration)
    )
}
