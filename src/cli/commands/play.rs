//! Simulated playback command.

use std::io::Write as _;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::{Context, ViewArgs};
use crate::error::Error;
use crate::player::{
    MediaResource, PlaybackController, PlayerState, SimulatedMedia, format_duration,
};

/// Delay before simulated output starts.
const START_LATENCY: Duration = Duration::from_millis(150);

/// Options of the `play` command.
#[derive(Debug, Clone)]
pub struct PlayOptions {
    /// Playlist position to start from
    pub index: usize,
    /// Song to start with instead of the playlist slot
    pub id: Option<String>,
    /// Initial seek, in seconds
    pub start_at: Option<f64>,
    /// Wall-clock run time
    pub seconds: f64,
    /// Clock speed, `None` uses the config value
    pub speed: Option<f64>,
}

/// Play the filtered view for `options.seconds` of wall time.
pub fn cmd_play(
    rt: &Runtime,
    ctx: &Context,
    view: &ViewArgs,
    options: &PlayOptions,
) -> anyhow::Result<()> {
    let mut store = ctx.open_store();
    view.apply(&mut store);
    let playlist = store.filtered_songs().to_vec();

    let first = options
        .id
        .as_deref()
        .map(|id| store.find(id).cloned().ok_or_else(|| Error::not_found(id)))
        .transpose()?;
    if playlist.is_empty() && first.is_none() {
        println!("Nothing to play.");
        return Ok(());
    }
    if !playlist.is_empty() && options.index >= playlist.len() {
        return Err(Error::validation(format!(
            "index {} out of range for {} songs",
            options.index,
            playlist.len()
        ))
        .into());
    }
    if !options.seconds.is_finite() || options.seconds < 0.0 {
        return Err(Error::validation(format!("invalid play time: {}", options.seconds)).into());
    }

    let playback = &ctx.config.playback;
    let speed = options.speed.unwrap_or(playback.speed);
    let tick = playback.tick();

    rt.block_on(async {
        let media = SimulatedMedia::for_songs(store.songs())
            .with_start_latency(START_LATENCY);
        let mut controller = PlaybackController::new(media.clone());
        controller.set_volume(ctx.config.audio.volume);
        if ctx.config.audio.muted {
            controller.toggle_mute();
        }

        info!(
            songs = playlist.len(),
            index = options.index,
            speed,
            "Starting playback"
        );
        controller.set_playlist(playlist, options.index);
        controller.play(first.as_ref());
        if let Some(at) = options.start_at {
            controller.seek_to(at);
        }

        let clock = media.start_clock(tick, speed);
        let mut ticker = tokio::time::interval(tick);
        let deadline = tokio::time::sleep(Duration::from_secs_f64(options.seconds));
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(deadline);
        tokio::pin!(ctrl_c);

        let mut shown: Option<String> = None;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut deadline => break,
                _ = &mut ctrl_c => {
                    debug!("Interrupted");
                    break;
                }
            }

            controller.pump_events();
            let current_id = controller.current_song().map(|s| s.id.clone());
            if current_id != shown {
                if shown.is_some() {
                    println!();
                }
                if let Some(song) = controller.current_song() {
                    println!("▶ {} - {} [{}]", song.artist, song.title, song.album);
                }
                shown = current_id;
            }
            print!(
                "\r  {}",
                progress_line(controller.state(), controller.status().as_str())
            );
            let _ = std::io::stdout().flush();
        }

        controller.pause();
        clock.abort();
        println!();
        println!(
            "Stopped at {} of {} (output volume {:.0}%)",
            format_duration(media.current_time()),
            controller.state().duration_str(),
            media.volume() * 100.0
        );
    });

    Ok(())
}

/// `"1:05 / 4:54 [#####.....] playing"` style progress text.
fn progress_line(state: &PlayerState, status: &str) -> String {
    const WIDTH: usize = 20;
    let filled = (state.progress_fraction().clamp(0.0, 1.0) * WIDTH as f64).round() as usize;
    format!(
        "{} / {} [{}{}] {}",
        state.position_str(),
        state.duration_str(),
        "#".repeat(filled),
        ".".repeat(WIDTH - filled),
        status
    )
}
