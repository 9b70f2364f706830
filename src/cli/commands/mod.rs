//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `library`: Listing, editing and summarising the collection
//! - `play`: Simulated playback through the playback controller

mod library;
mod play;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::{Builder, Runtime};

use crate::config::{self, Config};
use crate::error::Error;
use crate::library::LibraryStore;
use crate::model::{FilterUpdate, GroupField, GroupSpec, SortDirection, SortField, SortSpec};
use crate::repository::{FileRepository, SongRepository};

pub use library::{cmd_add, cmd_facets, cmd_list, cmd_remove, cmd_reset, cmd_stats};
pub use play::{PlayOptions, cmd_play};

/// tunedeck CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: OS config directory)
    #[arg(long, global = true, env = "TUNEDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Library data directory, overrides the config file
    #[arg(long, global = true, env = "TUNEDECK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List songs (default when no command is given)
    List {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Add a song to the library
    Add(AddArgs),
    /// Remove a song by id
    Remove {
        /// Song id
        id: String,
    },
    /// Show statistics for the (filtered) library
    Stats {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// List the albums, artists and genres available as filters
    Facets,
    /// Play the filtered view on a simulated output
    Play {
        #[command(flatten)]
        view: ViewArgs,
        /// Playlist position to start from
        #[arg(short, long, default_value = "0")]
        index: usize,
        /// Start with this song instead, even if the filters exclude it
        #[arg(long)]
        id: Option<String>,
        /// Seek to this many seconds into the first song
        #[arg(long)]
        start_at: Option<f64>,
        /// Stop after this many wall-clock seconds
        #[arg(short, long, default_value = "10")]
        seconds: f64,
        /// Playback speed multiplier (overrides config)
        #[arg(long)]
        speed: Option<f64>,
    },
    /// Replace the library with the built-in catalog
    Reset,
    /// Show the active configuration
    Config {
        /// Write the active configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

/// Filter, sort and group flags shared by the viewing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Case-insensitive text matched against title, artist and album
    #[arg(short = 'q', long)]
    pub search: Option<String>,
    /// Exact album
    #[arg(long)]
    pub album: Option<String>,
    /// Exact artist
    #[arg(long)]
    pub artist: Option<String>,
    /// Exact genre
    #[arg(long)]
    pub genre: Option<String>,
    /// Sort field: title, artist, album, year, duration
    #[arg(long, default_value = "title")]
    pub sort: SortField,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Group by: none, album, artist, genre, year
    #[arg(long, default_value = "none")]
    pub group: GroupField,
}

impl ViewArgs {
    /// Apply the flags to a store.
    pub fn apply<R: SongRepository>(&self, store: &mut LibraryStore<R>) {
        store.update_filters(FilterUpdate {
            search: self.search.clone(),
            album: self.album.clone(),
            artist: self.artist.clone(),
            genre: self.genre.clone(),
        });
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        store.update_sort(SortSpec::new(self.sort, direction));
        store.update_group_by(GroupSpec::new(self.group));
    }
}

/// Fields of a new song as typed by the user.
#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub artist: String,
    #[arg(long)]
    pub album: String,
    /// Length in minutes (default 3)
    #[arg(long)]
    pub minutes: Option<f64>,
    /// Genre (default "Unknown")
    #[arg(long)]
    pub genre: Option<String>,
    /// Release year (default current year)
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub cover_url: Option<String>,
    #[arg(long)]
    pub audio_url: Option<String>,
}

/// Resolved settings shared by all commands.
pub struct Context {
    pub config: Config,
    pub repository: FileRepository,
}

impl Context {
    fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        };
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| config.library.resolved_data_dir())
            .ok_or_else(|| Error::config("could not determine a data directory, pass --data-dir"))?;
        tracing::debug!(data_dir = %data_dir.display(), "Using library store");

        Ok(Self {
            config,
            repository: FileRepository::new(data_dir),
        })
    }

    /// Open the library store, loading the collection.
    pub fn open_store(&self) -> LibraryStore<FileRepository> {
        LibraryStore::open(self.repository.clone())
    }
}

/// Run the specified CLI command. No command lists the library.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let ctx = Context::from_cli(cli)?;

    match &cli.command {
        None => cmd_list(&ctx, &ViewArgs::default()),
        Some(Commands::List { view }) => cmd_list(&ctx, view),
        Some(Commands::Add(args)) => cmd_add(&ctx, args),
        Some(Commands::Remove { id }) => cmd_remove(&ctx, id),
        Some(Commands::Stats { view }) => cmd_stats(&ctx, view),
        Some(Commands::Facets) => cmd_facets(&ctx),
        Some(Commands::Play {
            view,
            index,
            id,
            start_at,
            seconds,
            speed,
        }) => {
            let rt = runtime()?;
            let options = PlayOptions {
                index: *index,
                id: id.clone(),
                start_at: *start_at,
                seconds: *seconds,
                speed: *speed,
            };
            cmd_play(&rt, &ctx, view, &options)
        }
        Some(Commands::Reset) => cmd_reset(&ctx),
        Some(Commands::Config { init }) => cmd_config(cli, &ctx, *init),
    }
}

fn runtime() -> anyhow::Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// Print the active configuration, optionally writing it out.
fn cmd_config(cli: &Cli, ctx: &Context, init: bool) -> anyhow::Result<()> {
    if init {
        let path = match &cli.config {
            Some(path) => {
                config::save_to(&ctx.config, path)?;
                path.clone()
            }
            None => config::save(&ctx.config)?,
        };
        println!("Wrote {}", path.display());
    }

    let path = cli.config.clone().or_else(config::config_path);
    if let Some(path) = path {
        println!("# {}", path.display());
    }
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    println!("# library store: {}", ctx.repository.blob_path().display());
    Ok(())
}
