//! mpd-cli
//!
//! Command-line interface for controlling an MPD daemon.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use mpdlink::{ClientConfig, MpdClient, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// mpd-cli
#[derive(Parser, Debug)]
#[command(name = "mpd-cli")]
#[command(about = "Control a Music Player Daemon")]
#[command(version)]
struct Args {
    /// Daemon host (defaults to $MPD_HOST or 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Daemon port (defaults to $MPD_PORT or 6600)
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl From<Switch> for bool {
    fn from(switch: Switch) -> bool {
        matches!(switch, Switch::On)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show player status
    Status,

    /// List the playback queue
    Queue,

    /// List every song in the library
    Library,

    /// Start playback
    Play {
        /// Queue position to play
        position: Option<u32>,
    },

    /// Toggle pause
    Pause,

    /// Stop playback
    Stop,

    /// Next song
    Next,

    /// Previous song
    Prev,

    /// Set the volume (0-100)
    Volume { level: i32 },

    /// Seek within the current song
    Seek { seconds: f64 },

    /// Toggle random mode
    Random { state: Switch },

    /// Toggle repeat mode
    Repeat { state: Switch },

    /// Append a song to the queue
    Add { uri: String },

    /// Remove a queue position or range
    Delete { start: u32, end: Option<u32> },

    /// Empty the queue
    Clear,

    /// Save the cover of a song to a file
    Albumart { uri: String, output: PathBuf },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mpdlink=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let client = MpdClient::new(config);
    client.connect()?;
    if let Some(version) = client.server_version() {
        tracing::info!("Connected to MPD {}", version);
    }

    let result = execute(&client, args.command);
    client.disconnect();
    result
}

fn execute(client: &MpdClient, command: Commands) -> Result<()> {
    match command {
        Commands::Status => {
            let status = client.get_status()?;
            println!("state:    {:?}", status.state);
            println!("volume:   {}", status.volume);
            println!(
                "repeat: {}  random: {}  single: {}  consume: {}",
                status.repeat, status.random, status.single, status.consume
            );
            println!("queue:    {} songs", status.playlist_length);
            if let Some(song) = status.song {
                println!(
                    "song:     #{} ({:.0}s / {:.0}s)",
                    song, status.elapsed, status.duration
                );
            }
        }
        Commands::Queue => {
            for item in client.get_queue()? {
                println!(
                    "{:>4}  {} - {} ({})",
                    item.pos, item.song.artist, item.song.title, item.song.uri
                );
            }
        }
        Commands::Library => {
            for song in client.fetch_library()? {
                println!("{} - {} - {}  [{}]", song.artist, song.album, song.title, song.uri);
            }
        }
        Commands::Play { position } => client.play(position)?,
        Commands::Pause => client.pause()?,
        Commands::Stop => client.stop()?,
        Commands::Next => client.next()?,
        Commands::Prev => client.previous()?,
        Commands::Volume { level } => client.set_volume(level)?,
        Commands::Seek { seconds } => client.seek(seconds)?,
        Commands::Random { state } => client.random(state.into())?,
        Commands::Repeat { state } => client.repeat(state.into())?,
        Commands::Add { uri } => client.add_to_queue(&uri, None)?,
        Commands::Delete { start, end } => client.remove_from_queue(start, end)?,
        Commands::Clear => client.clear()?,
        Commands::Albumart { uri, output } => {
            let image = client.fetch_album_art(&uri)?;
            std::fs::write(&output, &image)?;
            println!("wrote {} bytes to {}", image.len(), output.display());
        }
    }

    Ok(())
}
