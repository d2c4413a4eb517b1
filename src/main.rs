mod app;
mod color;
mod config;
mod input;
mod links;
mod lyrics;
mod playback;
mod preview;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "nowsync", version, about = "Now-playing page with synced lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Override the configured log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Poll the backend once and print the snapshot (headless).
    Now,
    /// Fetch lyrics and print the timeline (headless).
    Lyrics {
        track: String,
        artist: String,
        /// Mark the active line and word fills at this position (ms).
        #[arg(long)]
        at: Option<u64>,
        /// Print normalized LRC instead of the timeline.
        #[arg(long, conflicts_with = "at")]
        lrc: bool,
    },
    /// Look up the preview clip URL (headless).
    Preview { track: String, artist: String },
    /// Print the dominant color of an image URL (headless).
    Color { url: String },
    /// Print the config file path.
    ConfigPath,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let level = cli.log_level.unwrap_or_else(|| cfg.log.level());
    let command = cli.command.unwrap_or(Command::Tui);

    if matches!(command, Command::Tui) {
        init_file_logging(&cfg, level)?;
    } else {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }

    let timeout = cfg.source.request_timeout();

    match command {
        Command::Tui => {
            let mut app = app::App::new(cfg)?;
            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Now => {
            let client = playback::NowPlayingClient::new(&cfg.source.now_playing_url, timeout)?;
            match client.fetch().await? {
                playback::NowPlaying::Nothing => println!("nothing playing"),
                playback::NowPlaying::Track(s) => {
                    println!("{} - {}", s.track, s.artist);
                    println!(
                        "{} / {}  ({})",
                        playback::format_time(s.progress_ms),
                        playback::format_time(s.duration_ms),
                        if s.is_playing { "playing" } else { "last played" }
                    );
                    println!("id: {}", s.track_id);
                    if let Some(art) = &s.album_art {
                        println!("art: {art}");
                    }
                    println!("spotify: {}", links::spotify_web_url(&s.track, &s.artist));
                    println!("youtube: {}", links::youtube_url(&s.track, &s.artist));
                }
            }
        }
        Command::Lyrics {
            track,
            artist,
            at,
            lrc,
        } => {
            let client = lyrics::LrclibClient::new(&cfg.lyrics.base_url, timeout)?;
            let lines = lyrics::fetch_lyrics(&client, &track, &artist).await?;
            if lines.is_empty() {
                println!("no synced lyrics");
            } else if lrc {
                print!("{}", lyrics::parser::format_lrc(&lines));
            } else {
                print_timeline(&lyrics::timeline::build(&lines), at);
            }
        }
        Command::Preview { track, artist } => {
            let deezer = preview::DeezerClient::new(&cfg.preview.search_url, timeout)?;
            match deezer.preview_url(&track, &artist).await? {
                Some(url) => println!("{url}"),
                None => println!("no preview"),
            }
        }
        Command::Color { url } => {
            let http = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .context("build http client")?;
            println!("{}", color::fetch_dominant(&http, &url).await?);
        }
        Command::ConfigPath => match cli.config {
            Some(p) => println!("{}", p.display()),
            None => println!("{}", config::default_config_path()?.display()),
        },
    }

    Ok(())
}

/// The TUI owns the terminal, so its logs go to `{data_dir}/nowsync.log`.
fn init_file_logging(cfg: &config::Config, level: Level) -> anyhow::Result<()> {
    let dir = &cfg.paths.data_dir;
    fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    let path = dir.join("nowsync.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn print_timeline(entries: &[lyrics::TimelineEntry], at: Option<u64>) {
    let cursor = at.map(|ms| lyrics::locate(entries, ms));

    for (i, e) in entries.iter().enumerate() {
        let active = cursor.filter(|c| c.active_index == i);
        let marker = if active.is_some() { ">" } else { " " };
        let time = playback::format_time(e.time_ms);

        match active {
            Some(c) if !e.is_waiting() => {
                let words: Vec<String> = lyrics::cursor::word_fills(e, c.line_progress)
                    .iter()
                    .map(|w| format!("{}({:.0}%)", w.word, w.fill * 100.0))
                    .collect();
                println!("{marker} {time} +{:>5}ms  {}", e.duration_ms, words.join(" "));
            }
            Some(c) => {
                let dots: Vec<String> = lyrics::cursor::waiting_dots(c.line_progress)
                    .iter()
                    .map(|f| format!("{:.0}%", f * 100.0))
                    .collect();
                println!("{marker} {time} +{:>5}ms  {} [{}]", e.duration_ms, e.text, dots.join(" "));
            }
            None => println!("{marker} {time} +{:>5}ms  {}", e.duration_ms, e.text),
        }
    }
}
