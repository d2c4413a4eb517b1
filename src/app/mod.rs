pub mod actions;
pub mod events;
pub mod state;
pub mod timers;

use crate::config::Config;
use crate::input;
use crate::links;
use crate::lyrics::{self, LrclibClient, LyricsCache};
use crate::playback::{NowPlayingClient, PlaybackSnapshot};
use crate::preview::{DeezerClient, MpvHandle, PreviewState};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use anyhow::Context;
use events::{Event, NetworkEvent, PreviewEvent};
use state::{AppState, Toast};
use timers::TimerHandle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct App {
    cfg: Config,
    state: AppState,
    now_playing: NowPlayingClient,
    lrclib: LrclibClient,
    deezer: DeezerClient,
    http: reqwest::Client,
    mpv: Option<MpvHandle>,
    lyrics_cache: LyricsCache,
    /// Lookups for the current track; aborted when the track changes.
    track_tasks: Vec<JoinHandle<()>>,
}

impl App {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let timeout = cfg.source.request_timeout();
        let now_playing = NowPlayingClient::new(&cfg.source.now_playing_url, timeout)?;
        let lrclib = LrclibClient::new(&cfg.lyrics.base_url, timeout)?;
        let deezer = DeezerClient::new(&cfg.preview.search_url, timeout)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;

        let mut state = AppState::new(cfg.sync.tuning());
        state.preview_volume = cfg.preview.volume.min(100);

        Ok(Self {
            lyrics_cache: LyricsCache::new(cfg.lyrics.cache_capacity),
            cfg,
            state,
            now_playing,
            lrclib,
            deezer,
            http,
            mpv: None,
            track_tasks: Vec::new(),
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone());

        if self.cfg.preview.enabled {
            // Previews are optional; the page works without mpv.
            let mpv_log = self.cfg.paths.data_dir.join("mpv.log");
            match MpvHandle::spawn(
                tx.clone(),
                self.cfg.preview.audio_device.as_deref(),
                Some(&mpv_log),
            )
            .await
            {
                Ok(h) => self.mpv = Some(h),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "preview player unavailable");
                    self.state.toast = Some(Toast::error(format!("previews disabled: {e:#}")));
                }
            }
        }

        let client = self.now_playing.clone();
        let poller = timers::spawn_poller(
            move || {
                let client = client.clone();
                async move { client.fetch().await }
            },
            self.cfg.source.poll_interval(),
            tx.clone(),
        );
        let ticker = timers::spawn_ticker(self.cfg.sync.tick_interval(), tx.clone());

        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = input::map_input_to_action(&self.state, input_ev) {
                        self.handle_action(action, &poller, &tx).await;
                    }
                }
                Event::Tick(now) => self.state.tick(now),
                Event::Network(ne) => self.handle_network(ne, &tx).await,
                Event::Preview(pe) => self.handle_preview(pe, &poller),
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        poller.stop();
        ticker.stop();
        self.abort_track_tasks();
        self.stop_preview().await;

        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Action,
        poller: &TimerHandle,
        tx: &mpsc::Sender<Event>,
    ) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::TogglePreview => self.toggle_preview(poller).await,
            Action::PreviewVolumeUp | Action::PreviewVolumeDown => {
                let v = if action == Action::PreviewVolumeUp {
                    self.state.preview_volume.saturating_add(5).min(100)
                } else {
                    self.state.preview_volume.saturating_sub(5)
                };
                self.state.preview_volume = v;
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.set_volume(v).await;
                }
            }
            Action::Refresh => poller.fire_now(),
            Action::OpenSpotify | Action::OpenYoutube => self.open_link(action, tx),
            Action::ToggleHelp => self.state.show_help = !self.state.show_help,
            Action::Resize => {}
        }
    }

    async fn toggle_preview(&mut self, poller: &TimerHandle) {
        let Some(mpv) = &self.mpv else {
            self.state.toast = Some(Toast::error("previews disabled (mpv not running)"));
            return;
        };

        match self.state.preview.clone() {
            PreviewState::Unavailable => {
                self.state.toast = Some(Toast::info("No preview for this track"));
            }
            PreviewState::Ready { url } => {
                let _ = mpv.set_volume(self.state.preview_volume).await;
                match mpv.load_url(&url).await {
                    Ok(()) => {
                        info!(%url, "preview starting");
                        self.state.preview = PreviewState::Starting { url };
                    }
                    Err(e) => {
                        self.state.toast = Some(Toast::error(format!("preview: {e:#}")));
                    }
                }
            }
            PreviewState::Starting { .. } | PreviewState::Playing { .. } => {
                self.stop_preview().await;
                if self.state.preview_stopped() {
                    poller.fire_now();
                }
            }
        }
    }

    fn handle_preview(&mut self, pe: PreviewEvent, poller: &TimerHandle) {
        match pe {
            PreviewEvent::Started => {
                if self.state.preview_started() {
                    info!("preview playing, clock frozen");
                }
            }
            PreviewEvent::Ended => {
                if self.state.preview_stopped() {
                    info!("preview ended, resyncing");
                    poller.fire_now();
                }
            }
            PreviewEvent::Failed(e) => {
                warn!(error = %e, "preview failed");
                if self.state.preview.is_active() {
                    self.state.toast = Some(Toast::error(e));
                }
                if self.state.preview_stopped() {
                    poller.fire_now();
                }
            }
            PreviewEvent::Exited => {
                warn!("mpv exited, previews disabled");
                self.mpv = None;
                if self.state.preview_player_lost() {
                    poller.fire_now();
                }
                self.state.toast = Some(Toast::error("preview player exited"));
            }
        }
    }

    async fn handle_network(&mut self, ne: NetworkEvent, tx: &mpsc::Sender<Event>) {
        match ne {
            NetworkEvent::Snapshot(now_playing) => {
                let had_preview = self.state.preview.is_active();
                let effect = self.state.apply_snapshot(now_playing);
                if effect.track_ended {
                    self.abort_track_tasks();
                    if had_preview {
                        self.stop_preview().await;
                    }
                }
                if let Some(track) = effect.new_track {
                    self.start_track_lookups(track, tx);
                }
            }
            NetworkEvent::SnapshotFailed(e) => {
                // Keep showing the last known state.
                self.state.loading = false;
                self.state.toast = Some(Toast::error(e));
            }
            NetworkEvent::LyricsLoaded { track_id, lines } => {
                self.state.apply_lyrics(&track_id, &lines);
                self.lyrics_cache.insert(&track_id, lines);
            }
            NetworkEvent::LyricsFailed { track_id, error } => {
                if self.state.apply_lyrics_failed(&track_id) {
                    self.state.toast = Some(Toast::error(format!("lyrics: {error}")));
                }
            }
            NetworkEvent::PreviewFound { track_id, url } => {
                self.state.apply_preview_url(&track_id, Some(url));
            }
            NetworkEvent::PreviewNotFound { track_id } => {
                self.state.apply_preview_url(&track_id, None);
            }
            NetworkEvent::AlbumColor { track_id, color } => {
                if self.state.apply_color(&track_id, color) {
                    debug!(%color, "album color");
                }
            }
            NetworkEvent::LinkFailed(e) => {
                self.state.toast = Some(Toast::error(format!("open link: {e}")));
            }
        }
    }

    /// Kick off lyrics, preview and color lookups for a new track.
    fn start_track_lookups(&mut self, track: PlaybackSnapshot, tx: &mpsc::Sender<Event>) {
        if let Some(lines) = self.lyrics_cache.get(&track.track_id) {
            debug!(track_id = %track.track_id, "lyrics cache hit");
            self.state.apply_lyrics(&track.track_id, &lines);
        } else {
            self.spawn_lyrics_fetch(&track, tx.clone());
        }

        if self.mpv.is_some() {
            self.spawn_preview_lookup(&track, tx.clone());
        }

        if let Some(url) = track.album_art.clone() {
            self.spawn_color_fetch(track.track_id.clone(), url, tx.clone());
        }
    }

    fn spawn_lyrics_fetch(&mut self, track: &PlaybackSnapshot, tx: mpsc::Sender<Event>) {
        let lrclib = self.lrclib.clone();
        let title = track.track.clone();
        let artist = track.artist.clone();
        let track_id = track.track_id.clone();

        self.track_tasks.push(tokio::spawn(async move {
            let event = match lyrics::fetch_lyrics(&lrclib, &title, &artist).await {
                Ok(lines) => {
                    info!(%title, %artist, lines = lines.len(), "lyrics loaded");
                    NetworkEvent::LyricsLoaded { track_id, lines }
                }
                Err(e) => {
                    warn!(%title, %artist, error = %format!("{e:#}"), "lyrics fetch failed");
                    NetworkEvent::LyricsFailed {
                        track_id,
                        error: format!("{e:#}"),
                    }
                }
            };
            let _ = tx.send(Event::Network(event)).await;
        }));
    }

    fn spawn_preview_lookup(&mut self, track: &PlaybackSnapshot, tx: mpsc::Sender<Event>) {
        let deezer = self.deezer.clone();
        let title = track.track.clone();
        let artist = track.artist.clone();
        let track_id = track.track_id.clone();

        self.track_tasks.push(tokio::spawn(async move {
            let event = match deezer.preview_url(&title, &artist).await {
                Ok(Some(url)) => NetworkEvent::PreviewFound { track_id, url },
                Ok(None) => NetworkEvent::PreviewNotFound { track_id },
                Err(e) => {
                    warn!(%title, error = %format!("{e:#}"), "preview lookup failed");
                    NetworkEvent::PreviewNotFound { track_id }
                }
            };
            let _ = tx.send(Event::Network(event)).await;
        }));
    }

    fn spawn_color_fetch(&mut self, track_id: String, url: String, tx: mpsc::Sender<Event>) {
        let http = self.http.clone();

        self.track_tasks.push(tokio::spawn(async move {
            match crate::color::fetch_dominant(&http, &url).await {
                Ok(color) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::AlbumColor { track_id, color }))
                        .await;
                }
                Err(e) => warn!(%url, error = %format!("{e:#}"), "album color failed"),
            }
        }));
    }

    /// Open a search for the current track in the desktop browser or app.
    fn open_link(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        let Some((title, artist)) = self
            .state
            .track()
            .map(|t| (t.track.clone(), t.artist.clone()))
        else {
            self.state.toast = Some(Toast::info("Nothing playing"));
            return;
        };
        let tx = tx.clone();

        tokio::spawn(async move {
            let opened = if action == Action::OpenSpotify {
                links::open_spotify(&title, &artist).await
            } else {
                links::open_youtube(&title, &artist).await
            };
            if let Err(e) = opened {
                warn!(%title, error = %format!("{e:#}"), "open link failed");
                let _ = tx
                    .send(Event::Network(NetworkEvent::LinkFailed(format!("{e:#}"))))
                    .await;
            }
        });
    }

    fn abort_track_tasks(&mut self) {
        for task in self.track_tasks.drain(..) {
            task.abort();
        }
    }

    async fn stop_preview(&self) {
        if let Some(mpv) = &self.mpv
            && let Err(e) = mpv.stop().await
        {
            warn!(error = %format!("{e:#}"), "stop preview");
        }
    }
}
