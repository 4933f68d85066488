use std::sync::Arc;
use std::time::Duration;

use flume::{Receiver, Sender};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    audio::{
        engine::PlayerEngine,
        playback::RodioBackend,
        playlist::{Playlist, verse_element_id},
        preview::PreviewChannel,
        traits::MediaEvent,
    },
    config::ApiConfig,
    event::events::Event,
    http::ApiService,
    model::{LastRead, SurahDetail},
    store::SettingsStore,
    util::format_time,
};

/// Line-oriented front end: resolves content through the gateway, persists
/// reading state, and drives the playback engine from stdin commands.
pub struct App {
    event_rx: Receiver<Event>,
    event_tx: Sender<Event>,
    media_rx: Receiver<MediaEvent>,
    api: Arc<ApiService>,
    store: SettingsStore,
    engine: PlayerEngine,
    preview: PreviewChannel,
    should_quit: bool,
}

impl App {
    pub fn new() -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let (media_tx, media_rx) = flume::unbounded();

        let api = Arc::new(ApiService::new(ApiConfig::from_env()));
        let store = SettingsStore::open_default();
        let backend = RodioBackend::new(media_tx)?;
        let engine = PlayerEngine::new(Box::new(backend), event_tx.clone());
        let preview = PreviewChannel::new()?;

        Ok(Self {
            event_rx,
            event_tx,
            media_rx,
            api,
            store,
            engine,
            preview,
            should_quit: false,
        })
    }

    pub fn event_tx(&self) -> Sender<Event> {
        self.event_tx.clone()
    }

    pub async fn run(&mut self, surah_no: Option<u16>) -> color_eyre::Result<()> {
        match surah_no {
            None => self.print_catalog().await,
            Some(surah_no) => self.read_surah(surah_no).await,
        }
    }

    async fn print_catalog(&mut self) -> color_eyre::Result<()> {
        let list = self.api.surah_list().await?;

        if let Some(last) = self.store.last_read() {
            println!("Continue reading: {} (chapter {})\n", last.surah_name, last.surah_no);
        }
        for (index, surah) in list.iter().enumerate() {
            println!(
                "{:>3}  {:<24} {:<28} {:>3} verses",
                index + 1,
                surah.surah_name,
                surah.surah_name_translation,
                surah.total_ayah
            );
        }

        Ok(())
    }

    async fn read_surah(&mut self, surah_no: u16) -> color_eyre::Result<()> {
        let surah = self.api.surah_detail(surah_no).await?;
        self.store.set_last_read(&LastRead {
            surah_no: surah.surah_no,
            surah_name: surah.surah_name.clone(),
        });
        self.print_surah(&surah);

        let playlist = Playlist::full_surah(&surah, self.api.config());
        let verse_count = playlist.len();
        self.engine.set_track_observer(Box::new({
            let chapter = surah.surah_no;
            move |index| {
                let ayah_no = index as u16 + 1;
                println!(
                    "▶ now reciting {} ({}/{verse_count})",
                    verse_element_id(chapter, ayah_no),
                    index + 1
                );
            }
        }));
        self.engine.load_playlist(playlist, 0);

        println!(
            "\ncommands: p=play/pause  n=next  b=back  s <secs>=seek  i=status  \
             m <verse>=bookmark  t <verse>=tafsir  v <verse>=preview  q=quit"
        );

        let event_rx = self.event_rx.clone();
        let media_rx = self.media_rx.clone();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while !self.should_quit {
            tokio::select! {
                Ok(event) = event_rx.recv_async() => self.handle_event(event),
                Ok(event) = media_rx.recv_async() => self.engine.handle_media_event(event),
                line = lines.next_line() => match line? {
                    Some(line) => self.handle_command(&surah, line.trim()).await,
                    None => self.should_quit = true,
                },
            }
        }

        self.preview.stop();
        self.engine.close();
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            // Rendered by the track observer.
            Event::TrackChanged(_) => {}
            Event::PlaybackEnded => println!("recitation finished"),
            Event::PlaybackFailed(message) => {
                println!("playback problem, the player is still usable: {message}");
            }
            Event::PreviewRequested(url) => self.preview.play(&url),
        }
    }

    async fn handle_command(&mut self, surah: &SurahDetail, line: &str) {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("p"), _) => self.engine.toggle_play_pause(),
            (Some("n"), _) => self.engine.skip_forward(),
            (Some("b"), _) => self.engine.skip_back(),
            (Some("s"), Some(secs)) => {
                if let Ok(secs) = secs.parse::<u64>() {
                    self.engine.seek(Duration::from_secs(secs));
                }
            }
            (Some("i"), _) => {
                let state = self.engine.state();
                let title = self
                    .engine
                    .playlist()
                    .map(|playlist| playlist.display_title(state.index).to_string())
                    .unwrap_or_default();
                println!(
                    "{title} [{:?}] {} / {}",
                    state.status,
                    format_time(state.position),
                    format_time(state.duration)
                );
            }
            (Some("m"), Some(verse)) => {
                if let Ok(ayah_no) = verse.parse::<u16>() {
                    let bookmarked = self.store.toggle_bookmark(surah.surah_no, ayah_no);
                    println!(
                        "{}:{} {}",
                        surah.surah_no,
                        ayah_no,
                        if bookmarked { "bookmarked" } else { "bookmark removed" }
                    );
                }
            }
            (Some("t"), Some(verse)) => {
                if let Ok(ayah_no) = verse.parse::<u16>() {
                    match self.api.tafsir(surah.surah_no, ayah_no).await {
                        Ok(response) => {
                            for tafsir in &response.tafsirs {
                                println!("\n== {} ==\n{}", tafsir.author, tafsir.content);
                            }
                        }
                        Err(err) => {
                            println!("unable to reach the library, please retry: {err}");
                        }
                    }
                }
            }
            (Some("v"), Some(verse)) => {
                if let Ok(ayah_no) = verse.parse::<u16>() {
                    let url = self.api.verse_audio_url(surah.surah_no, ayah_no);
                    self.preview.play(&url);
                }
            }
            (Some("q"), _) => self.should_quit = true,
            _ => {}
        }
    }

    fn print_surah(&self, surah: &SurahDetail) {
        let language = self.store.language();
        let translations = surah.translation(language);
        let bookmarks = self.store.bookmarks();

        println!(
            "\n{}  ({} · {} · {} verses)\n",
            surah.surah_name_arabic, surah.surah_name, surah.revelation_place, surah.total_ayah
        );
        for (index, arabic) in surah.arabic1.iter().enumerate() {
            let ayah_no = index as u16 + 1;
            let marker = if bookmarks.contains(surah.surah_no, ayah_no) {
                "★"
            } else {
                " "
            };
            println!("{marker}{ayah_no:>3}  {arabic}");
            if let Some(translation) = translations.get(index) {
                println!("      {translation}");
            }
        }
    }
}
