use std::{io::Cursor, sync::Arc, time::Duration};

use flume::Sender;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::event::events::Event;

use super::{error::AudioError, playback::fetch_bytes};

pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

/// Secondary single-track channel for verse previews, fully independent of
/// the playlist engine. Starting a new preview stops and discards the
/// previous one unconditionally; failures never surface.
pub struct PreviewChannel {
    _stream: OutputStream,
    sink: Arc<Sink>,
    http: reqwest::Client,
    task: Option<JoinHandle<()>>,
}

impl PreviewChannel {
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| AudioError::Device(err.to_string()))?;
        let sink = Sink::connect_new(stream.mixer());

        Ok(Self {
            _stream: stream,
            sink: Arc::new(sink),
            http: reqwest::Client::new(),
            task: None,
        })
    }

    pub fn play(&mut self, url: &str) {
        self.stop();

        let url = url.to_string();
        let sink = self.sink.clone();
        let http = self.http.clone();

        self.task = Some(tokio::spawn(async move {
            match fetch_bytes(&http, &url).await {
                Ok(body) => match Decoder::builder().with_data(Cursor::new(body)).build() {
                    Ok(decoder) => {
                        sink.append(decoder);
                        sink.play();
                    }
                    Err(err) => debug!(url = url.as_str(), %err, "preview decode failed"),
                },
                Err(err) => debug!(url = url.as_str(), %err, "preview fetch failed"),
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.sink.stop();
    }
}

/// Press-and-hold detection. Arming starts a timer; releasing before the
/// threshold cancels it; when the timer fires first, a preview request is
/// emitted on the event channel. Playlist state is never touched.
pub struct LongPress {
    event_tx: Sender<Event>,
    threshold: Duration,
    pending: Option<JoinHandle<()>>,
}

impl LongPress {
    pub fn new(event_tx: Sender<Event>) -> Self {
        Self::with_threshold(event_tx, LONG_PRESS_THRESHOLD)
    }

    pub fn with_threshold(event_tx: Sender<Event>, threshold: Duration) -> Self {
        Self {
            event_tx,
            threshold,
            pending: None,
        }
    }

    /// Arms the timer for `url`, cancelling any previous press.
    pub fn press(&mut self, url: impl Into<String>) {
        self.release();

        let url = url.into();
        let event_tx = self.event_tx.clone();
        let threshold = self.threshold;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(threshold).await;
            let _ = event_tx.send(Event::PreviewRequested(url));
        }));
    }

    /// Cancels a pending press; a preview already requested is unaffected.
    pub fn release(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}
