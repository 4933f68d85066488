use std::{
    collections::HashMap,
    io::Cursor,
    sync::{Arc, Mutex},
    time::Duration,
};

use flume::Sender;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tokio::task::JoinHandle;
use tracing::debug;

use super::{
    error::AudioError,
    traits::{MediaBackend, MediaEvent, MediaEventKind},
};

const MONITOR_INTERVAL: Duration = Duration::from_millis(1000 / 8);

/// `MediaBackend` over a rodio output sink. Each load runs on its own task,
/// aborted when a newer load supersedes it; prefetched bodies are kept in
/// memory keyed by URL until their track comes up.
pub struct RodioBackend {
    _stream: OutputStream,
    sink: Arc<Sink>,
    http: reqwest::Client,
    media_tx: Sender<MediaEvent>,
    prefetched: Arc<Mutex<HashMap<String, Arc<Vec<u8>>>>>,
    load_task: Option<JoinHandle<()>>,
}

impl RodioBackend {
    pub fn new(media_tx: Sender<MediaEvent>) -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| AudioError::Device(err.to_string()))?;
        let sink = Sink::connect_new(stream.mixer());

        Ok(Self {
            _stream: stream,
            sink: Arc::new(sink),
            http: reqwest::Client::new(),
            media_tx,
            prefetched: Arc::new(Mutex::new(HashMap::new())),
            load_task: None,
        })
    }

    fn abort_load(&mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
    }
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, generation: u64, url: &str) {
        self.abort_load();
        self.sink.stop();
        // The appended source must not start before the engine says play.
        self.sink.pause();

        let url = url.to_string();
        let sink = self.sink.clone();
        let http = self.http.clone();
        let media_tx = self.media_tx.clone();
        let prefetched = self.prefetched.clone();

        self.load_task = Some(tokio::spawn(async move {
            let hit = prefetched.lock().unwrap().remove(&url);
            let body = match hit {
                Some(body) => {
                    debug!(url = url.as_str(), "prefetch_hit");
                    body
                }
                None => match fetch_bytes(&http, &url).await {
                    Ok(body) => Arc::new(body),
                    Err(err) => {
                        let _ = media_tx.send(MediaEvent {
                            generation,
                            kind: MediaEventKind::Failed(err),
                        });
                        return;
                    }
                },
            };

            let decoder = match Decoder::builder()
                .with_data(Cursor::new(body.to_vec()))
                .with_gapless(true)
                .build()
            {
                Ok(decoder) => decoder,
                Err(err) => {
                    let _ = media_tx.send(MediaEvent {
                        generation,
                        kind: MediaEventKind::Failed(AudioError::Decode(err.to_string())),
                    });
                    return;
                }
            };

            let duration = decoder.total_duration().unwrap_or_default();
            sink.append(decoder);
            let _ = media_tx.send(MediaEvent {
                generation,
                kind: MediaEventKind::Ready { duration },
            });

            // Position/end monitor for this load; dies with the task when a
            // newer load supersedes it.
            loop {
                tokio::time::sleep(MONITOR_INTERVAL).await;
                if sink.empty() {
                    let _ = media_tx.send(MediaEvent {
                        generation,
                        kind: MediaEventKind::Ended,
                    });
                    break;
                }
                if !sink.is_paused() {
                    let _ = media_tx.send(MediaEvent {
                        generation,
                        kind: MediaEventKind::Position(sink.get_pos()),
                    });
                }
            }
        }));
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        self.sink
            .try_seek(position)
            .map_err(|err| AudioError::Device(err.to_string()))
    }

    fn prefetch(&mut self, url: &str) {
        if self.prefetched.lock().unwrap().contains_key(url) {
            return;
        }

        let url = url.to_string();
        let http = self.http.clone();
        let prefetched = self.prefetched.clone();

        tokio::spawn(async move {
            match fetch_bytes(&http, &url).await {
                Ok(body) => {
                    prefetched.lock().unwrap().insert(url, Arc::new(body));
                }
                // Purely an optimization; the current track is unaffected.
                Err(err) => debug!(url = url.as_str(), %err, "prefetch failed"),
            }
        });
    }

    fn stop(&mut self) {
        self.abort_load();
        self.sink.stop();
    }
}

pub(crate) async fn fetch_bytes(
    http: &reqwest::Client,
    url: &str,
) -> Result<Vec<u8>, AudioError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|err| AudioError::Network(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(AudioError::Network(format!(
            "unexpected status {status} for {url}"
        )));
    }
    let body = response
        .bytes()
        .await
        .map_err(|err| AudioError::Network(err.to_string()))?;
    Ok(body.to_vec())
}
