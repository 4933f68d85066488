pub mod cache;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;
use crate::model::{AyahDetail, SurahDetail, SurahSummary, TafsirResponse};

use self::cache::ResponseCache;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The wire seam of the gateway; everything above it is cache and typing.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Read-only gateway to the content API. Successful responses are memoized
/// by exact URL for the process lifetime; a hit never touches the network
/// and is never re-validated. Concurrent misses for the same URL are not
/// deduplicated; each one fetches independently.
pub struct ApiService {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    config: ApiConfig,
}

impl ApiService {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn fetch_cached<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        if let Some(value) = self.cache.get(&url) {
            debug!(url = url.as_str(), "gateway_cache_hit");
            return Ok(serde_json::from_value((*value).clone())?);
        }

        debug!(url = url.as_str(), "gateway_cache_miss");
        let value = self.transport.get_json(&url).await?;
        let value = self.cache.insert(url, value);
        Ok(serde_json::from_value((*value).clone())?)
    }

    pub async fn surah_list(&self) -> Result<Vec<SurahSummary>, ApiError> {
        self.fetch_cached(format!("{}/surah.json", self.config.base_url))
            .await
    }

    pub async fn surah_detail(&self, surah_no: u16) -> Result<SurahDetail, ApiError> {
        self.fetch_cached(format!("{}/{}.json", self.config.base_url, surah_no))
            .await
    }

    pub async fn ayah_detail(&self, surah_no: u16, ayah_no: u16) -> Result<AyahDetail, ApiError> {
        self.fetch_cached(format!(
            "{}/{}/{}.json",
            self.config.base_url, surah_no, ayah_no
        ))
        .await
    }

    pub async fn tafsir(&self, surah_no: u16, ayah_no: u16) -> Result<TafsirResponse, ApiError> {
        self.fetch_cached(format!(
            "{}/tafsir/{}_{}.json",
            self.config.base_url, surah_no, ayah_no
        ))
        .await
    }

    pub fn verse_audio_url(&self, surah_no: u16, ayah_no: u16) -> String {
        self.config.verse_audio_url(surah_no, ayah_no)
    }
}
