use std::time::Duration;

use bytes::Bytes;
use engine_logging::engine_debug;
use futures_util::StreamExt;
use reqwest::Url;
use serde::Deserialize;

use crate::{ChapterDescriptor, FailureKind, FetchError, Quality};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub api_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_page_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.mangadex.org".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_page_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Fetches raw page bytes for one chapter.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, page_ref: &str) -> Result<Bytes, FetchError>;
}

/// Builds a [`PageFetcher`] scoped to a single chapter.
#[async_trait::async_trait]
pub trait FetcherFactory: Send + Sync {
    async fn page_fetcher(
        &self,
        chapter: &ChapterDescriptor,
        quality: Quality,
        force_port_443: bool,
    ) -> Result<Box<dyn PageFetcher>, FetchError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtHomeResponse {
    result: String,
    base_url: String,
    chapter: AtHomeChapter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtHomeChapter {
    hash: String,
}

/// Client for the MangaDex@Home delivery network.
#[derive(Debug, Clone)]
pub struct AtHomeClient {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl AtHomeClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn server_url(&self, chapter_id: &str, force_port_443: bool) -> Result<Url, FetchError> {
        let base = self.settings.api_base.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/at-home/server/{chapter_id}"))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("forcePort443", if force_port_443 { "true" } else { "false" });
        Ok(url)
    }
}

#[async_trait::async_trait]
impl FetcherFactory for AtHomeClient {
    async fn page_fetcher(
        &self,
        chapter: &ChapterDescriptor,
        quality: Quality,
        force_port_443: bool,
    ) -> Result<Box<dyn PageFetcher>, FetchError> {
        let url = self.server_url(&chapter.id, force_port_443)?;
        let body = get_bytes(&self.client, url, self.settings.max_page_bytes).await?;
        let server: AtHomeResponse = serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::InvalidResponse, err.to_string()))?;
        if server.result != "ok" {
            return Err(FetchError::new(
                FailureKind::InvalidResponse,
                format!("at-home server result {:?}", server.result),
            ));
        }
        engine_debug!(
            "chapter {} served from {} (hash {})",
            chapter.id,
            server.base_url,
            server.chapter.hash
        );
        Ok(Box::new(AtHomePageFetcher {
            client: self.client.clone(),
            base_url: server.base_url.trim_end_matches('/').to_string(),
            hash: server.chapter.hash,
            quality,
            max_bytes: self.settings.max_page_bytes,
        }))
    }
}

struct AtHomePageFetcher {
    client: reqwest::Client,
    base_url: String,
    hash: String,
    quality: Quality,
    max_bytes: u64,
}

#[async_trait::async_trait]
impl PageFetcher for AtHomePageFetcher {
    async fn fetch_page(&self, page_ref: &str) -> Result<Bytes, FetchError> {
        let raw = format!("{}/{}/{}/{}", self.base_url, self.quality, self.hash, page_ref);
        let url = Url::parse(&raw)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        get_bytes(&self.client, url, self.max_bytes).await
    }
}

async fn get_bytes(client: &reqwest::Client, url: Url, max_bytes: u64) -> Result<Bytes, FetchError> {
    let response = client.get(url).send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }

    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(bytes))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
