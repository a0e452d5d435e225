use super::error::UploadError;
use super::progress::{self, ProgressObserver};
use super::result::{write_stream, ResultReference};
use super::types::{SelectedFile, ServerHealth};
use crate::config::AppConfig;
use futures_util::StreamExt;
use log::{info, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

const CHUNK_SIZE: usize = 64 * 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PATH_SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'?');

/// HTTP client for the video processing service.
#[derive(Clone, Debug)]
pub struct ProcessingClient {
    client: Client,
    base_url: String,
}

impl ProcessingClient {
    pub fn new(config: &AppConfig) -> Result<Self, UploadError> {
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(UploadError::Request)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, UploadError> {
        let config = AppConfig {
            api_base_url: base_url.into(),
            ..AppConfig::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/outputs/processed_<file_name>`, the name the service writes its output under.
    ///
    /// The name is escaped only where it would otherwise end the path (`#`, `?`) or
    /// break it (spaces, `%`, controls).
    pub fn result_url(&self, file_name: &str) -> String {
        let name = utf8_percent_encode(file_name, PATH_SEGMENT);
        format!("{}/outputs/processed_{}", self.base_url, name)
    }

    /// Never fails: any problem reaching or reading `/health` yields `unavailable`.
    pub async fn probe_health(&self) -> ServerHealth {
        let url = format!("{}/health", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(res) => res,
            Err(e) => {
                warn!("Health probe to {} failed: {}", url, e);
                return ServerHealth::unavailable();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Health probe returned status {}", status);
            return ServerHealth::unavailable();
        }

        match response.json::<ServerHealth>().await {
            Ok(health) => {
                info!(
                    "Service status: {} (model loaded: {:?})",
                    health.status, health.model_loaded
                );
                health
            }
            Err(e) => {
                warn!("Could not decode health payload: {}", e);
                ServerHealth::unavailable()
            }
        }
    }

    /// Posts `file` as the `file` part of a multipart body and keeps the returned video.
    ///
    /// `observer` sees the fraction of the file handed to the transport so far.
    pub async fn upload(
        &self,
        file: &SelectedFile,
        observer: Option<Arc<dyn ProgressObserver>>,
    ) -> Result<ResultReference, UploadError> {
        let source = File::open(&file.path).await?;
        let total = source.metadata().await?.len();
        info!("Uploading {} ({} bytes)", file.name, total);

        let mut sent = 0u64;
        let body = ReaderStream::with_capacity(source, CHUNK_SIZE).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                sent += bytes.len() as u64;
                if let Some(observer) = &observer {
                    observer.on_progress(progress::fraction(sent, total));
                }
            }
            chunk
        });

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(file.name.clone())
            .mime_str(file.media_type.as_deref().unwrap_or("application/octet-stream"))
            .map_err(UploadError::Request)?;
        let form = Form::new().part("file", part);

        let url = format!("{}/upload_video/", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = UploadError::from_response(status.as_u16(), &body);
            warn!("Upload of {} rejected: {}", file.name, err);
            return Err(err);
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(UploadError::Request));
        let reference = ResultReference::from_stream(self.result_url(&file.name), body).await?;

        info!("Processed video available at {}", reference.url());
        Ok(reference)
    }

    /// Fetches `url` into `dest`, returning the number of bytes written.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64, UploadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UploadError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(UploadError::from_response(status.as_u16(), &body));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(UploadError::Request));
        let mut writer = File::create(dest).await?;
        write_stream(body, &mut writer).await
    }
}
