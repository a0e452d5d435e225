use super::error::UploadError;
use futures_util::{pin_mut, Stream, StreamExt};
use log::{debug, info, warn};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Where the processed video can be played or fetched from.
///
/// `url` follows the service's `outputs/processed_<name>` naming convention.
/// `blob` is the response body kept on disk; it is released when the reference is
/// replaced or dropped, and never twice.
#[derive(Debug)]
pub struct ResultReference {
    url: String,
    blob: Option<NamedTempFile>,
}

impl ResultReference {
    pub fn new(url: String) -> Self {
        Self { url, blob: None }
    }

    /// Streams `body` into a temp file backing this reference.
    ///
    /// On any error the partial temp file is removed.
    pub async fn from_stream<S, T>(url: String, body: S) -> Result<Self, UploadError>
    where
        S: Stream<Item = Result<T, UploadError>>,
        T: AsRef<[u8]>,
    {
        let blob = tempfile::Builder::new()
            .prefix("processed_")
            .suffix(".mp4")
            .tempfile()?;
        let mut writer = tokio::fs::File::from_std(blob.reopen()?);
        let written = write_stream(body, &mut writer).await?;
        debug!("Kept {} bytes of processed video at {}", written, blob.path().display());

        Ok(Self {
            url,
            blob: Some(blob),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn blob_path(&self) -> Option<&Path> {
        self.blob.as_ref().map(|b| b.path())
    }

    /// Copies the local blob to `dest`. Returns `Ok(None)` when there is no blob.
    pub fn save_blob_to(&self, dest: &Path) -> Result<Option<u64>, UploadError> {
        match &self.blob {
            Some(blob) => Ok(Some(std::fs::copy(blob.path(), dest)?)),
            None => Ok(None),
        }
    }

    pub fn release(&mut self) {
        if let Some(blob) = self.blob.take() {
            let path = blob.path().to_path_buf();
            match blob.close() {
                Ok(()) => info!("Released processed video blob {}", path.display()),
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
}

impl Drop for ResultReference {
    fn drop(&mut self) {
        self.release();
    }
}

/// Writes every chunk of `body` to `writer` and flushes, returning the byte count.
pub(crate) async fn write_stream<S, T, W>(body: S, writer: &mut W) -> Result<u64, UploadError>
where
    S: Stream<Item = Result<T, UploadError>>,
    T: AsRef<[u8]>,
    W: AsyncWrite + Unpin,
{
    pin_mut!(body);
    let mut written = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        writer.write_all(chunk.as_ref()).await?;
        written += chunk.as_ref().len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}

#[cfg(test)]
pub(crate) fn blocking_reference(url: &str, body: &[u8]) -> ResultReference {
    let chunks = vec![Ok::<_, UploadError>(body.to_vec())];
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(ResultReference::from_stream(
            url.to_string(),
            futures_util::stream::iter(chunks),
        ))
        .unwrap()
}
