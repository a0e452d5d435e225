use super::media;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const HEALTHY: &str = "healthy";
pub const UNAVAILABLE: &str = "unavailable";

/// Payload of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerHealth {
    pub status: String,
    #[serde(default)]
    pub model_loaded: Option<bool>,
}

impl ServerHealth {
    /// Stand-in stored when the probe fails for any reason.
    pub fn unavailable() -> Self {
        Self {
            status: UNAVAILABLE.to_string(),
            model_loaded: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }

    pub fn model_missing(&self) -> bool {
        self.is_healthy() && self.model_loaded == Some(false)
    }
}

/// A video chosen by the user, with the media type declared by its extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub media_type: Option<String>,
    pub size: Option<u64>,
}

impl SelectedFile {
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        media_type: Option<String>,
        size: Option<u64>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            media_type,
            size,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let media_type = media::declared_media_type(path).map(str::to_string);
        let size = std::fs::metadata(path).ok().map(|m| m.len());

        Self::new(path, name, media_type, size)
    }

    pub fn is_video(&self) -> bool {
        self.media_type
            .as_deref()
            .map_or(false, |m| m.starts_with("video/"))
    }
}
