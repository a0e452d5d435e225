use serde::Deserialize;
use thiserror::Error;

pub const NO_FILE_MESSAGE: &str = "Please select a file first";
pub const NOT_A_VIDEO_MESSAGE: &str = "Please select a video file";
pub const CONNECT_MESSAGE: &str =
    "Cannot connect to server. Please check if the server is running.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error occurred";
pub const GENERIC_MESSAGE: &str = "Error uploading video";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("selected file is not a video")]
    NotAVideo,

    #[error("service responded with status {status}")]
    Service {
        status: u16,
        detail: Option<String>,
    },

    #[error("could not reach the processing service: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl UploadError {
    /// Builds a `Service` error from a non-2xx response body.
    ///
    /// Only a string `detail` is kept; FastAPI validation errors carry a list there.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .and_then(|d| match d {
                serde_json::Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            });

        UploadError::Service { status, detail }
    }

    /// Splits transport errors into "never got a response" and everything else.
    ///
    /// `is_request` also covers a peer that drops the connection or sends a truncated
    /// response; those count as "no response" too.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            UploadError::Connect(err)
        } else {
            UploadError::Request(err)
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            UploadError::NoFileSelected => NO_FILE_MESSAGE.to_string(),
            UploadError::NotAVideo => NOT_A_VIDEO_MESSAGE.to_string(),
            UploadError::Service { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string()),
            UploadError::Connect(_) => CONNECT_MESSAGE.to_string(),
            UploadError::Request(_) | UploadError::Io(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}
