mod client;
mod error;
pub mod media;
mod progress;
mod result;
mod types;

pub use client::ProcessingClient;
pub use error::{
    UploadError, CONNECT_MESSAGE, GENERIC_MESSAGE, NOT_A_VIDEO_MESSAGE, NO_FILE_MESSAGE,
    SERVER_ERROR_MESSAGE,
};
pub use progress::ProgressObserver;
pub use result::ResultReference;
#[cfg(test)]
pub(crate) use result::blocking_reference;
pub use types::{SelectedFile, ServerHealth, HEALTHY, UNAVAILABLE};
