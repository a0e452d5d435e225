use crate::upload::{ResultReference, SelectedFile, ServerHealth, UploadError};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UploadPhase {
    Idle,
    InProgress { progress: f32 },
    Succeeded,
    Failed,
}

impl Default for UploadPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Everything the uploader view knows. Lives exactly as long as the view.
#[derive(Debug, Default)]
pub struct UploaderState {
    pub selected: Option<SelectedFile>,
    /// `None` until the health probe reports back.
    pub health: Option<ServerHealth>,
    pub phase: UploadPhase,
    pub error_message: Option<String>,
    pub notice: Option<String>,
    pub result: Option<ResultReference>,
}

impl UploaderState {
    pub fn apply_health(&mut self, health: ServerHealth) {
        self.health = Some(health);
    }

    /// Accepts `file` only if its declared type is a video; otherwise nothing stays selected.
    pub fn select_file(&mut self, file: SelectedFile) -> bool {
        if !file.is_video() {
            warn!(
                "Rejected {} with media type {:?}",
                file.name, file.media_type
            );
            self.selected = None;
            self.error_message = Some(UploadError::NotAVideo.user_message());
            return false;
        }

        info!("Selected {}", file.name);
        self.error_message = None;
        self.notice = None;
        self.replace_result(None);
        self.selected = Some(file);
        true
    }

    /// Moves into `InProgress` and hands back the file to send, or records why not.
    pub fn begin_upload(&mut self) -> Option<SelectedFile> {
        if self.is_uploading() {
            return None;
        }

        let Some(file) = self.selected.clone() else {
            self.error_message = Some(UploadError::NoFileSelected.user_message());
            return None;
        };

        self.error_message = None;
        self.notice = None;
        self.replace_result(None);
        self.phase = UploadPhase::InProgress { progress: 0.0 };
        Some(file)
    }

    pub fn record_progress(&mut self, fraction: f32) {
        if let UploadPhase::InProgress { progress } = &mut self.phase {
            *progress = fraction.clamp(0.0, 1.0);
        }
    }

    /// Applies the outcome of an upload. The in-progress flag is always cleared last.
    pub fn finish_upload(&mut self, outcome: Result<ResultReference, UploadError>) {
        let phase = match outcome {
            Ok(reference) => {
                self.replace_result(Some(reference));
                UploadPhase::Succeeded
            }
            Err(err) => {
                warn!("Upload failed: {}", err);
                self.error_message = Some(err.user_message());
                UploadPhase::Failed
            }
        };
        self.phase = phase;
    }

    /// Swaps the result, releasing whatever backed the previous one.
    pub fn replace_result(&mut self, next: Option<ResultReference>) {
        if let Some(mut previous) = std::mem::replace(&mut self.result, next) {
            previous.release();
        }
    }

    pub fn teardown(&mut self) {
        self.replace_result(None);
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, UploadPhase::InProgress { .. })
    }

    pub fn show_health_warning(&self) -> bool {
        self.health.as_ref().map_or(false, |h| !h.is_healthy())
    }

    pub fn show_model_warning(&self) -> bool {
        self.health.as_ref().map_or(false, ServerHealth::model_missing)
    }

    pub fn can_upload(&self) -> bool {
        self.selected.is_some() && !self.is_uploading()
    }

    pub fn visible_result(&self) -> Option<&ResultReference> {
        if self.is_uploading() {
            None
        } else {
            self.result.as_ref()
        }
    }

    pub fn progress_percentage(&self) -> f32 {
        match self.phase {
            UploadPhase::Idle | UploadPhase::Failed => 0.0,
            UploadPhase::InProgress { progress } => progress,
            UploadPhase::Succeeded => 1.0,
        }
    }

    pub fn upload_button_text(&self) -> &'static str {
        if self.is_uploading() {
            "Processing..."
        } else {
            "Upload and Process"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{CONNECT_MESSAGE, NOT_A_VIDEO_MESSAGE, NO_FILE_MESSAGE};
    use std::path::PathBuf;

    fn video(name: &str) -> SelectedFile {
        SelectedFile::new(
            PathBuf::from(name),
            name,
            Some("video/mp4".to_string()),
            Some(1024),
        )
    }

    fn text_file() -> SelectedFile {
        SelectedFile::new("notes.txt", "notes.txt", Some("text/plain".to_string()), None)
    }

    fn blob_result(name: &str) -> ResultReference {
        crate::upload::blocking_reference(&format!("http://svc/outputs/processed_{}", name), b"data")
    }

    #[test]
    fn non_video_is_rejected_and_nothing_is_selected() {
        let mut state = UploaderState::default();
        assert!(state.select_file(video("a.mp4")));

        assert!(!state.select_file(text_file()));
        assert!(state.selected.is_none());
        assert_eq!(state.error_message.as_deref(), Some(NOT_A_VIDEO_MESSAGE));
        assert!(state.begin_upload().is_none());
        assert!(!state.can_upload());
    }

    #[test]
    fn file_without_declared_type_is_rejected() {
        let mut state = UploaderState::default();
        assert!(!state.select_file(SelectedFile::new("clip", "clip", None, None)));
        assert!(state.selected.is_none());
    }

    #[test]
    fn new_selection_replaces_file_and_releases_result() {
        let mut state = UploaderState::default();
        state.select_file(video("a.mp4"));
        state.begin_upload();
        state.finish_upload(Ok(blob_result("a.mp4")));
        let blob = state.result.as_ref().unwrap().blob_path().unwrap().to_path_buf();
        state.error_message = Some("stale".into());

        assert!(state.select_file(video("b.mp4")));
        assert_eq!(state.selected.as_ref().unwrap().name, "b.mp4");
        assert!(state.result.is_none());
        assert!(state.error_message.is_none());
        assert!(!blob.exists());
    }

    #[test]
    fn upload_without_file_sets_message() {
        let mut state = UploaderState::default();
        assert!(state.begin_upload().is_none());
        assert_eq!(state.error_message.as_deref(), Some(NO_FILE_MESSAGE));
        assert_eq!(state.phase, UploadPhase::Idle);
    }

    #[test]
    fn upload_in_progress_hides_result_and_disables_control() {
        let mut state = UploaderState::default();
        state.select_file(video("a.mp4"));
        state.result = Some(blob_result("old.mp4"));

        let file = state.begin_upload().unwrap();
        assert_eq!(file.name, "a.mp4");
        assert!(state.is_uploading());
        assert!(!state.can_upload());
        assert!(state.visible_result().is_none());
        assert!(state.result.is_none());
        assert!(state.begin_upload().is_none());
    }

    #[test]
    fn in_progress_flag_clears_on_success_and_failure() {
        let mut state = UploaderState::default();
        state.select_file(video("a.mp4"));

        state.begin_upload();
        state.record_progress(0.5);
        assert_eq!(state.progress_percentage(), 0.5);
        state.finish_upload(Ok(ResultReference::new(
            "http://svc/outputs/processed_a.mp4".into(),
        )));
        assert!(!state.is_uploading());
        assert_eq!(state.phase, UploadPhase::Succeeded);
        assert_eq!(
            state.visible_result().unwrap().url(),
            "http://svc/outputs/processed_a.mp4"
        );

        state.begin_upload();
        state.finish_upload(Err(UploadError::Service {
            status: 400,
            detail: Some("bad codec".into()),
        }));
        assert!(!state.is_uploading());
        assert_eq!(state.phase, UploadPhase::Failed);
        assert_eq!(state.error_message.as_deref(), Some("bad codec"));
        assert!(state.can_upload());
    }

    #[test]
    fn io_failure_is_reported_generically() {
        let mut state = UploaderState::default();
        state.select_file(video("a.mp4"));
        state.begin_upload();
        state.finish_upload(Err(UploadError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ))));
        assert_ne!(state.error_message.as_deref(), Some(CONNECT_MESSAGE));
        assert!(!state.is_uploading());
    }

    #[test]
    fn health_warning_follows_stored_status() {
        let mut state = UploaderState::default();
        assert!(!state.show_health_warning());

        state.apply_health(ServerHealth::unavailable());
        assert!(state.show_health_warning());

        state.apply_health(ServerHealth {
            status: "healthy".into(),
            model_loaded: Some(false),
        });
        assert!(!state.show_health_warning());
        assert!(state.show_model_warning());
    }

    #[test]
    fn unhealthy_service_does_not_block_upload() {
        let mut state = UploaderState::default();
        state.apply_health(ServerHealth::unavailable());
        state.select_file(video("a.mp4"));
        assert!(state.can_upload());
        assert!(state.begin_upload().is_some());
    }

    #[test]
    fn teardown_releases_blob() {
        let mut state = UploaderState::default();
        state.result = Some(blob_result("a.mp4"));
        let blob = state.result.as_ref().unwrap().blob_path().unwrap().to_path_buf();

        state.teardown();
        assert!(state.result.is_none());
        assert!(!blob.exists());
    }
}
