mod router;
mod state;
mod ui;

use crate::upload::{
    media, ProcessingClient, ProgressObserver, ResultReference, SelectedFile, ServerHealth,
    UploadError,
};
use derivative::Derivative;
use eframe::{egui, App};
use log::{debug, error, info};
use rfd::FileDialog;
pub use router::{Router, View};
pub use state::{UploadPhase, UploaderState};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

pub const DOWNLOAD_FILE_NAME: &str = "processed_video.mp4";

/// Messages from background workers back to the view.
#[derive(Debug)]
pub enum UploaderEvent {
    Health(ServerHealth),
    Progress(f32),
    UploadFinished(Result<ResultReference, UploadError>),
    Saved(Result<(PathBuf, u64), UploadError>),
}

/// Root shell: one route, `/`, showing the uploader.
pub struct VideoUploaderApp {
    router: Router,
}

impl VideoUploaderApp {
    pub fn new(cc: &eframe::CreationContext<'_>, client: ProcessingClient) -> Self {
        Self::with_context(cc.egui_ctx.clone(), client)
    }

    pub fn with_context(ctx: egui::Context, client: ProcessingClient) -> Self {
        let uploader = UploaderView::mount(client, ctx);
        Self {
            router: Router::new().route(Router::ROOT, Box::new(uploader)),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl App for VideoUploaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.router.show(ctx);
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct UploaderView {
    client: ProcessingClient,
    state: UploaderState,
    #[derivative(Debug = "ignore")]
    ctx: egui::Context,
    #[derivative(Debug = "ignore")]
    sender: Sender<UploaderEvent>,
    #[derivative(Debug = "ignore")]
    receiver: Receiver<UploaderEvent>,
    last_logged_percent: Option<u32>,
}

impl UploaderView {
    /// Creates the view and starts the one-off health probe.
    pub fn mount(client: ProcessingClient, ctx: egui::Context) -> Self {
        info!("Mounting uploader for {}", client.base_url());
        let (sender, receiver) = channel();
        let view = Self {
            client,
            state: UploaderState::default(),
            ctx,
            sender,
            receiver,
            last_logged_percent: None,
        };
        view.probe_health();
        view
    }

    pub fn state(&self) -> &UploaderState {
        &self.state
    }

    pub fn probe_health(&self) {
        self.spawn_worker(
            |client, _| async move { UploaderEvent::Health(client.probe_health().await) },
            |_| UploaderEvent::Health(ServerHealth::unavailable()),
        );
    }

    pub fn pick_file(&mut self) {
        let picked = FileDialog::new()
            .add_filter("Video", media::VIDEO_EXTENSIONS)
            .pick_file();

        if let Some(path) = picked {
            self.select_path(&path);
        }
    }

    pub fn select_path(&mut self, path: &Path) -> bool {
        self.state.select_file(SelectedFile::from_path(path))
    }

    pub fn upload(&mut self) {
        let Some(file) = self.state.begin_upload() else {
            return;
        };
        self.last_logged_percent = None;

        self.spawn_worker(
            move |client, sender| async move {
                let progress_sender = Mutex::new(sender);
                let observer: Arc<dyn ProgressObserver> = Arc::new(move |fraction: f32| {
                    if let Ok(sender) = progress_sender.lock() {
                        let _ = sender.send(UploaderEvent::Progress(fraction));
                    }
                });
                UploaderEvent::UploadFinished(client.upload(&file, Some(observer)).await)
            },
            |e| UploaderEvent::UploadFinished(Err(e)),
        );
    }

    pub fn play(&mut self) {
        let Some(url) = self.state.visible_result().map(|r| r.url().to_string()) else {
            return;
        };

        if let Err(e) = open::that(&url) {
            error!("Could not open {}: {}", url, e);
            self.state.error_message = Some(format!("Could not open player: {}", e));
        }
    }

    pub fn download(&mut self) {
        if self.state.visible_result().is_none() {
            return;
        }

        let dest = FileDialog::new()
            .set_file_name(DOWNLOAD_FILE_NAME)
            .add_filter("Video", &["mp4"])
            .save_file();

        if let Some(dest) = dest {
            self.save_result_to(dest);
        }
    }

    /// Writes the processed video to `dest`, from the local blob when there is one.
    pub fn save_result_to(&mut self, dest: PathBuf) {
        let Some(result) = self.state.visible_result() else {
            return;
        };

        match result.save_blob_to(&dest) {
            Ok(Some(bytes)) => self.apply(UploaderEvent::Saved(Ok((dest, bytes)))),
            Ok(None) => {
                let url = result.url().to_string();
                self.spawn_worker(
                    move |client, _| async move {
                        let outcome = client.download(&url, &dest).await;
                        UploaderEvent::Saved(outcome.map(|n| (dest, n)))
                    },
                    |e| UploaderEvent::Saved(Err(e)),
                );
            }
            Err(e) => self.apply(UploaderEvent::Saved(Err(e))),
        }
    }

    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: UploaderEvent) {
        match event {
            UploaderEvent::Health(health) => self.state.apply_health(health),
            UploaderEvent::Progress(fraction) => {
                let percent = (fraction * 100.0).round() as u32;
                if self.last_logged_percent != Some(percent) {
                    debug!("Upload Progress: {}%", percent);
                    self.last_logged_percent = Some(percent);
                }
                self.state.record_progress(fraction);
            }
            UploaderEvent::UploadFinished(outcome) => self.state.finish_upload(outcome),
            UploaderEvent::Saved(Ok((path, bytes))) => {
                info!("Saved {} bytes to {}", bytes, path.display());
                self.state.error_message = None;
                self.state.notice = Some(format!("Saved to {}", path.display()));
            }
            UploaderEvent::Saved(Err(e)) => {
                error!("Saving processed video failed: {}", e);
                self.state.notice = None;
                self.state.error_message = Some(format!("Download failed: {}", e.user_message()));
            }
        }
    }

    /// Runs `task` on its own thread and runtime, then posts its event and repaints.
    fn spawn_worker<T, Fut>(
        &self,
        task: T,
        on_runtime_error: impl FnOnce(UploadError) -> UploaderEvent + Send + 'static,
    ) where
        T: FnOnce(ProcessingClient, Sender<UploaderEvent>) -> Fut + Send + 'static,
        Fut: Future<Output = UploaderEvent>,
    {
        let client = self.client.clone();
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();

        std::thread::spawn(move || {
            let event = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(task(client, sender.clone())),
                Err(e) => {
                    error!("Failed to start worker runtime: {}", e);
                    on_runtime_error(UploadError::Io(e))
                }
            };

            let _ = sender.send(event);
            ctx.request_repaint();
        });
    }
}

impl View for UploaderView {
    fn show(&mut self, ctx: &egui::Context) {
        if self.drain_events() > 0 || self.state.is_uploading() {
            ctx.request_repaint();
        }
        self.render(ctx);
    }
}

impl Drop for UploaderView {
    fn drop(&mut self) {
        self.state.teardown();
    }
}
