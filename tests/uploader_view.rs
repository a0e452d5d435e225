use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use yolo_video_uploader::app::{UploadPhase, UploaderState, UploaderView, VideoUploaderApp};
use yolo_video_uploader::upload::{ProcessingClient, NOT_A_VIDEO_MESSAGE, NO_FILE_MESSAGE};

fn wait_for(view: &mut UploaderView, what: &str, done: impl Fn(&UploaderState) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        view.drain_events();
        if done(view.state()) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(20));
    }
}

fn mount(server: &mockito::Server) -> UploaderView {
    let client = ProcessingClient::with_base_url(server.url()).unwrap();
    UploaderView::mount(client, eframe::egui::Context::default())
}

#[test]
fn root_shell_registers_only_the_uploader_route() {
    let client = ProcessingClient::with_base_url("http://127.0.0.1:1").unwrap();
    let app = VideoUploaderApp::with_context(eframe::egui::Context::default(), client);

    assert_eq!(app.router().paths().collect::<Vec<_>>(), vec!["/"]);
    assert_eq!(app.router().current(), "/");
}

#[test]
fn mount_probes_health_once() {
    let mut server = mockito::Server::new();
    let health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status": "healthy", "model_loaded": true}"#)
        .expect(1)
        .create();

    let mut view = mount(&server);
    wait_for(&mut view, "health", |s| s.health.is_some());

    assert!(!view.state().show_health_warning());
    health.assert();
}

#[test]
fn unreachable_service_shows_warning() {
    let client = ProcessingClient::with_base_url("http://127.0.0.1:1").unwrap();
    let mut view = UploaderView::mount(client, eframe::egui::Context::default());

    wait_for(&mut view, "health", |s| s.health.is_some());
    assert!(view.state().show_health_warning());
}

#[test]
fn upload_without_file_makes_no_request() {
    let mut server = mockito::Server::new();
    server.mock("GET", "/health").with_body(r#"{"status":"healthy"}"#).create();
    let upload = server.mock("POST", "/upload_video/").expect(0).create();

    let mut view = mount(&server);
    view.upload();

    assert_eq!(view.state().error_message.as_deref(), Some(NO_FILE_MESSAGE));
    assert_eq!(view.state().phase, UploadPhase::Idle);
    wait_for(&mut view, "health", |s| s.health.is_some());
    upload.assert();
}

#[test]
fn non_video_selection_is_rejected() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "hello").unwrap();

    let server = mockito::Server::new();
    let mut view = mount(&server);

    assert!(!view.select_path(&notes));
    assert!(view.state().selected.is_none());
    assert_eq!(view.state().error_message.as_deref(), Some(NOT_A_VIDEO_MESSAGE));
    assert!(!view.state().can_upload());
}

#[test]
fn successful_upload_shows_result_and_releases_it_on_teardown() {
    let dir = TempDir::new().unwrap();
    let clip = dir.path().join("clip.mp4");
    std::fs::write(&clip, b"frames").unwrap();

    let mut server = mockito::Server::new();
    server.mock("GET", "/health").with_body(r#"{"status":"healthy"}"#).create();
    server
        .mock("POST", "/upload_video/")
        .with_status(200)
        .with_header("content-type", "video/mp4")
        .with_body("annotated")
        .create();

    let mut view = mount(&server);
    assert!(view.select_path(&clip));
    view.upload();
    assert!(view.state().is_uploading());
    assert!(view.state().visible_result().is_none());

    wait_for(&mut view, "upload", |s| !s.is_uploading());

    let state = view.state();
    assert_eq!(state.phase, UploadPhase::Succeeded);
    let result = state.visible_result().unwrap();
    assert_eq!(
        result.url(),
        format!("{}/outputs/processed_clip.mp4", server.url())
    );
    let blob = result.blob_path().unwrap().to_path_buf();
    assert!(blob.exists());

    let saved = dir.path().join("processed_video.mp4");
    view.save_result_to(saved.clone());
    assert_eq!(std::fs::read(&saved).unwrap(), b"annotated");
    assert!(view.state().notice.is_some());

    drop(view);
    assert!(!blob.exists());
}

#[test]
fn failed_upload_clears_in_progress_and_shows_detail() {
    let dir = TempDir::new().unwrap();
    let clip = dir.path().join("clip.mp4");
    std::fs::write(&clip, b"frames").unwrap();

    let mut server = mockito::Server::new();
    server.mock("GET", "/health").with_status(503).create();
    server
        .mock("POST", "/upload_video/")
        .with_status(400)
        .with_body(r#"{"detail": "bad codec"}"#)
        .create();

    let mut view = mount(&server);
    view.select_path(&clip);
    view.upload();
    wait_for(&mut view, "upload", |s| !s.is_uploading());

    assert_eq!(view.state().phase, UploadPhase::Failed);
    assert_eq!(view.state().error_message.as_deref(), Some("bad codec"));
    assert!(view.state().visible_result().is_none());
    assert!(view.state().can_upload());
}
