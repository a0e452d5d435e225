use eframe::CreationContext;
use env_logger::Env;
use yolo_video_uploader::app::VideoUploaderApp;
use yolo_video_uploader::config::AppConfig;
use yolo_video_uploader::upload::ProcessingClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    log::info!("Starting video uploader against {}", config.api_base_url);
    let client = ProcessingClient::new(&config)?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 620.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "YOLO Video Uploader",
        options,
        Box::new(move |cc: &CreationContext| Box::new(VideoUploaderApp::new(cc, client))),
    )
    .map_err(|e| format!("window failed: {}", e))?;

    Ok(())
}
