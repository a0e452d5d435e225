use super::UploaderView;
use crate::utils::file_size::format_size;
use crate::utils::palette::Palette;
use eframe::egui::{self, Align, Color32, RichText};

const HEALTH_WARNING: &str =
    "Server is currently unavailable. Please check your connection and try again.";
const MODEL_WARNING: &str =
    "The server is up but has no detection model loaded; uploads will be rejected.";

impl UploaderView {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 30.0;

            egui::ScrollArea::vertical()
                .max_height(total_height - footer_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Upload Video for YOLO Processing");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new(format!("Service: {}", self.client.base_url()))
                                .color(muted(ui)),
                        );
                    });
                    ui.add_space(15.0);

                    if self.state.show_health_warning() {
                        banner(ui, Palette::WARNING_FILL, Palette::WARNING_TEXT, HEALTH_WARNING);
                    } else if self.state.show_model_warning() {
                        banner(ui, Palette::WARNING_FILL, Palette::WARNING_TEXT, MODEL_WARNING);
                    }

                    if let Some(error) = &self.state.error_message {
                        banner(ui, Palette::ERROR_FILL, Palette::ERROR_TEXT, error);
                    }

                    self.render_input(ui);

                    if self.state.is_uploading() {
                        ui.add_space(10.0);
                        let progress = egui::ProgressBar::new(self.state.progress_percentage())
                            .show_percentage()
                            .animate(true)
                            .fill(Palette::ACCENT);
                        ui.add(progress);
                    }

                    if self.state.visible_result().is_some() {
                        ui.add_space(20.0);
                        self.render_result(ui);
                    }
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(8.0);
                if let Some(notice) = &self.state.notice {
                    ui.colored_label(Palette::NOTICE_TEXT, notice);
                }
            });
        });
    }

    fn render_input(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                let picking_allowed = !self.state.is_uploading();
                if ui
                    .add_enabled(picking_allowed, egui::Button::new("🎞 Choose Video"))
                    .clicked()
                {
                    self.pick_file();
                }

                match &self.state.selected {
                    Some(file) => {
                        let size = file.size.map(format_size).unwrap_or_default();
                        ui.label(format!("{} {}", file.name, size).trim_end());
                    }
                    None => {
                        ui.label(RichText::new("No file chosen").italics());
                    }
                }
            });
        });

        ui.add_space(15.0);
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(self.state.upload_button_text())
                .min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(self.state.can_upload(), button).clicked() {
                self.upload();
            }
        });
    }

    fn render_result(&mut self, ui: &mut egui::Ui) {
        let Some(url) = self.state.visible_result().map(|r| r.url().to_string()) else {
            return;
        };

        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Processed Video");
                ui.add_space(8.0);
                ui.hyperlink_to(url.as_str(), &url);
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("▶ Play").clicked() {
                        self.play();
                    }
                    if ui.button("⬇ Download Processed Video").clicked() {
                        self.download();
                    }
                });
            });
        });
    }
}

fn banner(ui: &mut egui::Ui, fill: Color32, text: Color32, message: &str) {
    egui::Frame::none()
        .fill(fill)
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.colored_label(text, message);
        });
    ui.add_space(8.0);
}

fn muted(ui: &egui::Ui) -> Color32 {
    ui.visuals().text_color().gamma_multiply(0.7)
}
