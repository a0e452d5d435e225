use eframe::egui::Color32;

/// Banner and accent colors for the uploader screen.
pub struct Palette;

impl Palette {
    pub const ACCENT: Color32 = Color32::from_rgb(47, 128, 237);
    pub const ERROR_TEXT: Color32 = Color32::from_rgb(132, 32, 41);
    pub const ERROR_FILL: Color32 = Color32::from_rgb(248, 215, 218);
    pub const WARNING_TEXT: Color32 = Color32::from_rgb(102, 77, 3);
    pub const WARNING_FILL: Color32 = Color32::from_rgb(255, 243, 205);
    pub const NOTICE_TEXT: Color32 = Color32::from_rgb(15, 81, 50);
}
