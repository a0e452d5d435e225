use eframe::egui;
use log::warn;

/// A screen the root shell can mount at a route.
pub trait View {
    fn show(&mut self, ctx: &egui::Context);
}

pub struct Router {
    routes: Vec<(String, Box<dyn View>)>,
    current: String,
}

impl Router {
    pub const ROOT: &'static str = "/";

    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            current: Self::ROOT.to_string(),
        }
    }

    pub fn route(mut self, path: &str, view: Box<dyn View>) -> Self {
        self.routes.retain(|(p, _)| p != path);
        self.routes.push((path.to_string(), view));
        self
    }

    pub fn navigate(&mut self, path: &str) -> bool {
        if self.routes.iter().any(|(p, _)| p == path) {
            self.current = path.to_string();
            true
        } else {
            warn!("No view registered for {}", path);
            false
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let current = &self.current;
        if let Some((_, view)) = self.routes.iter_mut().find(|(p, _)| p == current) {
            view.show(ctx);
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
