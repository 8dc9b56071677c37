//! HUD window
//!
//! A single-threaded egui app: a loading screen that decodes model frames one
//! per repaint, then the dashboard driven by three tickers (sampling, model
//! animation, code scroll) with repaints scheduled at the nearest deadline.

use crate::config::Config;
use eframe::egui;

mod app;
mod theme;
mod widgets;

pub use app::JarvisApp;

/// Open the HUD window and block until it closes
pub fn run(config: Config) -> Result<(), eframe::Error> {
    let title = config.window.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([900.0, 700.0])
            .with_title(&title)
            .with_icon(load_icon()),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(JarvisApp::new(cc, config)))),
    )
}

/// Arc reactor icon: cyan ring around an orange core
fn load_icon() -> egui::IconData {
    let size = 32;
    let mut rgba = vec![0u8; size * size * 4];
    let c = (size as f32 - 1.0) / 2.0;

    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;
            let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();

            let color = if (11.0..15.0).contains(&d) {
                Some([0, 212, 255])
            } else if d < 6.0 {
                Some([255, 102, 0])
            } else {
                None
            };

            if let Some([r, g, b]) = color {
                rgba[idx] = r;
                rgba[idx + 1] = g;
                rgba[idx + 2] = b;
                rgba[idx + 3] = 255;
            }
        }
    }

    egui::IconData {
        rgba,
        width: size as u32,
        height: size as u32,
    }
}
