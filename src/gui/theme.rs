//! HUD theme: dark navy background with cyan and arc-reactor orange accents

use crate::gauge::Glow;
use egui::{Color32, FontFamily, FontId, Stroke, Style, TextStyle, Visuals};

/// HUD color palette
pub struct HudColors;

impl HudColors {
    pub const BACKGROUND: Color32 = Color32::from_rgb(10, 10, 18);
    pub const PRIMARY: Color32 = Color32::from_rgb(0, 212, 255);
    pub const SECONDARY: Color32 = Color32::from_rgb(0, 153, 204);
    /// Arc reactor orange
    pub const ACCENT: Color32 = Color32::from_rgb(255, 102, 0);
    pub const WARNING: Color32 = Color32::from_rgb(255, 170, 0);
    pub const TEXT_DIM: Color32 = Color32::from_rgb(74, 106, 122);
    pub const GLOW: Color32 = Color32::from_rgb(0, 255, 255);

    pub const MODEL_BACKGROUND: Color32 = Color32::from_rgb(5, 8, 16);
    pub const CODE_BACKGROUND: Color32 = Color32::from_rgb(10, 15, 20);
    pub const CODE_BRIGHT: Color32 = Color32::from_rgb(0, 160, 192);
    pub const CODE_FADED: Color32 = Color32::from_rgb(26, 58, 74);
}

/// Color of the inner glow arc
pub fn glow_color(glow: Glow, base: Color32) -> Color32 {
    match glow {
        Glow::Normal => base,
        Glow::Warning => HudColors::WARNING,
    }
}

pub fn title_font() -> FontId {
    FontId::proportional(26.0)
}

pub fn loading_font() -> FontId {
    FontId::proportional(20.0)
}

pub fn value_font() -> FontId {
    FontId::proportional(18.0)
}

pub fn label_font() -> FontId {
    FontId::proportional(13.0)
}

pub fn small_font() -> FontId {
    FontId::proportional(10.5)
}

pub fn hud_font() -> FontId {
    FontId::monospace(11.5)
}

pub fn code_font() -> FontId {
    FontId::monospace(8.5)
}

/// Apply the HUD theme to the egui context
pub fn apply_hud_theme(ctx: &egui::Context) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    visuals.window_fill = HudColors::BACKGROUND;
    visuals.panel_fill = HudColors::BACKGROUND;
    visuals.faint_bg_color = HudColors::CODE_BACKGROUND;
    visuals.extreme_bg_color = HudColors::MODEL_BACKGROUND;

    visuals.widgets.noninteractive.bg_fill = HudColors::BACKGROUND;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, HudColors::TEXT_DIM);
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, HudColors::SECONDARY);

    visuals.selection.bg_fill = HudColors::SECONDARY.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, HudColors::PRIMARY);
    visuals.hyperlink_color = HudColors::PRIMARY;

    visuals.window_rounding = egui::Rounding::same(0.0);
    visuals.menu_rounding = egui::Rounding::same(0.0);

    style.visuals = visuals;

    style.text_styles = [
        (TextStyle::Small, small_font()),
        (TextStyle::Body, label_font()),
        (TextStyle::Button, label_font()),
        (TextStyle::Heading, title_font()),
        (TextStyle::Monospace, FontId::new(11.5, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.window_margin = egui::Margin::same(10.0);

    ctx.set_style(style);
}
