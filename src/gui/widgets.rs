//! HUD widgets
//!
//! Each widget paints into a fixed-size rect with the painter; geometry comes
//! from the GUI-independent [`crate::gauge`] and [`crate::history`] modules.

use super::theme::{self, HudColors};
use crate::code_stream::CodeScroller;
use crate::gauge::ArcGauge;
use crate::history::{polyline, ValueRange};
use egui::epaint::PathShape;
use egui::{
    Align2, Color32, FontId, Pos2, Rect, Response, RichText, Sense, Shape, Stroke, TextureHandle,
    Ui, Vec2, Widget,
};

fn pos((x, y): (f32, f32)) -> Pos2 {
    Pos2::new(x, y)
}

/// Semicircular gauge with ticks, needle and a glow arc at high load
pub struct ArcGaugeWidget {
    gauge: ArcGauge,
    color: Color32,
    size: Vec2,
    radius: f32,
}

impl ArcGaugeWidget {
    pub fn new(gauge: ArcGauge) -> Self {
        Self {
            gauge,
            color: HudColors::PRIMARY,
            size: Vec2::new(210.0, 130.0),
            radius: 85.0,
        }
    }

    pub fn color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }
}

impl Widget for ArcGaugeWidget {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let center = (rect.center().x, rect.max.y - 15.0);
            let radius = self.radius;

            // Background track
            let track: Vec<Pos2> = ArcGauge::track(center, radius, 48)
                .into_iter()
                .map(pos)
                .collect();
            painter.add(PathShape::line(track, Stroke::new(3.0, HudColors::TEXT_DIM)));

            for (inner, outer) in ArcGauge::ticks(center, radius) {
                painter.line_segment([pos(inner), pos(outer)], Stroke::new(1.0, HudColors::TEXT_DIM));
            }

            let segments = ((self.gauge.extent_degrees() / 4.0) as usize).max(2);
            if self.gauge.extent_degrees() > 0.0 {
                let arc: Vec<Pos2> = self
                    .gauge
                    .value_arc(center, radius, segments)
                    .into_iter()
                    .map(pos)
                    .collect();
                painter.add(PathShape::line(arc, Stroke::new(4.0, self.color)));
            }

            if let Some(glow) = self.gauge.glow() {
                let inner: Vec<Pos2> = self
                    .gauge
                    .value_arc(center, radius - 5.0, segments)
                    .into_iter()
                    .map(pos)
                    .collect();
                painter.add(PathShape::line(
                    inner,
                    Stroke::new(2.0, theme::glow_color(glow, self.color)),
                ));
            }

            let needle = self.gauge.needle(center, radius);
            painter.line_segment([pos(center), pos(needle)], Stroke::new(2.0, self.color));
            painter.circle_filled(pos(center), 4.0, self.color);
        }

        response
    }
}

/// Line graph of one or more series sharing a vertical scale
pub struct HistoryGraph {
    series: Vec<(Vec<f32>, Color32)>,
    height: f32,
    padding: f32,
}

impl HistoryGraph {
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            height: 80.0,
            padding: 5.0,
        }
    }

    pub fn series(mut self, values: Vec<f32>, color: Color32) -> Self {
        self.series.push((values, color));
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    fn shared_range(&self) -> Option<ValueRange> {
        self.series
            .iter()
            .filter_map(|(values, _)| ValueRange::from_values(values))
            .reduce(ValueRange::merge)
    }
}

impl Default for HistoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for HistoryGraph {
    fn ui(self, ui: &mut Ui) -> Response {
        let desired_size = Vec2::new(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, HudColors::SECONDARY));

            // Dashed grid, four rows
            let graph_height = rect.height() - 2.0 * self.padding;
            for i in 0..4 {
                let y = rect.min.y + self.padding + graph_height * i as f32 / 3.0;
                painter.extend(Shape::dashed_line(
                    &[
                        Pos2::new(rect.min.x + self.padding, y),
                        Pos2::new(rect.max.x - self.padding, y),
                    ],
                    Stroke::new(1.0, HudColors::TEXT_DIM),
                    1.0,
                    3.0,
                ));
            }

            if let Some(range) = self.shared_range() {
                for (values, color) in &self.series {
                    if values.len() < 2 {
                        continue;
                    }
                    let points: Vec<Pos2> =
                        polyline(values, range, rect.width(), rect.height(), self.padding)
                            .into_iter()
                            .map(|(x, y)| rect.min + Vec2::new(x, y))
                            .collect();
                    painter.add(PathShape::line(points, Stroke::new(1.0, *color)));
                }
            }
        }

        response
    }
}

/// Scrolling code column with a `< TITLE >` header
pub struct CodePanel<'a> {
    title: &'a str,
    lines: &'a [String],
    scroller: &'a CodeScroller,
    size: Vec2,
}

impl<'a> CodePanel<'a> {
    pub const LINE_HEIGHT: f32 = 12.0;

    pub fn new(title: &'a str, lines: &'a [String], scroller: &'a CodeScroller) -> Self {
        Self {
            title,
            lines,
            scroller,
            size: Vec2::new(155.0, 120.0),
        }
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }
}

impl Widget for CodePanel<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, HudColors::CODE_BACKGROUND);
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, HudColors::SECONDARY));
            painter.text(
                Pos2::new(rect.center().x, rect.min.y + 3.0),
                Align2::CENTER_TOP,
                format!("< {} >", self.title),
                theme::small_font(),
                HudColors::SECONDARY,
            );

            let body = Rect::from_min_max(
                Pos2::new(rect.min.x + 1.0, rect.min.y + 18.0),
                Pos2::new(rect.max.x - 1.0, rect.max.y - 1.0),
            );
            let body_painter = ui.painter_at(body);
            let rows = CodeScroller::rows_for_height(body.height(), Self::LINE_HEIGHT);

            for line in self.scroller.visible(self.lines, rows) {
                let color = if line.faded {
                    HudColors::CODE_FADED
                } else {
                    HudColors::CODE_BRIGHT
                };
                body_painter.text(
                    Pos2::new(body.min.x + 3.0, body.min.y + line.y_offset * Self::LINE_HEIGHT),
                    Align2::LEFT_TOP,
                    line.text,
                    theme::code_font(),
                    color,
                );
            }
        }

        response
    }
}

/// Framed viewport showing the current model frame
pub struct ModelView<'a> {
    texture: Option<&'a TextureHandle>,
    size: Vec2,
}

impl<'a> ModelView<'a> {
    pub fn new(texture: Option<&'a TextureHandle>) -> Self {
        Self {
            texture,
            size: Vec2::new(320.0, 300.0),
        }
    }
}

impl Widget for ModelView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, HudColors::MODEL_BACKGROUND);
            painter.rect_stroke(rect, 0.0, Stroke::new(2.0, HudColors::PRIMARY));

            match self.texture {
                Some(texture) => {
                    // Square frames, fitted inside the border
                    let inner = rect.shrink(2.0);
                    let tex_size = texture.size_vec2();
                    let scale = (inner.width() / tex_size.x)
                        .min(inner.height() / tex_size.y)
                        .min(1.0);
                    let image_rect = Rect::from_center_size(rect.center(), tex_size * scale);
                    painter.image(
                        texture.id(),
                        image_rect,
                        Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
                None => {
                    painter.text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        "NO MODEL DATA",
                        theme::hud_font(),
                        HudColors::TEXT_DIM,
                    );
                }
            }
        }

        response
    }
}

/// Outlined progress bar of the loading screen
pub struct LoadingBar {
    progress: f32,
    size: Vec2,
}

impl LoadingBar {
    pub fn new(progress: f32) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0),
            size: Vec2::new(300.0, 20.0),
        }
    }
}

impl Widget for LoadingBar {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, HudColors::PRIMARY));
            let inner = rect.shrink(2.0);
            let fill = Rect::from_min_size(
                inner.min,
                Vec2::new(inner.width() * self.progress, inner.height()),
            );
            if fill.width() > 0.0 {
                painter.rect_filled(fill, 0.0, HudColors::PRIMARY);
            }
        }

        response
    }
}

/// Decorative header line ending in a ring
pub struct HeaderOrnament {
    ring_first: bool,
}

impl HeaderOrnament {
    /// Line then ring, for the left side of the title
    pub fn left() -> Self {
        Self { ring_first: false }
    }

    /// Ring then line, for the right side of the title
    pub fn right() -> Self {
        Self { ring_first: true }
    }
}

impl Widget for HeaderOrnament {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(Vec2::new(150.0, 30.0), Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let y = rect.center().y;
            let (line, ring_x) = if self.ring_first {
                (rect.min.x + 10.0..=rect.max.x, rect.min.x + 5.0)
            } else {
                (rect.min.x..=rect.max.x - 10.0, rect.max.x - 5.0)
            };
            painter.hline(line, y, Stroke::new(1.0, HudColors::PRIMARY));
            painter.circle_stroke(Pos2::new(ring_x, y), 5.0, Stroke::new(2.0, HudColors::PRIMARY));
        }

        response
    }
}

/// `LABEL:` on the left, value on the right
pub fn stat_row(
    ui: &mut Ui,
    label: &str,
    label_font: FontId,
    value: &str,
    value_font: FontId,
    color: Color32,
) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("{}:", label))
                .font(label_font)
                .color(HudColors::TEXT_DIM),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(value).font(value_font).color(color));
        });
    });
}

/// Centered section title
pub fn section_title(ui: &mut Ui, title: &str, color: Color32) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(title).font(theme::label_font()).color(color));
    });
}

/// One-pixel divider in the secondary color
pub fn divider(ui: &mut Ui) {
    ui.add_space(8.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 1.0), Sense::hover());
    ui.painter().rect_filled(rect, 0.0, HudColors::SECONDARY);
    ui.add_space(8.0);
}
