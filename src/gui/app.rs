//! Application state and layout of the HUD window

use eframe::egui;
use egui::{Align, Layout, RichText, TextureHandle, Vec2};
use std::time::{Duration, Instant};

use super::theme::{self, HudColors};
use super::widgets::{
    divider, section_title, stat_row, ArcGaugeWidget, CodePanel, HeaderOrnament, HistoryGraph,
    LoadingBar, ModelView,
};

use crate::cadence::Ticker;
use crate::code_stream::{self, CodeScroller, ScrollDirection};
use crate::config::Config;
use crate::format::{format_bytes, format_percent, format_speed};
use crate::frames::{FrameCycler, FrameLoader, FrameSequence};
use crate::gauge::ArcGauge;
use crate::metrics::{self, GpuStatus, PlatformSource, SystemInfo};
use crate::sampler::{Sampler, Snapshot};

const STATUS_ROW: [(&str, egui::Color32); 4] = [
    ("POWER: ONLINE", HudColors::PRIMARY),
    ("WEAPONS: STANDBY", HudColors::WARNING),
    ("FLIGHT: READY", HudColors::ACCENT),
    ("J.A.R.V.I.S.: ACTIVE", HudColors::PRIMARY),
];

/// Startup work is spread over repaints so the loading screen stays live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    LoadingFrames,
    LoadingCode,
    SettingUp,
    Dashboard,
}

/// Main application state
pub struct JarvisApp {
    config: Config,
    stage: Stage,
    progress: f32,
    status: String,

    frame_loader: Option<FrameLoader>,
    frames: Vec<TextureHandle>,
    cycler: FrameCycler,
    shown_frame: Option<usize>,

    code_lines: Vec<String>,
    sys_scan: CodeScroller,
    data_stream: CodeScroller,

    sampler: Sampler<PlatformSource>,
    snapshot: Option<Snapshot>,
    gpu: GpuStatus,
    system_info: SystemInfo,

    sample_ticker: Ticker,
    animation_ticker: Ticker,
    code_ticker: Ticker,
}

impl JarvisApp {
    pub fn new(cc: &eframe::CreationContext<'_>, mut config: Config) -> Self {
        theme::apply_hud_theme(&cc.egui_ctx);
        config.assets = config.assets.resolved();

        let frame_loader = FrameLoader::from_dir(
            &config.assets.frames_dir,
            &config.assets.frame_prefix,
            config.assets.frame_size,
        );
        let sampler = Sampler::new(metrics::platform_source(), config.history.length);

        Self {
            stage: Stage::LoadingFrames,
            progress: 0.1,
            status: "Loading pre-rendered frames...".to_string(),
            frame_loader: Some(frame_loader),
            frames: Vec::new(),
            cycler: FrameCycler::default(),
            shown_frame: None,
            code_lines: Vec::new(),
            sys_scan: CodeScroller::new(ScrollDirection::Up),
            data_stream: CodeScroller::new(ScrollDirection::Down),
            sampler,
            snapshot: None,
            gpu: metrics::gpu_status(),
            system_info: SystemInfo::collect(),
            sample_ticker: Ticker::new(config.general.sample_interval()),
            animation_ticker: Ticker::new(config.general.animation_interval()),
            code_ticker: Ticker::new(config.general.code_scroll_interval()),
            config,
        }
    }

    /// Do one unit of startup work
    fn step_loading(&mut self, ctx: &egui::Context) {
        match self.stage {
            Stage::LoadingFrames => {
                let Some(loader) = self.frame_loader.as_mut() else {
                    self.stage = Stage::LoadingCode;
                    return;
                };
                if loader.step() {
                    self.progress = 0.1 + loader.progress() * 0.5;
                    self.status = format!(
                        "Loading frames... {}/{}",
                        loader.processed(),
                        loader.total()
                    );
                } else if let Some(loader) = self.frame_loader.take() {
                    self.frames = upload_frames(ctx, loader.finish());
                    self.cycler = FrameCycler::new(self.frames.len());
                    self.progress = 0.6;
                    self.status = "Scanning code files...".to_string();
                    self.stage = Stage::LoadingCode;
                }
            }
            Stage::LoadingCode => {
                self.code_lines = code_stream::load_or_generate(
                    &self.config.assets.code_cache_path(),
                    &self.config.assets.code_source_dir,
                );
                self.progress = 0.8;
                self.status = "Setting up interface...".to_string();
                self.stage = Stage::SettingUp;
            }
            Stage::SettingUp => {
                self.progress = 1.0;
                self.stage = Stage::Dashboard;
                log::info!("HUD online");
            }
            Stage::Dashboard => {}
        }
    }

    fn poll_tickers(&mut self, now: Instant) {
        if self.sample_ticker.poll(now) {
            self.snapshot = Some(self.sampler.tick(now));
        }
        if self.animation_ticker.poll(now) {
            self.shown_frame = self.cycler.advance();
        }
        if self.code_ticker.poll(now) {
            self.sys_scan.advance(self.code_lines.len());
            self.data_stream.advance(self.code_lines.len());
        }
    }

    /// Time until the earliest ticker fires
    fn next_deadline(&self, now: Instant) -> Duration {
        [
            self.sample_ticker.time_until_next(now),
            self.animation_ticker.time_until_next(now),
            self.code_ticker.time_until_next(now),
        ]
        .into_iter()
        .min()
        .unwrap_or(Duration::ZERO)
    }

    fn draw_loading(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let top = (ui.available_height() / 2.0 - 110.0).max(0.0);
            ui.add_space(top);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("J.A.R.V.I.S.")
                        .font(theme::title_font())
                        .strong()
                        .color(HudColors::PRIMARY),
                );
                ui.add_space(20.0);
                ui.label(
                    RichText::new("INITIALIZING SYSTEMS...")
                        .font(theme::loading_font())
                        .color(HudColors::TEXT_DIM),
                );
                ui.add_space(20.0);
                ui.add(LoadingBar::new(self.progress));
                ui.add_space(20.0);
                ui.label(
                    RichText::new(&self.status)
                        .font(theme::hud_font())
                        .color(HudColors::TEXT_DIM),
                );
            });
        });
    }

    fn draw_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(HeaderOrnament::left());
            let width = (ui.available_width() - 150.0).max(0.0);
            ui.allocate_ui_with_layout(
                Vec2::new(width, 48.0),
                Layout::top_down(Align::Center),
                |ui| {
                    ui.label(
                        RichText::new("J.A.R.V.I.S.")
                            .font(theme::title_font())
                            .strong()
                            .color(HudColors::PRIMARY),
                    );
                    ui.label(
                        RichText::new("SYSTEM MONITORING INTERFACE v3.0")
                            .font(theme::small_font())
                            .color(HudColors::TEXT_DIM),
                    );
                },
            );
            ui.add(HeaderOrnament::right());
        });
    }

    fn draw_vitals(&self, ui: &mut egui::Ui) {
        let (cpu, mem) = self
            .snapshot
            .as_ref()
            .map(|s| (s.cpu_percent, s.memory_percent))
            .unwrap_or_default();

        ui.vertical_centered(|ui| {
            section_title(ui, "CPU LOAD", HudColors::PRIMARY);
            ui.add(ArcGaugeWidget::new(ArcGauge::percent(cpu)).color(HudColors::PRIMARY));
            ui.label(
                RichText::new(format_percent(cpu))
                    .font(theme::value_font())
                    .strong()
                    .color(HudColors::PRIMARY),
            );
            let detail = self.snapshot.as_ref().map(|s| s.cpu_detail()).unwrap_or_default();
            ui.label(RichText::new(detail).font(theme::hud_font()).color(HudColors::TEXT_DIM));
            ui.add(
                HistoryGraph::new()
                    .series(self.sampler.cpu_history().values(), HudColors::PRIMARY)
                    .height(28.0),
            );
            ui.add_space(14.0);

            section_title(ui, "MEMORY USAGE", HudColors::ACCENT);
            ui.add(ArcGaugeWidget::new(ArcGauge::percent(mem)).color(HudColors::ACCENT));
            ui.label(
                RichText::new(format_percent(mem))
                    .font(theme::value_font())
                    .strong()
                    .color(HudColors::ACCENT),
            );
            let detail = self.snapshot.as_ref().map(|s| s.memory_detail()).unwrap_or_default();
            ui.label(RichText::new(detail).font(theme::hud_font()).color(HudColors::TEXT_DIM));
            ui.add(
                HistoryGraph::new()
                    .series(self.sampler.mem_history().values(), HudColors::ACCENT)
                    .height(28.0),
            );
            ui.add_space(14.0);

            section_title(ui, "GPU STATUS", HudColors::WARNING);
            ui.label(
                RichText::new(&self.gpu.status)
                    .font(theme::value_font())
                    .strong()
                    .color(HudColors::WARNING),
            );
            ui.label(
                RichText::new(&self.gpu.detail)
                    .font(theme::hud_font())
                    .color(HudColors::TEXT_DIM),
            );
        });
    }

    fn draw_suit(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("[ MARK III SUIT STATUS ]")
                    .font(theme::hud_font())
                    .color(HudColors::PRIMARY),
            );
            let texture = self.shown_frame.and_then(|i| self.frames.get(i));
            ui.add(ModelView::new(texture));
        });
        ui.add_space(6.0);

        let code_height = (ui.available_height() - 34.0).max(60.0);
        let centered = Layout::left_to_right(Align::Min).with_main_align(Align::Center);
        ui.allocate_ui_with_layout(
            Vec2::new(ui.available_width(), code_height),
            centered,
            |ui| {
                let size = Vec2::new(155.0, code_height);
                ui.add(CodePanel::new("SYS.SCAN", &self.code_lines, &self.sys_scan).size(size));
                ui.add(
                    CodePanel::new("DATA.STREAM", &self.code_lines, &self.data_stream).size(size),
                );
            },
        );
        ui.add_space(6.0);

        ui.allocate_ui_with_layout(
            Vec2::new(ui.available_width(), 20.0),
            Layout::left_to_right(Align::Center).with_main_align(Align::Center),
            |ui| {
                ui.spacing_mut().item_spacing.x = 16.0;
                for (label, color) in STATUS_ROW {
                    ui.label(RichText::new(label).font(theme::small_font()).color(color));
                }
            },
        );
    }

    fn draw_telemetry(&self, ui: &mut egui::Ui) {
        let snap = self.snapshot.as_ref();

        section_title(ui, "NETWORK I/O", HudColors::PRIMARY);
        ui.add(
            HistoryGraph::new()
                .series(self.sampler.net_down_history().values(), HudColors::PRIMARY)
                .series(self.sampler.net_up_history().values(), HudColors::ACCENT)
                .height(80.0),
        );

        let speed = |rate: Option<f64>| format_speed(rate.unwrap_or(0.0));
        stat_row(
            ui,
            "UP",
            theme::hud_font(),
            &speed(snap.and_then(|s| s.net_up)),
            theme::label_font(),
            HudColors::ACCENT,
        );
        stat_row(
            ui,
            "DOWN",
            theme::hud_font(),
            &speed(snap.and_then(|s| s.net_down)),
            theme::label_font(),
            HudColors::PRIMARY,
        );

        let totals = snap.and_then(|s| s.net_totals).unwrap_or_default();
        stat_row(
            ui,
            "TOTAL TX",
            theme::small_font(),
            &format_bytes(totals.bytes_sent),
            theme::small_font(),
            HudColors::ACCENT,
        );
        stat_row(
            ui,
            "TOTAL RX",
            theme::small_font(),
            &format_bytes(totals.bytes_recv),
            theme::small_font(),
            HudColors::PRIMARY,
        );

        divider(ui);
        section_title(ui, "SYSTEM INFO", HudColors::PRIMARY);
        for (label, value) in self.system_info.rows() {
            stat_row(
                ui,
                label,
                theme::small_font(),
                value,
                theme::hud_font(),
                HudColors::PRIMARY,
            );
        }

        divider(ui);
        section_title(ui, "LIVE STATS", HudColors::PRIMARY);
        let live = [
            ("SWAP", snap.map(|s| s.swap_label()), HudColors::PRIMARY),
            ("PROCS", snap.map(|s| s.process_label()), HudColors::PRIMARY),
            ("BATTERY", snap.map(|s| s.battery.to_string()), HudColors::WARNING),
            ("TOP", snap.map(|s| s.top_label().to_string()), HudColors::ACCENT),
        ];
        for (label, value, color) in live {
            let value = value.unwrap_or_else(|| "...".to_string());
            stat_row(ui, label, theme::small_font(), &value, theme::small_font(), color);
        }
    }

    fn draw_footer(&self, ui: &mut egui::Ui) {
        let (time, proc_mem) = match &self.snapshot {
            Some(s) => (
                s.timestamp.format("SYS.TIME: %Y-%m-%d %H:%M:%S").to_string(),
                format!("PROC.MEM: {}", s.self_rss_label()),
            ),
            None => (String::new(), String::new()),
        };

        ui.columns(3, |cols| {
            cols[0].label(RichText::new(time).font(theme::hud_font()).color(HudColors::TEXT_DIM));
            cols[1].vertical_centered(|ui| {
                ui.label(
                    RichText::new("ALL SYSTEMS OPERATIONAL")
                        .font(theme::hud_font())
                        .color(HudColors::PRIMARY),
                );
            });
            cols[2].with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(
                    RichText::new(proc_mem)
                        .font(theme::hud_font())
                        .color(HudColors::TEXT_DIM),
                );
            });
        });
    }
}

/// Upload decoded frames as GPU textures
fn upload_frames(ctx: &egui::Context, frames: FrameSequence) -> Vec<TextureHandle> {
    frames
        .into_frames()
        .into_iter()
        .enumerate()
        .map(|(i, frame)| {
            let size = [frame.width() as usize, frame.height() as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
            ctx.load_texture(format!("model-frame-{}", i), image, egui::TextureOptions::LINEAR)
        })
        .collect()
}

impl eframe::App for JarvisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.stage != Stage::Dashboard {
            self.step_loading(ctx);
            self.draw_loading(ctx);
            ctx.request_repaint();
            return;
        }

        let now = Instant::now();
        self.poll_tickers(now);

        let panel_frame = egui::Frame::none()
            .fill(HudColors::BACKGROUND)
            .inner_margin(egui::Margin::same(10.0));

        egui::TopBottomPanel::top("header")
            .frame(panel_frame)
            .show(ctx, |ui| self.draw_header(ui));

        egui::TopBottomPanel::bottom("footer")
            .frame(panel_frame)
            .show(ctx, |ui| self.draw_footer(ui));

        egui::SidePanel::left("vitals")
            .exact_width(250.0)
            .resizable(false)
            .frame(panel_frame)
            .show(ctx, |ui| self.draw_vitals(ui));

        egui::SidePanel::right("telemetry")
            .exact_width(280.0)
            .resizable(false)
            .frame(panel_frame)
            .show(ctx, |ui| self.draw_telemetry(ui));

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| self.draw_suit(ui));

        ctx.request_repaint_after(self.next_deadline(Instant::now()));
    }
}
