//! # J.A.R.V.I.S. System Monitor (jarvis)
//!
//! A HUD-style desktop system monitor: CPU, memory, network, battery and
//! process metrics sampled once per second into rolling 60-sample buffers,
//! drawn as arc gauges and line graphs around an animated model view with
//! scrolling code panels.
//!
//! ## Features
//!
//! - **Metric sampling**: procfs/sysfs readers on Linux behind the
//!   [`MetricSource`] trait; unavailable metrics degrade to placeholders
//! - **Rolling histories**: fixed-capacity FIFO buffers with graph scaling
//! - **Model animation**: pre-rendered PNG frames cycled at 20 Hz
//! - **Code stream**: two decorative panels scrolling sampled source lines
//! - **GUI** (feature `gui`): eframe/egui HUD window
//! - **CLI** (feature `cli`): text/JSON snapshots without a window
//!
//! ## Quick Start
//!
//! ```no_run
//! use jarvis::{metrics, Sampler};
//! use std::time::{Duration, Instant};
//!
//! let mut sampler = Sampler::new(metrics::platform_source(), 60);
//! std::thread::sleep(Duration::from_secs(1));
//! let snapshot = sampler.tick(Instant::now());
//!
//! println!("CPU: {:.1}%", snapshot.cpu_percent);
//! println!("Memory: {}", snapshot.memory_detail());
//! println!("Battery: {}", snapshot.battery);
//! ```
//!
//! ### Frame animation
//!
//! ```no_run
//! use jarvis::frames::{FrameCycler, FrameLoader};
//! use std::path::Path;
//!
//! let mut loader = FrameLoader::from_dir(Path::new("ironman/cache"), "frame_", 300);
//! while loader.step() {
//!     println!("loading: {:.0}%", loader.progress() * 100.0);
//! }
//! let frames = loader.finish();
//! let mut cycler = FrameCycler::new(frames.len());
//! if let Some(index) = cycler.advance() {
//!     let _frame = frames.get(index);
//! }
//! ```

pub mod cadence; // Fixed-rate tickers for the repaint loop
pub mod code_stream; // Scrolling code panel content
pub mod config; // Configuration management with TOML persistence
pub mod error;
pub mod format;
pub mod frames; // Pre-rendered model frames
pub mod gauge; // Arc gauge geometry
pub mod history; // Rolling sample buffers and graph scaling
pub mod metrics; // Host metric sources
pub mod sampler;

#[cfg(feature = "gui")]
pub mod gui; // Graphical UI

pub use cadence::Ticker;
pub use code_stream::{CodeScroller, ScrollDirection};
pub use config::{AssetConfig, Config, GeneralConfig, HistoryConfig, WindowConfig};
pub use error::{Error, Result};
pub use frames::{FrameCycler, FrameLoader, FrameSequence};
pub use gauge::{ArcGauge, Glow};
pub use history::{HistoryBuffer, MetricSample, SampleHistory, ValueRange};
pub use metrics::{
    BatteryState, CpuTimes, GpuStatus, MemoryReading, MetricSource, NetCounters, PlatformSource,
    SwapReading, SystemInfo, UnsupportedSource,
};
pub use sampler::{Sampler, Snapshot, TopProcess};
