//! Configuration management for the HUD monitor
//!
//! Cadences, history length, asset locations and window geometry, persisted as
//! TOML. Every key is optional; missing keys take their defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Timer cadences
    #[serde(default)]
    pub general: GeneralConfig,
    /// Rolling history options
    #[serde(default)]
    pub history: HistoryConfig,
    /// Frame and code-stream assets
    #[serde(default)]
    pub assets: AssetConfig,
    /// Window geometry
    #[serde(default)]
    pub window: WindowConfig,
}

/// Timer cadences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Metric sampling interval in milliseconds
    #[serde(default = "default_sample_interval")]
    pub sample_interval_ms: u64,
    /// Model animation interval in milliseconds
    #[serde(default = "default_animation_interval")]
    pub animation_interval_ms: u64,
    /// Code panel scroll interval in milliseconds
    #[serde(default = "default_code_scroll_interval")]
    pub code_scroll_interval_ms: u64,
}

/// Rolling history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of samples kept per metric
    #[serde(default = "default_history_length")]
    pub length: usize,
}

/// Asset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Directory holding the pre-rendered `frame_*.png` images.
    /// Relative paths are taken from the executable's directory.
    #[serde(default = "default_frames_dir")]
    pub frames_dir: PathBuf,
    /// File name prefix of frame images
    #[serde(default = "default_frame_prefix")]
    pub frame_prefix: String,
    /// Frames are resized to a square of this many pixels
    #[serde(default = "default_frame_size")]
    pub frame_size: u32,
    /// Code-line cache file name, resolved inside `frames_dir`
    #[serde(default = "default_code_cache_file")]
    pub code_cache_file: String,
    /// Directory scanned for source lines when the cache is missing.
    /// Relative paths are taken from the executable's directory.
    #[serde(default = "default_code_source_dir")]
    pub code_source_dir: PathBuf,
}

/// Window geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: f32,
    #[serde(default = "default_window_height")]
    pub height: f32,
    #[serde(default = "default_window_title")]
    pub title: String,
}

// Default value functions
fn default_sample_interval() -> u64 {
    1000 // 1 Hz
}

fn default_animation_interval() -> u64 {
    50 // 20 fps
}

fn default_code_scroll_interval() -> u64 {
    80
}

fn default_history_length() -> usize {
    60 // 60 seconds at 1 Hz
}

fn default_frames_dir() -> PathBuf {
    PathBuf::from("ironman").join("cache")
}

fn default_frame_prefix() -> String {
    "frame_".to_string()
}

fn default_frame_size() -> u32 {
    300
}

fn default_code_cache_file() -> String {
    "code_lines.txt".to_string()
}

fn default_code_source_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_window_width() -> f32 {
    1024.0
}

fn default_window_height() -> f32 {
    768.0
}

fn default_window_title() -> String {
    "J.A.R.V.I.S. SYSTEM MONITOR".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval(),
            animation_interval_ms: default_animation_interval(),
            code_scroll_interval_ms: default_code_scroll_interval(),
        }
    }
}

impl GeneralConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    pub fn code_scroll_interval(&self) -> Duration {
        Duration::from_millis(self.code_scroll_interval_ms)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            length: default_history_length(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            frames_dir: default_frames_dir(),
            frame_prefix: default_frame_prefix(),
            frame_size: default_frame_size(),
            code_cache_file: default_code_cache_file(),
            code_source_dir: default_code_source_dir(),
        }
    }
}

impl AssetConfig {
    /// Full path of the code-line cache
    pub fn code_cache_path(&self) -> PathBuf {
        self.frames_dir.join(&self.code_cache_file)
    }

    /// Copy with relative asset directories anchored at the executable's
    /// directory, so the working directory never decides what gets scanned
    pub fn resolved(&self) -> Self {
        match install_dir() {
            Some(base) => self.resolved_against(&base),
            None => {
                log::warn!("could not locate the executable, asset paths stay relative");
                self.clone()
            }
        }
    }

    /// Copy with relative asset directories joined onto `base`
    pub fn resolved_against(&self, base: &Path) -> Self {
        let anchor = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        Self {
            frames_dir: anchor(&self.frames_dir),
            code_source_dir: anchor(&self.code_source_dir),
            ..self.clone()
        }
    }
}

/// Directory containing the running executable
fn install_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            title: default_window_title(),
        }
    }
}

impl Config {
    /// Get the default configuration directory
    ///
    /// Returns `~/.config/jarvis-monitor` on Unix-like systems,
    /// or `%APPDATA%\jarvis-monitor` on Windows.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(windows) {
            std::env::var("APPDATA")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        } else {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from(".config"))
        };

        Ok(config_dir.join("jarvis-monitor"))
    }

    /// Load configuration from the default path, falling back to defaults
    /// when no file exists
    pub fn load() -> Result<Self> {
        let config_file = Self::default_path()?.join("config.toml");

        if !config_file.exists() {
            log::debug!("no config at {}, using defaults", config_file.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::default_path()?;
        std::fs::create_dir_all(&config_dir)?;
        self.save_to(&config_dir.join("config.toml"))
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values that would stall a timer or empty a history
    pub fn validate(&self) -> Result<()> {
        let g = &self.general;
        if g.sample_interval_ms == 0 || g.animation_interval_ms == 0 || g.code_scroll_interval_ms == 0
        {
            return Err(Error::Config("intervals must be greater than zero".to_string()));
        }
        if self.history.length == 0 {
            return Err(Error::Config("history length must be greater than zero".to_string()));
        }
        if self.assets.frame_size == 0 {
            return Err(Error::Config("frame size must be greater than zero".to_string()));
        }
        Ok(())
    }
}
