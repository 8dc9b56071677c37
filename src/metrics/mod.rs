//! Host metric sources
//!
//! [`MetricSource`] is the seam between the sampler and the operating system.
//! On Linux [`ProcSource`] reads procfs/sysfs; elsewhere every call reports
//! [`Error::NotSupported`](crate::Error::NotSupported) and the sampler shows
//! placeholders instead.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod gpu;
pub mod procfs;
pub mod system;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::ProcSource;

pub use gpu::{gpu_status, GpuStatus};
pub use system::SystemInfo;

/// Aggregate CPU time counters since boot (clock ticks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    /// Ticks spent doing work (everything except idle and iowait)
    pub busy: u64,
    /// All ticks
    pub total: u64,
}

impl CpuTimes {
    /// Busy percentage over the interval between `prev` and `self`
    pub fn utilization_since(&self, prev: &CpuTimes) -> f32 {
        let total = self.total.saturating_sub(prev.total);
        if total == 0 {
            return 0.0;
        }
        let busy = self.busy.saturating_sub(prev.busy).min(total);
        (busy as f64 / total as f64 * 100.0) as f32
    }
}

/// Physical memory reading, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReading {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

impl MemoryReading {
    pub fn usage_percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.used as f64 / self.total as f64 * 100.0) as f32
        }
    }
}

/// Swap reading, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReading {
    pub total: u64,
    pub used: u64,
}

impl SwapReading {
    /// 0 when the machine has no swap
    pub fn usage_percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.used as f64 / self.total as f64 * 100.0) as f32
        }
    }
}

/// Cumulative network byte counters across non-loopback interfaces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// Battery condition as shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatteryState {
    /// A battery is present
    Level { percent: f32, plugged: bool },
    /// Machine runs from mains only (desktop)
    NoBattery,
    /// Battery could not be queried
    Unavailable,
}

impl BatteryState {
    pub fn percent(&self) -> Option<f32> {
        match self {
            BatteryState::Level { percent, .. } => Some(*percent),
            _ => None,
        }
    }
}

impl fmt::Display for BatteryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatteryState::Level { percent, plugged } => {
                write!(f, "{:.0}%", percent)?;
                if *plugged {
                    write!(f, "⚡")?;
                }
                Ok(())
            }
            BatteryState::NoBattery => write!(f, "AC"),
            BatteryState::Unavailable => write!(f, "N/A"),
        }
    }
}

/// Cumulative CPU time of one process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTimes {
    pub pid: u32,
    pub name: String,
    /// utime + stime, in clock ticks
    pub cpu_ticks: u64,
}

/// Read-only access to host counters
///
/// Each call is independent; a failure in one metric must not affect the
/// others.
pub trait MetricSource {
    /// Aggregate CPU counters
    fn cpu_times(&mut self) -> Result<CpuTimes>;

    /// Logical CPU count
    fn cpu_count(&mut self) -> Result<usize>;

    /// Mean current frequency across cores, in MHz
    fn cpu_frequency_mhz(&mut self) -> Result<f32>;

    fn memory(&mut self) -> Result<MemoryReading>;

    fn swap(&mut self) -> Result<SwapReading>;

    fn network_counters(&mut self) -> Result<NetCounters>;

    /// `Ok(BatteryState::NoBattery)` on machines without a battery
    fn battery(&mut self) -> Result<BatteryState>;

    /// Every visible process with its cumulative CPU time
    fn processes(&mut self) -> Result<Vec<ProcessTimes>>;

    /// Resident set size of this process
    fn self_rss_bytes(&mut self) -> Result<u64>;
}

/// Source used on platforms without a native reader
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSource;

impl MetricSource for UnsupportedSource {
    fn cpu_times(&mut self) -> Result<CpuTimes> {
        Err(crate::Error::not_supported("cpu times"))
    }

    fn cpu_count(&mut self) -> Result<usize> {
        Ok(num_cpus::get())
    }

    fn cpu_frequency_mhz(&mut self) -> Result<f32> {
        Err(crate::Error::not_supported("cpu frequency"))
    }

    fn memory(&mut self) -> Result<MemoryReading> {
        Err(crate::Error::not_supported("memory"))
    }

    fn swap(&mut self) -> Result<SwapReading> {
        Err(crate::Error::not_supported("swap"))
    }

    fn network_counters(&mut self) -> Result<NetCounters> {
        Err(crate::Error::not_supported("network counters"))
    }

    fn battery(&mut self) -> Result<BatteryState> {
        Err(crate::Error::not_supported("battery"))
    }

    fn processes(&mut self) -> Result<Vec<ProcessTimes>> {
        Err(crate::Error::not_supported("process list"))
    }

    fn self_rss_bytes(&mut self) -> Result<u64> {
        Err(crate::Error::not_supported("process memory"))
    }
}

/// Native source for the current platform
#[cfg(target_os = "linux")]
pub type PlatformSource = ProcSource;

/// Native source for the current platform
#[cfg(not(target_os = "linux"))]
pub type PlatformSource = UnsupportedSource;

pub fn platform_source() -> PlatformSource {
    PlatformSource::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_utilization_since() {
        let prev = CpuTimes { busy: 100, total: 1000 };
        let now = CpuTimes { busy: 150, total: 1100 };
        assert_eq!(now.utilization_since(&prev), 50.0);
        assert_eq!(now.utilization_since(&now), 0.0);
        // counters went backwards (e.g. CPU hot-unplug)
        assert_eq!(prev.utilization_since(&now), 0.0);
    }

    #[test]
    fn test_memory_percent() {
        let mem = MemoryReading { total: 200, used: 50, available: 150 };
        assert_eq!(mem.usage_percent(), 25.0);
        assert_eq!(MemoryReading::default().usage_percent(), 0.0);
        assert_eq!(SwapReading::default().usage_percent(), 0.0);
    }

    #[test]
    fn test_battery_labels() {
        let charging = BatteryState::Level { percent: 84.6, plugged: true };
        assert_eq!(charging.to_string(), "85%⚡");
        let draining = BatteryState::Level { percent: 30.0, plugged: false };
        assert_eq!(draining.to_string(), "30%");
        assert_eq!(BatteryState::NoBattery.to_string(), "AC");
        assert_eq!(BatteryState::Unavailable.to_string(), "N/A");
        assert_eq!(BatteryState::NoBattery.percent(), None);
    }

    #[test]
    fn test_unsupported_source_reports_not_supported() {
        let mut source = UnsupportedSource;
        assert!(matches!(
            source.memory(),
            Err(crate::Error::NotSupported(_))
        ));
        assert!(source.battery().is_err());
        assert!(source.cpu_count().unwrap() >= 1);
    }
}
