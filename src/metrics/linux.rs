//! Linux metric source backed by procfs and sysfs

use super::procfs::{self, PowerSupplyEntry};
use super::{
    BatteryState, CpuTimes, MemoryReading, MetricSource, NetCounters, ProcessTimes, SwapReading,
};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read file contents as string, trimming whitespace
fn read_file_string<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}

/// Reads host counters from `/proc` and `/sys`
///
/// The roots are configurable so a fake tree can stand in for the real one.
#[derive(Debug, Clone)]
pub struct ProcSource {
    proc_root: PathBuf,
    sys_root: PathBuf,
}

impl Default for ProcSource {
    fn default() -> Self {
        Self::with_roots("/proc", "/sys")
    }
}

impl ProcSource {
    pub fn with_roots(proc_root: impl Into<PathBuf>, sys_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
        }
    }

    fn proc_path(&self, rel: &str) -> PathBuf {
        self.proc_root.join(rel)
    }

    fn read_meminfo(&self) -> Result<(MemoryReading, SwapReading)> {
        let content = fs::read_to_string(self.proc_path("meminfo"))?;
        procfs::parse_meminfo(&content)
    }

    /// Mean of `scaling_cur_freq` (kHz) across cores
    fn sysfs_frequency_mhz(&self) -> Option<f32> {
        let cpu_dir = self.sys_root.join("devices/system/cpu");
        let entries = fs::read_dir(&cpu_dir).ok()?;

        let mut total_khz = 0u64;
        let mut count = 0u64;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(index) = name.strip_prefix("cpu") else {
                continue;
            };
            if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let freq_path = entry.path().join("cpufreq/scaling_cur_freq");
            if let Ok(khz) = read_file_string(&freq_path).and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| Error::Parse(format!("scaling_cur_freq: {}", e)))
            }) {
                total_khz += khz;
                count += 1;
            }
        }

        if count == 0 {
            None
        } else {
            Some(total_khz as f32 / count as f32 / 1000.0)
        }
    }

    fn read_power_supplies(&self) -> Result<Vec<PowerSupplyEntry>> {
        let dir = self.sys_root.join("class/power_supply");
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            // desktops and containers often have no power_supply class at all
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut supplies = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let attr = |name: &str| read_file_string(path.join(name)).ok();

            let kind = attr("type").unwrap_or_default().to_lowercase();
            supplies.push(PowerSupplyEntry {
                kind,
                online: attr("online").map(|s| s == "1"),
                capacity: attr("capacity").and_then(|s| s.parse::<f32>().ok()),
                status: attr("status").map(|s| s.to_lowercase()),
            });
        }
        Ok(supplies)
    }
}

impl MetricSource for ProcSource {
    fn cpu_times(&mut self) -> Result<CpuTimes> {
        let content = fs::read_to_string(self.proc_path("stat"))?;
        procfs::parse_cpu_times(&content)
    }

    fn cpu_count(&mut self) -> Result<usize> {
        Ok(num_cpus::get())
    }

    fn cpu_frequency_mhz(&mut self) -> Result<f32> {
        if let Some(mhz) = self.sysfs_frequency_mhz() {
            return Ok(mhz);
        }
        let cpuinfo = fs::read_to_string(self.proc_path("cpuinfo"))?;
        procfs::parse_cpuinfo_mhz(&cpuinfo)
            .ok_or_else(|| Error::not_supported("cpu frequency"))
    }

    fn memory(&mut self) -> Result<MemoryReading> {
        self.read_meminfo().map(|(mem, _)| mem)
    }

    fn swap(&mut self) -> Result<SwapReading> {
        self.read_meminfo().map(|(_, swap)| swap)
    }

    fn network_counters(&mut self) -> Result<NetCounters> {
        let content = fs::read_to_string(self.proc_path("net/dev"))?;
        procfs::parse_net_dev(&content)
    }

    fn battery(&mut self) -> Result<BatteryState> {
        let supplies = self.read_power_supplies()?;
        Ok(procfs::battery_from_supplies(&supplies))
    }

    fn processes(&mut self) -> Result<Vec<ProcessTimes>> {
        let mut processes = Vec::new();
        for entry in fs::read_dir(&self.proc_root)?.flatten() {
            let Some(pid) = entry
                .file_name()
                .to_str()
                .and_then(|s| s.parse::<u32>().ok())
            else {
                continue;
            };
            // processes can exit between read_dir and the read
            let Ok(stat) = fs::read_to_string(entry.path().join("stat")) else {
                continue;
            };
            match procfs::parse_pid_stat(&stat) {
                Ok((name, cpu_ticks)) => processes.push(ProcessTimes {
                    pid,
                    name,
                    cpu_ticks,
                }),
                Err(e) => log::trace!("skipping pid {}: {}", pid, e),
            }
        }
        Ok(processes)
    }

    fn self_rss_bytes(&mut self) -> Result<u64> {
        let status = fs::read_to_string(self.proc_path("self/status"))?;
        procfs::parse_vm_rss(&status)
    }
}
