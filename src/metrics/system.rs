//! Static system information panel
//!
//! Collected once at startup. Every field degrades to `N/A` on its own.

use crate::format::truncate_chars;
use chrono::{Local, TimeZone};
use serde::Serialize;

const NA: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    /// OS name and release, e.g. `Linux 6.8.0-45-`
    pub os: String,
    pub arch: String,
    /// `physical C / logical T`
    pub cores: String,
    /// Root filesystem usage
    pub disk: String,
    /// Boot time as `MM/DD HH:MM`
    pub boot: String,
    pub host: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: NA.to_string(),
            arch: NA.to_string(),
            cores: NA.to_string(),
            disk: NA.to_string(),
            boot: NA.to_string(),
            host: NA.to_string(),
        }
    }
}

impl SystemInfo {
    pub fn collect() -> Self {
        let info = Self {
            os: os_label().unwrap_or_else(|| NA.to_string()),
            arch: std::env::consts::ARCH.to_string(),
            cores: format!("{}C / {}T", num_cpus::get_physical(), num_cpus::get()),
            disk: root_disk_percent()
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_else(|| NA.to_string()),
            boot: boot_time()
                .and_then(format_boot_time)
                .unwrap_or_else(|| NA.to_string()),
            host: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .map(|h| truncate_chars(&h, 12).to_string())
                .unwrap_or_else(|| NA.to_string()),
        };
        log::debug!("system info: {:?}", info);
        info
    }

    /// Label/value rows in display order
    pub fn rows(&self) -> [(&'static str, &str); 6] {
        [
            ("OS", self.os.as_str()),
            ("ARCH", self.arch.as_str()),
            ("CPU", self.cores.as_str()),
            ("DISK", self.disk.as_str()),
            ("BOOT", self.boot.as_str()),
            ("HOST", self.host.as_str()),
        ]
    }
}

/// `MM/DD HH:MM` in local time
pub fn format_boot_time(unix_secs: i64) -> Option<String> {
    Local
        .timestamp_opt(unix_secs, 0)
        .single()
        .map(|dt| dt.format("%m/%d %H:%M").to_string())
}

#[cfg(unix)]
fn os_label() -> Option<String> {
    let uts = nix::sys::utsname::uname().ok()?;
    let sysname = uts.sysname().to_string_lossy().into_owned();
    let release = uts.release().to_string_lossy().into_owned();
    Some(format!("{} {}", sysname, truncate_chars(&release, 10)))
}

#[cfg(not(unix))]
fn os_label() -> Option<String> {
    match std::env::consts::OS {
        "windows" => Some("Windows".to_string()),
        "" => None,
        other => Some(other.to_string()),
    }
}

/// Used percentage of `/`, counting only blocks available to unprivileged users
#[cfg(unix)]
fn root_disk_percent() -> Option<f32> {
    let stat = nix::sys::statvfs::statvfs("/").ok()?;
    let total = stat.blocks() as u64;
    let free = stat.blocks_free() as u64;
    let avail = stat.blocks_available() as u64;
    let used = total.saturating_sub(free);
    let usable = used + avail;
    if usable == 0 {
        return None;
    }
    Some((used as f64 / usable as f64 * 100.0) as f32)
}

#[cfg(not(unix))]
fn root_disk_percent() -> Option<f32> {
    None
}

#[cfg(target_os = "linux")]
fn boot_time() -> Option<i64> {
    let stat = std::fs::read_to_string("/proc/stat").ok()?;
    super::procfs::parse_boot_time(&stat)
}

#[cfg(not(target_os = "linux"))]
fn boot_time() -> Option<i64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_na() {
        let info = SystemInfo::default();
        assert!(info.rows().iter().all(|(_, v)| *v == "N/A"));
    }

    #[test]
    fn test_collect_fills_every_row() {
        let info = SystemInfo::collect();
        for (label, value) in info.rows() {
            assert!(!value.is_empty(), "{} is empty", label);
        }
        assert!(info.host.chars().count() <= 12);
        assert_eq!(info.arch, std::env::consts::ARCH);
    }

    #[test]
    fn test_format_boot_time_shape() {
        let label = format_boot_time(1_700_000_000).unwrap();
        // MM/DD HH:MM
        assert_eq!(label.len(), 11);
        assert_eq!(&label[2..3], "/");
        assert_eq!(&label[8..9], ":");
    }
}
