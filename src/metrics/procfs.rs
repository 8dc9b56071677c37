//! Parsers for procfs/sysfs text
//!
//! Pure functions over file contents so they can be tested anywhere; the Linux
//! source does the reading.

use super::{BatteryState, CpuTimes, MemoryReading, NetCounters, SwapReading};
use crate::error::{Error, Result};

/// Parse the aggregate `cpu` line of `/proc/stat`
pub fn parse_cpu_times(proc_stat: &str) -> Result<CpuTimes> {
    let line = proc_stat
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| Error::Parse("no aggregate cpu line in /proc/stat".to_string()))?;

    // user nice system idle iowait irq softirq steal [guest guest_nice]
    // guest time is already folded into user/nice
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(|s| s.parse::<u64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| Error::Parse(format!("bad cpu field in /proc/stat: {}", e)))?;

    if fields.len() < 4 {
        return Err(Error::Parse(format!(
            "expected at least 4 cpu fields, got {}",
            fields.len()
        )));
    }

    let total: u64 = fields.iter().sum();
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);

    Ok(CpuTimes {
        busy: total.saturating_sub(idle),
        total,
    })
}

/// Parse the `btime` (boot time, unix seconds) line of `/proc/stat`
pub fn parse_boot_time(proc_stat: &str) -> Option<i64> {
    proc_stat
        .lines()
        .find(|l| l.starts_with("btime "))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
}

/// Parse `/proc/meminfo` into RAM and swap readings (bytes)
pub fn parse_meminfo(meminfo: &str) -> Result<(MemoryReading, SwapReading)> {
    let mut mem_total = None;
    let mut mem_free = 0u64;
    let mut mem_available = None;
    let mut buffers = 0u64;
    let mut cached = 0u64;
    let mut swap_total = 0u64;
    let mut swap_free = 0u64;

    for line in meminfo.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(kb) = value.parse::<u64>() else {
            continue;
        };
        let bytes = kb.saturating_mul(1024);

        match key.trim_end_matches(':') {
            "MemTotal" => mem_total = Some(bytes),
            "MemFree" => mem_free = bytes,
            "MemAvailable" => mem_available = Some(bytes),
            "Buffers" => buffers = bytes,
            "Cached" => cached = bytes,
            "SwapTotal" => swap_total = bytes,
            "SwapFree" => swap_free = bytes,
            _ => {}
        }
    }

    let total = mem_total.ok_or_else(|| Error::Parse("MemTotal missing".to_string()))?;
    // Kernels before 3.14 have no MemAvailable
    let available = mem_available
        .unwrap_or(mem_free.saturating_add(buffers).saturating_add(cached))
        .min(total);

    Ok((
        MemoryReading {
            total,
            used: total - available,
            available,
        },
        SwapReading {
            total: swap_total,
            used: swap_total.saturating_sub(swap_free),
        },
    ))
}

/// Sum `/proc/net/dev` byte counters over every interface except loopback
pub fn parse_net_dev(net_dev: &str) -> Result<NetCounters> {
    let mut counters = NetCounters::default();
    let mut seen = false;

    // two header lines, then "iface: rx_bytes rx_packets ... tx_bytes ..."
    for line in net_dev.lines().skip(2) {
        let Some((iface, stats)) = line.split_once(':') else {
            continue;
        };
        if iface.trim() == "lo" {
            continue;
        }
        let fields: Vec<&str> = stats.split_whitespace().collect();
        if fields.len() < 9 {
            return Err(Error::Parse(format!(
                "short /proc/net/dev line for {}",
                iface.trim()
            )));
        }
        let rx: u64 = fields[0]
            .parse()
            .map_err(|e| Error::Parse(format!("rx_bytes: {}", e)))?;
        let tx: u64 = fields[8]
            .parse()
            .map_err(|e| Error::Parse(format!("tx_bytes: {}", e)))?;
        counters.bytes_recv = counters.bytes_recv.saturating_add(rx);
        counters.bytes_sent = counters.bytes_sent.saturating_add(tx);
        seen = true;
    }

    if !seen {
        log::debug!("no non-loopback interfaces in /proc/net/dev");
    }
    Ok(counters)
}

/// Parse `/proc/[pid]/stat` into (command name, utime + stime)
pub fn parse_pid_stat(stat: &str) -> Result<(String, u64)> {
    // comm is wrapped in parens and may itself contain spaces or parens
    let open = stat
        .find('(')
        .ok_or_else(|| Error::Parse("missing '(' in pid stat".to_string()))?;
    let close = stat
        .rfind(')')
        .ok_or_else(|| Error::Parse("missing ')' in pid stat".to_string()))?;
    if close < open {
        return Err(Error::Parse("malformed pid stat".to_string()));
    }
    let name = stat[open + 1..close].to_string();

    // after comm: state(3) ppid ... utime(14) stime(15)
    let rest: Vec<&str> = stat[close + 1..].split_whitespace().collect();
    let field = |n: usize| -> Result<u64> {
        rest.get(n - 3)
            .ok_or_else(|| Error::Parse(format!("pid stat field {} missing", n)))?
            .parse::<u64>()
            .map_err(|e| Error::Parse(format!("pid stat field {}: {}", n, e)))
    };

    Ok((name, field(14)? + field(15)?))
}

/// Parse `VmRSS` from `/proc/[pid]/status`, in bytes
pub fn parse_vm_rss(status: &str) -> Result<u64> {
    status
        .lines()
        .find(|l| l.starts_with("VmRSS:"))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
        .ok_or_else(|| Error::Parse("VmRSS missing".to_string()))
}

/// Parse the mean `cpu MHz` of `/proc/cpuinfo`
pub fn parse_cpuinfo_mhz(cpuinfo: &str) -> Option<f32> {
    let speeds: Vec<f32> = cpuinfo
        .lines()
        .filter(|l| l.starts_with("cpu MHz"))
        .filter_map(|l| l.split_once(':'))
        .filter_map(|(_, v)| v.trim().parse::<f32>().ok())
        .collect();
    if speeds.is_empty() {
        None
    } else {
        Some(speeds.iter().sum::<f32>() / speeds.len() as f32)
    }
}

/// One entry of `/sys/class/power_supply`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerSupplyEntry {
    /// `type` attribute, lowercased ("battery", "mains", "usb", ...)
    pub kind: String,
    pub online: Option<bool>,
    pub capacity: Option<f32>,
    /// `status` attribute, lowercased ("charging", "discharging", "full", ...)
    pub status: Option<String>,
}

/// Reduce power supply entries to the HUD battery state
///
/// The first battery reporting a capacity wins. It counts as plugged when any
/// mains/USB supply is online or the battery itself is charging or full.
pub fn battery_from_supplies(supplies: &[PowerSupplyEntry]) -> BatteryState {
    let Some(battery) = supplies
        .iter()
        .find(|s| s.kind == "battery" && s.capacity.is_some())
    else {
        return BatteryState::NoBattery;
    };

    let external_online = supplies
        .iter()
        .filter(|s| s.kind != "battery")
        .any(|s| s.online == Some(true));
    let charging = matches!(battery.status.as_deref(), Some("charging") | Some("full"));

    BatteryState::Level {
        percent: battery.capacity.unwrap_or(0.0).clamp(0.0, 100.0),
        plugged: external_online || charging,
    }
}
