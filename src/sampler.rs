//! Once-per-tick metric sampling
//!
//! [`Sampler`] is the boundary where metric errors turn into fallbacks: it
//! never fails, and each failing reading shows up as `None` (or 0 for graphed
//! series) in the [`Snapshot`].

use crate::format::{format_bytes, format_percent, format_speed, truncate_chars};
use crate::history::{MetricSample, SampleHistory};
use crate::metrics::{
    BatteryState, CpuTimes, MemoryReading, MetricSource, NetCounters, ProcessTimes,
};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Characters of a process name shown on the HUD
const TOP_NAME_LEN: usize = 10;

/// Process using the most CPU since the previous tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProcess {
    pub name: String,
    /// Percent of one core
    pub cpu_percent: f32,
}

/// Everything the HUD shows for one sampling tick
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub cpu_percent: f32,
    pub cpu_count: Option<usize>,
    pub cpu_freq_mhz: Option<f32>,
    pub memory: Option<MemoryReading>,
    pub memory_percent: f32,
    pub swap_percent: Option<f32>,
    /// Bytes/s; `None` when no rate could be computed this tick
    pub net_up: Option<f64>,
    pub net_down: Option<f64>,
    pub net_totals: Option<NetCounters>,
    pub battery: BatteryState,
    pub process_count: Option<usize>,
    /// Last process seen with non-zero CPU usage
    pub top_process: Option<TopProcess>,
    pub self_rss: Option<u64>,
}

impl Snapshot {
    /// `N CORES @ F MHz`, or `N CORES` without a frequency
    pub fn cpu_detail(&self) -> String {
        match (self.cpu_count, self.cpu_freq_mhz) {
            (Some(n), Some(mhz)) => format!("{} CORES @ {:.0} MHz", n, mhz),
            (Some(n), None) => format!("{} CORES", n),
            _ => "N/A".to_string(),
        }
    }

    /// `used / total`
    pub fn memory_detail(&self) -> String {
        match &self.memory {
            Some(mem) => format!("{} / {}", format_bytes(mem.used), format_bytes(mem.total)),
            None => "N/A".to_string(),
        }
    }

    pub fn swap_label(&self) -> String {
        self.swap_percent
            .map(format_percent)
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn process_label(&self) -> String {
        self.process_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn top_label(&self) -> &str {
        self.top_process
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("...")
    }

    pub fn self_rss_label(&self) -> String {
        self.self_rss
            .map(format_bytes)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let na = || "N/A".to_string();
        writeln!(f, "SYS.TIME:  {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(
            f,
            "CPU:       {} ({})",
            format_percent(self.cpu_percent),
            self.cpu_detail()
        )?;
        writeln!(
            f,
            "MEMORY:    {} ({})",
            format_percent(self.memory_percent),
            self.memory_detail()
        )?;
        writeln!(f, "SWAP:      {}", self.swap_label())?;
        writeln!(
            f,
            "NET UP:    {}",
            self.net_up.map(format_speed).unwrap_or_else(na)
        )?;
        writeln!(
            f,
            "NET DOWN:  {}",
            self.net_down.map(format_speed).unwrap_or_else(na)
        )?;
        if let Some(totals) = &self.net_totals {
            writeln!(f, "TOTAL TX:  {}", format_bytes(totals.bytes_sent))?;
            writeln!(f, "TOTAL RX:  {}", format_bytes(totals.bytes_recv))?;
        }
        writeln!(f, "BATTERY:   {}", self.battery)?;
        writeln!(f, "PROCS:     {}", self.process_label())?;
        writeln!(f, "TOP:       {}", self.top_label())?;
        write!(f, "PROC.MEM:  {}", self.self_rss_label())
    }
}

/// Reads a [`MetricSource`] once per tick and keeps the rolling histories
pub struct Sampler<S: MetricSource> {
    source: S,
    history_len: usize,
    last_cpu: Option<CpuTimes>,
    last_net: Option<(NetCounters, Instant)>,
    last_procs: HashMap<u32, u64>,
    top_process: Option<TopProcess>,

    cpu_history: SampleHistory,
    mem_history: SampleHistory,
    net_up_history: SampleHistory,
    net_down_history: SampleHistory,
    battery_history: SampleHistory,
}

impl<S: MetricSource> Sampler<S> {
    /// Create a sampler and prime the delta counters. Histories start
    /// pre-filled with zeros so graphs have full width from the first frame.
    pub fn new(mut source: S, history_len: usize) -> Self {
        let now = Instant::now();
        let last_cpu = source.cpu_times().ok();
        let last_net = source.network_counters().ok().map(|c| (c, now));
        let last_procs = source
            .processes()
            .map(|procs| procs.into_iter().map(|p| (p.pid, p.cpu_ticks)).collect())
            .unwrap_or_default();

        let empty = || SampleHistory::filled(history_len, MetricSample::zero());

        Self {
            source,
            history_len,
            last_cpu,
            last_net,
            last_procs,
            top_process: None,
            cpu_history: empty(),
            mem_history: empty(),
            net_up_history: empty(),
            net_down_history: empty(),
            battery_history: empty(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn cpu_history(&self) -> &SampleHistory {
        &self.cpu_history
    }

    pub fn mem_history(&self) -> &SampleHistory {
        &self.mem_history
    }

    pub fn net_up_history(&self) -> &SampleHistory {
        &self.net_up_history
    }

    pub fn net_down_history(&self) -> &SampleHistory {
        &self.net_down_history
    }

    pub fn battery_history(&self) -> &SampleHistory {
        &self.battery_history
    }

    /// Take one reading of every metric
    pub fn tick(&mut self, now: Instant) -> Snapshot {
        let timestamp = Local::now();

        let cpu_now = self.source.cpu_times().map_err(|e| log::debug!("cpu: {}", e)).ok();
        let cpu_percent = match (cpu_now, self.last_cpu) {
            (Some(cur), Some(prev)) => cur.utilization_since(&prev),
            _ => 0.0,
        };
        let cpu_total_delta = match (cpu_now, self.last_cpu) {
            (Some(cur), Some(prev)) => cur.total.saturating_sub(prev.total),
            _ => 0,
        };
        if cpu_now.is_some() {
            self.last_cpu = cpu_now;
        }

        let cpu_count = self.source.cpu_count().map_err(|e| log::debug!("cpu count: {}", e)).ok();
        let cpu_freq_mhz = self
            .source
            .cpu_frequency_mhz()
            .map_err(|e| log::debug!("cpu frequency: {}", e))
            .ok();

        let memory = self.source.memory().map_err(|e| log::debug!("memory: {}", e)).ok();
        let memory_percent = memory.map(|m| m.usage_percent()).unwrap_or(0.0);

        let swap_percent = self
            .source
            .swap()
            .map_err(|e| log::debug!("swap: {}", e))
            .ok()
            .map(|s| s.usage_percent());

        let net_totals = self
            .source
            .network_counters()
            .map_err(|e| log::debug!("network: {}", e))
            .ok();
        let (net_up, net_down) = match (net_totals, self.last_net) {
            (Some(cur), Some((prev, prev_at))) => {
                let elapsed = now.saturating_duration_since(prev_at).as_secs_f64();
                if elapsed > 0.0 {
                    (
                        Some(rate(prev.bytes_sent, cur.bytes_sent, elapsed)),
                        Some(rate(prev.bytes_recv, cur.bytes_recv, elapsed)),
                    )
                } else {
                    (None, None)
                }
            }
            _ => (None, None),
        };
        if let Some(cur) = net_totals {
            self.last_net = Some((cur, now));
        }

        let battery = match self.source.battery() {
            Ok(state) => state,
            Err(e) => {
                log::debug!("battery: {}", e);
                BatteryState::Unavailable
            }
        };

        let processes = self
            .source
            .processes()
            .map_err(|e| log::debug!("processes: {}", e))
            .ok();
        let process_count = processes.as_ref().map(|p| p.len());
        if let Some(procs) = processes {
            let cores = cpu_count.unwrap_or(1).max(1);
            if let Some(top) = self.top_since_last(&procs, cpu_total_delta, cores) {
                self.top_process = Some(top);
            }
            self.last_procs = procs.into_iter().map(|p| (p.pid, p.cpu_ticks)).collect();
        }

        let self_rss = self
            .source
            .self_rss_bytes()
            .map_err(|e| log::debug!("self rss: {}", e))
            .ok();

        self.cpu_history.push(MetricSample::new(timestamp, cpu_percent));
        self.mem_history.push(MetricSample::new(timestamp, memory_percent));
        if let (Some(up), Some(down)) = (net_up, net_down) {
            self.net_up_history.push(MetricSample::new(timestamp, up as f32));
            self.net_down_history.push(MetricSample::new(timestamp, down as f32));
        }
        self.battery_history.push(MetricSample::new(
            timestamp,
            battery.percent().unwrap_or(0.0),
        ));

        Snapshot {
            timestamp,
            cpu_percent,
            cpu_count,
            cpu_freq_mhz,
            memory,
            memory_percent,
            swap_percent,
            net_up,
            net_down,
            net_totals,
            battery,
            process_count,
            top_process: self.top_process.clone(),
            self_rss,
        }
    }

    /// Busiest process since the previous scan, if any used CPU
    fn top_since_last(
        &self,
        procs: &[ProcessTimes],
        cpu_total_delta: u64,
        cores: usize,
    ) -> Option<TopProcess> {
        let (busiest, delta) = procs
            .iter()
            .filter_map(|p| {
                // new processes have no baseline
                let prev = self.last_procs.get(&p.pid)?;
                Some((p, p.cpu_ticks.saturating_sub(*prev)))
            })
            .max_by_key(|(_, delta)| *delta)?;

        if delta == 0 {
            return None;
        }

        // cpu_total_delta counts ticks of every core
        let cpu_percent = if cpu_total_delta > 0 {
            (delta as f64 * cores as f64 * 100.0 / cpu_total_delta as f64) as f32
        } else {
            0.0
        };

        Some(TopProcess {
            name: truncate_chars(&busiest.name, TOP_NAME_LEN).to_string(),
            cpu_percent,
        })
    }
}

/// Bytes/s between two cumulative counters; a counter reset yields 0
fn rate(prev: u64, cur: u64, elapsed_secs: f64) -> f64 {
    cur.saturating_sub(prev) as f64 / elapsed_secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::metrics::SwapReading;
    use std::time::Duration;

    /// Scriptable source: each field is the reading for the next call
    #[derive(Default)]
    struct FakeSource {
        cpu: Option<CpuTimes>,
        memory: Option<MemoryReading>,
        net: Option<NetCounters>,
        battery: Option<BatteryState>,
        procs: Option<Vec<ProcessTimes>>,
    }

    fn unavailable<T>(what: &str) -> Result<T> {
        Err(Error::not_supported(what))
    }

    impl MetricSource for FakeSource {
        fn cpu_times(&mut self) -> Result<CpuTimes> {
            self.cpu.ok_or_else(|| Error::not_supported("cpu"))
        }

        fn cpu_count(&mut self) -> Result<usize> {
            Ok(4)
        }

        fn cpu_frequency_mhz(&mut self) -> Result<f32> {
            unavailable("cpu frequency")
        }

        fn memory(&mut self) -> Result<MemoryReading> {
            self.memory.ok_or_else(|| Error::not_supported("memory"))
        }

        fn swap(&mut self) -> Result<SwapReading> {
            unavailable("swap")
        }

        fn network_counters(&mut self) -> Result<NetCounters> {
            self.net.ok_or_else(|| Error::not_supported("network"))
        }

        fn battery(&mut self) -> Result<BatteryState> {
            self.battery.ok_or_else(|| Error::not_supported("battery"))
        }

        fn processes(&mut self) -> Result<Vec<ProcessTimes>> {
            self.procs
                .clone()
                .ok_or_else(|| Error::not_supported("processes"))
        }

        fn self_rss_bytes(&mut self) -> Result<u64> {
            Ok(1024)
        }
    }

    fn proc(pid: u32, name: &str, cpu_ticks: u64) -> ProcessTimes {
        ProcessTimes {
            pid,
            name: name.to_string(),
            cpu_ticks,
        }
    }

    #[test]
    fn test_everything_unavailable_falls_back() {
        let mut sampler = Sampler::new(FakeSource::default(), 60);
        let snap = sampler.tick(Instant::now());

        assert_eq!(snap.cpu_percent, 0.0);
        assert_eq!(snap.memory_percent, 0.0);
        assert_eq!(snap.memory, None);
        assert_eq!(snap.swap_label(), "N/A");
        assert_eq!(snap.net_up, None);
        assert_eq!(snap.battery, BatteryState::Unavailable);
        assert_eq!(snap.battery.to_string(), "N/A");
        assert_eq!(snap.process_label(), "N/A");
        assert_eq!(snap.top_label(), "...");
        assert_eq!(snap.cpu_detail(), "4 CORES");
        assert_eq!(snap.memory_detail(), "N/A");
        assert_eq!(snap.self_rss_label(), "1.0 KB");
    }

    #[test]
    fn test_histories_stay_at_capacity() {
        let mut sampler = Sampler::new(FakeSource::default(), 5);
        assert_eq!(sampler.cpu_history().len(), 5);
        let start = Instant::now();
        for i in 0..20 {
            sampler.tick(start + Duration::from_secs(i));
            assert_eq!(sampler.cpu_history().len(), 5);
            assert_eq!(sampler.mem_history().len(), 5);
            assert_eq!(sampler.battery_history().len(), 5);
            assert!(sampler.net_up_history().len() <= 5);
        }
    }

    #[test]
    fn test_cpu_percent_from_delta() {
        let source = FakeSource {
            cpu: Some(CpuTimes { busy: 0, total: 0 }),
            ..Default::default()
        };
        let mut sampler = Sampler::new(source, 60);
        sampler.source.cpu = Some(CpuTimes { busy: 30, total: 100 });
        let snap = sampler.tick(Instant::now());
        assert_eq!(snap.cpu_percent, 30.0);
        assert_eq!(sampler.cpu_history().latest_value(), 30.0);
    }

    #[test]
    fn test_network_rate() {
        let source = FakeSource {
            net: Some(NetCounters { bytes_sent: 1_000, bytes_recv: 10_000 }),
            ..Default::default()
        };
        let mut sampler = Sampler::new(source, 60);
        let primed_at = sampler.last_net.map(|(_, at)| at).unwrap();

        sampler.source.net = Some(NetCounters { bytes_sent: 3_000, bytes_recv: 14_000 });
        let snap = sampler.tick(primed_at + Duration::from_secs(2));
        assert_eq!(snap.net_up, Some(1_000.0));
        assert_eq!(snap.net_down, Some(2_000.0));
        assert_eq!(sampler.net_down_history().latest_value(), 2_000.0);
    }

    #[test]
    fn test_network_counter_reset_and_zero_elapsed() {
        let source = FakeSource {
            net: Some(NetCounters { bytes_sent: 5_000, bytes_recv: 5_000 }),
            ..Default::default()
        };
        let mut sampler = Sampler::new(source, 60);
        let primed_at = sampler.last_net.map(|(_, at)| at).unwrap();

        // zero elapsed: nothing pushed
        let before = sampler.net_up_history().to_vec();
        let snap = sampler.tick(primed_at);
        assert_eq!(snap.net_up, None);
        assert_eq!(sampler.net_up_history().to_vec(), before);

        // interface went down and came back: counters restart
        sampler.source.net = Some(NetCounters { bytes_sent: 10, bytes_recv: 10 });
        let snap = sampler.tick(primed_at + Duration::from_secs(1));
        assert_eq!(snap.net_up, Some(0.0));
        assert_eq!(snap.net_down, Some(0.0));
    }

    #[test]
    fn test_battery_states() {
        let source = FakeSource {
            battery: Some(BatteryState::NoBattery),
            ..Default::default()
        };
        let mut sampler = Sampler::new(source, 60);
        assert_eq!(sampler.tick(Instant::now()).battery.to_string(), "AC");

        sampler.source.battery = Some(BatteryState::Level { percent: 85.0, plugged: true });
        let snap = sampler.tick(Instant::now());
        assert_eq!(snap.battery.to_string(), "85%⚡");
        assert_eq!(sampler.battery_history().latest_value(), 85.0);
    }

    #[test]
    fn test_top_process_needs_cpu_usage() {
        let source = FakeSource {
            cpu: Some(CpuTimes { busy: 0, total: 0 }),
            procs: Some(vec![proc(1, "init", 10), proc(2, "compositor-main", 50)]),
            ..Default::default()
        };
        let mut sampler = Sampler::new(source, 60);

        // no process advanced: keep the placeholder
        let snap = sampler.tick(Instant::now());
        assert_eq!(snap.top_process, None);
        assert_eq!(snap.process_count, Some(2));

        sampler.source.cpu = Some(CpuTimes { busy: 100, total: 400 });
        sampler.source.procs = Some(vec![
            proc(1, "init", 11),
            proc(2, "compositor-main", 70),
            proc(3, "newcomer", 900),
        ]);
        let snap = sampler.tick(Instant::now());
        let top = snap.top_process.clone().unwrap();
        // truncated to ten characters; pid 3 has no baseline yet
        assert_eq!(top.name, "compositor");
        // 20 of 400 ticks across 4 cores = 20% of one core
        assert_eq!(top.cpu_percent, 20.0);
        assert_eq!(snap.process_count, Some(3));

        // idle tick keeps the last known top process
        sampler.source.cpu = Some(CpuTimes { busy: 100, total: 500 });
        let snap = sampler.tick(Instant::now());
        assert_eq!(snap.top_label(), "compositor");
    }

    #[test]
    fn test_snapshot_text_and_json() {
        let source = FakeSource {
            memory: Some(MemoryReading { total: 2048, used: 1024, available: 1024 }),
            battery: Some(BatteryState::NoBattery),
            ..Default::default()
        };
        let mut sampler = Sampler::new(source, 60);
        let snap = sampler.tick(Instant::now());

        let text = snap.to_string();
        assert!(text.contains("MEMORY:    50.0% (1.0 KB / 2.0 KB)"));
        assert!(text.contains("BATTERY:   AC"));
        assert!(text.contains("NET UP:    N/A"));

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["memory_percent"], 50.0);
        assert_eq!(json["battery"]["state"], "no_battery");
    }
}
