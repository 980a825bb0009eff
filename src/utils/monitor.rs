use std::fmt::Display;
use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// 一個批次結束時的資源摘要
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchUsage {
    pub elapsed: Duration,
    pub peak_memory_mb: u64,
    pub samples: usize,
}

/// 只盯著本程序的取樣器；瀏覽器子程序不算在內
#[cfg(feature = "cli")]
struct ProcessSampler {
    system: System,
    pid: Pid,
}

#[cfg(feature = "cli")]
impl ProcessSampler {
    fn new() -> Option<Self> {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                tracing::warn!("System monitoring unavailable: {}", e);
                return None;
            }
        };

        let mut sampler = Self {
            system: System::new(),
            pid,
        };
        // 第一次刷新只是建立 CPU 基準
        sampler.refresh();
        Some(sampler)
    }

    fn refresh(&mut self) {
        self.system.refresh_memory();
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[self.pid]), false);
    }

    /// (CPU %, 記憶體 MB, 佔總記憶體 %)
    fn sample(&mut self) -> Option<(f32, u64, f32)> {
        self.refresh();
        let process = self.system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let total_mb = self.system.total_memory() / 1024 / 1024;
        let percent = if total_mb > 0 {
            memory_mb as f32 / total_mb as f32 * 100.0
        } else {
            0.0
        };
        Some((process.cpu_usage(), memory_mb, percent))
    }
}

/// 每個批次各建一個，計時和峰值都只算這一批。
/// 關閉時完全不碰 sysinfo。
pub struct BatchMonitor {
    #[cfg(feature = "cli")]
    sampler: Option<ProcessSampler>,
    started: Instant,
    peak_memory_mb: u64,
    samples: usize,
}

impl BatchMonitor {
    #[cfg(feature = "cli")]
    pub fn start(enabled: bool) -> Self {
        Self {
            sampler: if enabled { ProcessSampler::new() } else { None },
            started: Instant::now(),
            peak_memory_mb: 0,
            samples: 0,
        }
    }

    #[cfg(not(feature = "cli"))]
    pub fn start(_enabled: bool) -> Self {
        Self {
            started: Instant::now(),
            peak_memory_mb: 0,
            samples: 0,
        }
    }

    /// 在階段切換時記錄一筆
    #[cfg(feature = "cli")]
    pub fn record(&mut self, phase: impl Display) {
        let Some(sampler) = self.sampler.as_mut() else {
            return;
        };
        let Some((cpu, memory_mb, percent)) = sampler.sample() else {
            return;
        };

        self.samples += 1;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);
        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Peak: {}MB, Batch time: {:?}",
            phase,
            cpu,
            memory_mb,
            percent,
            self.peak_memory_mb,
            self.started.elapsed()
        );
    }

    #[cfg(not(feature = "cli"))]
    pub fn record(&mut self, _phase: impl Display) {}

    /// 沒有任何取樣時回 None
    pub fn finish(self) -> Option<BatchUsage> {
        if self.samples == 0 {
            return None;
        }

        let usage = BatchUsage {
            elapsed: self.started.elapsed(),
            peak_memory_mb: self.peak_memory_mb,
            samples: self.samples,
        };
        tracing::info!(
            "📊 Batch usage - Time: {:?}, Peak Memory: {}MB",
            usage.elapsed,
            usage.peak_memory_mb
        );
        Some(usage)
    }
}
