#[cfg(feature = "cli")]
use std::sync::{Arc, Mutex};
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ResourceSample {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub memory_percent: f32,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Arc<Mutex<System>>,
    pid: Pid,
    started_at: Instant,
    peak_memory: Arc<Mutex<u64>>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());

        let pid = sysinfo::get_current_pid().expect("Failed to get current PID");

        // 啟動時先刷新一次，後續取樣才有基準
        system.refresh_all();

        Self {
            system: Arc::new(Mutex::new(system)),
            pid,
            started_at: Instant::now(),
            peak_memory: Arc::new(Mutex::new(0)),
            enabled,
        }
    }

    pub fn sample(&self) -> Option<ResourceSample> {
        if !self.enabled {
            return None;
        }

        let mut system = self.system.lock().ok()?;
        system.refresh_all();

        let process = system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let total_mb = system.total_memory() / 1024 / 1024;
        let memory_percent = if total_mb > 0 {
            (memory_mb as f32 / total_mb as f32) * 100.0
        } else {
            0.0
        };

        // 記錄峰值
        let mut peak = self.peak_memory.lock().ok()?;
        if memory_mb > *peak {
            *peak = memory_mb;
        }

        Some(ResourceSample {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            memory_percent,
            peak_memory_mb: *peak,
            elapsed: self.started_at.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Peak: {}MB, Time: {:?}",
                phase,
                sample.cpu_usage,
                sample.memory_mb,
                sample.memory_percent,
                sample.peak_memory_mb,
                sample.elapsed
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                sample.elapsed,
                sample.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 環境的空實現
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
