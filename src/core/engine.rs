use crate::core::ReplayPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ReplayEngine<P: ReplayPipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: ReplayPipeline> ReplayEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting trace replay");

        // Extract
        tracing::info!("📥 Reading event trace...");
        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Parsed {} trace records", records.len());
        self.monitor.log_stats("Extract completed");

        // Transform
        tracing::info!("🔄 Replaying events through the guarded page...");
        let result = self.pipeline.transform(records).await?;
        tracing::info!(
            "🔄 Replayed {} events, {} suppressed",
            result.outcomes.len(),
            result.suppressed.len()
        );
        self.monitor.log_stats("Replay completed");

        // Load
        tracing::info!("💾 Writing report bundle...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Report saved to: {}", output_path);
        self.monitor.log_stats("Load completed");

        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
