use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::monitor::SystemMonitor;

pub struct CompareEngine<P: Pipeline> {
    pipeline: P,
    #[cfg(feature = "cli")]
    monitor: SystemMonitor,
}

impl<P: Pipeline> CompareEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        #[cfg(not(feature = "cli"))]
        let _ = monitor_enabled;

        Self {
            pipeline,
            #[cfg(feature = "cli")]
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting comparison process...");

        // Extract
        tracing::info!("Collecting entity extractions...");
        let entities = self.pipeline.extract().await?;
        tracing::info!("Collected {} entities", entities.len());
        #[cfg(feature = "cli")]
        self.monitor.log_stats("extract");

        // Transform
        tracing::info!("Comparing specifications...");
        let output = self.pipeline.transform(entities).await?;
        tracing::info!(
            "Found {} specification differences",
            output.result.differences.len()
        );
        #[cfg(feature = "cli")]
        self.monitor.log_stats("compare");

        // Load
        tracing::info!("Writing comparison output...");
        let output_path = self.pipeline.load(output).await?;
        tracing::info!("Output saved to: {}", output_path);
        #[cfg(feature = "cli")]
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
