use crate::core::Study;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a study through its three phases: scenario setup, simulation and
/// reporting. Optionally samples process stats between phases.
pub struct StudyEngine<S: Study> {
    study: S,
    monitor: SystemMonitor,
}

impl<S: Study> StudyEngine<S> {
    pub fn new(study: S) -> Self {
        Self {
            study,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(study: S, monitor_enabled: bool) -> Self {
        Self {
            study,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting study: {}", self.study.name());

        let scenarios = self.study.setup().await?;
        tracing::info!("Prepared {} scenarios", scenarios.len());
        self.monitor.log_stats("Setup complete");

        let outcome = self.study.simulate(scenarios).await?;
        tracing::info!("Simulation produced {} result rows", outcome.table.rows.len());
        self.monitor.log_stats("Simulation complete");

        let output_path = self.study.report(outcome).await?;
        tracing::info!("Report written to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
