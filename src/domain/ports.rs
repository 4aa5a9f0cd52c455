use crate::domain::model::{Scenario, StudyOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Settings every study shares, regardless of where they were loaded from
/// (CLI flags or a TOML suite file).
pub trait SimConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn runs(&self) -> usize;
    fn seed(&self) -> u64;
    fn workers(&self) -> usize;
}

#[async_trait]
pub trait Study: Send + Sync {
    fn name(&self) -> &str;
    async fn setup(&self) -> Result<Vec<Scenario>>;
    async fn simulate(&self, scenarios: Vec<Scenario>) -> Result<StudyOutcome>;
    async fn report(&self, outcome: StudyOutcome) -> Result<String>;
}
