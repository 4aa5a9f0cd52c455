use async_trait::async_trait;

use crate::core::{report, Scenario, SimConfigProvider, Storage, Study, StudyOutcome};
use crate::domain::model::ReportTable;
use crate::math::RunningStats;
use crate::sim::dealer::{simulate_paths, DealerParams, HedgePolicy};
use crate::utils::error::{LabError, Result};

/// Electronic market-maker study: runs the dealer simulation once per
/// configured hedge policy and tabulates the PnL distribution of each.
pub struct DealerStudy<S: Storage, C: SimConfigProvider> {
    storage: S,
    config: C,
    params: DealerParams,
    policies: Vec<HedgePolicy>,
}

impl<S: Storage, C: SimConfigProvider> DealerStudy<S, C> {
    pub fn new(storage: S, config: C, params: DealerParams, policies: Vec<HedgePolicy>) -> Self {
        Self {
            storage,
            config,
            params,
            policies,
        }
    }

    /// Splits the run budget across workers and merges the chunk statistics
    /// exactly, so pooled numbers match a single-worker pass over the same
    /// chunks.
    async fn run_policy(&self, policy: HedgePolicy, seed_base: u64) -> Result<RunningStats> {
        let runs = self.config.runs();
        let workers = self.config.workers().max(1).min(runs.max(1));

        let chunk = runs / workers;
        let remainder = runs % workers;

        let mut handles = Vec::with_capacity(workers);
        for w in 0..workers {
            let chunk_runs = chunk + usize::from(w < remainder);
            if chunk_runs == 0 {
                continue;
            }
            let params = DealerParams {
                policy,
                ..self.params.clone()
            };
            let seed = seed_base.wrapping_add(w as u64);
            handles.push(tokio::task::spawn_blocking(move || {
                simulate_paths(&params, seed, chunk_runs)
            }));
        }

        let mut stats = RunningStats::new();
        for handle in handles {
            let part = handle.await.map_err(|e| LabError::SimulationError {
                message: format!("simulation worker failed: {}", e),
            })??;
            stats.merge(&part);
        }
        Ok(stats)
    }
}

#[async_trait]
impl<S: Storage, C: SimConfigProvider> Study for DealerStudy<S, C> {
    fn name(&self) -> &str {
        "dealer-hedging"
    }

    async fn setup(&self) -> Result<Vec<Scenario>> {
        self.params.validate()?;
        if self.policies.is_empty() {
            return Err(LabError::MissingConfigError {
                field: "dealer.policies".to_string(),
            });
        }

        let scenarios = self
            .policies
            .iter()
            .map(|policy| {
                Scenario::new(format!("policy={}", policy))
                    .with_param("policy", policy.to_string())
            })
            .collect();
        Ok(scenarios)
    }

    async fn simulate(&self, scenarios: Vec<Scenario>) -> Result<StudyOutcome> {
        let mut table = ReportTable::new(&[
            "policy",
            "runs",
            "pnl_mean_bp",
            "pnl_std_bp",
            "sharpe",
        ]);

        for (idx, scenario) in scenarios.iter().enumerate() {
            let policy: HedgePolicy = scenario
                .param_str("policy")?
                .parse()
                .map_err(|e: String| LabError::SimulationError { message: e })?;

            // Disjoint seed block per scenario so policies do not share paths.
            let seed_base = self
                .config
                .seed()
                .wrapping_add((idx as u64) * 0x9E37_79B9);

            tracing::debug!("Simulating scenario '{}'", scenario.label);
            let stats = self.run_policy(policy, seed_base).await?;

            table.push_row(vec![
                policy.to_string(),
                stats.count().to_string(),
                format!("{:.6}", stats.mean() * 1e4),
                format!("{:.6}", stats.std_dev() * 1e4),
                format!("{:.6}", stats.sharpe()),
            ]);
        }

        let summary = serde_json::json!({
            "runs": self.config.runs(),
            "seed": self.config.seed(),
            "workers": self.config.workers(),
            "steps": self.params.steps,
            "annual_vol": self.params.annual_vol,
            "arrival_rate": self.params.arrival_rate,
            "client_spread": self.params.client_spread,
            "dealer_spread": self.params.dealer_spread,
            "delta_limit": self.params.delta_limit,
            "trade_probability": self.params.trade_probability(),
        });

        Ok(StudyOutcome {
            study: self.name().to_string(),
            table,
            summary,
        })
    }

    async fn report(&self, outcome: StudyOutcome) -> Result<String> {
        report::write_outcome(&self.storage, self.config.output_path(), &outcome).await
    }
}
