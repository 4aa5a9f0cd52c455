use async_trait::async_trait;

use crate::core::{report, Scenario, SimConfigProvider, Storage, Study, StudyOutcome};
use crate::domain::model::ReportTable;
use crate::sim::factor::{FactorMarket, HedgeStrategy};
use crate::utils::error::{LabError, Result};

/// Factor vs. triangle hedging study: for each (tenor, strategy) pair,
/// simulate the one-step PnL of a hedged forward and report the PnL
/// standard deviation in basis points.
pub struct FactorStudy<S: Storage, C: SimConfigProvider> {
    storage: S,
    config: C,
    market: FactorMarket,
    tenors: Vec<f64>,
    strategies: Vec<HedgeStrategy>,
}

impl<S: Storage, C: SimConfigProvider> FactorStudy<S, C> {
    pub fn new(
        storage: S,
        config: C,
        market: FactorMarket,
        tenors: Vec<f64>,
        strategies: Vec<HedgeStrategy>,
    ) -> Self {
        Self {
            storage,
            config,
            market,
            tenors,
            strategies,
        }
    }

    /// The tenor grid of the original course question.
    pub fn default_tenors() -> Vec<f64> {
        vec![0.1, 0.25, 0.5, 0.75, 1.0, 2.0]
    }

    pub fn all_strategies() -> Vec<HedgeStrategy> {
        vec![
            HedgeStrategy::None,
            HedgeStrategy::Triangle,
            HedgeStrategy::Factor,
        ]
    }
}

#[async_trait]
impl<S: Storage, C: SimConfigProvider> Study for FactorStudy<S, C> {
    fn name(&self) -> &str {
        "factor-hedging"
    }

    async fn setup(&self) -> Result<Vec<Scenario>> {
        self.market.validate()?;
        if self.tenors.is_empty() {
            return Err(LabError::MissingConfigError {
                field: "factor.tenors".to_string(),
            });
        }
        if self.strategies.is_empty() {
            return Err(LabError::MissingConfigError {
                field: "factor.strategies".to_string(),
            });
        }

        let mut scenarios = Vec::with_capacity(self.tenors.len() * self.strategies.len());
        for &tenor in &self.tenors {
            for &strategy in &self.strategies {
                scenarios.push(
                    Scenario::new(format!("tenor={} strategy={}", tenor, strategy))
                        .with_param("tenor", tenor)
                        .with_param("strategy", strategy.to_string()),
                );
            }
        }
        Ok(scenarios)
    }

    async fn simulate(&self, scenarios: Vec<Scenario>) -> Result<StudyOutcome> {
        let runs = self.config.runs();

        // Scenarios are independent one-step simulations; run them all on
        // blocking workers and collect in order.
        let mut handles = Vec::with_capacity(scenarios.len());
        for (idx, scenario) in scenarios.iter().enumerate() {
            let tenor = scenario.param_f64("tenor")?;
            let strategy: HedgeStrategy = scenario
                .param_str("strategy")?
                .parse()
                .map_err(|e: String| LabError::SimulationError { message: e })?;

            let market = self.market.clone();
            let seed = self.config.seed().wrapping_add((idx as u64) * 0x9E37_79B9);
            handles.push((
                tenor,
                strategy,
                tokio::task::spawn_blocking(move || {
                    market.pnl_distribution(tenor, strategy, seed, runs)
                }),
            ));
        }

        let mut table = ReportTable::new(&[
            "tenor",
            "strategy",
            "notional_t1",
            "notional_t2",
            "pnl_std_bp",
        ]);

        for (tenor, strategy, handle) in handles {
            let stats = handle.await.map_err(|e| LabError::SimulationError {
                message: format!("simulation worker failed: {}", e),
            })??;
            let (n1, n2) = self.market.hedge_notionals(tenor, strategy);

            table.push_row(vec![
                format!("{}", tenor),
                strategy.to_string(),
                format!("{:.6}", n1),
                format!("{:.6}", n2),
                format!("{:.6}", stats.std_dev() * 1e4),
            ]);
        }

        let summary = serde_json::json!({
            "runs": runs,
            "seed": self.config.seed(),
            "dt": self.market.dt,
            "sigma1": self.market.sigma1,
            "sigma2": self.market.sigma2,
            "beta1": self.market.beta1,
            "beta2": self.market.beta2,
            "rho": self.market.rho,
            "benchmarks": [self.market.t1, self.market.t2],
            "tenors": self.tenors,
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
