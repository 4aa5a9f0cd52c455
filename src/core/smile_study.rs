use async_trait::async_trait;

use crate::core::{report, Scenario, SimConfigProvider, Storage, Study, StudyOutcome};
use crate::domain::model::ReportTable;
use crate::smile::{SmileQuotes, VolSpline};
use crate::utils::error::{LabError, Result};

/// Smile spline study: fit the constrained cubic spline to the quoted
/// smile for each extrapolation factor and tabulate the resulting vol
/// curve over a strike grid.
pub struct SmileStudy<S: Storage, C: SimConfigProvider> {
    storage: S,
    config: C,
    quotes: SmileQuotes,
    extrap_facts: Vec<f64>,
    curve_points: usize,
}

impl<S: Storage, C: SimConfigProvider> SmileStudy<S, C> {
    pub fn new(
        storage: S,
        config: C,
        quotes: SmileQuotes,
        extrap_facts: Vec<f64>,
        curve_points: usize,
    ) -> Self {
        Self {
            storage,
            config,
            quotes,
            extrap_facts,
            curve_points,
        }
    }
}

#[async_trait]
impl<S: Storage, C: SimConfigProvider> Study for SmileStudy<S, C> {
    fn name(&self) -> &str {
        "smile-spline"
    }

    async fn setup(&self) -> Result<Vec<Scenario>> {
        self.quotes.validate()?;
        if self.extrap_facts.is_empty() {
            return Err(LabError::MissingConfigError {
                field: "smile.extrap_facts".to_string(),
            });
        }
        if self.curve_points < 2 {
            return Err(LabError::InvalidConfigValueError {
                field: "smile.curve_points".to_string(),
                value: self.curve_points.to_string(),
                reason: "a curve needs at least two points".to_string(),
            });
        }

        let scenarios = self
            .extrap_facts
            .iter()
            .map(|&f| {
                Scenario::new(format!("extrap_fact={}", f)).with_param("extrap_fact", f)
            })
            .collect();
        Ok(scenarios)
    }

    async fn simulate(&self, scenarios: Vec<Scenario>) -> Result<StudyOutcome> {
        let strikes = self.quotes.strikes()?;
        let vols = self.quotes.vols();

        let mut table = ReportTable::new(&["extrap_fact", "strike", "vol"]);

        for scenario in &scenarios {
            let extrap_fact = scenario.param_f64("extrap_fact")?;
            tracing::debug!("Fitting spline for {}", scenario.label);
            let spline = VolSpline::fit(&strikes, &vols, self.quotes.texp, extrap_fact)?;

            let (lo, hi) = spline.strike_range();
            let dstrike = (hi - lo) / (self.curve_points - 1) as f64;

            for i in 0..self.curve_points {
                let strike = lo + i as f64 * dstrike;
                table.push_row(vec![
                    format!("{}", extrap_fact),
                    format!("{:.6}", strike),
                    format!("{:.6}", spline.volatility(strike)),
                ]);
            }
        }

        let summary = serde_json::json!({
            "spot": self.quotes.spot,
            "atm": self.quotes.atm,
            "rr25": self.quotes.rr25,
            "rr10": self.quotes.rr10,
            "bf25": self.quotes.bf25,
            "bf10": self.quotes.bf10,
            "texp": self.quotes.texp,
            "marked_strikes": strikes,
            "marked_vols": vols,
            "extrap_facts": self.extrap_facts,
            "curve_points": self.curve_points,
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
