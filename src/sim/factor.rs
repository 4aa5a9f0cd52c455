use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::math::RunningStats;
use crate::utils::error::{LabError, Result};
use crate::utils::validation;

/// How the benchmark hedge notionals are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HedgeStrategy {
    /// Leave the forward unhedged.
    None,
    /// Notionals from the piecewise-linear triangle shocks, flat before the
    /// first benchmark and after the second.
    Triangle,
    /// Notionals from the true factor shocks of the rate model.
    Factor,
}

impl std::fmt::Display for HedgeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Triangle => write!(f, "triangle"),
            Self::Factor => write!(f, "factor"),
        }
    }
}

impl std::str::FromStr for HedgeStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "triangle" => Ok(Self::Triangle),
            "factor" => Ok(Self::Factor),
            other => Err(format!(
                "unknown hedge strategy '{}', expected 'none', 'triangle' or 'factor'",
                other
            )),
        }
    }
}

/// Toy market for the asset-currency rate curve:
///
///   dQ(T) = sigma1 e^{-beta1 T} dz1 + sigma2 e^{-beta2 T} dz2,
///   E[dz1 dz2] = rho dt
///
/// with flat asset and denominated rate curves. Benchmarks at `t1` and `t2`
/// carry the forwards used as hedges.
#[derive(Debug, Clone)]
pub struct FactorMarket {
    pub spot: f64,
    /// Asset currency rate curve Q(T), flat.
    pub asset_rate: f64,
    /// Denominated currency rate curve R(T), flat.
    pub denominated_rate: f64,
    pub sigma1: f64,
    pub sigma2: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub rho: f64,
    pub t1: f64,
    pub t2: f64,
    /// Length of the single simulated step, in years.
    pub dt: f64,
}

impl Default for FactorMarket {
    fn default() -> Self {
        Self {
            spot: 1.0,
            asset_rate: 0.03,
            denominated_rate: 0.0,
            sigma1: 0.01,
            sigma2: 0.008,
            beta1: 0.5,
            beta2: 0.1,
            rho: -0.4,
            t1: 0.25,
            t2: 1.0,
            dt: 1e-3,
        }
    }
}

impl FactorMarket {
    pub fn validate(&self) -> Result<()> {
        validation::validate_positive("factor.spot", self.spot)?;
        validation::validate_positive("factor.sigma1", self.sigma1)?;
        validation::validate_positive("factor.sigma2", self.sigma2)?;
        validation::validate_positive("factor.beta1", self.beta1)?;
        validation::validate_positive("factor.beta2", self.beta2)?;
        // The benchmark sensitivities divide by 1 - e^{(beta1-beta2) gap}.
        if (self.beta1 - self.beta2).abs() < 1e-9 {
            return Err(LabError::InvalidConfigValueError {
                field: "factor.beta2".to_string(),
                value: self.beta2.to_string(),
                reason: format!(
                    "factor decay rates must differ, got beta1 = {}",
                    self.beta1
                ),
            });
        }
        validation::validate_open_interval("factor.rho", self.rho, -1.0, 1.0)?;
        validation::validate_positive("factor.t1", self.t1)?;
        validation::validate_positive("factor.dt", self.dt)?;
        if self.t2 <= self.t1 {
            return Err(LabError::InvalidConfigValueError {
                field: "factor.t2".to_string(),
                value: self.t2.to_string(),
                reason: format!("second benchmark must lie beyond t1 = {}", self.t1),
            });
        }
        Ok(())
    }

    /// Curve shock at `tenor` for a realized pair of factor increments.
    pub fn shock_at(&self, tenor: f64, dz1: f64, dz2: f64) -> f64 {
        self.sigma1 * (-self.beta1 * tenor).exp() * dz1
            + self.sigma2 * (-self.beta2 * tenor).exp() * dz2
    }

    /// Sensitivity of Q(tenor) to the first benchmark shock, dQ(T)/dQ(t1).
    /// Equals 1 at `tenor == t1` and 0 at `tenor == t2`.
    pub fn dq_dq1(&self, tenor: f64) -> f64 {
        let gap = self.t2 - self.t1;
        let denom = 1.0 - ((self.beta1 - self.beta2) * gap).exp();
        let dz1 = -1.0 / self.sigma1 * (self.beta1 * self.t2 - self.beta2 * gap).exp() / denom;
        let dz2 = 1.0 / self.sigma2 * (self.beta2 * self.t1).exp() / denom;
        self.shock_at(tenor, dz1, dz2)
    }

    /// Sensitivity of Q(tenor) to the second benchmark shock, dQ(T)/dQ(t2).
    /// Equals 0 at `tenor == t1` and 1 at `tenor == t2`.
    pub fn dq_dq2(&self, tenor: f64) -> f64 {
        let gap = self.t2 - self.t1;
        let denom = 1.0 - ((self.beta2 - self.beta1) * gap).exp();
        let dz1 = -1.0 / self.sigma1 * (self.beta1 * self.t1 + self.beta2 * gap).exp() / denom;
        let dz2 = 1.0 / self.sigma2 * (self.beta2 * self.t2).exp() / denom;
        self.shock_at(tenor, dz1, dz2)
    }

    /// Hedge notionals (benchmark t1, benchmark t2) for a unit forward at
    /// `tenor`, per strategy. Discounting factors as in the course model.
    pub fn hedge_notionals(&self, tenor: f64, strategy: HedgeStrategy) -> (f64, f64) {
        let q = self.asset_rate;
        match strategy {
            HedgeStrategy::None => (0.0, 0.0),
            HedgeStrategy::Triangle => {
                let n1 = if tenor <= self.t1 {
                    tenor / self.t1 * (-q * (tenor - self.t1)).exp()
                } else if tenor >= self.t2 {
                    0.0
                } else {
                    (self.t2 - tenor) / (self.t2 - self.t1)
                        * tenor
                        / self.t1
                        * (-q * (tenor - self.t1)).exp()
                };
                let n2 = if tenor <= self.t1 {
                    0.0
                } else if tenor >= self.t2 {
                    tenor / self.t2 * (-q * (tenor - self.t2)).exp()
                } else {
                    (tenor - self.t1) / (self.t2 - self.t1)
                        * tenor
                        / self.t2
                        * (q * (self.t2 - tenor)).exp()
                };
                (n1, n2)
            }
            HedgeStrategy::Factor => {
                let n1 = self.dq_dq1(tenor) * tenor / self.t1 * (-q * (tenor - self.t1)).exp();
                let n2 = self.dq_dq2(tenor) * tenor / self.t2 * (q * (self.t2 - tenor)).exp();
                (n1, n2)
            }
        }
    }

    /// Simulates the one-step PnL distribution of a unit tenor-`tenor`
    /// forward hedged with the two benchmark forwards.
    pub fn pnl_distribution(
        &self,
        tenor: f64,
        strategy: HedgeStrategy,
        seed: u64,
        runs: usize,
    ) -> Result<RunningStats> {
        self.validate()?;
        validation::validate_positive("factor.tenor", tenor)?;

        let step_normal =
            Normal::new(0.0, self.dt.sqrt()).map_err(|e| LabError::NumericsError {
                message: format!("invalid factor shock distribution: {}", e),
            })?;

        let (n1, n2) = self.hedge_notionals(tenor, strategy);
        let q = self.asset_rate;
        let orth = (1.0 - self.rho * self.rho).sqrt();

        let mut rng = StdRng::seed_from_u64(seed);
        let mut stats = RunningStats::new();

        for _ in 0..runs {
            let dz1 = step_normal.sample(&mut rng);
            let dz2 = self.rho * dz1 + orth * step_normal.sample(&mut rng);

            let dq_t = self.shock_at(tenor, dz1, dz2);
            let dq_1 = self.shock_at(self.t1, dz1, dz2);
            let dq_2 = self.shock_at(self.t2, dz1, dz2);

            let mut pnl =
                self.spot * ((-(q + dq_t) * tenor).exp() - (-q * tenor).exp());
            pnl -= n1 * self.spot * ((-(q + dq_1) * self.t1).exp() - (-q * self.t1).exp());
            pnl -= n2 * self.spot * ((-(q + dq_2) * self.t2).exp() - (-q * self.t2).exp());

            stats.push(pnl);
        }

        Ok(stats)
    }
}
