use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::math::RunningStats;
use crate::utils::error::{LabError, Result};
use crate::utils::validation;

/// What the algorithm does once the net position breaches the delta limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HedgePolicy {
    /// Pay half the dealer spread on the whole position and flatten to zero.
    Full,
    /// Pay half the dealer spread on the excess only and clamp the position
    /// back to the limit.
    ToLimit,
}

impl std::fmt::Display for HedgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::ToLimit => write!(f, "to-limit"),
        }
    }
}

impl std::str::FromStr for HedgePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "to-limit" | "to_limit" | "partial" => Ok(Self::ToLimit),
            other => Err(format!(
                "unknown hedge policy '{}', expected 'full' or 'to-limit'",
                other
            )),
        }
    }
}

/// Parameters of the electronic market-making simulation. Time is measured
/// in trading days; the annual vol is converted with `trading_days` per year.
#[derive(Debug, Clone)]
pub struct DealerParams {
    pub annual_vol: f64,
    pub trading_days: f64,
    /// Poisson arrival rate of client trades, per day (1/sec = 86400/day).
    pub arrival_rate: f64,
    /// Client bid/ask spread; the dealer captures half per client trade.
    pub client_spread: f64,
    /// Inter-dealer bid/ask spread paid (half) when hedging.
    pub dealer_spread: f64,
    pub delta_limit: f64,
    pub policy: HedgePolicy,
    pub steps: usize,
    /// Time step as a fraction of the mean client inter-arrival time.
    pub step_fraction: f64,
}

impl Default for DealerParams {
    fn default() -> Self {
        Self {
            annual_vol: 0.10,
            trading_days: 260.0,
            arrival_rate: 60.0 * 60.0 * 24.0,
            client_spread: 1e-4,
            dealer_spread: 2e-4,
            delta_limit: 3.0,
            policy: HedgePolicy::Full,
            steps: 500,
            step_fraction: 0.1,
        }
    }
}

impl DealerParams {
    pub fn daily_vol(&self) -> f64 {
        self.annual_vol * (1.0 / self.trading_days).sqrt()
    }

    pub fn time_step(&self) -> f64 {
        self.step_fraction / self.arrival_rate
    }

    /// Probability of at least one client trade arriving within a step.
    pub fn trade_probability(&self) -> f64 {
        1.0 - (-self.arrival_rate * self.time_step()).exp()
    }

    /// Applies the hedge rule to a net position: returns the post-hedge
    /// position and the inter-dealer spread cost paid.
    pub fn hedge(&self, position: f64, spot: f64) -> (f64, f64) {
        let half_spread = self.dealer_spread * spot / 2.0;
        match self.policy {
            HedgePolicy::Full => {
                if position.abs() >= self.delta_limit {
                    (0.0, position.abs() * half_spread)
                } else {
                    (position, 0.0)
                }
            }
            HedgePolicy::ToLimit => {
                if position > self.delta_limit {
                    (self.delta_limit, (position - self.delta_limit) * half_spread)
                } else if position < -self.delta_limit {
                    (-self.delta_limit, (-self.delta_limit - position) * half_spread)
                } else {
                    (position, 0.0)
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_positive("dealer.annual_vol", self.annual_vol)?;
        validation::validate_positive("dealer.trading_days", self.trading_days)?;
        validation::validate_positive("dealer.arrival_rate", self.arrival_rate)?;
        validation::validate_positive("dealer.client_spread", self.client_spread)?;
        validation::validate_positive("dealer.dealer_spread", self.dealer_spread)?;
        validation::validate_positive("dealer.delta_limit", self.delta_limit)?;
        validation::validate_positive("dealer.step_fraction", self.step_fraction)?;
        validation::validate_positive_count("dealer.steps", self.steps, 1)?;
        Ok(())
    }
}

/// Runs `runs` independent paths of the dealer simulation and accumulates
/// the terminal PnL distribution. Deterministic for a given seed.
///
/// Each step: check for a client trade arrival (earn half the client
/// spread, position moves one unit either way), hedge if the delta limit is
/// breached, then advance spot and mark the open position to market.
pub fn simulate_paths(params: &DealerParams, seed: u64, runs: usize) -> Result<RunningStats> {
    params.validate()?;

    let dt = params.time_step();
    let step_normal = Normal::new(0.0, dt.sqrt()).map_err(|e| LabError::NumericsError {
        message: format!("invalid spot shock distribution: {}", e),
    })?;

    let vol = params.daily_vol();
    let trade_prob = params.trade_probability();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = RunningStats::new();

    for _ in 0..runs {
        let mut spot: f64 = 1.0;
        let mut position: f64 = 0.0;
        let mut pnl: f64 = 0.0;

        for _ in 0..params.steps {
            // Client flow: earn half the client spread, inventory moves.
            if rng.gen::<f64>() < trade_prob {
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                position += sign;
                pnl += params.client_spread * spot / 2.0;
            }

            let (hedged, cost) = params.hedge(position, spot);
            position = hedged;
            pnl -= cost;

            let dspot = vol * spot * step_normal.sample(&mut rng);
            pnl += position * dspot;
            spot += dspot;
        }

        stats.push(pnl);
    }

    Ok(stats)
}
