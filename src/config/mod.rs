pub mod cli;
pub mod toml_config;

use serde::{Deserialize, Serialize};

use crate::domain::ports::SimConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

/// Shared run settings, assembled either from CLI flags or from the
/// `[simulation]` / `[output]` sections of a TOML suite file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    pub output_path: String,
    pub runs: usize,
    pub seed: u64,
    pub workers: usize,
}

impl RunSettings {
    pub fn new(output_path: impl Into<String>, runs: usize, seed: u64, workers: usize) -> Self {
        Self {
            output_path: output_path.into(),
            runs,
            seed,
            workers,
        }
    }
}

impl SimConfigProvider for RunSettings {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn runs(&self) -> usize {
        self.runs
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn workers(&self) -> usize {
        self.workers
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_count("runs", self.runs, 1)?;
        validation::validate_positive_count("workers", self.workers, 1)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use args::{Cli, DealerArgs, FactorArgs, SmileArgs, StudyCommand};

#[cfg(feature = "cli")]
mod args {
    use clap::{Args, Parser, Subcommand};

    use super::RunSettings;
    use crate::sim::dealer::{DealerParams, HedgePolicy};
    use crate::sim::factor::{FactorMarket, HedgeStrategy};
    use crate::smile::SmileQuotes;

    #[derive(Debug, Parser)]
    #[command(name = "fxlab")]
    #[command(about = "FX market-making simulation lab")]
    pub struct Cli {
        #[command(subcommand)]
        pub command: StudyCommand,

        #[arg(long, default_value = "./output", global = true)]
        pub output: String,

        #[arg(long, default_value = "42", global = true)]
        pub seed: u64,

        #[arg(long, default_value = "1", global = true, help = "Blocking simulation workers")]
        pub workers: usize,

        #[arg(long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Log process CPU/memory stats")]
        pub monitor: bool,
    }

    #[derive(Debug, Subcommand)]
    pub enum StudyCommand {
        /// Electronic dealer hedging simulation
        Dealer(DealerArgs),
        /// Factor vs. triangle hedging comparison
        Factor(FactorArgs),
        /// Volatility smile spline curves
        Smile(SmileArgs),
    }

    impl Cli {
        pub fn run_settings(&self) -> RunSettings {
            let runs = match &self.command {
                StudyCommand::Dealer(args) => args.runs,
                StudyCommand::Factor(args) => args.runs,
                // The smile study is deterministic; runs is unused.
                StudyCommand::Smile(_) => 1,
            };
            RunSettings::new(self.output.clone(), runs, self.seed, self.workers)
        }
    }

    #[derive(Debug, Args)]
    pub struct DealerArgs {
        #[arg(long, default_value = "10000")]
        pub runs: usize,

        #[arg(long, default_value = "0.1")]
        pub annual_vol: f64,

        #[arg(long, default_value = "260")]
        pub trading_days: f64,

        #[arg(long, default_value = "86400", help = "Client trades per day")]
        pub arrival_rate: f64,

        #[arg(long, default_value = "0.0001")]
        pub client_spread: f64,

        #[arg(long, default_value = "0.0002")]
        pub dealer_spread: f64,

        #[arg(long, default_value = "3")]
        pub delta_limit: f64,

        #[arg(long, default_value = "500")]
        pub steps: usize,

        #[arg(long, default_value = "0.1")]
        pub step_fraction: f64,

        #[arg(long, value_delimiter = ',', default_values_t = [HedgePolicy::Full, HedgePolicy::ToLimit])]
        pub policies: Vec<HedgePolicy>,
    }

    impl DealerArgs {
        pub fn params(&self) -> DealerParams {
            DealerParams {
                annual_vol: self.annual_vol,
                trading_days: self.trading_days,
                arrival_rate: self.arrival_rate,
                client_spread: self.client_spread,
                dealer_spread: self.dealer_spread,
                delta_limit: self.delta_limit,
                policy: *self.policies.first().unwrap_or(&HedgePolicy::Full),
                steps: self.steps,
                step_fraction: self.step_fraction,
            }
        }
    }

    #[derive(Debug, Args)]
    pub struct FactorArgs {
        #[arg(long, default_value = "100000")]
        pub runs: usize,

        #[arg(long, value_delimiter = ',', default_values_t = [0.1, 0.25, 0.5, 0.75, 1.0, 2.0])]
        pub tenors: Vec<f64>,

        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = [HedgeStrategy::None, HedgeStrategy::Triangle, HedgeStrategy::Factor]
        )]
        pub strategies: Vec<HedgeStrategy>,

        #[arg(long, default_value = "1")]
        pub spot: f64,

        #[arg(long, default_value = "0.03")]
        pub asset_rate: f64,

        #[arg(long, default_value = "0")]
        pub denominated_rate: f64,

        #[arg(long, default_value = "0.01")]
        pub sigma1: f64,

        #[arg(long, default_value = "0.008")]
        pub sigma2: f64,

        #[arg(long, default_value = "0.5")]
        pub beta1: f64,

        #[arg(long, default_value = "0.1")]
        pub beta2: f64,

        #[arg(long, default_value = "-0.4", allow_hyphen_values = true)]
        pub rho: f64,

        #[arg(long, default_value = "0.25")]
        pub t1: f64,

        #[arg(long, default_value = "1")]
        pub t2: f64,

        #[arg(long, default_value = "0.001")]
        pub dt: f64,
    }

    impl FactorArgs {
        pub fn market(&self) -> FactorMarket {
            FactorMarket {
                spot: self.spot,
                asset_rate: self.asset_rate,
                denominated_rate: self.denominated_rate,
                sigma1: self.sigma1,
                sigma2: self.sigma2,
                beta1: self.beta1,
                beta2: self.beta2,
                rho: self.rho,
                t1: self.t1,
                t2: self.t2,
                dt: self.dt,
            }
        }
    }

    #[derive(Debug, Args)]
    pub struct SmileArgs {
        #[arg(long, default_value = "1")]
        pub spot: f64,

        #[arg(long, default_value = "0.08")]
        pub atm: f64,

        #[arg(long, default_value = "0.01")]
        pub rr25: f64,

        #[arg(long, default_value = "0.018")]
        pub rr10: f64,

        #[arg(long, default_value = "0.0025")]
        pub bf25: f64,

        #[arg(long, default_value = "0.008")]
        pub bf10: f64,

        #[arg(long, default_value = "0.5")]
        pub texp: f64,

        #[arg(long, value_delimiter = ',', default_values_t = [0.01, 10.0])]
        pub extrap_factors: Vec<f64>,

        #[arg(long, default_value = "100")]
        pub curve_points: usize,
    }

    impl SmileArgs {
        pub fn quotes(&self) -> SmileQuotes {
            SmileQuotes {
                spot: self.spot,
                atm: self.atm,
                rr25: self.rr25,
                rr10: self.rr10,
                bf25: self.bf25,
                bf10: self.bf10,
                texp: self.texp,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_settings_validation() {
        assert!(RunSettings::new("./output", 1000, 42, 4).validate().is_ok());
        assert!(RunSettings::new("", 1000, 42, 4).validate().is_err());
        assert!(RunSettings::new("./output", 0, 42, 4).validate().is_err());
        assert!(RunSettings::new("./output", 1000, 42, 0).validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_defaults_parse() {
        use clap::Parser;

        let cli = Cli::parse_from(["fxlab", "dealer"]);
        let settings = cli.run_settings();
        assert_eq!(settings.runs, 10_000);
        assert_eq!(settings.seed, 42);

        let cli = Cli::parse_from(["fxlab", "factor", "--rho", "-0.4"]);
        match cli.command {
            StudyCommand::Factor(args) => {
                assert_eq!(args.tenors.len(), 6);
                assert_eq!(args.strategies.len(), 3);
                assert_eq!(args.rho, -0.4);
            }
            _ => panic!("expected factor subcommand"),
        }
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_policy_list_parses() {
        use crate::sim::dealer::HedgePolicy;
        use clap::Parser;

        let cli = Cli::parse_from(["fxlab", "dealer", "--policies", "full,to-limit"]);
        match cli.command {
            StudyCommand::Dealer(args) => {
                assert_eq!(args.policies, vec![HedgePolicy::Full, HedgePolicy::ToLimit]);
            }
            _ => panic!("expected dealer subcommand"),
        }
    }
}
