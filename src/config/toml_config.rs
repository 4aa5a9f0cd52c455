use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::RunSettings;
use crate::sim::dealer::{DealerParams, HedgePolicy};
use crate::sim::factor::{FactorMarket, HedgeStrategy};
use crate::smile::SmileQuotes;
use crate::utils::error::{LabError, Result};
use crate::utils::validation::{self, Validate};

/// Suite configuration for the `lab-suite` binary: lab metadata, shared
/// simulation settings and one optional section per study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub lab: LabSection,
    pub simulation: Option<SimulationSection>,
    pub output: OutputSection,
    pub monitoring: Option<MonitoringSection>,
    pub dealer: Option<DealerSection>,
    pub factor: Option<FactorSection>,
    pub smile: Option<SmileSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabSection {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSection {
    pub runs: Option<usize>,
    pub seed: Option<u64>,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealerSection {
    pub runs: Option<usize>,
    pub annual_vol: Option<f64>,
    pub trading_days: Option<f64>,
    pub arrival_rate: Option<f64>,
    pub client_spread: Option<f64>,
    pub dealer_spread: Option<f64>,
    pub delta_limit: Option<f64>,
    pub steps: Option<usize>,
    pub step_fraction: Option<f64>,
    pub policies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorSection {
    pub runs: Option<usize>,
    pub tenors: Option<Vec<f64>>,
    pub strategies: Option<Vec<String>>,
    pub spot: Option<f64>,
    pub asset_rate: Option<f64>,
    pub denominated_rate: Option<f64>,
    pub sigma1: Option<f64>,
    pub sigma2: Option<f64>,
    pub beta1: Option<f64>,
    pub beta2: Option<f64>,
    pub rho: Option<f64>,
    pub t1: Option<f64>,
    pub t2: Option<f64>,
    pub dt: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmileSection {
    pub spot: Option<f64>,
    pub atm: Option<f64>,
    pub rr25: Option<f64>,
    pub rr10: Option<f64>,
    pub bf25: Option<f64>,
    pub bf10: Option<f64>,
    pub texp: Option<f64>,
    pub extrap_factors: Option<Vec<f64>>,
    pub curve_points: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LabError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LabError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values; unknown
    /// variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LabError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    fn base_runs(&self) -> usize {
        self.simulation
            .as_ref()
            .and_then(|s| s.runs)
            .unwrap_or(10_000)
    }

    pub fn seed(&self) -> u64 {
        self.simulation.as_ref().and_then(|s| s.seed).unwrap_or(42)
    }

    pub fn workers(&self) -> usize {
        self.simulation
            .as_ref()
            .and_then(|s| s.workers)
            .unwrap_or(1)
    }

    /// Run settings for a study, honoring a per-study run override.
    pub fn run_settings(&self, study_runs: Option<usize>) -> RunSettings {
        RunSettings::new(
            self.output.path.clone(),
            study_runs.unwrap_or_else(|| self.base_runs()),
            self.seed(),
            self.workers(),
        )
    }

    pub fn dealer_params(&self) -> Option<(DealerParams, Vec<HedgePolicy>, RunSettings)> {
        let section = self.dealer.as_ref()?;
        let defaults = DealerParams::default();
        let params = DealerParams {
            annual_vol: section.annual_vol.unwrap_or(defaults.annual_vol),
            trading_days: section.trading_days.unwrap_or(defaults.trading_days),
            arrival_rate: section.arrival_rate.unwrap_or(defaults.arrival_rate),
            client_spread: section.client_spread.unwrap_or(defaults.client_spread),
            dealer_spread: section.dealer_spread.unwrap_or(defaults.dealer_spread),
            delta_limit: section.delta_limit.unwrap_or(defaults.delta_limit),
            policy: defaults.policy,
            steps: section.steps.unwrap_or(defaults.steps),
            step_fraction: section.step_fraction.unwrap_or(defaults.step_fraction),
        };
        let policies = match &section.policies {
            Some(names) => names
                .iter()
                .filter_map(|name| name.parse().ok())
                .collect(),
            None => vec![HedgePolicy::Full, HedgePolicy::ToLimit],
        };
        Some((params, policies, self.run_settings(section.runs)))
    }

    pub fn factor_market(&self) -> Option<(FactorMarket, Vec<f64>, Vec<HedgeStrategy>, RunSettings)> {
        let section = self.factor.as_ref()?;
        let defaults = FactorMarket::default();
        let market = FactorMarket {
            spot: section.spot.unwrap_or(defaults.spot),
            asset_rate: section.asset_rate.unwrap_or(defaults.asset_rate),
            denominated_rate: section
                .denominated_rate
                .unwrap_or(defaults.denominated_rate),
            sigma1: section.sigma1.unwrap_or(defaults.sigma1),
            sigma2: section.sigma2.unwrap_or(defaults.sigma2),
            beta1: section.beta1.unwrap_or(defaults.beta1),
            beta2: section.beta2.unwrap_or(defaults.beta2),
            rho: section.rho.unwrap_or(defaults.rho),
            t1: section.t1.unwrap_or(defaults.t1),
            t2: section.t2.unwrap_or(defaults.t2),
            dt: section.dt.unwrap_or(defaults.dt),
        };
        let tenors = section
            .tenors
            .clone()
            .unwrap_or_else(|| vec![0.1, 0.25, 0.5, 0.75, 1.0, 2.0]);
        let strategies = match &section.strategies {
            Some(names) => names
                .iter()
                .filter_map(|name| name.parse().ok())
                .collect(),
            None => vec![
                HedgeStrategy::None,
                HedgeStrategy::Triangle,
                HedgeStrategy::Factor,
            ],
        };
        Some((market, tenors, strategies, self.run_settings(section.runs)))
    }

    pub fn smile_quotes(&self) -> Option<(SmileQuotes, Vec<f64>, usize, RunSettings)> {
        let section = self.smile.as_ref()?;
        let defaults = SmileQuotes::default();
        let quotes = SmileQuotes {
            spot: section.spot.unwrap_or(defaults.spot),
            atm: section.atm.unwrap_or(defaults.atm),
            rr25: section.rr25.unwrap_or(defaults.rr25),
            rr10: section.rr10.unwrap_or(defaults.rr10),
            bf25: section.bf25.unwrap_or(defaults.bf25),
            bf10: section.bf10.unwrap_or(defaults.bf10),
            texp: section.texp.unwrap_or(defaults.texp),
        };
        let extrap_factors = section
            .extrap_factors
            .clone()
            .unwrap_or_else(|| vec![0.01, 10.0]);
        let curve_points = section.curve_points.unwrap_or(100);
        Some((quotes, extrap_factors, curve_points, self.run_settings(Some(1))))
    }

    pub fn enabled_studies(&self) -> Vec<&'static str> {
        let mut studies = Vec::new();
        if self.dealer.is_some() {
            studies.push("dealer-hedging");
        }
        if self.factor.is_some() {
            studies.push("factor-hedging");
        }
        if self.smile.is_some() {
            studies.push("smile-spline");
        }
        studies
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.path", &self.output.path)?;

        if let Some(simulation) = &self.simulation {
            if let Some(runs) = simulation.runs {
                validation::validate_positive_count("simulation.runs", runs, 1)?;
            }
            if let Some(workers) = simulation.workers {
                validation::validate_positive_count("simulation.workers", workers, 1)?;
            }
        }

        if self.enabled_studies().is_empty() {
            return Err(LabError::MissingConfigError {
                field: "dealer | factor | smile".to_string(),
            });
        }

        // Unknown policy/strategy names would otherwise be silently dropped.
        if let Some(dealer) = &self.dealer {
            if let Some(policies) = &dealer.policies {
                for name in policies {
                    name.parse::<HedgePolicy>().map_err(|reason| {
                        LabError::InvalidConfigValueError {
                            field: "dealer.policies".to_string(),
                            value: name.clone(),
                            reason,
                        }
                    })?;
                }
            }
        }
        if let Some(factor) = &self.factor {
            if let Some(strategies) = &factor.strategies {
                for name in strategies {
                    name.parse::<HedgeStrategy>().map_err(|reason| {
                        LabError::InvalidConfigValueError {
                            field: "factor.strategies".to_string(),
                            value: name.clone(),
                            reason,
                        }
                    })?;
                }
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[lab]
name = "test-lab"
description = "Test suite"
version = "1.0.0"

[simulation]
runs = 5000
seed = 7
workers = 2

[output]
path = "./test-output"

[factor]
tenors = [0.25, 0.5]
strategies = ["triangle", "factor"]
"#;

    #[test]
    fn test_parse_basic_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();
        assert_eq!(config.lab.name, "test-lab");
        assert_eq!(config.seed(), 7);
        assert_eq!(config.workers(), 2);
        assert_eq!(config.enabled_studies(), vec!["factor-hedging"]);

        let (market, tenors, strategies, settings) = config.factor_market().unwrap();
        assert_eq!(market.rho, -0.4);
        assert_eq!(tenors, vec![0.25, 0.5]);
        assert_eq!(
            strategies,
            vec![HedgeStrategy::Triangle, HedgeStrategy::Factor]
        );
        assert_eq!(settings.runs, 5000);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FXLAB_TEST_OUTPUT", "./env-output");

        let toml_content = r#"
[lab]
name = "env"
description = "env"
version = "1.0"

[output]
path = "${FXLAB_TEST_OUTPUT}"

[smile]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "./env-output");

        std::env::remove_var("FXLAB_TEST_OUTPUT");
    }

    #[test]
    fn test_unknown_strategy_fails_validation() {
        let toml_content = r#"
[lab]
name = "bad"
description = "bad"
version = "1.0"

[output]
path = "./output"

[factor]
strategies = ["martingale"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_without_studies_fails_validation() {
        let toml_content = r#"
[lab]
name = "empty"
description = "empty"
version = "1.0"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.lab.name, "test-lab");
    }
}
