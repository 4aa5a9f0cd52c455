use statrs::distribution::{ContinuousCDF, Normal};

use crate::utils::error::{LabError, Result};
use crate::utils::validation;

/// Standard FX smile quotes: ATM vol plus 25- and 10-delta risk reversals
/// and butterflies, for one expiry. Rates are zero in the toy market, so
/// forward == spot.
#[derive(Debug, Clone)]
pub struct SmileQuotes {
    pub spot: f64,
    pub atm: f64,
    pub rr25: f64,
    pub rr10: f64,
    pub bf25: f64,
    pub bf10: f64,
    pub texp: f64,
}

impl Default for SmileQuotes {
    fn default() -> Self {
        Self {
            spot: 1.0,
            atm: 0.08,
            rr25: 0.01,
            rr10: 0.018,
            bf25: 0.0025,
            bf10: 0.0080,
            texp: 0.5,
        }
    }
}

impl SmileQuotes {
    pub fn validate(&self) -> Result<()> {
        validation::validate_positive("smile.spot", self.spot)?;
        validation::validate_positive("smile.atm", self.atm)?;
        validation::validate_positive("smile.texp", self.texp)?;
        for (name, vol) in [
            ("smile.vol10p", self.vol10p()),
            ("smile.vol25p", self.vol25p()),
            ("smile.vol25c", self.vol25c()),
            ("smile.vol10c", self.vol10c()),
        ] {
            validation::validate_positive(name, vol)?;
        }
        Ok(())
    }

    pub fn vol25c(&self) -> f64 {
        self.atm + self.rr25 / 2.0 + self.bf25
    }

    pub fn vol25p(&self) -> f64 {
        self.atm - self.rr25 / 2.0 + self.bf25
    }

    pub fn vol10c(&self) -> f64 {
        self.atm + self.rr10 / 2.0 + self.bf10
    }

    pub fn vol10p(&self) -> f64 {
        self.atm - self.rr10 / 2.0 + self.bf10
    }

    /// The five marked vols, ordered by strike (10d put .. 10d call).
    pub fn vols(&self) -> [f64; 5] {
        [
            self.vol10p(),
            self.vol25p(),
            self.atm,
            self.vol25c(),
            self.vol10c(),
        ]
    }

    /// Delta-neutral-straddle ATM strike.
    pub fn atm_strike(&self) -> f64 {
        self.spot * (self.atm * self.atm * self.texp / 2.0).exp()
    }

    /// The five marked strikes, ordered to match `vols()`.
    pub fn strikes(&self) -> Result<[f64; 5]> {
        self.validate()?;

        let normal = Normal::new(0.0, 1.0).map_err(|e| LabError::NumericsError {
            message: format!("standard normal unavailable: {}", e),
        })?;

        let z25 = normal.inverse_cdf(0.25);
        let z10 = normal.inverse_cdf(0.10);

        let strikes = [
            self.delta_strike(self.vol10p(), z10, false),
            self.delta_strike(self.vol25p(), z25, false),
            self.atm_strike(),
            self.delta_strike(self.vol25c(), z25, true),
            self.delta_strike(self.vol10c(), z10, true),
        ];

        validation::validate_strictly_increasing("smile.strikes", &strikes)?;
        Ok(strikes)
    }

    fn delta_strike(&self, vol: f64, z: f64, call: bool) -> f64 {
        let drift = vol * vol * self.texp / 2.0;
        let shift = vol * self.texp.sqrt() * z;
        if call {
            self.spot * (drift - shift).exp()
        } else {
            self.spot * (drift + shift).exp()
        }
    }
}
