use ndarray::{Array1, Array2};

use crate::math::solve_dense;
use crate::utils::error::{LabError, Result};
use crate::utils::validation;

const MARKS: usize = 5;
const SEGMENTS: usize = MARKS + 1;
const UNKNOWNS: usize = 4 * SEGMENTS;

/// Cubic spline through five (strike, vol) points with non-standard
/// boundary conditions: instead of natural-spline ends, the slope and
/// curvature are forced to zero at pseudo-strikes placed `extrap_fact`
/// standard deviations beyond the outside strikes, so extrapolated vols
/// flatten out instead of running off linearly.
#[derive(Debug, Clone)]
pub struct VolSpline {
    strikes: [f64; MARKS],
    /// Marked strikes plus the two pseudo-strikes where the wings go flat.
    all_strikes: [f64; MARKS + 2],
    coeffs: [f64; UNKNOWNS],
}

impl VolSpline {
    /// Fits the spline. `strikes` must be strictly increasing and paired
    /// with `vols`; `extrap_fact` controls how far out the wings flatten.
    ///
    /// The fit solves a 24x24 linear system: six cubic segments
    /// y_i(x) = A_i + B_i x + C_i x^2 + D_i x^3 constrained by
    ///   - value match at the five marked points (5 equations),
    ///   - value, slope and curvature continuity at the five interior
    ///     joins (15 equations),
    ///   - zero slope and curvature at both pseudo-strikes (4 equations).
    pub fn fit(strikes: &[f64], vols: &[f64], texp: f64, extrap_fact: f64) -> Result<Self> {
        if strikes.len() != MARKS {
            return Err(LabError::InvalidConfigValueError {
                field: "spline.strikes".to_string(),
                value: strikes.len().to_string(),
                reason: format!("exactly {} strikes are required", MARKS),
            });
        }
        if vols.len() != MARKS {
            return Err(LabError::InvalidConfigValueError {
                field: "spline.vols".to_string(),
                value: vols.len().to_string(),
                reason: format!("exactly {} vols are required", MARKS),
            });
        }
        validation::validate_strictly_increasing("spline.strikes", strikes)?;
        validation::validate_positive("spline.texp", texp)?;
        validation::validate_positive("spline.extrap_fact", extrap_fact)?;
        for &vol in vols {
            validation::validate_positive("spline.vols", vol)?;
        }

        let strike_min = strikes[0] * (-extrap_fact * vols[0] * texp.sqrt()).exp();
        let strike_max =
            strikes[MARKS - 1] * (extrap_fact * vols[MARKS - 1] * texp.sqrt()).exp();

        let mut xs = [0.0; MARKS + 2];
        xs[0] = strike_min;
        xs[1..=MARKS].copy_from_slice(strikes);
        xs[MARKS + 1] = strike_max;

        let x2: Vec<f64> = xs.iter().map(|x| x * x).collect();
        let x3: Vec<f64> = xs.iter().map(|x| x * x * x).collect();

        let mut a = Array2::<f64>::zeros((UNKNOWNS, UNKNOWNS));
        let mut b = Array1::<f64>::zeros(UNKNOWNS);

        for i in 0..MARKS {
            let x = xs[i + 1];

            // Value at the marked point, taken on the right-hand segment.
            a[[i, 4 * (i + 1)]] = 1.0;
            a[[i, 4 * (i + 1) + 1]] = x;
            a[[i, 4 * (i + 1) + 2]] = x2[i + 1];
            a[[i, 4 * (i + 1) + 3]] = x3[i + 1];
            b[i] = vols[i];

            // Value continuity across the join.
            a[[i + 5, 4 * i]] = 1.0;
            a[[i + 5, 4 * i + 1]] = x;
            a[[i + 5, 4 * i + 2]] = x2[i + 1];
            a[[i + 5, 4 * i + 3]] = x3[i + 1];
            a[[i + 5, 4 * (i + 1)]] = -1.0;
            a[[i + 5, 4 * (i + 1) + 1]] = -x;
            a[[i + 5, 4 * (i + 1) + 2]] = -x2[i + 1];
            a[[i + 5, 4 * (i + 1) + 3]] = -x3[i + 1];

            // Slope continuity.
            a[[i + 10, 4 * i + 1]] = 1.0;
            a[[i + 10, 4 * i + 2]] = 2.0 * x;
            a[[i + 10, 4 * i + 3]] = 3.0 * x2[i + 1];
            a[[i + 10, 4 * (i + 1) + 1]] = -1.0;
            a[[i + 10, 4 * (i + 1) + 2]] = -2.0 * x;
            a[[i + 10, 4 * (i + 1) + 3]] = -3.0 * x2[i + 1];

            // Curvature continuity.
            a[[i + 15, 4 * i + 2]] = 2.0;
            a[[i + 15, 4 * i + 3]] = 6.0 * x;
            a[[i + 15, 4 * (i + 1) + 2]] = -2.0;
            a[[i + 15, 4 * (i + 1) + 3]] = -6.0 * x;
        }

        // Flat wings: slope and curvature vanish at both pseudo-strikes.
        a[[20, 1]] = 1.0;
        a[[20, 2]] = 2.0 * xs[0];
        a[[20, 3]] = 3.0 * x2[0];

        a[[21, 2]] = 2.0;
        a[[21, 3]] = 6.0 * xs[0];

        a[[22, 4 * MARKS + 1]] = 1.0;
        a[[22, 4 * MARKS + 2]] = 2.0 * xs[MARKS + 1];
        a[[22, 4 * MARKS + 3]] = 3.0 * x2[MARKS + 1];

        a[[23, 4 * MARKS + 2]] = 2.0;
        a[[23, 4 * MARKS + 3]] = 6.0 * xs[MARKS + 1];

        let solution = solve_dense(&a, &b)?;

        let mut coeffs = [0.0; UNKNOWNS];
        for (dst, src) in coeffs.iter_mut().zip(solution.iter()) {
            *dst = *src;
        }

        let mut marked = [0.0; MARKS];
        marked.copy_from_slice(strikes);

        Ok(Self {
            strikes: marked,
            all_strikes: xs,
            coeffs,
        })
    }

    /// Strike range beyond which vols are flat.
    pub fn strike_range(&self) -> (f64, f64) {
        (self.all_strikes[0], self.all_strikes[MARKS + 1])
    }

    /// Interpolated vol at `strike`; strikes beyond the pseudo-strikes get
    /// the flat wing value.
    pub fn volatility(&self, strike: f64) -> f64 {
        let (lo, hi) = self.strike_range();
        let strike = strike.clamp(lo, hi);

        let seg = self.strikes.partition_point(|&k| k < strike);

        let a = self.coeffs[4 * seg];
        let b = self.coeffs[4 * seg + 1];
        let c = self.coeffs[4 * seg + 2];
        let d = self.coeffs[4 * seg + 3];

        a + b * strike + c * strike * strike + d * strike * strike * strike
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smile::quotes::SmileQuotes;
    use approx::assert_relative_eq;

    fn fitted(extrap_fact: f64) -> (VolSpline, [f64; 5], [f64; 5]) {
        let quotes = SmileQuotes::default();
        let strikes = quotes.strikes().unwrap();
        let vols = quotes.vols();
        let spline = VolSpline::fit(&strikes, &vols, quotes.texp, extrap_fact).unwrap();
        (spline, strikes, vols)
    }

    #[test]
    fn test_spline_reproduces_marked_vols() {
        let (spline, strikes, vols) = fitted(3.5);
        for (k, v) in strikes.iter().zip(vols.iter()) {
            assert_relative_eq!(spline.volatility(*k), *v, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_wings_are_flat() {
        let (spline, _, _) = fitted(3.5);
        let (lo, hi) = spline.strike_range();

        assert_relative_eq!(spline.volatility(lo * 0.5), spline.volatility(lo), epsilon = 1e-12);
        assert_relative_eq!(spline.volatility(hi * 2.0), spline.volatility(hi), epsilon = 1e-12);

        // Slope dies out approaching the pseudo-strikes.
        let eps = 1e-6;
        let slope_lo = (spline.volatility(lo + eps) - spline.volatility(lo)) / eps;
        let slope_hi = (spline.volatility(hi) - spline.volatility(hi - eps)) / eps;
        assert!(slope_lo.abs() < 1e-4);
        assert!(slope_hi.abs() < 1e-4);
    }

    #[test]
    fn test_spline_is_continuous_at_the_joins() {
        let (spline, strikes, _) = fitted(2.0);
        for &k in &strikes {
            let left = spline.volatility(k - 1e-9);
            let right = spline.volatility(k + 1e-9);
            assert_relative_eq!(left, right, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_tight_extrapolation_pins_the_wings_close() {
        // With a tiny extrapolation factor the pseudo-strikes sit right on
        // the outer marks, so wing vols barely move beyond them.
        let (spline, strikes, vols) = fitted(0.01);
        assert_relative_eq!(spline.volatility(strikes[0] * 0.9), vols[0], epsilon = 1e-3);
        assert_relative_eq!(spline.volatility(strikes[4] * 1.1), vols[4], epsilon = 1e-3);
    }

    #[test]
    fn test_fit_rejects_bad_inputs() {
        let quotes = SmileQuotes::default();
        let strikes = quotes.strikes().unwrap();
        let vols = quotes.vols();

        assert!(VolSpline::fit(&strikes[..4], &vols, 0.5, 3.5).is_err());
        assert!(VolSpline::fit(&strikes, &vols[..4], 0.5, 3.5).is_err());
        assert!(VolSpline::fit(&strikes, &vols, 0.5, 0.0).is_err());
        assert!(VolSpline::fit(&strikes, &vols, -0.5, 3.5).is_err());

        let mut unsorted = strikes;
        unsorted.swap(0, 1);
        assert!(VolSpline::fit(&unsorted, &vols, 0.5, 3.5).is_err());
    }
}
