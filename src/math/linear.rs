use ndarray::{Array1, Array2};

use crate::utils::error::{LabError, Result};

/// Solves the dense system `a * x = b` by Gaussian elimination with partial
/// pivoting. The systems this lab builds are small (24x24 for the smile
/// spline), so a direct elimination is plenty.
pub fn solve_dense(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(LabError::NumericsError {
            message: format!(
                "solve_dense expects a square system, got {}x{} with rhs of length {}",
                a.nrows(),
                a.ncols(),
                b.len()
            ),
        });
    }

    let mut m = a.clone();
    let mut rhs = b.clone();

    for col in 0..n {
        // Partial pivot: bring the largest remaining entry into the diagonal.
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                m[[i, col]]
                    .abs()
                    .partial_cmp(&m[[j, col]].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if m[[pivot_row, col]].abs() < 1e-12 {
            return Err(LabError::NumericsError {
                message: format!("singular system: no usable pivot in column {}", col),
            });
        }

        if pivot_row != col {
            for k in 0..n {
                let tmp = m[[col, k]];
                m[[col, k]] = m[[pivot_row, k]];
                m[[pivot_row, k]] = tmp;
            }
            rhs.swap(col, pivot_row);
        }

        for row in (col + 1)..n {
            let factor = m[[row, col]] / m[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[[row, k]] -= factor * m[[col, k]];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    // Back substitution.
    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let mut acc = rhs[row];
        for k in (row + 1)..n {
            acc -= m[[row, k]] * x[k];
        }
        x[row] = acc / m[[row, row]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_solves_small_system() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![5.0, 10.0];
        let x = solve_dense(&a, &b).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pivoting_handles_zero_diagonal() {
        let a = array![[0.0, 1.0], [1.0, 0.0]];
        let b = array![2.0, 3.0];
        let x = solve_dense(&a, &b).unwrap();
        assert_relative_eq!(x[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_system_is_an_error() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let b = array![1.0, 2.0];
        assert!(solve_dense(&a, &b).is_err());
    }

    #[test]
    fn test_rejects_non_square() {
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array1::<f64>::zeros(2);
        assert!(solve_dense(&a, &b).is_err());
    }

    #[test]
    fn test_residual_on_random_like_system() {
        let n = 24;
        let a = Array2::from_shape_fn((n, n), |(i, j)| ((i * 31 + j * 17) % 13) as f64 - 6.0
            + if i == j { 20.0 } else { 0.0 });
        let b = Array1::from_shape_fn(n, |i| (i as f64 * 0.9).cos());
        let x = solve_dense(&a, &b).unwrap();
        let residual = a.dot(&x) - &b;
        for r in residual.iter() {
            assert!(r.abs() < 1e-9);
        }
    }
}
