//! Savitzky–Golay smoothing.
//!
//! Each output sample is the value at the window centre of a least-squares
//! polynomial fitted to the surrounding `window` samples. Interior points use
//! a fixed convolution kernel; the first and last `window / 2` points are
//! evaluated on a polynomial fitted to the first (last) full window, so the
//! output has exactly as many samples as the input.

use serde::{Deserialize, Serialize};

use super::model::NumericSeries;
use crate::error::{AlignError, AlignResult};

/// Samples per smoothing window.
pub const DEFAULT_WINDOW: usize = 53;
/// Degree of the fitted polynomial.
pub const DEFAULT_DEGREE: usize = 3;

/// Filter shape. The window must be odd and wider than the degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    pub window: usize,
    pub degree: usize,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            degree: DEFAULT_DEGREE,
        }
    }
}

impl SmoothingParams {
    pub fn validate(&self) -> AlignResult<()> {
        if self.window == 0 || self.window % 2 == 0 {
            return Err(AlignError::InvalidInput(format!(
                "smoothing window must be a positive odd number, got {}",
                self.window
            )));
        }
        if self.degree >= self.window {
            return Err(AlignError::InvalidInput(format!(
                "polynomial degree {} must be less than window {}",
                self.degree, self.window
            )));
        }
        Ok(())
    }
}

/// Smooth with the default window (53) and degree (3).
pub fn smooth(series: &NumericSeries) -> AlignResult<NumericSeries> {
    smooth_with(series, SmoothingParams::default())
}

/// Smooth with explicit filter parameters.
///
/// Fails with [`AlignError::InsufficientData`] when the series is shorter
/// than the window and with [`AlignError::InvalidInput`] when it contains a
/// missing or non-finite sample.
pub fn smooth_with(series: &NumericSeries, params: SmoothingParams) -> AlignResult<NumericSeries> {
    params.validate()?;

    let y = series.values();
    let n = y.len();
    let window = params.window;
    if n < window {
        return Err(AlignError::InsufficientData { len: n, window });
    }
    if let Some((i, v)) = y.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(AlignError::InvalidInput(format!(
            "cannot smooth non-finite value {v} at index {i}"
        )));
    }

    let half = window / 2;
    let weights = kernel(window, params.degree)?;
    let mut out = vec![0.0; n];

    for (k, slot) in out.iter_mut().enumerate().take(n - half).skip(half) {
        let span = &y[k - half..=k + half];
        *slot = weights.iter().zip(span).map(|(w, v)| w * v).sum();
    }

    // Edges: fit once per end, evaluate at the uncovered positions.
    let offsets: Vec<f64> = (0..window).map(|i| i as f64 - half as f64).collect();

    let head = fit_polynomial(&offsets, &y[..window], params.degree)?;
    for (k, slot) in out.iter_mut().enumerate().take(half) {
        *slot = eval_polynomial(&head, k as f64 - half as f64);
    }

    let start = n - window;
    let tail = fit_polynomial(&offsets, &y[start..], params.degree)?;
    for (k, slot) in out.iter_mut().enumerate().skip(n - half) {
        *slot = eval_polynomial(&tail, (k - start) as f64 - half as f64);
    }

    Ok(NumericSeries::new(out))
}

/// Convolution weights that evaluate the fitted polynomial at the window
/// centre: row 0 of the pseudo-inverse of the Vandermonde matrix.
fn kernel(window: usize, degree: usize) -> AlignResult<Vec<f64>> {
    let half = (window / 2) as f64;
    let xs: Vec<f64> = (0..window).map(|i| i as f64 - half).collect();

    let mut e0 = vec![0.0; degree + 1];
    e0[0] = 1.0;
    let z = solve(normal_matrix(&xs, degree), e0)?;

    Ok(xs.iter().map(|&x| eval_polynomial(&z, x)).collect())
}

/// Least-squares polynomial coefficients, lowest power first.
fn fit_polynomial(xs: &[f64], ys: &[f64], degree: usize) -> AlignResult<Vec<f64>> {
    let mut rhs = vec![0.0; degree + 1];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut p = 1.0;
        for r in rhs.iter_mut() {
            *r += p * y;
            p *= x;
        }
    }
    solve(normal_matrix(xs, degree), rhs)
}

/// `AᵀA` for the Vandermonde matrix `A[i][j] = xs[i]^j`.
fn normal_matrix(xs: &[f64], degree: usize) -> Vec<Vec<f64>> {
    let size = degree + 1;
    // Power sums Σ x^p for p in 0..=2·degree.
    let mut sums = vec![0.0; 2 * degree + 1];
    for &x in xs {
        let mut p = 1.0;
        for s in sums.iter_mut() {
            *s += p;
            p *= x;
        }
    }
    (0..size)
        .map(|r| (0..size).map(|c| sums[r + c]).collect())
        .collect()
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> AlignResult<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < f64::EPSILON {
            return Err(AlignError::InvalidInput(
                "smoothing system is singular".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for c in col..n {
                a[row][c] -= factor * a[col][c];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|c| a[row][c] * x[c]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

fn eval_polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
