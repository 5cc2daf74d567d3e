//! Ordinary least-squares line through a window of values.
//!
//! x is the bar index 0..n-1. The residual deviation is the population
//! standard deviation of (y - fitted).

use crate::domain::indicator::stddev::population_stddev;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub residual_std: f64,
    len: usize,
}

impl LinearFit {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Fitted value at the last point of the window.
    pub fn latest_fitted(&self) -> f64 {
        self.value_at(self.len.saturating_sub(1) as f64)
    }
}

/// Fit a line to `values`. Needs at least two points.
pub fn fit_line(values: &[f64]) -> Option<LinearFit> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / nf;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let residuals: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, &y)| y - (slope * i as f64 + intercept))
        .collect();

    Some(LinearFit {
        slope,
        intercept,
        residual_std: population_stddev(&residuals),
        len: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_line_has_zero_residual() {
        let values: Vec<f64> = (0..20).map(|i| 10.0 + 0.5 * i as f64).collect();
        let fit = fit_line(&values).unwrap();
        assert_relative_eq!(fit.slope, 0.5, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 10.0, epsilon = 1e-12);
        assert!(fit.residual_std < 1e-9);
        assert_relative_eq!(fit.latest_fitted(), 19.5, epsilon = 1e-9);
    }

    #[test]
    fn flat_values_zero_slope() {
        let fit = fit_line(&[7.0; 10]).unwrap();
        assert!(fit.slope.abs() < 1e-12);
        assert_relative_eq!(fit.latest_fitted(), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn residual_spread_is_population_std() {
        // y = 0,2,0,2 -> best fit slope 0.4, intercept 0.4
        let fit = fit_line(&[0.0, 2.0, 0.0, 2.0]).unwrap();
        assert_relative_eq!(fit.slope, 0.4, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 0.4, epsilon = 1e-12);
        let residuals = [-0.4, 1.2, -1.2, 0.4];
        assert_relative_eq!(
            fit.residual_std,
            population_stddev(&residuals),
            epsilon = 1e-12
        );
    }

    #[test]
    fn too_short_is_none() {
        assert!(fit_line(&[1.0]).is_none());
        assert!(fit_line(&[]).is_none());
    }
}
