//! Population standard deviation, used for regression channel widths.
//!
//! STDDEV = sqrt(sum((V[j] - mean)^2) / n)

/// Population standard deviation (divide by n). Empty input yields 0.
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stddev_constant_values() {
        assert!(population_stddev(&[100.0; 5]).abs() < f64::EPSILON);
    }

    #[test]
    fn stddev_known_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_stddev(&values) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn stddev_empty_is_zero() {
        assert_eq!(population_stddev(&[]), 0.0);
    }
}
