//! Stochastic oscillator (KD).
//!
//! RSV = (C - LL(n)) / (HH(n) - LL(n)) × 100, defined as 50 before the window
//! fills and whenever the n-bar range is zero.
//! K[i] = 2/3·K[i-1] + 1/3·RSV[i], D[i] = 2/3·D[i-1] + 1/3·K[i], both seeded at 50.
//!
//! Warmup: first (n-1) bars are invalid, although K/D already carry values.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const KD_SEED: f64 = 50.0;

pub fn raw_stochastic_value(window: &[OhlcvBar]) -> f64 {
    let Some(last) = window.last() else {
        return KD_SEED;
    };
    let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let range = highest - lowest;

    if range > 0.0 {
        (last.close - lowest) / range * 100.0
    } else {
        KD_SEED
    }
}

pub fn calculate_stochastic(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let mut k = KD_SEED;
    let mut d = KD_SEED;

    for (i, bar) in bars.iter().enumerate() {
        let valid = period > 0 && i + 1 >= period;
        let rsv = if valid {
            raw_stochastic_value(&bars[i + 1 - period..=i])
        } else {
            KD_SEED
        };

        k = (2.0 / 3.0) * k + (1.0 / 3.0) * rsv;
        d = (2.0 / 3.0) * d + (1.0 / 3.0) * k;

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: IndicatorValue::Stochastic { k, d },
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Stochastic { period },
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(day: u32, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    fn kd_at(series: &IndicatorSeries, idx: usize) -> (f64, f64) {
        match series.values[idx].value {
            IndicatorValue::Stochastic { k, d } => (k, d),
            _ => panic!("Expected Stochastic value"),
        }
    }

    #[test]
    fn flat_range_rsv_is_neutral() {
        let bars: Vec<OhlcvBar> = (1..=3).map(|d| make_bar(d, 10.0, 10.0, 10.0)).collect();
        assert_eq!(raw_stochastic_value(&bars), KD_SEED);
    }

    #[test]
    fn rsv_position_in_range() {
        let bars = vec![make_bar(1, 20.0, 10.0, 15.0), make_bar(2, 18.0, 12.0, 17.5)];
        // (17.5 - 10) / (20 - 10) * 100 = 75
        assert!((raw_stochastic_value(&bars) - 75.0).abs() < 1e-12);
    }

    #[test]
    fn flat_series_stays_at_fifty() {
        let bars: Vec<OhlcvBar> = (1..=10).map(|d| make_bar(d, 10.0, 10.0, 10.0)).collect();
        let series = calculate_stochastic(&bars, 9);
        let (k, d) = kd_at(&series, 9);
        assert!((k - 50.0).abs() < 1e-12);
        assert!((d - 50.0).abs() < 1e-12);
    }

    #[test]
    fn recursive_smoothing_step() {
        let bars = vec![
            make_bar(1, 10.0, 0.0, 5.0),
            make_bar(2, 10.0, 0.0, 10.0),
        ];
        let series = calculate_stochastic(&bars, 2);
        // bar 0: warmup, RSV 50 -> K = 50, D = 50
        // bar 1: RSV = 100 -> K = 2/3*50 + 1/3*100, D = 2/3*50 + 1/3*K
        let expected_k = (2.0 / 3.0) * 50.0 + (1.0 / 3.0) * 100.0;
        let expected_d = (2.0 / 3.0) * 50.0 + (1.0 / 3.0) * expected_k;
        let (k, d) = kd_at(&series, 1);
        assert!((k - expected_k).abs() < 1e-12);
        assert!((d - expected_d).abs() < 1e-12);
        assert!(!series.values[0].valid);
        assert!(series.values[1].valid);
    }

    #[test]
    fn rising_closes_push_k_up() {
        let bars: Vec<OhlcvBar> = (1..=20)
            .map(|d| {
                let c = 100.0 + d as f64;
                make_bar(d, c + 0.5, c - 0.5, c)
            })
            .collect();
        let series = calculate_stochastic(&bars, 9);
        let (k, _) = kd_at(&series, 19);
        assert!(k > 80.0);
    }
}
