//! MACD analysis: histogram momentum crossed with zero-line regime and
//! DIF/signal crossovers.

use crate::domain::analysis::{fmt2, require_bars, AnalysisResult};
use crate::domain::error::AnalysisError;
use crate::domain::indicator::macd::calculate_macd_default;
use crate::domain::indicator::IndicatorValue;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Bias;

pub const MACD_MIN_BARS: usize = 35;
const TITLE: &str = "MACD (momentum x zero line)";

/// Direction of the histogram versus the prior bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Momentum {
    Strengthening,
    Weakening,
    Flat,
}

impl Momentum {
    pub fn label(self) -> &'static str {
        match self {
            Momentum::Strengthening => "Strengthening",
            Momentum::Weakening => "Weakening",
            Momentum::Flat => "Flat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    Golden,
    Death,
    None,
}

/// Entry/exit timing derived from crossovers and histogram sign changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdTiming {
    GoldenCrossAboveZero,
    GoldenCrossBelowZero,
    HistogramTurnsPositive,
    DeathCross,
    MomentumFading,
    Watch,
}

impl MacdTiming {
    pub fn label(self) -> &'static str {
        match self {
            MacdTiming::GoldenCrossAboveZero => "Buy (golden cross above zero)",
            MacdTiming::GoldenCrossBelowZero => "Short-term buy (golden cross below zero)",
            MacdTiming::HistogramTurnsPositive => "Buy (histogram turns positive)",
            MacdTiming::DeathCross => "Sell (death cross)",
            MacdTiming::MomentumFading => "Reduce (momentum fading)",
            MacdTiming::Watch => "Watch",
        }
    }

    fn description(self) -> &'static str {
        match self {
            MacdTiming::GoldenCrossAboveZero => "Pullback over, uptrend resuming.",
            MacdTiming::GoldenCrossBelowZero => "Oversold bounce, trade it short-term.",
            MacdTiming::HistogramTurnsPositive => "Sellers exhausted, buyers taking over.",
            MacdTiming::DeathCross => "Turning down, take profits.",
            MacdTiming::MomentumFading => "Bullish momentum decaying, histogram shrinking.",
            MacdTiming::Watch => "",
        }
    }

    pub fn bias(self) -> Bias {
        match self {
            MacdTiming::GoldenCrossAboveZero
            | MacdTiming::GoldenCrossBelowZero
            | MacdTiming::HistogramTurnsPositive => Bias::Bullish,
            MacdTiming::DeathCross | MacdTiming::MomentumFading => Bias::Bearish,
            MacdTiming::Watch => Bias::Neutral,
        }
    }
}

/// Trend posture for swing holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdSwing {
    HoldLong,
    StayFlat,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub dif: f64,
    pub signal: f64,
    pub histogram: f64,
    pub prev_dif: f64,
    pub prev_signal: f64,
    pub prev_histogram: f64,
}

impl MacdReading {
    pub fn read(series: &PriceSeries) -> Result<Self, AnalysisError> {
        require_bars("MACD", series.len(), MACD_MIN_BARS)?;

        let macd = calculate_macd_default(series.bars());
        let latest = macd.valid_from_end(0);
        let previous = macd.valid_from_end(1);

        match (latest, previous) {
            (
                Some(IndicatorValue::Macd {
                    line,
                    signal,
                    histogram,
                }),
                Some(IndicatorValue::Macd {
                    line: prev_line,
                    signal: prev_signal,
                    histogram: prev_histogram,
                }),
            ) => Ok(Self {
                dif: *line,
                signal: *signal,
                histogram: *histogram,
                prev_dif: *prev_line,
                prev_signal: *prev_signal,
                prev_histogram: *prev_histogram,
            }),
            _ => Err(AnalysisError::Computation {
                reason: "MACD series has no valid latest values".into(),
            }),
        }
    }

    pub fn momentum(&self) -> Momentum {
        if self.histogram > self.prev_histogram {
            Momentum::Strengthening
        } else if self.histogram < self.prev_histogram {
            Momentum::Weakening
        } else {
            Momentum::Flat
        }
    }

    pub fn above_zero(&self) -> bool {
        self.dif > 0.0
    }

    pub fn below_zero(&self) -> bool {
        self.dif < 0.0
    }

    pub fn crossover(&self) -> Crossover {
        if self.dif > self.signal && self.prev_dif <= self.prev_signal {
            Crossover::Golden
        } else if self.dif < self.signal && self.prev_dif >= self.prev_signal {
            Crossover::Death
        } else {
            Crossover::None
        }
    }

    pub fn timing(&self) -> MacdTiming {
        match self.crossover() {
            Crossover::Golden if self.above_zero() => MacdTiming::GoldenCrossAboveZero,
            Crossover::Golden => MacdTiming::GoldenCrossBelowZero,
            _ if self.prev_histogram < 0.0 && self.histogram > 0.0 => {
                MacdTiming::HistogramTurnsPositive
            }
            Crossover::Death => MacdTiming::DeathCross,
            _ if self.momentum() == Momentum::Weakening && self.histogram > 0.0 => {
                MacdTiming::MomentumFading
            }
            _ => MacdTiming::Watch,
        }
    }

    pub fn swing(&self) -> MacdSwing {
        match self.momentum() {
            Momentum::Strengthening
                if self.above_zero() || self.crossover() == Crossover::Golden =>
            {
                MacdSwing::HoldLong
            }
            Momentum::Weakening => MacdSwing::StayFlat,
            _ => MacdSwing::Balanced,
        }
    }

    fn swing_description(&self) -> &'static str {
        match self.swing() {
            MacdSwing::HoldLong if self.above_zero() => {
                "Momentum rising while above the zero line."
            }
            MacdSwing::HoldLong => "Momentum turning up, base completed.",
            MacdSwing::StayFlat if self.below_zero() => {
                "Momentum falling while below the zero line."
            }
            MacdSwing::StayFlat => "Profit-taking pressure.",
            MacdSwing::Balanced => "Bulls and bears in a standoff.",
        }
    }

    pub fn to_result(&self) -> AnalysisResult {
        let timing = self.timing();
        let description = format!("{} {}", timing.description(), self.swing_description())
            .trim()
            .to_string();

        AnalysisResult::new(TITLE, timing.label(), timing.bias(), description)
            .with("DIF (fast)", fmt2(self.dif))
            .with("Signal (slow)", fmt2(self.signal))
            .with("Histogram", fmt2(self.histogram))
            .with("Momentum", self.momentum().label())
            .with(
                "Zero line",
                if self.above_zero() { "Above (bullish)" } else { "Below (bearish)" },
            )
    }
}

pub fn analyze(series: &PriceSeries) -> Result<AnalysisResult, AnalysisError> {
    match MacdReading::read(series) {
        Ok(reading) => Ok(reading.to_result()),
        Err(err @ AnalysisError::InsufficientData { .. }) => {
            Ok(AnalysisResult::insufficient(TITLE, &err))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::{Duration, NaiveDate};

    fn make_series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar {
                date: start + Duration::days(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1000,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    fn reading(dif: f64, signal: f64, prev_dif: f64, prev_signal: f64) -> MacdReading {
        MacdReading {
            dif,
            signal,
            histogram: dif - signal,
            prev_dif,
            prev_signal,
            prev_histogram: prev_dif - prev_signal,
        }
    }

    #[test]
    fn insufficient_bars_neutral() {
        let result = analyze(&make_series(&[10.0; 20])).unwrap();
        assert_eq!(result.signal, "Insufficient data");
        assert_eq!(result.bias, Bias::Neutral);
    }

    #[test]
    fn golden_cross_above_zero_buys() {
        let r = reading(1.0, 0.5, 0.4, 0.5);
        assert_eq!(r.crossover(), Crossover::Golden);
        assert_eq!(r.timing(), MacdTiming::GoldenCrossAboveZero);
        assert_eq!(r.swing(), MacdSwing::HoldLong);
    }

    #[test]
    fn golden_cross_below_zero_short_term() {
        let r = reading(-1.0, -1.5, -1.6, -1.5);
        assert_eq!(r.timing(), MacdTiming::GoldenCrossBelowZero);
        assert_eq!(r.swing(), MacdSwing::HoldLong);
    }

    #[test]
    fn death_cross_sells() {
        let r = reading(0.5, 0.6, 0.7, 0.6);
        assert_eq!(r.crossover(), Crossover::Death);
        assert_eq!(r.timing(), MacdTiming::DeathCross);
        assert_eq!(r.timing().bias(), Bias::Bearish);
    }

    #[test]
    fn fading_positive_histogram_reduces() {
        let r = reading(2.0, 1.5, 2.2, 1.4);
        assert_eq!(r.crossover(), Crossover::None);
        assert_eq!(r.momentum(), Momentum::Weakening);
        assert_eq!(r.timing(), MacdTiming::MomentumFading);
        assert_eq!(r.swing(), MacdSwing::StayFlat);
    }

    #[test]
    fn flat_prices_watch() {
        let r = MacdReading::read(&make_series(&[50.0; 40])).unwrap();
        assert_eq!(r.momentum(), Momentum::Flat);
        assert_eq!(r.timing(), MacdTiming::Watch);
        assert_eq!(r.swing(), MacdSwing::Balanced);
        assert_eq!(r.to_result().description, "Bulls and bears in a standoff.");
    }

    #[test]
    fn rising_prices_dif_above_zero() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let r = MacdReading::read(&make_series(&closes)).unwrap();
        assert!(r.above_zero());
        assert!(r.dif > r.signal);
    }
}
