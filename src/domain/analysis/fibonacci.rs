//! Fibonacci retracement of the recent swing.

use crate::domain::analysis::{fmt2, AnalysisResult};
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::signal::Bias;

pub const FIB_LOOKBACK: usize = 120;
pub const FIB_RATIOS: [f64; 4] = [0.236, 0.382, 0.5, 0.618];
const GOLDEN_PROXIMITY: f64 = 0.02;
const TITLE: &str = "Fibonacci Retracement";

/// Retracement prices projected down from `high`, one per ratio in `FIB_RATIOS`.
pub fn retracement_levels(high: f64, low: f64) -> [(f64, f64); 4] {
    let range = high - low;
    FIB_RATIOS.map(|ratio| (ratio, high - ratio * range))
}

/// Highest high and lowest low over `bars`.
pub fn swing_range(bars: &[OhlcvBar]) -> Option<(f64, f64)> {
    if bars.is_empty() {
        return None;
    }
    let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    Some((high, low))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FibZone {
    Strong,
    Consolidating,
    Deep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibReading {
    pub high: f64,
    pub low: f64,
    pub price: f64,
    pub levels: [(f64, f64); 4],
}

impl FibReading {
    pub fn read(series: &PriceSeries) -> Option<Self> {
        let (high, low) = swing_range(series.tail(FIB_LOOKBACK))?;
        let price = series.latest_close()?;
        Some(Self {
            high,
            low,
            price,
            levels: retracement_levels(high, low),
        })
    }

    fn level(&self, idx: usize) -> f64 {
        self.levels[idx].1
    }

    pub fn zone(&self) -> FibZone {
        if self.price > self.level(0) {
            FibZone::Strong
        } else if self.price < self.level(3) {
            FibZone::Deep
        } else {
            FibZone::Consolidating
        }
    }

    /// Deep retracement sitting within 2% of the 0.618 level.
    pub fn at_golden_support(&self) -> bool {
        self.zone() == FibZone::Deep
            && self.price > 0.0
            && (self.price - self.level(3)).abs() / self.price < GOLDEN_PROXIMITY
    }

    pub fn to_result(&self) -> AnalysisResult {
        let (status, signal, bias) = match self.zone() {
            FibZone::Strong => ("strong upper", "Bullish", Bias::Bullish),
            FibZone::Deep if self.at_golden_support() => {
                ("deep retracement", "0.618 golden support buy", Bias::Bullish)
            }
            FibZone::Deep => ("deep retracement", "Look for support", Bias::Neutral),
            FibZone::Consolidating => ("mid-range consolidation", "Watch", Bias::Neutral),
        };

        let description = format!(
            "Swing high {}, low {}. Price is in the {} zone.",
            fmt2(self.high),
            fmt2(self.low),
            status
        );

        AnalysisResult::new(TITLE, signal, bias, description)
            .with("Swing high (0%)", fmt2(self.high))
            .with("Swing low (100%)", fmt2(self.low))
            .with("0.382 resistance", fmt2(self.level(1)))
            .with("0.5 midpoint", fmt2(self.level(2)))
            .with("0.618 strong support", fmt2(self.level(3)))
            .with("Price", fmt2(self.price))
    }
}

pub fn analyze(series: &PriceSeries) -> AnalysisResult {
    match FibReading::read(series) {
        Some(reading) => reading.to_result(),
        None => AnalysisResult::no_data(TITLE, "No price data available"),
    }
}
