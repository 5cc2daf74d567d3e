//! Aggregated support and resistance levels.
//!
//! Candidates come from MA5/10/20/60, the 60-bar high and low, and Fibonacci
//! retracements of that 60-bar range. Levels within 0.5% of the previously
//! kept level are merged and their sources joined.

use crate::domain::analysis::fibonacci::{retracement_levels, swing_range};
use crate::domain::analysis::moving_average::latest_sma;
use crate::domain::analysis::{fmt2, fmt_signed_pct, AnalysisResult};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Bias;

const MA_PERIODS: [usize; 4] = [5, 10, 20, 60];
const SWING_WINDOW: usize = 60;
const MERGE_TOLERANCE: f64 = 0.005;
const TESTING_PROXIMITY: f64 = 0.01;
const TITLE: &str = "Key Support / Resistance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelKind {
    Support,
    Resistance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceLevel {
    pub price: f64,
    pub sources: Vec<String>,
}

impl PriceLevel {
    fn new(price: f64, source: impl Into<String>) -> Self {
        Self {
            price,
            sources: vec![source.into()],
        }
    }

    pub fn source_label(&self) -> String {
        self.sources.join(" / ")
    }

    pub fn kind(&self, price: f64) -> LevelKind {
        if self.price > price {
            LevelKind::Resistance
        } else {
            LevelKind::Support
        }
    }

    pub fn distance_pct(&self, price: f64) -> f64 {
        (self.price - price) / price * 100.0
    }
}

fn candidate_levels(series: &PriceSeries) -> Vec<PriceLevel> {
    let mut levels = Vec::new();

    for period in MA_PERIODS {
        if let Some(ma) = latest_sma(series.bars(), period) {
            levels.push(PriceLevel::new(ma, format!("MA{period}")));
        }
    }

    if let Some((high, low)) = swing_range(series.tail(SWING_WINDOW)) {
        levels.push(PriceLevel::new(high, "60-day high"));
        levels.push(PriceLevel::new(low, "60-day low"));
        for (ratio, price) in retracement_levels(high, low) {
            levels.push(PriceLevel::new(price, format!("Fib {:.1}%", ratio * 100.0)));
        }
    }

    levels
}

/// Sort descending and merge near-identical neighbours.
pub fn merge_levels(mut levels: Vec<PriceLevel>) -> Vec<PriceLevel> {
    levels.sort_by(|a, b| b.price.total_cmp(&a.price));

    let mut merged: Vec<PriceLevel> = Vec::with_capacity(levels.len());
    for level in levels {
        match merged.last_mut() {
            Some(last) if !is_distinct(last.price, level.price) => {
                last.sources.extend(level.sources);
            }
            _ => merged.push(level),
        }
    }
    merged
}

fn is_distinct(kept: f64, candidate: f64) -> bool {
    if kept == 0.0 {
        return candidate != 0.0;
    }
    (kept - candidate).abs() / kept > MERGE_TOLERANCE
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupportResistanceReading {
    pub price: f64,
    pub levels: Vec<PriceLevel>,
}

impl SupportResistanceReading {
    pub fn read(series: &PriceSeries) -> Option<Self> {
        let price = series.latest_close()?;
        Some(Self {
            price,
            levels: merge_levels(candidate_levels(series)),
        })
    }

    /// Closest level above the price.
    pub fn nearest_resistance(&self) -> Option<&PriceLevel> {
        self.levels.iter().filter(|l| l.price > self.price).last()
    }

    /// Closest level below the price.
    pub fn nearest_support(&self) -> Option<&PriceLevel> {
        self.levels.iter().find(|l| l.price < self.price)
    }

    pub fn to_result(&self) -> AnalysisResult {
        let near = |level: &PriceLevel| {
            self.price > 0.0 && (level.price - self.price).abs() / self.price < TESTING_PROXIMITY
        };

        let mut result = match (self.nearest_resistance(), self.nearest_support()) {
            (Some(res), _) if near(res) => AnalysisResult::new(
                TITLE,
                "Testing resistance",
                Bias::Neutral,
                format!("About to test {} ({})", res.source_label(), fmt2(res.price)),
            ),
            (_, Some(sup)) if near(sup) => AnalysisResult::new(
                TITLE,
                "Testing support",
                Bias::Neutral,
                format!("Retesting {} ({})", sup.source_label(), fmt2(sup.price)),
            ),
            _ => AnalysisResult::new(
                TITLE,
                "Range bound",
                Bias::Neutral,
                "Price sits between support and resistance",
            ),
        };

        for (idx, level) in self.levels.iter().enumerate() {
            let kind = match level.kind(self.price) {
                LevelKind::Resistance => "Resistance",
                LevelKind::Support => "Support",
            };
            result.push(
                format!("Level {:02}", idx + 1),
                format!(
                    "{} | {} | {} | {}",
                    fmt2(level.price),
                    kind,
                    fmt_signed_pct(level.distance_pct(self.price)),
                    level.source_label()
                ),
            );
        }

        result
    }
}

pub fn analyze(series: &PriceSeries) -> AnalysisResult {
    match SupportResistanceReading::read(series) {
        Some(reading) => reading.to_result(),
        None => AnalysisResult::no_data(TITLE, "No price data available"),
    }
}
