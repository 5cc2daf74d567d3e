//! Price gap detection over the recent window.

use chrono::NaiveDate;

use crate::domain::analysis::{fmt2, AnalysisResult};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Bias;

pub const GAP_LOOKBACK: usize = 120;
/// Minimum gap size as a percentage of the reference price.
pub const MIN_GAP_PCT: f64 = 0.5;
pub const GAPS_REPORTED: usize = 4;
const TITLE: &str = "Price Gaps";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapDirection {
    /// Today's low above yesterday's high; acts as support.
    Up,
    /// Today's high below yesterday's low; acts as resistance.
    Down,
}

impl GapDirection {
    pub fn label(self) -> &'static str {
        match self {
            GapDirection::Up => "Up gap (support)",
            GapDirection::Down => "Down gap (resistance)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub date: NaiveDate,
    pub direction: GapDirection,
    /// Lower edge of the unfilled range.
    pub from: f64,
    /// Upper edge of the unfilled range.
    pub to: f64,
}

/// All gaps in the trailing window, newest first.
pub fn find_gaps(series: &PriceSeries) -> Vec<Gap> {
    let window = series.tail(GAP_LOOKBACK);
    let mut gaps: Vec<Gap> = window
        .windows(2)
        .filter_map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            if curr.low > prev.high {
                let size = (curr.low - prev.high) / prev.high * 100.0;
                (size > MIN_GAP_PCT).then_some(Gap {
                    date: curr.date,
                    direction: GapDirection::Up,
                    from: prev.high,
                    to: curr.low,
                })
            } else if curr.high < prev.low {
                let size = (prev.low - curr.high) / prev.low * 100.0;
                (size > MIN_GAP_PCT).then_some(Gap {
                    date: curr.date,
                    direction: GapDirection::Down,
                    from: curr.high,
                    to: prev.low,
                })
            } else {
                None
            }
        })
        .collect();
    gaps.reverse();
    gaps
}

pub fn analyze(series: &PriceSeries) -> AnalysisResult {
    let Some(price) = series.latest_close() else {
        return AnalysisResult::no_data(TITLE, "No price data available");
    };

    let gaps = find_gaps(series);
    let recent: Vec<&Gap> = gaps.iter().take(GAPS_REPORTED).collect();

    let Some(newest) = recent.first() else {
        return AnalysisResult::new(
            TITLE,
            "No notable gaps",
            Bias::Neutral,
            "Recent price action is continuous, no gaps",
        );
    };

    let (signal, bias) = match newest.direction {
        GapDirection::Up => ("Bullish gap support", Bias::Bullish),
        GapDirection::Down => ("Bearish gap resistance", Bias::Bearish),
    };

    let mut result = AnalysisResult::new(
        TITLE,
        signal,
        bias,
        format!("Detected {} recent unfilled gaps", recent.len()),
    )
    .with("Price", fmt2(price));

    for (idx, gap) in recent.iter().enumerate() {
        result.push(
            format!("Gap {}", idx + 1),
            format!(
                "{} | {} | {} ~ {}",
                gap.date.format("%Y-%m-%d"),
                gap.direction.label(),
                fmt2(gap.from),
                fmt2(gap.to)
            ),
        );
    }

    result
}
