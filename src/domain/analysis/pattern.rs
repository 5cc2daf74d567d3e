//! Double bottom / double top detection on closing prices.

use crate::domain::analysis::{fmt2, AnalysisResult};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Bias;

/// Bars on each side a point must beat to count as an extremum.
pub const EXTREMA_ORDER: usize = 5;
/// Maximum relative difference between the two matched extrema.
pub const MATCH_TOLERANCE: f64 = 0.03;
const TITLE: &str = "Chart Pattern";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Min,
    Max,
}

/// Indices that are strict extrema within `order` bars on either side.
///
/// Neighbours past either end are clamped to the boundary element, so the
/// first and last points never qualify.
fn local_extrema(values: &[f64], order: usize, kind: Extremum) -> Vec<usize> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let beats = |a: f64, b: f64| match kind {
        Extremum::Min => a < b,
        Extremum::Max => a > b,
    };

    (0..n)
        .filter(|&i| {
            (1..=order).all(|k| {
                let left = i.saturating_sub(k);
                let right = (i + k).min(n - 1);
                beats(values[i], values[left]) && beats(values[i], values[right])
            })
        })
        .collect()
}

pub fn local_minima(values: &[f64], order: usize) -> Vec<usize> {
    local_extrema(values, order, Extremum::Min)
}

pub fn local_maxima(values: &[f64], order: usize) -> Vec<usize> {
    local_extrema(values, order, Extremum::Max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    DoubleBottom,
    DoubleTop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub first: f64,
    pub second: f64,
    pub neckline: f64,
    /// Price has broken through the neckline.
    pub confirmed: bool,
}

/// The last two extrema of `indices`, when they sit within tolerance.
fn matched_pair(closes: &[f64], indices: &[usize]) -> Option<(usize, usize)> {
    let [.., i1, i2] = indices else {
        return None;
    };
    let (a, b) = (closes[*i1], closes[*i2]);
    if a != 0.0 && (a - b).abs() / a.abs() < MATCH_TOLERANCE {
        Some((*i1, *i2))
    } else {
        None
    }
}

/// Detect a double bottom, or failing that a double top.
pub fn detect(closes: &[f64]) -> Option<PatternMatch> {
    let price = *closes.last()?;

    if let Some((i1, i2)) = matched_pair(closes, &local_minima(closes, EXTREMA_ORDER)) {
        let neckline = closes[i1..i2].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        return Some(PatternMatch {
            kind: PatternKind::DoubleBottom,
            first: closes[i1],
            second: closes[i2],
            neckline,
            confirmed: price > neckline,
        });
    }

    let (i1, i2) = matched_pair(closes, &local_maxima(closes, EXTREMA_ORDER))?;
    let neckline = closes[i1..i2].iter().copied().fold(f64::INFINITY, f64::min);
    Some(PatternMatch {
        kind: PatternKind::DoubleTop,
        first: closes[i1],
        second: closes[i2],
        neckline,
        confirmed: price < neckline,
    })
}

pub fn analyze(series: &PriceSeries) -> AnalysisResult {
    let closes = series.closes();
    let Some(&price) = closes.last() else {
        return AnalysisResult::no_data(TITLE, "No price data available");
    };

    let mut result = match detect(&closes) {
        None => AnalysisResult::new(
            TITLE,
            "No pattern (consolidating)",
            Bias::Neutral,
            "No clear double bottom or double top",
        ),
        Some(m) => {
            let (signal, bias, description) = match (m.kind, m.confirmed) {
                (PatternKind::DoubleBottom, true) => (
                    "Double bottom (neckline broken)",
                    Bias::Bullish,
                    "W pattern complete and through the neckline, strongly bullish",
                ),
                (PatternKind::DoubleBottom, false) => (
                    "Double bottom (forming)",
                    Bias::Neutral,
                    "Right foot in place, neckline not yet broken",
                ),
                (PatternKind::DoubleTop, true) => (
                    "Double top (neckline broken)",
                    Bias::Bearish,
                    "M pattern complete and below the neckline, pullback risk",
                ),
                (PatternKind::DoubleTop, false) => (
                    "Double top (forming)",
                    Bias::Neutral,
                    "Double top at highs, watch for a pullback",
                ),
            };
            let (first, second) = match m.kind {
                PatternKind::DoubleBottom => ("Left low", "Right low"),
                PatternKind::DoubleTop => ("Left high", "Right high"),
            };
            let pattern = match m.kind {
                PatternKind::DoubleBottom => "Double bottom (W)",
                PatternKind::DoubleTop => "Double top (M)",
            };
            AnalysisResult::new(TITLE, signal, bias, description)
                .with("Pattern", pattern)
                .with(first, fmt2(m.first))
                .with(second, fmt2(m.second))
                .with("Neckline", fmt2(m.neckline))
        }
    };

    result.push("Price", fmt2(price));
    result
}
