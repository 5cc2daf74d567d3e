//! Position advice from a composite score or a single result's bias, given
//! the caller's cost basis.

use serde::Serialize;

use crate::domain::signal::Bias;

pub const STOP_LOSS_ROI_PCT: f64 = -10.0;
pub const SCALE_OUT_ROI_PCT: f64 = 20.0;

/// Return on investment in percent; `None` without a usable cost basis.
pub fn roi_pct(cost_basis: Option<f64>, price: f64) -> Option<f64> {
    let cost = cost_basis.filter(|c| c.is_finite() && *c > 0.0)?;
    Some((price - cost) / cost * 100.0)
}

/// Composite score band used to pick the advice row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBand {
    Low,
    MidLow,
    MidHigh,
    High,
}

impl ScoreBand {
    pub fn of(score: i32) -> Self {
        match score {
            s if s >= 75 => ScoreBand::High,
            s if s >= 60 => ScoreBand::MidHigh,
            s if s >= 40 => ScoreBand::MidLow,
            _ => ScoreBand::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advice {
    NeedCostBasis,
    AddOnStrength,
    AverageDown,
    HoldWithTrailingStop,
    WaitForBase,
    TrimIntoWeakness,
    StopOnRebound,
    TakeProfit,
    CutLosses,
    StopLoss,
    ScaleOut,
    HoldWinner,
    LockInGains,
    HoldThroughDip,
    WatchStop,
}

impl Advice {
    pub fn text(self) -> &'static str {
        match self {
            Advice::NeedCostBasis => "Supply cost basis for personalized advice",
            Advice::AddOnStrength => "Strong trend and in profit: add on strength",
            Advice::AverageDown => "Sold off with fundamentals intact: average down, thesis intact",
            Advice::HoldWithTrailingStop => "Signal steady: hold with a trailing stop",
            Advice::WaitForBase => "Not yet turning up: wait for a base before adding",
            Advice::TrimIntoWeakness => "Momentum fading: take partial profit",
            Advice::StopOnRebound => "Trend unclear: consider a stop on the next rebound",
            Advice::TakeProfit => "Chips loosening: take profit before reversal",
            Advice::CutLosses => "Trend turned bearish: cut losses decisively",
            Advice::StopLoss => "Stop-loss",
            Advice::ScaleOut => "Scale out",
            Advice::HoldWinner => "In profit: keep holding",
            Advice::LockInGains => "In profit: lock in gains",
            Advice::HoldThroughDip => "Under water but signal supportive: hold",
            Advice::WatchStop => "Under water: watch the stop",
        }
    }

    pub fn is_placeholder(self) -> bool {
        self == Advice::NeedCostBasis
    }
}

/// Score band crossed with ROI sign (zero counts as not profitable).
pub fn composite_advice(score: i32, roi: Option<f64>) -> Advice {
    let Some(roi) = roi else {
        return Advice::NeedCostBasis;
    };
    let in_profit = roi > 0.0;
    match (ScoreBand::of(score), in_profit) {
        (ScoreBand::High, true) => Advice::AddOnStrength,
        (ScoreBand::High, false) => Advice::AverageDown,
        (ScoreBand::MidHigh, true) => Advice::HoldWithTrailingStop,
        (ScoreBand::MidHigh, false) => Advice::WaitForBase,
        (ScoreBand::MidLow, true) => Advice::TrimIntoWeakness,
        (ScoreBand::MidLow, false) => Advice::StopOnRebound,
        (ScoreBand::Low, true) => Advice::TakeProfit,
        (ScoreBand::Low, false) => Advice::CutLosses,
    }
}

/// Two-factor advice for single analyses: ROI sign and the result's bias,
/// overridden at the ROI extremes.
pub fn simple_advice(bias: Bias, roi: Option<f64>) -> Advice {
    let Some(roi) = roi else {
        return Advice::NeedCostBasis;
    };
    if roi <= STOP_LOSS_ROI_PCT {
        return Advice::StopLoss;
    }
    if roi >= SCALE_OUT_ROI_PCT {
        return Advice::ScaleOut;
    }
    let bullish = bias == Bias::Bullish;
    match (roi > 0.0, bullish) {
        (true, true) => Advice::HoldWinner,
        (true, false) => Advice::LockInGains,
        (false, true) => Advice::HoldThroughDip,
        (false, false) => Advice::WatchStop,
    }
}
