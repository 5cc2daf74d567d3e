//! Moving-average trend analysis: MA20 lifeline for the swing view, MA5/MA10
//! and MA20 bias for the short-term view.

use crate::domain::analysis::{fmt2, require_bars, AnalysisResult};
use crate::domain::error::AnalysisError;
use crate::domain::indicator::calculate_sma;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::signal::Bias;

/// Longest window (60) plus one bar for slopes and crossovers.
pub const MA_MIN_BARS: usize = 61;
pub const BIAS_EXTREME_PCT: f64 = 20.0;
const PULLBACK_TOLERANCE: f64 = 1.01;
const TITLE: &str = "Moving Average Trend";

/// Latest simple moving average over `period` closes, if enough bars exist.
pub fn latest_sma(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    calculate_sma(bars, period).latest_simple()
}

fn sma_pair(bars: &[OhlcvBar], period: usize) -> Result<(f64, f64), AnalysisError> {
    let series = calculate_sma(bars, period);
    match (series.latest_simple(), series.previous_simple()) {
        (Some(current), Some(previous)) => Ok((current, previous)),
        _ => Err(AnalysisError::Computation {
            reason: format!("MA{period} unavailable"),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaSwing {
    HoldLong,
    AddOnPullback,
    Breakout,
    Consolidating,
    Exit,
    Weakening,
    Neutral,
}

impl MaSwing {
    pub fn label(self) -> &'static str {
        match self {
            MaSwing::HoldLong => "Swing hold (long)",
            MaSwing::AddOnPullback => "Add on pullback",
            MaSwing::Breakout => "Swing breakout",
            MaSwing::Consolidating => "Watch (consolidating)",
            MaSwing::Exit => "Swing sell (short)",
            MaSwing::Weakening => "Caution (weakening)",
            MaSwing::Neutral => "Watch",
        }
    }

    fn description(self) -> &'static str {
        match self {
            MaSwing::HoldLong => "Above a rising MA20 lifeline",
            MaSwing::AddOnPullback => "Pullback to the MA20 lifeline held",
            MaSwing::Breakout => "Fresh breakout above the MA20 lifeline",
            MaSwing::Consolidating => "Above MA20 but the average is flat, momentum lacking",
            MaSwing::Exit => "Below a falling MA20 lifeline, stop out",
            MaSwing::Weakening => "Broke below the lifeline, awaiting confirmation",
            MaSwing::Neutral => "Price consolidating around the lifeline",
        }
    }

    pub fn bias(self) -> Bias {
        match self {
            MaSwing::HoldLong | MaSwing::AddOnPullback | MaSwing::Breakout => Bias::Bullish,
            MaSwing::Exit | MaSwing::Weakening => Bias::Bearish,
            MaSwing::Consolidating | MaSwing::Neutral => Bias::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaShortTerm {
    Strong,
    TakeProfit,
    GoldenCross,
    ShortSell,
    SpeculativeRebound,
    Quiet,
}

impl MaShortTerm {
    pub fn label(self) -> &'static str {
        match self {
            MaShortTerm::Strong => "Strong buy",
            MaShortTerm::TakeProfit => "Take profit",
            MaShortTerm::GoldenCross => "Short-term buy",
            MaShortTerm::ShortSell => "Short-term sell",
            MaShortTerm::SpeculativeRebound => "Speculative rebound (risky)",
            MaShortTerm::Quiet => "Watch",
        }
    }

    fn description(self) -> &'static str {
        match self {
            MaShortTerm::Strong => "riding the 5-day line",
            MaShortTerm::TakeProfit => "positive bias overextended, pullback likely",
            MaShortTerm::GoldenCross => "MA5 crossed above MA10",
            MaShortTerm::ShortSell => "held down by the 5-day line",
            MaShortTerm::SpeculativeRebound => "negative bias overextended, rebound possible",
            MaShortTerm::Quiet => "no clear short-term signal",
        }
    }

    /// Short-term states strong enough to override the swing signal.
    pub fn overrides_swing(self) -> bool {
        matches!(self, MaShortTerm::TakeProfit | MaShortTerm::SpeculativeRebound)
    }

    pub fn bias(self) -> Bias {
        match self {
            MaShortTerm::Strong | MaShortTerm::GoldenCross | MaShortTerm::SpeculativeRebound => {
                Bias::Bullish
            }
            MaShortTerm::TakeProfit | MaShortTerm::ShortSell => Bias::Bearish,
            MaShortTerm::Quiet => Bias::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaReading {
    pub price: f64,
    pub prev_price: f64,
    pub low: f64,
    pub ma5: f64,
    pub ma10: f64,
    pub ma20: f64,
    pub ma60: f64,
    pub prev_ma5: f64,
    pub prev_ma10: f64,
    pub prev_ma20: f64,
}

impl MaReading {
    pub fn read(series: &PriceSeries) -> Result<Self, AnalysisError> {
        require_bars("MA", series.len(), MA_MIN_BARS)?;
        let bars = series.bars();
        let latest = &bars[bars.len() - 1];
        let previous = &bars[bars.len() - 2];

        let (ma5, prev_ma5) = sma_pair(bars, 5)?;
        let (ma10, prev_ma10) = sma_pair(bars, 10)?;
        let (ma20, prev_ma20) = sma_pair(bars, 20)?;
        let (ma60, _) = sma_pair(bars, 60)?;

        Ok(Self {
            price: latest.close,
            prev_price: previous.close,
            low: latest.low,
            ma5,
            ma10,
            ma20,
            ma60,
            prev_ma5,
            prev_ma10,
            prev_ma20,
        })
    }

    pub fn ma20_slope(&self) -> f64 {
        self.ma20 - self.prev_ma20
    }

    /// Percentage deviation of price from MA20.
    pub fn bias_pct(&self) -> f64 {
        (self.price - self.ma20) / self.ma20 * 100.0
    }

    /// MA5 > MA10 > MA20 > MA60.
    pub fn is_bullish_alignment(&self) -> bool {
        self.ma5 > self.ma10 && self.ma10 > self.ma20 && self.ma20 > self.ma60
    }

    pub fn swing(&self) -> MaSwing {
        let slope = self.ma20_slope();
        if self.price > self.ma20 {
            if slope <= 0.0 {
                return MaSwing::Consolidating;
            }
            if self.prev_price < self.prev_ma20 {
                MaSwing::Breakout
            } else if self.low <= self.ma20 * PULLBACK_TOLERANCE {
                MaSwing::AddOnPullback
            } else {
                MaSwing::HoldLong
            }
        } else if self.price < self.ma20 {
            if slope < 0.0 {
                MaSwing::Exit
            } else {
                MaSwing::Weakening
            }
        } else {
            MaSwing::Neutral
        }
    }

    pub fn short_term(&self) -> MaShortTerm {
        if self.ma5 > self.ma10 && self.price > self.ma5 {
            if self.bias_pct() > BIAS_EXTREME_PCT {
                MaShortTerm::TakeProfit
            } else {
                MaShortTerm::Strong
            }
        } else if self.ma5 > self.ma10 && self.prev_ma5 <= self.prev_ma10 {
            MaShortTerm::GoldenCross
        } else if self.ma5 < self.ma10 {
            if self.bias_pct() < -BIAS_EXTREME_PCT {
                MaShortTerm::SpeculativeRebound
            } else if self.price < self.ma5 {
                MaShortTerm::ShortSell
            } else {
                MaShortTerm::Quiet
            }
        } else {
            MaShortTerm::Quiet
        }
    }

    /// Trend classification from the swing view.
    pub fn trend(&self) -> Bias {
        self.swing().bias()
    }

    pub fn to_result(&self) -> AnalysisResult {
        let swing = self.swing();
        let short = self.short_term();

        let (signal, bias) = if short.overrides_swing() {
            (short.label(), short.bias())
        } else {
            (swing.label(), swing.bias())
        };

        let description = format!("{}. {}", swing.description(), capitalize(short.description()));

        AnalysisResult::new(TITLE, signal, bias, description)
            .with("Price", fmt2(self.price))
            .with("MA5 (short)", fmt2(self.ma5))
            .with("MA20 (lifeline)", fmt2(self.ma20))
            .with("MA60 (trend)", fmt2(self.ma60))
            .with("Swing status", swing.label())
            .with("Short-term status", short.label())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn analyze(series: &PriceSeries) -> Result<AnalysisResult, AnalysisError> {
    match MaReading::read(series) {
        Ok(reading) => Ok(reading.to_result()),
        Err(err @ AnalysisError::InsufficientData { .. }) => {
            Ok(AnalysisResult::insufficient(TITLE, &err))
        }
        Err(err) => Err(err),
    }
}
