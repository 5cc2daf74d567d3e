//! RSI analysis on daily and weekly bars.

use crate::domain::analysis::kd::zone_signal_label;
use crate::domain::analysis::{fmt2, AnalysisResult, OscillatorZone};
use crate::domain::indicator::rsi::{calculate_rsi, RSI_NEUTRAL};
use crate::domain::ohlcv::{OhlcvBar, PriceSeries, WeekAnchor};
use crate::domain::signal::SignalTier;

pub const RSI_PERIOD: usize = 6;
const TITLE: &str = "RSI Strength (daily/weekly)";

/// Latest RSI, or 50 when there are fewer than `period` bars.
pub fn latest_rsi(bars: &[OhlcvBar], period: usize) -> f64 {
    if bars.len() < period {
        return RSI_NEUTRAL;
    }
    calculate_rsi(bars, period)
        .latest_simple()
        .unwrap_or(RSI_NEUTRAL)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiReading {
    pub daily: f64,
    pub weekly: f64,
}

impl RsiReading {
    pub fn read(series: &PriceSeries, anchor: WeekAnchor) -> Self {
        let weekly_bars = series.resample_weekly(anchor);
        Self {
            daily: latest_rsi(series.bars(), RSI_PERIOD),
            weekly: latest_rsi(&weekly_bars, RSI_PERIOD),
        }
    }

    pub fn daily_zone(&self) -> OscillatorZone {
        OscillatorZone::of(self.daily)
    }

    pub fn weekly_zone(&self) -> OscillatorZone {
        OscillatorZone::of(self.weekly)
    }

    pub fn tier(&self) -> SignalTier {
        match (self.daily_zone(), self.weekly_zone()) {
            (OscillatorZone::Oversold, OscillatorZone::Oversold) => SignalTier::StrongBuy,
            (OscillatorZone::Oversold, _) => SignalTier::Buy,
            (OscillatorZone::Overbought, OscillatorZone::Overbought) => SignalTier::StrongSell,
            (OscillatorZone::Overbought, _) => SignalTier::Sell,
            (OscillatorZone::Neutral, _) => SignalTier::Hold,
        }
    }

    fn short_status(&self) -> &'static str {
        match self.daily_zone() {
            OscillatorZone::Oversold => "Buy (short-term oversold)",
            OscillatorZone::Overbought => "Sell (short-term overheated)",
            OscillatorZone::Neutral => "Watch",
        }
    }

    fn swing_status(&self) -> &'static str {
        match self.weekly_zone() {
            OscillatorZone::Oversold => "Buy (swing low)",
            OscillatorZone::Overbought => "Sell (swing high)",
            OscillatorZone::Neutral => "Watch",
        }
    }

    pub fn to_result(&self) -> AnalysisResult {
        let tier = self.tier();
        let description = match tier {
            SignalTier::StrongBuy => {
                "Daily and weekly oversold together, a resonant buy point".to_string()
            }
            SignalTier::Buy => "Short-term oversold, a rebound is brewing".to_string(),
            SignalTier::StrongSell => {
                "Daily and weekly overheated together, a resonant sell point".to_string()
            }
            SignalTier::Sell => "Short-term overbought, watch for a pullback".to_string(),
            SignalTier::Hold
                if self.weekly_zone() == OscillatorZone::Oversold
                    && self.daily > 30.0
                    && self.daily < 50.0 =>
            {
                "Swing low, short-term consolidating".to_string()
            }
            SignalTier::Hold => format!(
                "Daily ({}) and weekly ({}) both in the neutral range",
                fmt2(self.daily),
                fmt2(self.weekly)
            ),
        };

        AnalysisResult::new(TITLE, zone_signal_label(tier), tier.bias(), description)
            .with("Short-term (daily RSI)", fmt2(self.daily))
            .with("Short-term status", self.short_status())
            .with("Swing (weekly RSI)", fmt2(self.weekly))
            .with("Swing status", self.swing_status())
    }
}

pub fn analyze(series: &PriceSeries, anchor: WeekAnchor) -> AnalysisResult {
    RsiReading::read(series, anchor).to_result()
}
