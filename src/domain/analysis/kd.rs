//! KD stochastic analysis on daily and weekly bars.

use crate::domain::analysis::{fmt2, AnalysisResult, OscillatorZone};
use crate::domain::indicator::stochastic::{calculate_stochastic, KD_SEED};
use crate::domain::indicator::IndicatorValue;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries, WeekAnchor};
use crate::domain::signal::{Bias, SignalTier};

pub const KD_PERIOD: usize = 9;
const TITLE: &str = "KD Stochastic (daily/weekly)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdPair {
    pub k: f64,
    pub d: f64,
}

impl KdPair {
    pub const NEUTRAL: KdPair = KdPair {
        k: KD_SEED,
        d: KD_SEED,
    };
}

/// Latest K/D, or (50, 50) when there are fewer than `KD_PERIOD` bars.
pub fn latest_kd(bars: &[OhlcvBar]) -> KdPair {
    if bars.len() < KD_PERIOD {
        return KdPair::NEUTRAL;
    }
    match calculate_stochastic(bars, KD_PERIOD).valid_from_end(0) {
        Some(IndicatorValue::Stochastic { k, d }) => KdPair { k: *k, d: *d },
        _ => KdPair::NEUTRAL,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdReading {
    pub daily: KdPair,
    pub weekly: KdPair,
}

impl KdReading {
    pub fn read(series: &PriceSeries, anchor: WeekAnchor) -> Self {
        let weekly_bars = series.resample_weekly(anchor);
        Self {
            daily: latest_kd(series.bars()),
            weekly: latest_kd(&weekly_bars),
        }
    }

    pub fn daily_zone(&self) -> OscillatorZone {
        OscillatorZone::of(self.daily.k)
    }

    pub fn weekly_zone(&self) -> OscillatorZone {
        OscillatorZone::of(self.weekly.k)
    }

    /// Daily zone decides the side, a matching weekly zone escalates it.
    pub fn tier(&self) -> SignalTier {
        match (self.daily_zone(), self.weekly_zone()) {
            (OscillatorZone::Oversold, OscillatorZone::Oversold) => SignalTier::StrongBuy,
            (OscillatorZone::Oversold, _) => SignalTier::Buy,
            (OscillatorZone::Overbought, OscillatorZone::Overbought) => SignalTier::StrongSell,
            (OscillatorZone::Overbought, _) => SignalTier::Sell,
            (OscillatorZone::Neutral, _) => SignalTier::Hold,
        }
    }

    pub fn to_result(&self) -> AnalysisResult {
        let day_k = fmt2(self.daily.k);
        let tier = self.tier();

        let description = match tier {
            SignalTier::StrongBuy => format!(
                "Daily K ({day_k}) in the oversold zone, weekly K oversold in resonance"
            ),
            SignalTier::Buy if self.weekly.k > self.daily.k => {
                format!("Daily K ({day_k}) in the oversold zone (rebound play)")
            }
            SignalTier::Buy => format!("Daily K ({day_k}) in the oversold zone"),
            SignalTier::StrongSell => format!(
                "Daily K ({day_k}) in the overheated zone, weekly K overheated as well"
            ),
            SignalTier::Sell => format!("Daily K ({day_k}) in the overheated zone"),
            SignalTier::Hold => "Indicator in the neutral range".to_string(),
        };

        AnalysisResult::new(TITLE, zone_signal_label(tier), tier.bias(), description)
            .with("Daily K", fmt2(self.daily.k))
            .with("Daily D", fmt2(self.daily.d))
            .with("Weekly K", fmt2(self.weekly.k))
            .with("Weekly D", fmt2(self.weekly.d))
    }
}

/// Signal wording shared by the dual-timeframe oscillators.
pub(crate) fn zone_signal_label(tier: SignalTier) -> &'static str {
    match tier {
        SignalTier::StrongBuy => "Strong Buy",
        SignalTier::Buy => "Buy signal",
        SignalTier::Hold => "Watch",
        SignalTier::Sell => "Sell signal",
        SignalTier::StrongSell => "Strong Sell",
    }
}

pub fn analyze(series: &PriceSeries, anchor: WeekAnchor) -> AnalysisResult {
    KdReading::read(series, anchor).to_result()
}
