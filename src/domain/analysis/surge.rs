//! Surge screen: limit-up runs and persistent weekly strength.

use crate::domain::analysis::{fmt_signed_pct, AnalysisResult};
use crate::domain::ohlcv::{PriceSeries, WeekAnchor};
use crate::domain::signal::Bias;

/// Daily gain treated as a limit-up close, in percent.
pub const LIMIT_UP_PCT: f64 = 9.4;
pub const LIMIT_UP_RUN: usize = 3;
pub const UP_WEEKS_RUN: usize = 5;
const TITLE: &str = "Surge Screen";

#[derive(Debug, Clone, PartialEq)]
pub struct SurgeReading {
    /// Last `LIMIT_UP_RUN` daily changes in percent, oldest first.
    pub recent_changes: Vec<f64>,
    pub limit_up_run: bool,
    pub up_weeks_run: bool,
}

impl SurgeReading {
    pub fn read(series: &PriceSeries) -> Self {
        let tail = series.tail(LIMIT_UP_RUN + 1);
        let recent_changes: Vec<f64> = tail
            .windows(2)
            .map(|pair| (pair[1].close - pair[0].close) / pair[0].close * 100.0)
            .collect();
        let limit_up_run = recent_changes.len() == LIMIT_UP_RUN
            && recent_changes.iter().all(|&pct| pct > LIMIT_UP_PCT);

        // Trading weeks close on Friday regardless of the configured anchor.
        let weekly = series.resample_weekly(WeekAnchor::Friday);
        let up_weeks_run = weekly.len() >= UP_WEEKS_RUN
            && weekly[weekly.len() - UP_WEEKS_RUN..]
                .iter()
                .all(|w| w.is_up_candle());

        Self {
            recent_changes,
            limit_up_run,
            up_weeks_run,
        }
    }

    pub fn matched(&self) -> bool {
        self.limit_up_run || self.up_weeks_run
    }

    pub fn to_result(&self, code: &str) -> AnalysisResult {
        let mut reasons = Vec::new();
        if self.limit_up_run {
            reasons.push("3 consecutive limit-up days");
        }
        if self.up_weeks_run {
            reasons.push("5 consecutive up weeks");
        }

        let (signal, bias, description) = if self.matched() {
            (
                "Surge candidate",
                Bias::Bullish,
                format!("{code}: {}", reasons.join(", ")),
            )
        } else {
            (
                "No surge",
                Bias::Neutral,
                format!("{code} does not meet either surge condition"),
            )
        };

        let changes = self
            .recent_changes
            .iter()
            .map(|&pct| fmt_signed_pct(pct))
            .collect::<Vec<_>>()
            .join(", ");

        AnalysisResult::new(TITLE, signal, bias, description)
            .with("Condition A", "3 consecutive limit-up days")
            .with("Condition B", "5 consecutive up weeks")
            .with("Recent daily change", if changes.is_empty() { "-".to_string() } else { changes })
            .with("Limit-up run", yes_no(self.limit_up_run))
            .with("Up-week run", yes_no(self.up_weeks_run))
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn analyze(series: &PriceSeries) -> AnalysisResult {
    if series.is_empty() {
        return AnalysisResult::no_data(TITLE, "No price data available");
    }
    SurgeReading::read(series).to_result(series.code())
}
