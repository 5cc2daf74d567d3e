//! Per-indicator analyzers.
//!
//! Each analyzer reads a [`PriceSeries`](crate::domain::ohlcv::PriceSeries)
//! into a typed reading (zones, crossovers, momentum as enums) and renders
//! that reading as an [`AnalysisResult`]. Composites and scorers consume the
//! typed readings, never the rendered text.

pub mod box_range;
pub mod chips;
pub mod fibonacci;
pub mod financial;
pub mod gap;
pub mod kd;
pub mod macd;
pub mod moving_average;
pub mod pattern;
pub mod regression;
pub mod rsi;
pub mod support_resistance;
pub mod surge;

use std::panic::{self, AssertUnwindSafe};

use log::error;
use serde::Serialize;

use crate::domain::error::AnalysisError;
use crate::domain::signal::Bias;

pub const ERROR_SIGNAL: &str = "ERROR";
pub const NO_DATA_SIGNAL: &str = "No data";
pub const INSUFFICIENT_SIGNAL: &str = "Insufficient data";

/// One display row: label and pre-formatted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRow {
    pub label: String,
    pub value: String,
}

/// Structured output of a single analysis.
///
/// `values` keeps insertion order; presentation layers render it as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub title: String,
    pub signal: String,
    pub bias: Bias,
    pub description: String,
    pub values: Vec<ValueRow>,
}

impl AnalysisResult {
    pub fn new(
        title: impl Into<String>,
        signal: impl Into<String>,
        bias: Bias,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            signal: signal.into(),
            bias,
            description: description.into(),
            values: Vec::new(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, ERROR_SIGNAL, Bias::Neutral, message)
    }

    pub fn no_data(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, NO_DATA_SIGNAL, Bias::Neutral, description)
    }

    /// Neutral result for a series shorter than an indicator's lookback.
    pub fn insufficient(title: impl Into<String>, err: &AnalysisError) -> Self {
        Self::new(title, INSUFFICIENT_SIGNAL, Bias::Neutral, err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.signal == ERROR_SIGNAL
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.values.push(ValueRow {
            label: label.into(),
            value: value.into(),
        });
    }

    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(label, value);
        self
    }

    /// Insert rows ahead of the existing ones, preserving their order.
    pub fn prepend(&mut self, rows: Vec<ValueRow>) {
        self.values.splice(0..0, rows);
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// Run one analysis step, converting any fault into an ERROR-tagged result.
///
/// Both `AnalysisError`s and panics stop here; nothing escapes to the caller.
pub fn guarded<F>(title: &str, step: F) -> AnalysisResult
where
    F: FnOnce() -> Result<AnalysisResult, AnalysisError>,
{
    match panic::catch_unwind(AssertUnwindSafe(step)) {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            error!("{title} failed: {err}");
            AnalysisResult::error(title, err.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("{title} panicked: {message}");
            AnalysisResult::error(title, message)
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected fault".to_string()
    }
}

pub(crate) fn require_bars(
    indicator: &str,
    bars: usize,
    minimum: usize,
) -> Result<(), AnalysisError> {
    if bars < minimum {
        return Err(AnalysisError::InsufficientData {
            indicator: indicator.to_string(),
            bars,
            minimum,
        });
    }
    Ok(())
}

/// Oscillator zone with the 30/80 thresholds used by KD and RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorZone {
    Oversold,
    Neutral,
    Overbought,
}

pub const OVERSOLD_BELOW: f64 = 30.0;
pub const OVERBOUGHT_ABOVE: f64 = 80.0;

impl OscillatorZone {
    pub fn of(value: f64) -> Self {
        if value < OVERSOLD_BELOW {
            OscillatorZone::Oversold
        } else if value > OVERBOUGHT_ABOVE {
            OscillatorZone::Overbought
        } else {
            OscillatorZone::Neutral
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn fmt2(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn fmt_signed_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}
