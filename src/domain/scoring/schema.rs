//! Versioned scorer inputs and the translation layer for legacy field names.
//!
//! Older producers emitted technical values under several alternate names
//! (`Close`/`price`, `5MA`, `DIF`, ...). All of that is resolved here, once,
//! so the scorers only ever see [`TechnicalSnapshot`] and [`InstitutionClass`].

use std::collections::BTreeMap;

use log::debug;

use crate::domain::analysis::moving_average::latest_sma;
use crate::domain::error::AnalysisError;
use crate::domain::indicator::ema_values;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::ohlcv::PriceSeries;

pub const TECHNICAL_SCHEMA_VERSION: u32 = 2;
/// Version assumed for field maps that carry no `schema_version` key.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;
const VERSION_KEY: &str = "schema_version";

/// Latest-bar technical values consumed by the technical and margin scorers.
///
/// Moving averages and MACD are `None` when the series is too short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechnicalSnapshot {
    pub version: u32,
    pub close: f64,
    pub prev_close: Option<f64>,
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
}

/// Canonical name first, legacy aliases after.
const CLOSE: &[&str] = &["close", "Close", "price", "Price"];
const PREV_CLOSE: &[&str] = &["prev_close", "PrevClose", "previous_close"];
const MA5: &[&str] = &["ma5", "MA5", "5MA"];
const MA20: &[&str] = &["ma20", "MA20", "20MA"];
const MA60: &[&str] = &["ma60", "MA60", "60MA"];
const MACD_LINE: &[&str] = &["macd_line", "DIF", "dif", "MACD"];
const MACD_SIGNAL: &[&str] = &["macd_signal", "signal", "Signal", "DEA", "MACD_Signal"];

fn lookup(fields: &BTreeMap<String, f64>, names: &[&str]) -> Option<f64> {
    let (canonical, aliases) = names.split_first()?;
    if let Some(v) = fields.get(*canonical) {
        return Some(*v);
    }
    aliases.iter().find_map(|alias| {
        fields.get(*alias).map(|v| {
            debug!("translated legacy field {alias} -> {canonical}");
            *v
        })
    })
}

impl TechnicalSnapshot {
    /// Compute the snapshot from a price series; `None` when it is empty.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let closes = series.closes();
        let close = *closes.last()?;
        let prev_close = closes.len().checked_sub(2).map(|i| closes[i]);

        let fast = ema_values(&closes, DEFAULT_FAST);
        let slow = ema_values(&closes, DEFAULT_SLOW);
        let dif: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_values(&dif, DEFAULT_SIGNAL);

        Some(Self {
            version: TECHNICAL_SCHEMA_VERSION,
            close,
            prev_close,
            ma5: latest_sma(series.bars(), 5),
            ma20: latest_sma(series.bars(), 20),
            ma60: latest_sma(series.bars(), 60),
            macd_line: dif.last().copied(),
            macd_signal: signal.last().copied(),
        })
    }

    /// Build a snapshot from a loosely-named field map, translating legacy
    /// names to the current schema.
    pub fn from_fields(fields: &BTreeMap<String, f64>) -> Result<Self, AnalysisError> {
        let version = fields
            .get(VERSION_KEY)
            .map(|v| *v as u32)
            .unwrap_or(LEGACY_SCHEMA_VERSION);
        if version > TECHNICAL_SCHEMA_VERSION {
            return Err(AnalysisError::Degenerate {
                reason: format!("unsupported technical schema version {version}"),
            });
        }

        let close = lookup(fields, CLOSE).ok_or_else(|| AnalysisError::Degenerate {
            reason: "technical snapshot has no close".into(),
        })?;

        Ok(Self {
            version: TECHNICAL_SCHEMA_VERSION,
            close,
            prev_close: lookup(fields, PREV_CLOSE),
            ma5: lookup(fields, MA5),
            ma20: lookup(fields, MA20),
            ma60: lookup(fields, MA60),
            macd_line: lookup(fields, MACD_LINE),
            macd_signal: lookup(fields, MACD_SIGNAL),
        })
    }

    /// Close-to-close move of the latest bar (0 with a single bar).
    pub fn price_change(&self) -> f64 {
        self.prev_close.map_or(0.0, |prev| self.close - prev)
    }

    pub fn macd_bullish(&self) -> Option<bool> {
        Some(self.macd_line? > self.macd_signal?)
    }
}

/// Institutional investor class, after alias translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstitutionClass {
    Foreign,
    Trust,
    Dealer,
}

impl InstitutionClass {
    /// Map a provider class name (current or legacy) to its class.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "Foreign_Investor" | "Foreign_Investor_Net" => Some(InstitutionClass::Foreign),
            "Investment_Trust" | "Investment_Trust_Net" => Some(InstitutionClass::Trust),
            "Dealer_self" | "Dealer_Self_Analysis" | "Dealer_Hedging" | "Dealer"
            | "Dealer_Net" => Some(InstitutionClass::Dealer),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InstitutionClass::Foreign => "Foreign",
            InstitutionClass::Trust => "Trust",
            InstitutionClass::Dealer => "Dealer",
        }
    }
}
