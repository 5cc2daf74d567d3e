//! Top-level evaluation: dispatch one analysis kind over in-memory inputs.
//!
//! [`evaluate`] always returns an [`Evaluation`]; faults inside an analysis
//! come back as ERROR-tagged results.

use log::debug;
use serde::Serialize;

use crate::domain::advisor::{roi_pct, simple_advice};
use crate::domain::analysis::kd::KdReading;
use crate::domain::analysis::macd::MacdReading;
use crate::domain::analysis::moving_average::MaReading;
use crate::domain::analysis::rsi::RsiReading;
use crate::domain::analysis::{
    box_range, chips, fibonacci, financial, fmt2, fmt_signed_pct, gap, guarded, kd, macd,
    moving_average, pattern, regression, rsi, support_resistance, surge, AnalysisResult, ValueRow,
};
use crate::domain::error::AnalysisError;
use crate::domain::fusion::{summary, votes, WeightingPolicy};
use crate::domain::market_data::MarketInputs;
use crate::domain::ohlcv::WeekAnchor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    MovingAverage,
    Kd,
    Rsi,
    Macd,
    Box,
    Regression,
    Financial,
    Chips,
    Fibonacci,
    SupportResistance,
    Gap,
    Pattern,
    KdRsi,
    MaMacd,
    MacdRsi,
    Summary,
    Surge,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 17] = [
        AnalysisKind::MovingAverage,
        AnalysisKind::Kd,
        AnalysisKind::Rsi,
        AnalysisKind::Macd,
        AnalysisKind::Box,
        AnalysisKind::Regression,
        AnalysisKind::Financial,
        AnalysisKind::Chips,
        AnalysisKind::Fibonacci,
        AnalysisKind::SupportResistance,
        AnalysisKind::Gap,
        AnalysisKind::Pattern,
        AnalysisKind::KdRsi,
        AnalysisKind::MaMacd,
        AnalysisKind::MacdRsi,
        AnalysisKind::Summary,
        AnalysisKind::Surge,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value.trim().to_lowercase().as_str() {
            "ma" | "moving_average" => AnalysisKind::MovingAverage,
            "kd" => AnalysisKind::Kd,
            "rsi" => AnalysisKind::Rsi,
            "macd" => AnalysisKind::Macd,
            "box" => AnalysisKind::Box,
            "reg" | "regression" => AnalysisKind::Regression,
            "financial" => AnalysisKind::Financial,
            "chips" => AnalysisKind::Chips,
            "fib" | "fibonacci" => AnalysisKind::Fibonacci,
            "sr" | "support_resistance" => AnalysisKind::SupportResistance,
            "gap" => AnalysisKind::Gap,
            "pattern" => AnalysisKind::Pattern,
            "kdrsi" | "kd_rsi" => AnalysisKind::KdRsi,
            "mamacd" | "makd" | "ma_macd" => AnalysisKind::MaMacd,
            "macdrsi" | "macd_rsi" => AnalysisKind::MacdRsi,
            "summary" => AnalysisKind::Summary,
            "surge" | "demon" => AnalysisKind::Surge,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical command-line name.
    pub fn name(self) -> &'static str {
        match self {
            AnalysisKind::MovingAverage => "ma",
            AnalysisKind::Kd => "kd",
            AnalysisKind::Rsi => "rsi",
            AnalysisKind::Macd => "macd",
            AnalysisKind::Box => "box",
            AnalysisKind::Regression => "regression",
            AnalysisKind::Financial => "financial",
            AnalysisKind::Chips => "chips",
            AnalysisKind::Fibonacci => "fib",
            AnalysisKind::SupportResistance => "sr",
            AnalysisKind::Gap => "gap",
            AnalysisKind::Pattern => "pattern",
            AnalysisKind::KdRsi => "kdrsi",
            AnalysisKind::MaMacd => "mamacd",
            AnalysisKind::MacdRsi => "macdrsi",
            AnalysisKind::Summary => "summary",
            AnalysisKind::Surge => "surge",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AnalysisKind::MovingAverage => "Moving Average Trend",
            AnalysisKind::Kd => "KD Stochastic",
            AnalysisKind::Rsi => "RSI Strength",
            AnalysisKind::Macd => "MACD",
            AnalysisKind::Box => "Box Range",
            AnalysisKind::Regression => "Linear Regression Channel",
            AnalysisKind::Financial => "Financials",
            AnalysisKind::Chips => "Institutional Flows",
            AnalysisKind::Fibonacci => "Fibonacci Retracement",
            AnalysisKind::SupportResistance => "Support / Resistance",
            AnalysisKind::Gap => "Price Gaps",
            AnalysisKind::Pattern => "Chart Pattern",
            AnalysisKind::KdRsi => "KD + RSI Composite",
            AnalysisKind::MaMacd => "MA + MACD Trend Momentum",
            AnalysisKind::MacdRsi => "MACD + RSI Composite",
            AnalysisKind::Summary => summary::TITLE,
            AnalysisKind::Surge => "Surge Screen",
        }
    }

    fn needs_prices(self) -> bool {
        !matches!(self, AnalysisKind::Financial | AnalysisKind::Chips)
    }

    /// Single analyses get the simple cost-basis advice rows.
    fn takes_simple_advice(self) -> bool {
        !matches!(self, AnalysisKind::Summary | AnalysisKind::Surge)
    }

    /// Whether the (dates, closes) chart payload accompanies this kind.
    pub fn carries_chart(self) -> bool {
        !matches!(
            self,
            AnalysisKind::Financial
                | AnalysisKind::Chips
                | AnalysisKind::Gap
                | AnalysisKind::Pattern
                | AnalysisKind::SupportResistance
                | AnalysisKind::Surge
        )
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationSettings {
    pub week_anchor: WeekAnchor,
    pub policy: WeightingPolicy,
    pub include_chart: bool,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            week_anchor: WeekAnchor::default(),
            policy: WeightingPolicy::default(),
            include_chart: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationRequest {
    pub kind: AnalysisKind,
    pub cost_basis: Option<f64>,
    pub settings: EvaluationSettings,
}

impl EvaluationRequest {
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            cost_basis: None,
            settings: EvaluationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub dates: Vec<String>,
    pub closes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub code: String,
    pub kind: AnalysisKind,
    pub price: Option<f64>,
    pub result: AnalysisResult,
    pub chart: Option<ChartSeries>,
}

/// Map an insufficient-history error from a composite's inputs to a neutral result.
fn neutral_when_short(
    title: &str,
    outcome: Result<AnalysisResult, AnalysisError>,
) -> Result<AnalysisResult, AnalysisError> {
    match outcome {
        Err(err @ AnalysisError::InsufficientData { .. }) => {
            Ok(AnalysisResult::insufficient(title, &err))
        }
        other => other,
    }
}

fn dispatch(inputs: &MarketInputs, request: &EvaluationRequest) -> AnalysisResult {
    let kind = request.kind;
    let series = &inputs.prices;
    let anchor = request.settings.week_anchor;

    if kind.needs_prices() && series.is_empty() {
        return AnalysisResult::no_data(kind.title(), "No price data available");
    }

    guarded(kind.title(), || match kind {
        AnalysisKind::MovingAverage => moving_average::analyze(series),
        AnalysisKind::Kd => Ok(kd::analyze(series, anchor)),
        AnalysisKind::Rsi => Ok(rsi::analyze(series, anchor)),
        AnalysisKind::Macd => macd::analyze(series),
        AnalysisKind::Box => box_range::analyze(series),
        AnalysisKind::Regression => regression::analyze(series),
        AnalysisKind::Financial => Ok(financial::analyze(&inputs.financials)),
        AnalysisKind::Chips => Ok(chips::analyze(&inputs.flows)),
        AnalysisKind::Fibonacci => Ok(fibonacci::analyze(series)),
        AnalysisKind::SupportResistance => Ok(support_resistance::analyze(series)),
        AnalysisKind::Gap => Ok(gap::analyze(series)),
        AnalysisKind::Pattern => Ok(pattern::analyze(series)),
        AnalysisKind::KdRsi => Ok(votes::kd_rsi(
            &KdReading::read(series, anchor),
            &RsiReading::read(series, anchor),
        )),
        AnalysisKind::MaMacd => neutral_when_short(kind.title(), {
            MaReading::read(series)
                .and_then(|ma| MacdReading::read(series).map(|m| votes::ma_macd(&ma, &m)))
        }),
        AnalysisKind::MacdRsi => neutral_when_short(kind.title(), {
            MacdReading::read(series)
                .map(|m| votes::macd_rsi(&m, &RsiReading::read(series, anchor)))
        }),
        AnalysisKind::Summary => Ok(summary::analyze(
            inputs,
            request.settings.policy,
            request.cost_basis,
        )),
        AnalysisKind::Surge => Ok(surge::analyze(series)),
    })
}

/// "Your cost" and "Unrealized P/L" rows, plus simple advice where it applies.
fn cost_rows(kind: AnalysisKind, result: &AnalysisResult, cost: f64, roi: f64) -> Vec<ValueRow> {
    let mut rows = vec![
        ValueRow {
            label: "Your cost".into(),
            value: fmt2(cost),
        },
        ValueRow {
            label: "Unrealized P/L".into(),
            value: fmt_signed_pct(roi),
        },
    ];
    if kind.takes_simple_advice() {
        rows.push(ValueRow {
            label: "Advice".into(),
            value: simple_advice(result.bias, Some(roi)).text().into(),
        });
    }
    rows
}

pub fn evaluate(inputs: &MarketInputs, request: &EvaluationRequest) -> Evaluation {
    let kind = request.kind;
    let series = &inputs.prices;
    debug!("evaluating {kind} for {} ({} bars)", series.code(), series.len());

    let mut result = dispatch(inputs, request);
    let price = series.latest_close();

    let decorate = kind != AnalysisKind::Surge && !result.is_error();
    if let (true, Some(price)) = (decorate, price) {
        if let (Some(cost), Some(roi)) = (request.cost_basis, roi_pct(request.cost_basis, price)) {
            let rows = cost_rows(kind, &result, cost, roi);
            result.prepend(rows);
        }
    }

    let chart = (request.settings.include_chart && kind.carries_chart() && !series.is_empty())
        .then(|| ChartSeries {
            dates: series
                .bars()
                .iter()
                .map(|b| b.date.format("%Y-%m-%d").to_string())
                .collect(),
            closes: series.closes(),
        });

    Evaluation {
        code: series.code().to_string(),
        kind,
        price,
        result,
        chart,
    }
}
