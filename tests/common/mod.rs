#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use stockscope::domain::error::StockscopeError;
use stockscope::domain::market_data::{
    FinancialData, InstitutionalFlowRow, MarginBalanceRow, MarketInputs,
};
pub use stockscope::domain::ohlcv::{OhlcvBar, PriceSeries};
use stockscope::ports::data_port::MarketDataPort;

/// In-memory market data keyed by code.
#[derive(Default)]
pub struct MockDataPort {
    pub prices: HashMap<String, Vec<OhlcvBar>>,
    pub financials: HashMap<String, FinancialData>,
    pub flows: HashMap<String, Vec<InstitutionalFlowRow>>,
    pub margin: HashMap<String, Vec<MarginBalanceRow>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.prices.insert(code.to_string(), bars);
        self
    }

    pub fn with_flows(mut self, code: &str, rows: Vec<InstitutionalFlowRow>) -> Self {
        self.flows.insert(code.to_string(), rows);
        self
    }

    pub fn with_margin(mut self, code: &str, rows: Vec<MarginBalanceRow>) -> Self {
        self.margin.insert(code.to_string(), rows);
        self
    }

    pub fn with_financials(mut self, code: &str, data: FinancialData) -> Self {
        self.financials.insert(code.to_string(), data);
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn load_prices(&self, code: &str) -> Result<PriceSeries, StockscopeError> {
        let bars = self
            .prices
            .get(code)
            .cloned()
            .ok_or_else(|| StockscopeError::NoData {
                code: code.to_string(),
            })?;
        PriceSeries::new(code, bars)
    }

    fn load_financials(&self, code: &str) -> Result<FinancialData, StockscopeError> {
        Ok(self.financials.get(code).cloned().unwrap_or_default())
    }

    fn load_flows(&self, code: &str) -> Result<Vec<InstitutionalFlowRow>, StockscopeError> {
        Ok(self.flows.get(code).cloned().unwrap_or_default())
    }

    fn load_margin(&self, code: &str) -> Result<Vec<MarginBalanceRow>, StockscopeError> {
        Ok(self.margin.get(code).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2024-01-01 is a Monday; bars run on consecutive calendar days.
pub fn start_date() -> NaiveDate {
    date(2024, 1, 1)
}

pub fn make_bar(day: NaiveDate, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: day,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(start_date() + Duration::days(i as i64), c))
        .collect()
}

/// Bars with a fixed intraday spread around each close.
pub fn bars_with_range(closes: &[f64], spread: f64) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| OhlcvBar {
            date: start_date() + Duration::days(i as i64),
            open: c - spread / 2.0,
            high: c + spread,
            low: c - spread,
            close: c,
            volume: 1000 + (i as i64 % 7) * 100,
        })
        .collect()
}

pub fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new("TEST", bars_from_closes(closes)).unwrap()
}

pub fn inputs(closes: &[f64]) -> MarketInputs {
    MarketInputs::prices_only(series(closes))
}

pub fn rising(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

pub fn falling(n: usize) -> Vec<f64> {
    (0..n).map(|i| 200.0 - i as f64).collect()
}

pub fn flow(day: NaiveDate, name: &str, net: f64) -> InstitutionalFlowRow {
    InstitutionalFlowRow {
        date: day,
        name: name.to_string(),
        net,
    }
}

pub fn margin_row(day: NaiveDate, margin: f64, short: f64) -> MarginBalanceRow {
    MarginBalanceRow {
        date: day,
        margin_purchase_balance: margin,
        short_sale_balance: short,
    }
}
