//! Optional non-price inputs: financial statements, monthly revenue,
//! institutional flows and margin balances.
//!
//! Row structs deserialize directly from the provider's CSV column names.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::ohlcv::PriceSeries;

/// One financial-statement field for one reporting date (e.g. `EPS`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatementRow {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
}

/// Monthly revenue with its month-over-month and year-over-year growth (%).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevenueRow {
    pub date: NaiveDate,
    pub revenue: f64,
    pub revenue_month: f64,
    pub revenue_year: f64,
}

/// Net shares bought (positive) or sold by one institution class on one day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstitutionalFlowRow {
    pub date: NaiveDate,
    pub name: String,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarginBalanceRow {
    pub date: NaiveDate,
    #[serde(rename = "MarginPurchaseTodayBalance")]
    pub margin_purchase_balance: f64,
    #[serde(rename = "ShortSaleTodayBalance")]
    pub short_sale_balance: f64,
}

/// Statements and revenue travel together; either half may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialData {
    pub statements: Vec<StatementRow>,
    pub revenue: Vec<RevenueRow>,
}

impl FinancialData {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.revenue.is_empty()
    }

    /// Values of one statement field, sorted by date.
    pub fn statement_values(&self, kind: &str) -> Vec<f64> {
        let mut rows: Vec<&StatementRow> =
            self.statements.iter().filter(|r| r.kind == kind).collect();
        rows.sort_by_key(|r| r.date);
        rows.into_iter().map(|r| r.value).collect()
    }

    pub fn latest_revenue(&self) -> Option<&RevenueRow> {
        self.revenue.iter().max_by_key(|r| r.date)
    }
}

/// Everything one evaluation may look at, already in memory.
#[derive(Debug, Clone)]
pub struct MarketInputs {
    pub prices: PriceSeries,
    pub financials: FinancialData,
    pub flows: Vec<InstitutionalFlowRow>,
    pub margin: Vec<MarginBalanceRow>,
}

impl MarketInputs {
    /// Inputs with only a price series.
    pub fn prices_only(prices: PriceSeries) -> Self {
        Self {
            prices,
            financials: FinancialData::default(),
            flows: Vec::new(),
            margin: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn statement_values_sorted_by_date() {
        let data = FinancialData {
            statements: vec![
                StatementRow {
                    date: d(2024, 6, 30),
                    kind: "EPS".into(),
                    value: 3.0,
                },
                StatementRow {
                    date: d(2024, 3, 31),
                    kind: "EPS".into(),
                    value: 2.0,
                },
                StatementRow {
                    date: d(2024, 3, 31),
                    kind: "GrossProfitMargin".into(),
                    value: 40.0,
                },
            ],
            revenue: Vec::new(),
        };
        assert_eq!(data.statement_values("EPS"), vec![2.0, 3.0]);
        assert_eq!(data.statement_values("GrossProfitMargin"), vec![40.0]);
        assert!(data.statement_values("ROE").is_empty());
        assert!(!data.is_empty());
    }

    #[test]
    fn latest_revenue_by_date() {
        let row = |m: u32, revenue: f64| RevenueRow {
            date: d(2024, m, 1),
            revenue,
            revenue_month: 0.0,
            revenue_year: 0.0,
        };
        let data = FinancialData {
            statements: Vec::new(),
            revenue: vec![row(5, 2.0), row(3, 1.0)],
        };
        assert_eq!(data.latest_revenue().map(|r| r.revenue), Some(2.0));
    }
}
