//! CSV file data adapter.
//!
//! One directory holds every source for a code as `<code>_prices.csv`,
//! `<code>_statements.csv`, `<code>_revenue.csv`, `<code>_institutional.csv`
//! and `<code>_margin.csv`. Only the prices file is required.

use crate::domain::error::StockscopeError;
use crate::domain::market_data::{
    FinancialData, InstitutionalFlowRow, MarginBalanceRow, RevenueRow, StatementRow,
};
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Daily bar as written by common price exporters (either header case).
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: f64,
}

impl PriceRow {
    fn into_bar(self, file: &Path) -> Result<OhlcvBar, StockscopeError> {
        // Exporters may append a time and zone; the calendar date is the prefix.
        let day = self.date.get(..10).unwrap_or(&self.date);
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| StockscopeError::Csv {
            file: file.display().to_string(),
            reason: format!("invalid date '{}': {}", self.date, e),
        })?;
        Ok(OhlcvBar {
            date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume.round() as i64,
        })
    }
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str, source: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, source))
    }

    fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StockscopeError> {
        let csv_error = |e: csv::Error| StockscopeError::Csv {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        let mut rdr = csv::Reader::from_path(path).map_err(csv_error)?;
        rdr.deserialize().map(|row| row.map_err(csv_error)).collect()
    }

    /// Rows of an optional source; a missing file is an empty source.
    fn read_optional<T: DeserializeOwned>(
        &self,
        code: &str,
        source: &str,
    ) -> Result<Vec<T>, StockscopeError> {
        let path = self.csv_path(code, source);
        if !path.exists() {
            debug!("{}: no {} file, treating as empty", code, source);
            return Ok(Vec::new());
        }
        Self::read_rows(&path)
    }
}

impl MarketDataPort for CsvAdapter {
    fn load_prices(&self, code: &str) -> Result<PriceSeries, StockscopeError> {
        let path = self.csv_path(code, "prices");
        if !path.exists() {
            return Err(StockscopeError::NoData {
                code: code.to_string(),
            });
        }

        let rows: Vec<PriceRow> = Self::read_rows(&path)?;
        let mut bars = rows
            .into_iter()
            .map(|row| row.into_bar(&path))
            .collect::<Result<Vec<_>, _>>()?;

        bars.sort_by_key(|b| b.date);
        PriceSeries::new(code, bars)
    }

    fn load_financials(&self, code: &str) -> Result<FinancialData, StockscopeError> {
        let statements: Vec<StatementRow> = self.read_optional(code, "statements")?;
        let revenue: Vec<RevenueRow> = self.read_optional(code, "revenue")?;
        Ok(FinancialData {
            statements,
            revenue,
        })
    }

    fn load_flows(&self, code: &str) -> Result<Vec<InstitutionalFlowRow>, StockscopeError> {
        self.read_optional(code, "institutional")
    }

    fn load_margin(&self, code: &str) -> Result<Vec<MarginBalanceRow>, StockscopeError> {
        let mut rows: Vec<MarginBalanceRow> = self.read_optional(code, "margin")?;
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let prices = "Date,Open,High,Low,Close,Volume\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-15 00:00:00+08:00,100.0,110.0,90.0,105.0,50000.0\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";
        fs::write(path.join("2330_prices.csv"), prices).unwrap();

        fs::write(
            path.join("2330_institutional.csv"),
            "date,stock_id,name,net\n\
             2024-01-17,2330,Foreign_Investor,1200000\n\
             2024-01-17,2330,Investment_Trust,-3000\n",
        )
        .unwrap();

        fs::write(
            path.join("2330_margin.csv"),
            "date,MarginPurchaseTodayBalance,ShortSaleTodayBalance\n\
             2024-01-17,900,20\n\
             2024-01-16,1000,10\n",
        )
        .unwrap();

        fs::write(
            path.join("2330_statements.csv"),
            "date,type,value\n2023-12-31,EPS,9.21\n2023-09-30,EPS,8.14\n",
        )
        .unwrap();

        (dir, path)
    }

    #[test]
    fn load_prices_sorts_and_parses() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.load_prices("2330").unwrap();
        assert_eq!(series.len(), 3);
        let first = &series.bars()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(first.open, 100.0);
        assert_eq!(first.volume, 50000);
        assert_eq!(series.latest_close(), Some(115.0));
    }

    #[test]
    fn missing_prices_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.load_prices("9999").unwrap_err();
        assert!(matches!(err, StockscopeError::NoData { .. }));
    }

    #[test]
    fn optional_sources_default_to_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let financials = adapter.load_financials("2330").unwrap();
        assert_eq!(financials.statements.len(), 2);
        assert!(financials.revenue.is_empty());
        assert_eq!(financials.statement_values("EPS"), vec![8.14, 9.21]);
    }

    #[test]
    fn flows_and_margin_deserialize_provider_columns() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let flows = adapter.load_flows("2330").unwrap();
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[1].name, "Investment_Trust");
        assert_eq!(flows[1].net, -3000.0);

        let margin = adapter.load_margin("2330").unwrap();
        assert_eq!(margin[0].margin_purchase_balance, 1000.0);
        assert_eq!(margin[1].short_sale_balance, 20.0);
    }

    #[test]
    fn malformed_row_is_csv_error() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("BAD_prices.csv"),
            "date,open,high,low,close,volume\n2024-01-15,abc,1,1,1,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let err = adapter.load_prices("BAD").unwrap_err();
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn duplicate_dates_rejected() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("DUP_prices.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-15,1,1,1,1,1\n\
             2024-01-15,2,2,2,2,2\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let err = adapter.load_prices("DUP").unwrap_err();
        assert!(matches!(err, StockscopeError::InvalidSeries { .. }));
    }

    #[test]
    fn load_inputs_bundles_sources() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let inputs = adapter.load_inputs("2330").unwrap();
        assert_eq!(inputs.prices.code(), "2330");
        assert_eq!(inputs.flows.len(), 2);
        assert_eq!(inputs.margin.len(), 2);
    }
}
