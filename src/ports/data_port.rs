//! Market data access port.

use log::debug;

use crate::domain::error::StockscopeError;
use crate::domain::market_data::{
    FinancialData, InstitutionalFlowRow, MarginBalanceRow, MarketInputs,
};
use crate::domain::ohlcv::PriceSeries;

/// Source of already-fetched inputs for one security.
///
/// Prices are mandatory; the other sources are optional and an absent source
/// is an empty collection, not an error.
pub trait MarketDataPort {
    fn load_prices(&self, code: &str) -> Result<PriceSeries, StockscopeError>;

    fn load_financials(&self, code: &str) -> Result<FinancialData, StockscopeError>;

    fn load_flows(&self, code: &str) -> Result<Vec<InstitutionalFlowRow>, StockscopeError>;

    fn load_margin(&self, code: &str) -> Result<Vec<MarginBalanceRow>, StockscopeError>;

    /// Default implementation: load every source and bundle them.
    fn load_inputs(&self, code: &str) -> Result<MarketInputs, StockscopeError> {
        let prices = self.load_prices(code)?;
        let financials = self.load_financials(code)?;
        let flows = self.load_flows(code)?;
        let margin = self.load_margin(code)?;
        debug!(
            "{code}: {} bars, {} statement rows, {} revenue rows, {} flow rows, {} margin rows",
            prices.len(),
            financials.statements.len(),
            financials.revenue.len(),
            flows.len(),
            margin.len()
        );
        Ok(MarketInputs {
            prices,
            financials,
            flows,
            margin,
        })
    }
}
