//! Margin category: margin-purchase and short-sale balance changes read
//! against the latest price move.

use crate::domain::market_data::MarginBalanceRow;
use crate::domain::scoring::{Category, CategoryScore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginDelta {
    pub margin_balance: f64,
    pub margin_change: f64,
    pub short_balance: f64,
    pub short_change: f64,
}

impl MarginDelta {
    /// Latest balance against the previous row; a single row compares with itself.
    pub fn from_rows(rows: &[MarginBalanceRow]) -> Option<Self> {
        let mut sorted: Vec<&MarginBalanceRow> = rows.iter().collect();
        sorted.sort_by_key(|r| r.date);
        let latest = *sorted.last()?;
        let prev = sorted.len().checked_sub(2).map_or(latest, |i| sorted[i]);

        Some(Self {
            margin_balance: latest.margin_purchase_balance,
            margin_change: latest.margin_purchase_balance - prev.margin_purchase_balance,
            short_balance: latest.short_sale_balance,
            short_change: latest.short_sale_balance - prev.short_sale_balance,
        })
    }
}

pub fn score_delta(delta: &MarginDelta, price_change: f64) -> CategoryScore {
    let mut score = CategoryScore::new(Category::Margin);

    if delta.margin_change < 0.0 {
        score.add(10, "margin falling (stabilizing)");
    } else if delta.margin_change > 0.0 && price_change < 0.0 {
        score.add(-5, "margin rising into a falling price");
    } else {
        score.add(5, "margin steady");
    }

    if delta.short_change > 0.0 && price_change > 0.0 {
        score.add(10, "short squeeze in progress");
    }

    score
}

/// `price_change` is the latest close minus the previous close.
pub fn score(rows: &[MarginBalanceRow], price_change: f64) -> CategoryScore {
    match MarginDelta::from_rows(rows) {
        Some(delta) => score_delta(&delta, price_change),
        None => CategoryScore::no_data(Category::Margin),
    }
}
