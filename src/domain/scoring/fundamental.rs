//! Fundamental category: EPS trend, monthly revenue growth, gross margin.

use crate::domain::market_data::FinancialData;
use crate::domain::scoring::{Category, CategoryScore};

pub const EPS_KIND: &str = "EPS";
pub const GROSS_MARGIN_KIND: &str = "GrossProfitMargin";
pub const REVENUE_BOOM_YOY_PCT: f64 = 20.0;
pub const GROSS_MARGIN_FLOOR_PCT: f64 = 20.0;
const QUARTERS_PER_YEAR: usize = 4;
const REVENUE_UNIT: f64 = 100_000_000.0;

/// Figures extracted from statements and revenue, before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FundamentalFigures {
    pub latest_eps: Option<f64>,
    /// Quarter-over-quarter EPS change in percent; 0 without a usable prior quarter.
    pub eps_growth_pct: f64,
    pub ttm_eps: Option<f64>,
    pub gross_margin_pct: Option<f64>,
    /// Latest monthly revenue in units of 100 million.
    pub revenue_100m: Option<f64>,
    pub revenue_mom_pct: Option<f64>,
    pub revenue_yoy_pct: Option<f64>,
}

impl FundamentalFigures {
    pub fn extract(data: &FinancialData) -> Self {
        let eps = data.statement_values(EPS_KIND);
        let latest_eps = eps.last().copied();
        let eps_growth_pct = match eps.as_slice() {
            [.., last, current] if *last != 0.0 => (current - last) / last.abs() * 100.0,
            _ => 0.0,
        };
        let ttm_eps = (!eps.is_empty())
            .then(|| eps[eps.len().saturating_sub(QUARTERS_PER_YEAR)..].iter().sum::<f64>());

        let revenue = data.latest_revenue();

        Self {
            latest_eps,
            eps_growth_pct,
            ttm_eps,
            gross_margin_pct: data.statement_values(GROSS_MARGIN_KIND).last().copied(),
            revenue_100m: revenue.map(|r| r.revenue / REVENUE_UNIT),
            revenue_mom_pct: revenue.map(|r| r.revenue_month),
            revenue_yoy_pct: revenue.map(|r| r.revenue_year),
        }
    }
}

pub fn score_figures(figures: &FundamentalFigures) -> CategoryScore {
    let mut score = CategoryScore::new(Category::Fundamental);

    if figures.eps_growth_pct > 0.0 {
        score.add(20, "EPS up quarter over quarter");
    }
    if figures.latest_eps.is_some_and(|eps| eps > 0.0) {
        score.add(10, "EPS positive");
    }

    match figures.revenue_yoy_pct {
        Some(yoy) if yoy > REVENUE_BOOM_YOY_PCT => score.add(30, "revenue booming (>20% YoY)"),
        Some(yoy) if yoy > 0.0 => score.add(10, "revenue growing"),
        Some(_) => score.note("revenue declining"),
        None => score.note("no revenue data"),
    }
    if figures.revenue_mom_pct.is_some_and(|mom| mom > 0.0) {
        score.add(10, "revenue up month over month");
    }

    if figures
        .gross_margin_pct
        .is_some_and(|gm| gm > GROSS_MARGIN_FLOOR_PCT)
    {
        score.add(10, "gross margin above 20%");
    }

    score
}

/// Score the fundamental category; partial data scores what it can.
pub fn score(data: &FinancialData) -> CategoryScore {
    if data.is_empty() {
        return CategoryScore::no_data(Category::Fundamental);
    }
    score_figures(&FundamentalFigures::extract(data))
}
