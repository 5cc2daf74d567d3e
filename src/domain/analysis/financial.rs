//! Standalone quarterly statement and monthly revenue analysis.

use crate::domain::analysis::{fmt2, AnalysisResult};
use crate::domain::market_data::FinancialData;
use crate::domain::scoring::fundamental::{score_figures, FundamentalFigures};
use crate::domain::signal::Bias;

const TITLE: &str = "Quarterly Financials & Monthly Revenue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FinancialGrade {
    D,
    C,
    B,
    A,
}

impl FinancialGrade {
    pub fn of(points: i32) -> Self {
        match points {
            p if p >= 70 => FinancialGrade::A,
            p if p >= 50 => FinancialGrade::B,
            p if p >= 30 => FinancialGrade::C,
            _ => FinancialGrade::D,
        }
    }

    fn signal(self) -> &'static str {
        match self {
            FinancialGrade::A => "Financials strong (A)",
            FinancialGrade::B => "Financials steady (B)",
            FinancialGrade::C => "Financials weak (C)",
            FinancialGrade::D => "Financials at risk (D)",
        }
    }

    fn verdict(self) -> &'static str {
        match self {
            FinancialGrade::A => "Strong fundamentals with high growth momentum",
            FinancialGrade::B => "Stable earnings, performance flat",
            FinancialGrade::C => "Growth slowing, watch for a turnaround",
            FinancialGrade::D => "Earnings declining, fundamentals weakening",
        }
    }

    fn bias(self) -> Bias {
        match self {
            FinancialGrade::A | FinancialGrade::B => Bias::Bullish,
            FinancialGrade::C => Bias::Neutral,
            FinancialGrade::D => Bias::Bearish,
        }
    }
}

fn pct_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{}%", fmt2(v)))
}

fn num_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), fmt2)
}

pub fn analyze(data: &FinancialData) -> AnalysisResult {
    if data.is_empty() {
        return AnalysisResult::no_data(
            TITLE,
            "No financial statement or revenue data for this security",
        );
    }

    let figures = FundamentalFigures::extract(data);
    let score = score_figures(&figures);
    let grade = FinancialGrade::of(score.points);

    AnalysisResult::new(
        TITLE,
        grade.signal(),
        grade.bias(),
        format!("{} ({})", grade.verdict(), score.reasons.join(", ")),
    )
    .with("Latest EPS", num_or_na(figures.latest_eps))
    .with("EPS QoQ", format!("{}%", fmt2(figures.eps_growth_pct)))
    .with("TTM EPS", num_or_na(figures.ttm_eps))
    .with("Gross margin", pct_or_na(figures.gross_margin_pct))
    .with("Monthly revenue (100M)", num_or_na(figures.revenue_100m))
    .with("Revenue MoM", pct_or_na(figures.revenue_mom_pct))
    .with("Revenue YoY", pct_or_na(figures.revenue_yoy_pct))
    .with("Score", score.points.to_string())
}
