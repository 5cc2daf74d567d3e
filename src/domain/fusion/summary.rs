//! Full health check: all four categories fused under a weighting policy,
//! with composite position advice.

use crate::domain::advisor::{composite_advice, roi_pct, Advice};
use crate::domain::analysis::{fmt2, AnalysisResult};
use crate::domain::fusion::weighted::{assess, CompositeAssessment, WeightingPolicy};
use crate::domain::market_data::MarketInputs;
use crate::domain::scoring::chip::ChipFlows;
use crate::domain::scoring::schema::TechnicalSnapshot;
use crate::domain::scoring::{chip, fundamental, guarded_score, margin, technical, Category};

pub const TITLE: &str = "Full Health Check";

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub snapshot: TechnicalSnapshot,
    pub assessment: CompositeAssessment,
    pub advice: Advice,
    pub net_flow_lots: Option<f64>,
}

impl Summary {
    /// Score every category and fuse them; `None` without prices.
    pub fn build(
        inputs: &MarketInputs,
        policy: WeightingPolicy,
        cost_basis: Option<f64>,
    ) -> Option<Self> {
        let snapshot = TechnicalSnapshot::from_series(&inputs.prices)?;

        let categories = vec![
            guarded_score(Category::Technical, || technical::score(Some(&snapshot))),
            guarded_score(Category::Fundamental, || fundamental::score(&inputs.financials)),
            guarded_score(Category::Chip, || chip::score(&inputs.flows)),
            guarded_score(Category::Margin, || {
                margin::score(&inputs.margin, snapshot.price_change())
            }),
        ];

        let assessment = assess(policy, categories);
        let advice = composite_advice(assessment.score, roi_pct(cost_basis, snapshot.close));
        let net_flow_lots = ChipFlows::from_rows(&inputs.flows).map(|f| f.window.total());

        Some(Self {
            snapshot,
            assessment,
            advice,
            net_flow_lots,
        })
    }

    fn category_value(&self, category: Category) -> String {
        self.assessment
            .categories
            .iter()
            .find(|s| s.category == category)
            .map_or_else(
                || "no data".to_string(),
                |s| {
                    if s.has_data {
                        format!("{}/{}", s.points, s.max())
                    } else {
                        s.reasons.join(", ")
                    }
                },
            )
    }

    pub fn to_result(&self) -> AnalysisResult {
        let tier = self.assessment.tier;
        let snap = &self.snapshot;

        let alignment = match (snap.ma20, snap.ma60) {
            (Some(ma20), Some(ma60)) if snap.close > ma20 && ma20 > ma60 => "Bullish alignment",
            (Some(_), Some(_)) => "Consolidating / bearish",
            _ => "Not enough history",
        };
        let macd = match snap.macd_bullish() {
            Some(true) => "Golden cross",
            Some(false) => "Death cross",
            None => "n/a",
        };
        let flow = match self.net_flow_lots {
            Some(lots) if lots >= 0.0 => format!("Net buy {} lots (5d)", lots.trunc() as i64),
            Some(lots) => format!("Net sell {} lots (5d)", lots.abs().trunc() as i64),
            None => "No institutional data".to_string(),
        };

        AnalysisResult::new(TITLE, tier.label(), tier.bias(), &self.assessment.rationale)
            .with("Composite score", format!("{} pts", self.assessment.score))
            .with("Signal", tier.label())
            .with("Advice", self.advice.text())
            .with("Close", fmt2(snap.close))
            .with("MA alignment", alignment)
            .with("Technical", self.category_value(Category::Technical))
            .with("Fundamental", self.category_value(Category::Fundamental))
            .with("Chip", self.category_value(Category::Chip))
            .with("Margin", self.category_value(Category::Margin))
            .with("Institutional flow", flow)
            .with("MACD", macd)
            .with("Policy", self.assessment.policy.name())
    }
}

pub fn analyze(
    inputs: &MarketInputs,
    policy: WeightingPolicy,
    cost_basis: Option<f64>,
) -> AnalysisResult {
    match Summary::build(inputs, policy, cost_basis) {
        Some(summary) => summary.to_result(),
        None => AnalysisResult::no_data(TITLE, "No price data available"),
    }
}
