//! Weighted composite of the category scores.
//!
//! The weighting scheme is a named policy; tier thresholds are constants
//! attached to each policy.

use serde::Serialize;

use crate::domain::scoring::{Category, CategoryScore};
use crate::domain::signal::SignalTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WeightingPolicy {
    /// Four categories scaled into fixed budgets summing to 100.
    #[default]
    FourDomain,
    /// Raw technical + fundamental + chip points, unbounded.
    LegacyThreeDomain,
}

impl WeightingPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "four_domain" | "four-domain" => Some(WeightingPolicy::FourDomain),
            "legacy_three_domain" | "legacy-three-domain" | "legacy" => {
                Some(WeightingPolicy::LegacyThreeDomain)
            }
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeightingPolicy::FourDomain => "four_domain",
            WeightingPolicy::LegacyThreeDomain => "legacy_three_domain",
        }
    }

    /// Point budget a category contributes under this policy.
    pub fn budget(self, category: Category) -> Option<f64> {
        match self {
            WeightingPolicy::FourDomain => Some(match category {
                Category::Technical => 40.0,
                Category::Fundamental | Category::Chip | Category::Margin => 20.0,
            }),
            WeightingPolicy::LegacyThreeDomain => match category {
                Category::Margin => None,
                _ => Some(f64::from(category.range().1)),
            },
        }
    }

    /// Fuse category scores into one integer composite.
    pub fn composite(self, scores: &[CategoryScore]) -> i32 {
        match self {
            WeightingPolicy::FourDomain => {
                let sum: f64 = scores
                    .iter()
                    .filter_map(|s| {
                        let budget = self.budget(s.category)?;
                        Some(f64::from(s.bounded_points()) / f64::from(s.max()) * budget)
                    })
                    .sum();
                (sum.round() as i32).clamp(0, 100)
            }
            WeightingPolicy::LegacyThreeDomain => scores
                .iter()
                .filter(|s| self.budget(s.category).is_some())
                .map(|s| s.points)
                .sum(),
        }
    }

    /// Map a composite to its tier; every threshold is inclusive.
    pub fn tier(self, composite: i32) -> SignalTier {
        match self {
            WeightingPolicy::FourDomain => match composite {
                s if s >= 80 => SignalTier::StrongBuy,
                s if s >= 60 => SignalTier::Buy,
                s if s >= 41 => SignalTier::Hold,
                _ => SignalTier::Sell,
            },
            WeightingPolicy::LegacyThreeDomain => match composite {
                s if s >= 80 => SignalTier::StrongBuy,
                s if s >= 50 => SignalTier::Buy,
                s if s >= 20 => SignalTier::Hold,
                s if s >= -20 => SignalTier::Sell,
                _ => SignalTier::StrongSell,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeAssessment {
    pub policy: WeightingPolicy,
    pub score: i32,
    pub tier: SignalTier,
    pub categories: Vec<CategoryScore>,
    pub rationale: String,
}

pub fn assess(policy: WeightingPolicy, categories: Vec<CategoryScore>) -> CompositeAssessment {
    let score = policy.composite(&categories);
    let tier = policy.tier(score);
    let parts: Vec<String> = categories.iter().map(CategoryScore::rationale).collect();
    let rationale = format!(
        "{}; composite {} ({}) = {}",
        parts.join("; "),
        score,
        policy.name(),
        tier
    );

    CompositeAssessment {
        policy,
        score,
        tier,
        categories,
        rationale,
    }
}
