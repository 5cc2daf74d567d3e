//! Standalone institutional flow ("chips") analysis.

use crate::domain::analysis::AnalysisResult;
use crate::domain::market_data::InstitutionalFlowRow;
use crate::domain::scoring::chip::{score_flows, ChipFlows};
use crate::domain::signal::Bias;

const TITLE: &str = "Institutional Flows";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipGrade {
    APlus,
    B,
    C,
    D,
}

impl ChipGrade {
    pub fn of(points: i32) -> Self {
        match points {
            p if p >= 50 => ChipGrade::APlus,
            p if p >= 20 => ChipGrade::B,
            p if p <= -20 => ChipGrade::D,
            _ => ChipGrade::C,
        }
    }

    fn signal(self) -> &'static str {
        match self {
            ChipGrade::APlus => "Chips excellent (A+)",
            ChipGrade::B => "Chips leaning bullish (B)",
            ChipGrade::C => "Chips on hold (C)",
            ChipGrade::D => "Chips scattered (D)",
        }
    }

    fn verdict(self) -> &'static str {
        match self {
            ChipGrade::APlus => "Main capital flowing in, easy to rise and hard to fall",
            ChipGrade::B => "Institutions on the buy side",
            ChipGrade::C => "Buying and selling offset, waiting for direction",
            ChipGrade::D => "Institutions distributing, beware of a drop",
        }
    }

    fn bias(self) -> Bias {
        match self {
            ChipGrade::APlus | ChipGrade::B => Bias::Bullish,
            ChipGrade::C => Bias::Neutral,
            ChipGrade::D => Bias::Bearish,
        }
    }
}

fn lots(value: f64) -> String {
    format!("{} lots", value.trunc() as i64)
}

pub fn analyze(rows: &[InstitutionalFlowRow]) -> AnalysisResult {
    let Some(flows) = ChipFlows::from_rows(rows) else {
        return AnalysisResult::no_data(TITLE, "No recent institutional flow data");
    };

    let score = score_flows(&flows);
    let grade = ChipGrade::of(score.points);
    let description = if score.reasons.is_empty() {
        grade.verdict().to_string()
    } else {
        format!("{} ({})", grade.verdict(), score.reasons.join(", "))
    };

    AnalysisResult::new(TITLE, grade.signal(), grade.bias(), description)
        .with("Foreign (latest)", lots(flows.latest.foreign))
        .with("Trust (latest)", lots(flows.latest.trust))
        .with("Dealer (latest)", lots(flows.latest.dealer))
        .with("Total (latest)", lots(flows.latest.total()))
        .with("Trust 5-day", lots(flows.window.trust))
        .with("Foreign 5-day", lots(flows.window.foreign))
        .with("Score", score.points.to_string())
}
