//! Factor scoring: independent, bounded category scores with reason tags.
//!
//! Every scorer accepts possibly-empty input and returns a [`CategoryScore`];
//! an absent source scores 0 and is flagged with [`NO_DATA_REASON`].

pub mod chip;
pub mod fundamental;
pub mod margin;
pub mod schema;
pub mod technical;

use std::panic::{self, AssertUnwindSafe};

use log::error;
use serde::Serialize;

use crate::domain::analysis::panic_message;

pub const NO_DATA_REASON: &str = "no data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Technical,
    Fundamental,
    Chip,
    Margin,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Technical,
        Category::Fundamental,
        Category::Chip,
        Category::Margin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Technical => "Technical",
            Category::Fundamental => "Fundamental",
            Category::Chip => "Chip",
            Category::Margin => "Margin",
        }
    }

    /// Inclusive (min, max) raw points the category's table can produce.
    pub fn range(self) -> (i32, i32) {
        match self {
            Category::Technical => (0, 50),
            Category::Fundamental => (0, 80),
            Category::Chip => (-20, 80),
            Category::Margin => (-5, 20),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub points: i32,
    pub reasons: Vec<String>,
    pub has_data: bool,
}

impl CategoryScore {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            points: 0,
            reasons: Vec::new(),
            has_data: true,
        }
    }

    pub fn no_data(category: Category) -> Self {
        Self {
            category,
            points: 0,
            reasons: vec![NO_DATA_REASON.to_string()],
            has_data: false,
        }
    }

    /// Add (or subtract) points for a condition that fired.
    pub fn add(&mut self, points: i32, reason: impl Into<String>) {
        self.points += points;
        self.reasons.push(reason.into());
    }

    /// Record a reason without changing the points.
    pub fn note(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    pub fn min(&self) -> i32 {
        self.category.range().0
    }

    pub fn max(&self) -> i32 {
        self.category.range().1
    }

    /// Points forced into the category's declared range.
    pub fn bounded_points(&self) -> i32 {
        self.points.clamp(self.min(), self.max())
    }

    /// e.g. `Technical 30/50 (above MA5, above MA20)` or `Chip: no data`.
    pub fn rationale(&self) -> String {
        if !self.has_data {
            return format!("{}: {}", self.category.label(), self.reasons.join(", "));
        }
        let mut out = format!("{} {}/{}", self.category.label(), self.points, self.max());
        if !self.reasons.is_empty() {
            out.push_str(&format!(" ({})", self.reasons.join(", ")));
        }
        out
    }
}

/// Run one scorer; a fault zeroes that category and leaves the others intact.
pub fn guarded_score<F>(category: Category, scorer: F) -> CategoryScore
where
    F: FnOnce() -> CategoryScore,
{
    match panic::catch_unwind(AssertUnwindSafe(scorer)) {
        Ok(score) => score,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("{} scorer panicked: {message}", category.label());
            let mut score = CategoryScore::no_data(category);
            score.reasons = vec![format!("ERROR: {message}")];
            score
        }
    }
}
