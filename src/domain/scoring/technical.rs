//! Technical category: price against its moving averages plus MACD state.

use crate::domain::scoring::schema::TechnicalSnapshot;
use crate::domain::scoring::{Category, CategoryScore};

const POINTS_PER_CONDITION: i32 = 10;

pub fn score(snapshot: Option<&TechnicalSnapshot>) -> CategoryScore {
    let Some(snap) = snapshot else {
        return CategoryScore::no_data(Category::Technical);
    };

    let mut score = CategoryScore::new(Category::Technical);
    let above = |ma: Option<f64>| ma.is_some_and(|m| snap.close > m);

    if above(snap.ma5) {
        score.add(POINTS_PER_CONDITION, "above MA5");
    }
    if above(snap.ma20) {
        score.add(POINTS_PER_CONDITION, "above MA20");
    }
    if above(snap.ma60) {
        score.add(POINTS_PER_CONDITION, "above MA60");
    }
    if let (Some(ma5), Some(ma20)) = (snap.ma5, snap.ma20) {
        if ma5 > ma20 {
            score.add(POINTS_PER_CONDITION, "MA5 above MA20");
        }
    }
    if snap.macd_bullish() == Some(true) {
        score.add(POINTS_PER_CONDITION, "MACD above signal");
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scoring::schema::TECHNICAL_SCHEMA_VERSION;

    fn snapshot(close: f64) -> TechnicalSnapshot {
        TechnicalSnapshot {
            version: TECHNICAL_SCHEMA_VERSION,
            close,
            prev_close: None,
            ma5: Some(100.0),
            ma20: Some(95.0),
            ma60: Some(90.0),
            macd_line: Some(1.0),
            macd_signal: Some(0.5),
        }
    }

    #[test]
    fn all_conditions_max_out() {
        let score = score(Some(&snapshot(110.0)));
        assert_eq!(score.points, 50);
        assert_eq!(score.points, score.max());
        assert_eq!(score.reasons.len(), 5);
    }

    #[test]
    fn below_all_mas() {
        let mut snap = snapshot(80.0);
        snap.macd_line = Some(0.0);
        snap.ma5 = Some(90.0);
        snap.ma20 = Some(95.0);
        assert_eq!(score(Some(&snap)).points, 0);
    }

    #[test]
    fn missing_mas_contribute_nothing() {
        let mut snap = snapshot(110.0);
        snap.ma20 = None;
        snap.ma60 = None;
        // above MA5, MACD above signal
        assert_eq!(score(Some(&snap)).points, 20);
    }

    #[test]
    fn absent_snapshot_is_no_data() {
        let score = score(None);
        assert_eq!(score.points, 0);
        assert!(!score.has_data);
    }
}
