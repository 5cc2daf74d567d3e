//! OHLCV bar and validated daily price series.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::error::StockscopeError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Close above open.
    pub fn is_up_candle(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    pub fn is_down_candle(&self) -> bool {
        self.close < self.open
    }
}

/// Day on which a resampled week closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekAnchor {
    /// ISO week, Monday through Sunday.
    #[default]
    Sunday,
    /// Trading week closing on Friday; weekend bars roll into the next week.
    Friday,
}

impl WeekAnchor {
    fn weekday(self) -> Weekday {
        match self {
            WeekAnchor::Sunday => Weekday::Sun,
            WeekAnchor::Friday => Weekday::Fri,
        }
    }

    /// The week-closing date for the week containing `date`.
    pub fn week_end(self, date: NaiveDate) -> NaiveDate {
        let target = self.weekday().num_days_from_monday() as i64;
        let current = date.weekday().num_days_from_monday() as i64;
        date + Duration::days((target - current).rem_euclid(7))
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sunday" | "sun" | "iso" => Some(WeekAnchor::Sunday),
            "friday" | "fri" => Some(WeekAnchor::Friday),
            _ => None,
        }
    }
}

/// Ascending, duplicate-free daily bars for one security.
///
/// The latest bar is always the last element.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    code: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(code: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, StockscopeError> {
        for bar in &bars {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite()) {
                return Err(StockscopeError::InvalidSeries {
                    reason: format!("non-finite price on {}", bar.date),
                });
            }
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(StockscopeError::InvalidSeries {
                    reason: format!(
                        "dates must be strictly increasing ({} follows {})",
                        pair[1].date, pair[0].date
                    ),
                });
            }
        }

        Ok(Self {
            code: code.into(),
            bars,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The trailing `n` bars (or all of them when shorter).
    pub fn tail(&self, n: usize) -> &[OhlcvBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Aggregate daily bars into weekly bars.
    ///
    /// open = first, high = max, low = min, close = last, volume = sum. Each
    /// weekly bar is dated with its week-closing day under `anchor`.
    pub fn resample_weekly(&self, anchor: WeekAnchor) -> Vec<OhlcvBar> {
        let mut weeks: Vec<OhlcvBar> = Vec::new();

        for bar in &self.bars {
            let week_end = anchor.week_end(bar.date);
            match weeks.last_mut() {
                Some(week) if week.date == week_end => {
                    week.high = week.high.max(bar.high);
                    week.low = week.low.min(bar.low);
                    week.close = bar.close;
                    week.volume += bar.volume;
                }
                _ => weeks.push(OhlcvBar {
                    date: week_end,
                    ..bar.clone()
                }),
            }
        }

        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: i64) -> OhlcvBar {
        OhlcvBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rejects_duplicate_dates() {
        let bars = vec![
            bar(d(2024, 1, 2), 1.0, 1.0, 1.0, 1.0, 10),
            bar(d(2024, 1, 2), 1.0, 1.0, 1.0, 1.0, 10),
        ];
        let err = PriceSeries::new("T", bars).unwrap_err();
        assert!(matches!(err, StockscopeError::InvalidSeries { .. }));
    }

    #[test]
    fn rejects_descending_dates() {
        let bars = vec![
            bar(d(2024, 1, 3), 1.0, 1.0, 1.0, 1.0, 10),
            bar(d(2024, 1, 2), 1.0, 1.0, 1.0, 1.0, 10),
        ];
        assert!(PriceSeries::new("T", bars).is_err());
    }

    #[test]
    fn rejects_nan_close() {
        let bars = vec![bar(d(2024, 1, 3), 1.0, 1.0, 1.0, f64::NAN, 10)];
        assert!(PriceSeries::new("T", bars).is_err());
    }

    #[test]
    fn week_end_sunday_anchor() {
        // 2024-01-03 is a Wednesday
        assert_eq!(WeekAnchor::Sunday.week_end(d(2024, 1, 3)), d(2024, 1, 7));
        assert_eq!(WeekAnchor::Sunday.week_end(d(2024, 1, 7)), d(2024, 1, 7));
        assert_eq!(WeekAnchor::Sunday.week_end(d(2024, 1, 8)), d(2024, 1, 14));
    }

    #[test]
    fn week_end_friday_anchor_rolls_weekend_forward() {
        assert_eq!(WeekAnchor::Friday.week_end(d(2024, 1, 5)), d(2024, 1, 5));
        // Saturday belongs to the following trading week
        assert_eq!(WeekAnchor::Friday.week_end(d(2024, 1, 6)), d(2024, 1, 12));
    }

    #[test]
    fn resample_aggregates_ohlcv() {
        let bars = vec![
            bar(d(2024, 1, 2), 10.0, 12.0, 9.0, 11.0, 100),
            bar(d(2024, 1, 3), 11.0, 15.0, 10.0, 14.0, 200),
            bar(d(2024, 1, 5), 14.0, 14.5, 8.0, 13.0, 300),
            bar(d(2024, 1, 8), 13.0, 13.5, 12.0, 12.5, 50),
        ];
        let series = PriceSeries::new("T", bars).unwrap();
        let weekly = series.resample_weekly(WeekAnchor::Sunday);

        assert_eq!(weekly.len(), 2);
        let first = &weekly[0];
        assert_eq!(first.date, d(2024, 1, 7));
        assert_eq!(first.open, 10.0);
        assert_eq!(first.high, 15.0);
        assert_eq!(first.low, 8.0);
        assert_eq!(first.close, 13.0);
        assert_eq!(first.volume, 600);
        assert_eq!(weekly[1].close, 12.5);
    }

    #[test]
    fn tail_shorter_than_series() {
        let bars = vec![
            bar(d(2024, 1, 2), 1.0, 1.0, 1.0, 1.0, 1),
            bar(d(2024, 1, 3), 2.0, 2.0, 2.0, 2.0, 1),
        ];
        let series = PriceSeries::new("T", bars).unwrap();
        assert_eq!(series.tail(1).len(), 1);
        assert_eq!(series.tail(10).len(), 2);
        assert_eq!(series.latest_close(), Some(2.0));
    }

    #[test]
    fn candle_color() {
        let up = bar(d(2024, 1, 2), 10.0, 11.0, 9.0, 10.5, 1);
        assert!(up.is_up_candle());
        assert!(!up.is_down_candle());
    }
}
