//! Box (trading range) analysis: breakouts above the box top and support
//! plays near the box bottom.

use crate::domain::analysis::{fmt2, require_bars, AnalysisResult};
use crate::domain::error::AnalysisError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Bias;

pub const BOX_WINDOW: usize = 20;
pub const BOX_MIN_BARS: usize = BOX_WINDOW + 5;
const VOLUME_WINDOW: usize = 5;
const VOLUME_CONFIRM_RATIO: f64 = 1.3;
const LOWER_EDGE_PCT: f64 = 20.0;
const UPPER_EDGE_PCT: f64 = 80.0;
const TITLE: &str = "Box Range";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSetup {
    Breakout,
    VolumeBreakout,
    BottomSupport,
    NearBottom,
    Breakdown,
    TopRejection,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxReading {
    pub price: f64,
    pub top: f64,
    pub bottom: f64,
    /// Unclamped position in the box, 0 = bottom, 100 = top.
    pub raw_position: f64,
    pub volume_confirmed: bool,
    pub up_candle: bool,
    pub down_candle: bool,
}

impl BoxReading {
    pub fn read(series: &PriceSeries) -> Result<Self, AnalysisError> {
        require_bars("Box", series.len(), BOX_MIN_BARS)?;

        let bars = series.bars();
        let latest = &bars[bars.len() - 1];
        let window = &bars[bars.len() - 1 - BOX_WINDOW..bars.len() - 1];

        let top = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let bottom = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let height = top - bottom;
        let raw_position = if height == 0.0 {
            50.0
        } else {
            (latest.close - bottom) / height * 100.0
        };

        let recent = series.tail(VOLUME_WINDOW);
        let avg_volume =
            recent.iter().map(|b| b.volume as f64).sum::<f64>() / recent.len() as f64;

        Ok(Self {
            price: latest.close,
            top,
            bottom,
            raw_position,
            volume_confirmed: latest.volume as f64 > avg_volume * VOLUME_CONFIRM_RATIO,
            up_candle: latest.is_up_candle(),
            down_candle: latest.is_down_candle(),
        })
    }

    /// Position clamped to [0, 100].
    pub fn position(&self) -> f64 {
        self.raw_position.clamp(0.0, 100.0)
    }

    pub fn setup(&self) -> BoxSetup {
        if self.price > self.top {
            if self.volume_confirmed {
                BoxSetup::VolumeBreakout
            } else {
                BoxSetup::Breakout
            }
        } else if self.raw_position < LOWER_EDGE_PCT && self.price > self.bottom {
            if self.up_candle {
                BoxSetup::BottomSupport
            } else {
                BoxSetup::NearBottom
            }
        } else if self.price < self.bottom {
            BoxSetup::Breakdown
        } else if self.raw_position > UPPER_EDGE_PCT && self.price < self.top && self.down_candle
        {
            BoxSetup::TopRejection
        } else {
            BoxSetup::Inside
        }
    }

    pub fn to_result(&self) -> AnalysisResult {
        let position = self.position().trunc() as i64;
        let (signal, bias, description) = match self.setup() {
            BoxSetup::VolumeBreakout => (
                "Strong Buy (breakout)",
                Bias::Bullish,
                "New high through the box top, confirmed by heavy volume".to_string(),
            ),
            BoxSetup::Breakout => (
                "Buy (box breakout)",
                Bias::Bullish,
                "New high through the box top".to_string(),
            ),
            BoxSetup::BottomSupport => (
                "Buy (box bottom support)",
                Bias::Bullish,
                "Retest of the box bottom held with a reversal candle".to_string(),
            ),
            BoxSetup::NearBottom => (
                "Watch",
                Bias::Neutral,
                "Near the box bottom, waiting for a reversal candle".to_string(),
            ),
            BoxSetup::Breakdown => (
                "Sell (breakdown)",
                Bias::Bearish,
                "Broke below the box bottom, support gone".to_string(),
            ),
            BoxSetup::TopRejection => (
                "Sell (rejected at box top)",
                Bias::Bearish,
                "Failed at the box top, take short-term profit".to_string(),
            ),
            BoxSetup::Inside => (
                "Watch",
                Bias::Neutral,
                format!("Trading inside the box (position {position}%)"),
            ),
        };

        AnalysisResult::new(TITLE, signal, bias, description)
            .with("Price", fmt2(self.price))
            .with("Box top (resistance)", fmt2(self.top))
            .with("Box bottom (support)", fmt2(self.bottom))
            .with("Position in box", format!("{position}%"))
    }
}

pub fn analyze(series: &PriceSeries) -> Result<AnalysisResult, AnalysisError> {
    match BoxReading::read(series) {
        Ok(reading) => Ok(reading.to_result()),
        Err(err @ AnalysisError::InsufficientData { .. }) => {
            Ok(AnalysisResult::insufficient(TITLE, &err))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::{Duration, NaiveDate};

    /// 25 bars ranging 90..110, then a final bar with the given shape.
    fn make_series(last_open: f64, last_close: f64, last_volume: i64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut bars: Vec<OhlcvBar> = (0..25)
            .map(|i| OhlcvBar {
                date: start + Duration::days(i),
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 100.0,
                volume: 1000,
            })
            .collect();
        bars.push(OhlcvBar {
            date: start + Duration::days(25),
            open: last_open,
            high: last_open.max(last_close),
            low: last_open.min(last_close),
            close: last_close,
            volume: last_volume,
        });
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn volume_breakout() {
        let r = BoxReading::read(&make_series(108.0, 115.0, 5000)).unwrap();
        assert_eq!(r.top, 110.0);
        assert_eq!(r.bottom, 90.0);
        assert_eq!(r.setup(), BoxSetup::VolumeBreakout);
        assert_eq!(r.position(), 100.0);
        assert_eq!(r.to_result().value("Position in box"), Some("100%"));
    }

    #[test]
    fn breakout_without_volume() {
        let r = BoxReading::read(&make_series(108.0, 115.0, 1000)).unwrap();
        assert_eq!(r.setup(), BoxSetup::Breakout);
    }

    #[test]
    fn bottom_support_needs_up_candle() {
        let up = BoxReading::read(&make_series(91.0, 92.0, 1000)).unwrap();
        assert_eq!(up.setup(), BoxSetup::BottomSupport);
        let down = BoxReading::read(&make_series(93.0, 92.0, 1000)).unwrap();
        assert_eq!(down.setup(), BoxSetup::NearBottom);
    }

    #[test]
    fn breakdown_clamps_position() {
        let r = BoxReading::read(&make_series(90.0, 85.0, 1000)).unwrap();
        assert_eq!(r.setup(), BoxSetup::Breakdown);
        assert!(r.raw_position < 0.0);
        assert_eq!(r.position(), 0.0);
    }

    #[test]
    fn top_rejection_on_down_candle() {
        let r = BoxReading::read(&make_series(109.0, 108.0, 1000)).unwrap();
        assert_eq!(r.setup(), BoxSetup::TopRejection);
    }

    #[test]
    fn flat_box_is_midpoint() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..30)
            .map(|i| OhlcvBar {
                date: start + Duration::days(i),
                open: 10.0,
                high: 10.0,
                low: 10.0,
                close: 10.0,
                volume: 100,
            })
            .collect();
        let r = BoxReading::read(&PriceSeries::new("T", bars).unwrap()).unwrap();
        assert_eq!(r.position(), 50.0);
        assert_eq!(r.setup(), BoxSetup::Inside);
    }
}
