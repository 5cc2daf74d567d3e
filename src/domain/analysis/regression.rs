//! Linear-regression channel: OLS center line with ±2σ residual bands.

use crate::domain::analysis::{fmt2, require_bars, AnalysisResult};
use crate::domain::error::AnalysisError;
use crate::domain::indicator::linreg::fit_line;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Bias;

pub const REGRESSION_WINDOW: usize = 20;
/// Slope dead zone in price units per bar.
pub const SLOPE_DEAD_ZONE: f64 = 0.1;
const BAND_PROXIMITY: f64 = 0.01;
const BAND_WIDTH_SIGMAS: f64 = 2.0;
const TITLE: &str = "Linear Regression Channel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelTrend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSetup {
    BuyLowerBand,
    SellUpperBand,
    SellIntoResistance,
    CoverLowerBand,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionReading {
    pub slope: f64,
    pub price: f64,
    pub center: f64,
    pub upper: f64,
    pub lower: f64,
}

impl RegressionReading {
    pub fn read(series: &PriceSeries) -> Result<Self, AnalysisError> {
        require_bars("Regression", series.len(), REGRESSION_WINDOW)?;

        let closes: Vec<f64> = series
            .tail(REGRESSION_WINDOW)
            .iter()
            .map(|b| b.close)
            .collect();
        let fit = fit_line(&closes).ok_or_else(|| AnalysisError::Degenerate {
            reason: "regression window too short".into(),
        })?;

        let center = fit.latest_fitted();
        let half_width = BAND_WIDTH_SIGMAS * fit.residual_std;

        Ok(Self {
            slope: fit.slope,
            price: closes[closes.len() - 1],
            center,
            upper: center + half_width,
            lower: center - half_width,
        })
    }

    pub fn trend(&self) -> ChannelTrend {
        if self.slope > SLOPE_DEAD_ZONE {
            ChannelTrend::Up
        } else if self.slope < -SLOPE_DEAD_ZONE {
            ChannelTrend::Down
        } else {
            ChannelTrend::Flat
        }
    }

    fn near_lower(&self) -> bool {
        self.price <= self.lower * (1.0 + BAND_PROXIMITY)
    }

    fn near_upper(&self) -> bool {
        self.price >= self.upper * (1.0 - BAND_PROXIMITY)
    }

    pub fn setup(&self) -> ChannelSetup {
        match self.trend() {
            ChannelTrend::Up if self.near_lower() => ChannelSetup::BuyLowerBand,
            ChannelTrend::Up if self.near_upper() => ChannelSetup::SellUpperBand,
            ChannelTrend::Down if self.near_upper() => ChannelSetup::SellIntoResistance,
            ChannelTrend::Down if self.near_lower() => ChannelSetup::CoverLowerBand,
            _ => ChannelSetup::Inside,
        }
    }

    pub fn to_result(&self) -> AnalysisResult {
        let trend = self.trend();
        let setup = self.setup();

        let trend_label = match trend {
            ChannelTrend::Up => "Uptrend",
            ChannelTrend::Down => "Downtrend",
            ChannelTrend::Flat => "Sideways",
        };

        let (signal, bias, detail) = match setup {
            ChannelSetup::BuyLowerBand => (
                "Buy (lower band retest)",
                Bias::Bullish,
                "Uptrend pulled back to support, value emerging".to_string(),
            ),
            ChannelSetup::SellUpperBand => (
                "Sell (upper band touch)",
                Bias::Bearish,
                "Stretched above the mean, expect reversion".to_string(),
            ),
            ChannelSetup::SellIntoResistance => (
                "Sell (resistance test)",
                Bias::Bearish,
                "Downtrend bounced into resistance".to_string(),
            ),
            ChannelSetup::CoverLowerBand => (
                "Cover (lower band touch)",
                Bias::Bullish,
                "Negative deviation extreme, a bounce may come".to_string(),
            ),
            ChannelSetup::Inside if trend == ChannelTrend::Flat => (
                "Watch",
                Bias::Neutral,
                "Slope flat, trading in a range".to_string(),
            ),
            ChannelSetup::Inside => (
                "Watch",
                Bias::Neutral,
                format!("Slope {}, price inside the channel", fmt2(self.slope)),
            ),
        };

        AnalysisResult::new(TITLE, signal, bias, format!("{trend_label}. {detail}"))
            .with("Slope (trend)", format!("{:.3}", self.slope))
            .with("Price", fmt2(self.price))
            .with("Upper band (resistance)", fmt2(self.upper))
            .with("Center (value)", fmt2(self.center))
            .with("Lower band (support)", fmt2(self.lower))
    }
}

pub fn analyze(series: &PriceSeries) -> Result<AnalysisResult, AnalysisError> {
    match RegressionReading::read(series) {
        Ok(reading) => Ok(reading.to_result()),
        Err(err @ AnalysisError::InsufficientData { .. }) => {
            Ok(AnalysisResult::insufficient(TITLE, &err))
        }
        Err(err) => Err(err),
    }
}
