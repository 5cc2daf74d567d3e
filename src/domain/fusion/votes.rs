//! Vote-counting composites over pairs of indicators.
//!
//! Each composite casts up to four buy votes and four sell votes from typed
//! readings. The side with strictly more votes wins; a tie is Watch.

use crate::domain::analysis::kd::KdReading;
use crate::domain::analysis::macd::{MacdReading, Momentum};
use crate::domain::analysis::moving_average::MaReading;
use crate::domain::analysis::rsi::RsiReading;
use crate::domain::analysis::{fmt2, AnalysisResult, OVERBOUGHT_ABOVE, OVERSOLD_BELOW};
use crate::domain::signal::Bias;

pub const MAX_VOTES: u8 = 4;
const RSI_MIDLINE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteSignal {
    Buy(u8),
    Sell(u8),
    Watch,
}

impl VoteSignal {
    pub fn label(self) -> String {
        match self {
            VoteSignal::Buy(n) => {
                let action = match n {
                    1 => "Try",
                    2 => "Small position",
                    3 => "Enter",
                    _ => "Full position",
                };
                format!("{action} ({n}/{MAX_VOTES})")
            }
            VoteSignal::Sell(n) => {
                let action = match n {
                    1 => "Trim one lot",
                    2 => "Light selling",
                    3 => "Reduce",
                    _ => "Exit all",
                };
                format!("{action} ({n}/{MAX_VOTES})")
            }
            VoteSignal::Watch => "Watch".to_string(),
        }
    }

    pub fn bias(self) -> Bias {
        match self {
            VoteSignal::Buy(_) => Bias::Bullish,
            VoteSignal::Sell(_) => Bias::Bearish,
            VoteSignal::Watch => Bias::Neutral,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteTally {
    pub buy: u8,
    pub sell: u8,
    pub buy_reasons: Vec<&'static str>,
    pub sell_reasons: Vec<&'static str>,
}

impl VoteTally {
    pub fn buy_if(&mut self, condition: bool, reason: &'static str) {
        if condition {
            self.buy += 1;
            self.buy_reasons.push(reason);
        }
    }

    pub fn sell_if(&mut self, condition: bool, reason: &'static str) {
        if condition {
            self.sell += 1;
            self.sell_reasons.push(reason);
        }
    }

    pub fn outcome(&self) -> VoteSignal {
        if self.buy > self.sell {
            VoteSignal::Buy(self.buy)
        } else if self.sell > self.buy {
            VoteSignal::Sell(self.sell)
        } else {
            VoteSignal::Watch
        }
    }

    pub fn rationale(&self) -> String {
        let list = |reasons: &[&str]| {
            if reasons.is_empty() {
                "none".to_string()
            } else {
                reasons.join(", ")
            }
        };
        format!(
            "Buy {}/{MAX_VOTES} ({}) vs sell {}/{MAX_VOTES} ({})",
            self.buy,
            list(&self.buy_reasons),
            self.sell,
            list(&self.sell_reasons)
        )
    }

    /// Render the tally with the composite's own value rows.
    pub fn to_result(&self, title: &str, rows: Vec<(&str, String)>) -> AnalysisResult {
        let outcome = self.outcome();
        let mut result = AnalysisResult::new(title, outcome.label(), outcome.bias(), self.rationale());
        for (label, value) in rows {
            result.push(label, value);
        }
        result
            .with("Buy votes", format!("{} / {MAX_VOTES}", self.buy))
            .with("Sell votes", format!("{} / {MAX_VOTES}", self.sell))
    }
}

/// Oversold/overbought votes from daily and weekly K and RSI.
pub fn kd_rsi_tally(kd: &KdReading, rsi: &RsiReading) -> VoteTally {
    let mut tally = VoteTally::default();
    let factors = [
        (kd.daily.k, "daily K oversold", "daily K overbought"),
        (kd.weekly.k, "weekly K oversold", "weekly K overbought"),
        (rsi.daily, "daily RSI oversold", "daily RSI overbought"),
        (rsi.weekly, "weekly RSI oversold", "weekly RSI overbought"),
    ];
    for (value, low, high) in factors {
        tally.buy_if(value < OVERSOLD_BELOW, low);
        tally.sell_if(value > OVERBOUGHT_ABOVE, high);
    }
    tally
}

pub fn kd_rsi(kd: &KdReading, rsi: &RsiReading) -> AnalysisResult {
    kd_rsi_tally(kd, rsi).to_result(
        "KD + RSI Composite",
        vec![
            ("Daily K", fmt2(kd.daily.k)),
            ("Weekly K", fmt2(kd.weekly.k)),
            ("Daily RSI", fmt2(rsi.daily)),
            ("Weekly RSI", fmt2(rsi.weekly)),
        ],
    )
}

/// Trend (MA20 lifeline, MA5/MA10) and momentum (MACD) votes.
pub fn ma_macd_tally(ma: &MaReading, macd: &MacdReading) -> VoteTally {
    let mut tally = VoteTally::default();
    let momentum = macd.momentum();

    tally.buy_if(ma.price > ma.ma20, "above MA20");
    tally.buy_if(ma.ma5 > ma.ma10, "MA5 above MA10");
    tally.buy_if(macd.dif > macd.signal, "DIF above signal");
    tally.buy_if(momentum == Momentum::Strengthening, "histogram strengthening");

    tally.sell_if(ma.price < ma.ma20, "below MA20");
    tally.sell_if(ma.ma5 < ma.ma10, "MA5 below MA10");
    tally.sell_if(macd.dif < macd.signal, "DIF below signal");
    tally.sell_if(momentum == Momentum::Weakening, "histogram weakening");

    tally
}

pub fn ma_macd(ma: &MaReading, macd: &MacdReading) -> AnalysisResult {
    ma_macd_tally(ma, macd).to_result(
        "MA + MACD Trend Momentum",
        vec![
            ("Price", fmt2(ma.price)),
            ("MA20 (lifeline)", fmt2(ma.ma20)),
            ("Histogram", fmt2(macd.histogram)),
            ("Momentum", macd.momentum().label().to_string()),
        ],
    )
}

/// MACD state with RSI midline votes.
///
/// The sell side counts an overbought daily RSI as a fourth vote in place
/// of a weekly condition.
pub fn macd_rsi_tally(macd: &MacdReading, rsi: &RsiReading) -> VoteTally {
    let mut tally = VoteTally::default();
    let momentum = macd.momentum();

    tally.buy_if(macd.dif > macd.signal, "DIF above signal");
    tally.buy_if(momentum == Momentum::Strengthening, "histogram strengthening");
    tally.buy_if(rsi.daily > RSI_MIDLINE, "daily RSI above 50");
    tally.buy_if(rsi.weekly > RSI_MIDLINE, "weekly RSI above 50");

    tally.sell_if(macd.dif < macd.signal, "DIF below signal");
    tally.sell_if(momentum == Momentum::Weakening, "histogram weakening");
    tally.sell_if(rsi.daily < RSI_MIDLINE, "daily RSI below 50");
    tally.sell_if(rsi.daily > OVERBOUGHT_ABOVE, "daily RSI overbought");

    tally
}

pub fn macd_rsi(macd: &MacdReading, rsi: &RsiReading) -> AnalysisResult {
    macd_rsi_tally(macd, rsi).to_result(
        "MACD + RSI Composite",
        vec![
            ("DIF", fmt2(macd.dif)),
            ("Signal", fmt2(macd.signal)),
            ("Daily RSI", fmt2(rsi.daily)),
            ("Weekly RSI", fmt2(rsi.weekly)),
        ],
    )
}
