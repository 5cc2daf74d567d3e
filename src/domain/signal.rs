//! Discrete signal tiers and directional bias shared by indicators and fusion.

use serde::Serialize;
use std::fmt;

/// Totally ordered signal scale, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SignalTier {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl SignalTier {
    pub fn label(self) -> &'static str {
        match self {
            SignalTier::StrongSell => "Strong Sell",
            SignalTier::Sell => "Sell",
            SignalTier::Hold => "Hold",
            SignalTier::Buy => "Buy",
            SignalTier::StrongBuy => "Strong Buy",
        }
    }

    pub fn bias(self) -> Bias {
        match self {
            SignalTier::StrongBuy | SignalTier::Buy => Bias::Bullish,
            SignalTier::Hold => Bias::Neutral,
            SignalTier::Sell | SignalTier::StrongSell => Bias::Bearish,
        }
    }
}

impl fmt::Display for SignalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction an individual result leans.
///
/// Carried as a field on every result so downstream consumers never have to
/// parse signal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Bias {
    Bullish,
    #[default]
    Neutral,
    Bearish,
}

impl Bias {
    pub fn label(self) -> &'static str {
        match self {
            Bias::Bullish => "bullish",
            Bias::Neutral => "neutral",
            Bias::Bearish => "bearish",
        }
    }
}
