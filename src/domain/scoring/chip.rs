//! Chip category: institutional net buying by class.
//!
//! Flows are pivoted by date with classes summed per day; a class missing
//! from the data counts as zero rather than failing the score.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use crate::domain::market_data::InstitutionalFlowRow;
use crate::domain::scoring::schema::InstitutionClass;
use crate::domain::scoring::{Category, CategoryScore};

pub const SHARES_PER_LOT: f64 = 1000.0;
pub const CHIP_WINDOW_DAYS: usize = 5;
pub const TRUST_STREAK_LOTS: f64 = 1000.0;
pub const FOREIGN_EXODUS_LOTS: f64 = -5000.0;

/// Net buying per class, in lots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassNet {
    pub foreign: f64,
    pub trust: f64,
    pub dealer: f64,
}

impl ClassNet {
    fn add(&mut self, class: InstitutionClass, lots: f64) {
        match class {
            InstitutionClass::Foreign => self.foreign += lots,
            InstitutionClass::Trust => self.trust += lots,
            InstitutionClass::Dealer => self.dealer += lots,
        }
    }

    pub fn total(&self) -> f64 {
        self.foreign + self.trust + self.dealer
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipFlows {
    pub latest_date: NaiveDate,
    pub latest: ClassNet,
    /// Sum over the trailing `CHIP_WINDOW_DAYS` dates.
    pub window: ClassNet,
}

impl ChipFlows {
    /// Pivot rows by date; `None` when no row names a known class.
    pub fn from_rows(rows: &[InstitutionalFlowRow]) -> Option<Self> {
        let mut by_date: BTreeMap<NaiveDate, ClassNet> = BTreeMap::new();
        for row in rows {
            match InstitutionClass::parse(&row.name) {
                Some(class) => by_date
                    .entry(row.date)
                    .or_default()
                    .add(class, row.net / SHARES_PER_LOT),
                None => debug!("ignoring unknown institution class {:?}", row.name),
            }
        }

        let (&latest_date, &latest) = by_date.iter().next_back()?;
        let window = by_date
            .values()
            .rev()
            .take(CHIP_WINDOW_DAYS)
            .fold(ClassNet::default(), |mut acc, day| {
                acc.foreign += day.foreign;
                acc.trust += day.trust;
                acc.dealer += day.dealer;
                acc
            });

        Some(Self {
            latest_date,
            latest,
            window,
        })
    }
}

pub fn score_flows(flows: &ChipFlows) -> CategoryScore {
    let mut score = CategoryScore::new(Category::Chip);
    let latest = flows.latest;

    if latest.trust > 0.0 {
        score.add(30, "trust buying");
    }
    if flows.window.trust > TRUST_STREAK_LOTS {
        score.add(20, "trust accumulating");
    }

    if latest.foreign > 0.0 {
        score.add(10, "foreign buying");
    } else if latest.foreign < FOREIGN_EXODUS_LOTS {
        score.add(-20, "foreign exodus");
    }

    if latest.foreign > 0.0 && latest.trust > 0.0 && latest.dealer > 0.0 {
        score.add(20, "concerted buying");
    }

    score
}

pub fn score(rows: &[InstitutionalFlowRow]) -> CategoryScore {
    match ChipFlows::from_rows(rows) {
        Some(flows) => score_flows(&flows),
        None => CategoryScore::no_data(Category::Chip),
    }
}
