use chrono::{DateTime, Local, Timelike};

use crate::quantity::price::KilowattHourPrice;

/// Quarter-hour slot of a local calendar day, indexed 0 through 95.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[must_use]
pub struct QuarterIndex(u8);

impl QuarterIndex {
    pub const PER_DAY: usize = 96;

    pub const fn new(index: u8) -> Self {
        assert!(index < Self::PER_DAY as u8);
        Self(index)
    }

    pub fn of(timestamp: DateTime<Local>) -> Self {
        Self((timestamp.hour() * 4 + timestamp.minute() / 15) as u8)
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Single observed price sample, immutable once observed.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct PricePoint {
    pub timestamp: DateTime<Local>,
    pub quarter: QuarterIndex,
    pub price: KilowattHourPrice,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Local>, price: KilowattHourPrice) -> Self {
        Self { timestamp, quarter: QuarterIndex::of(timestamp), price }
    }
}

/// Price samples for one local calendar day, chronological,
/// at most one sample per quarter.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct PriceSeries(Vec<PricePoint>);

impl PriceSeries {
    /// Insert a sample, replacing an earlier sample of the same quarter.
    ///
    /// The feed revises prices intraday, and on DST days the wall clock may
    /// repeat a quarter; either way, the latest sample wins.
    pub fn push(&mut self, point: PricePoint) {
        match self.0.iter_mut().find(|existing| existing.quarter == point.quarter) {
            Some(existing) => *existing = point,
            None => self.0.push(point),
        }
    }

    pub fn get(&self, quarter: QuarterIndex) -> Option<&PricePoint> {
        self.0.iter().find(|point| point.quarter == quarter)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(points: I) -> Self {
        let mut series = Self::default();
        for point in points {
            series.push(point);
        }
        series
    }
}
