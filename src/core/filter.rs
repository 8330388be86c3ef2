use chrono::{Days, NaiveDate};
use enumset::EnumSet;
use serde::Serialize;

use crate::core::{export::UsageRecord, weekday::DayOfWeek};

/// Inclusive range of calendar days, unbounded on a missing side.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub const UNBOUNDED: Self = Self { start: None, end: None };

    /// Default range for the freshly ingested records.
    ///
    /// Note that the start is the day after the earliest record: the first day
    /// of an export is usually incomplete.
    pub fn spanning(records: &[UsageRecord]) -> Self {
        let earliest = records.iter().map(|record| record.date).min();
        let latest = records.iter().map(|record| record.date).max();
        Self {
            start: earliest.and_then(|date| date.checked_add_days(Days::new(1))),
            end: latest,
        }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Filters {
    pub dates: DateRange,

    /// Days of week to keep, the empty set rejects everything.
    #[serde(with = "crate::core::weekday::indices")]
    pub weekdays: EnumSet<DayOfWeek>,

    /// Years since signing up, selects the discount tier.
    pub discount_year: usize,
}

impl Default for Filters {
    fn default() -> Self {
        Self { dates: DateRange::UNBOUNDED, weekdays: EnumSet::all(), discount_year: 0 }
    }
}

impl Filters {
    #[must_use]
    pub fn qualifies(&self, date: NaiveDate) -> bool {
        qualifies(date, &self.dates, self.weekdays)
    }
}

#[must_use]
pub fn qualifies(date: NaiveDate, dates: &DateRange, weekdays: EnumSet<DayOfWeek>) -> bool {
    dates.contains(date) && weekdays.contains(DayOfWeek::from(date))
}
