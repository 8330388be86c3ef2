use enumset::EnumSet;
use serde::{Serialize, Serializer};

use crate::{
    core::{export::UsageRecord, filter::Filters, hours::HOURS_PER_DAY, weekday::DayOfWeek},
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Consumption per hour of day.
///
/// A bucket is [`Some`] as soon as any record falls into that hour,
/// even if the record's value was not a number.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HourlyAggregate([Option<KilowattHours>; HOURS_PER_DAY as usize]);

impl HourlyAggregate {
    pub fn add(&mut self, hour: u8, consumption: Option<KilowattHours>) {
        let bucket = self.0[usize::from(hour)].get_or_insert(KilowattHours::ZERO);
        *bucket += consumption.unwrap_or(KilowattHours::ZERO);
    }

    #[must_use]
    pub fn get(&self, hour: u8) -> Option<KilowattHours> {
        self.0.get(usize::from(hour)).copied().flatten()
    }

    /// Iterate over the filled buckets in hour order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, KilowattHours)> + '_ {
        (0..HOURS_PER_DAY).zip(self.0).filter_map(|(hour, bucket)| Some((hour, bucket?)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn total(&self) -> KilowattHours {
        self.iter().map(|(_, consumption)| consumption).sum()
    }
}

impl Serialize for HourlyAggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Consumption per day of week and hour of day.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WeeklyAggregate([HourlyAggregate; 7]);

impl WeeklyAggregate {
    pub fn add(&mut self, day: DayOfWeek, hour: u8, consumption: Option<KilowattHours>) {
        self.0[usize::from(day.index())].add(hour, consumption);
    }

    pub const fn on(&self, day: DayOfWeek) -> &HourlyAggregate {
        &self.0[day.index() as usize]
    }

    /// Iterate over the days that have any buckets.
    pub fn iter(&self) -> impl Iterator<Item = (DayOfWeek, &HourlyAggregate)> + '_ {
        EnumSet::<DayOfWeek>::all()
            .iter()
            .map(|day| (day, self.on(day)))
            .filter(|(_, hourly)| !hourly.is_empty())
    }
}

/// Filtered consumption, rebuilt from scratch on every filter change.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub hourly: HourlyAggregate,

    #[serde(skip)]
    pub weekly: WeeklyAggregate,
}

impl Aggregates {
    #[instrument(skip_all)]
    pub fn collect(records: &[UsageRecord], filters: &Filters) -> Self {
        let mut this = Self::default();
        let mut n_qualified = 0_usize;
        for record in records.iter().filter(|record| filters.qualifies(record.date)) {
            this.hourly.add(record.hour, record.consumption);
            this.weekly.add(DayOfWeek::from(record.date), record.hour, record.consumption);
            n_qualified += 1;
        }
        debug!(n_qualified, n_records = records.len(), "aggregated");
        this
    }
}
