use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
};

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

pub const HOURS_PER_DAY: u8 = 24;

/// Sorted set of hours of day.
///
/// Catalogs are allowed to spell midnight as `24`, it is stored as `0`.
#[must_use]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HourSet(BTreeSet<u8>);

impl HourSet {
    pub fn try_from_hours(hours: impl IntoIterator<Item = u8>) -> Result<Self, u8> {
        hours
            .into_iter()
            .map(|hour| match hour {
                0..HOURS_PER_DAY => Ok(hour),
                HOURS_PER_DAY => Ok(0),
                _ => Err(hour),
            })
            .collect::<Result<BTreeSet<u8>, u8>>()
            .map(Self)
    }

    #[must_use]
    pub fn contains(&self, hour: u8) -> bool {
        self.0.contains(&hour)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.len() == usize::from(HOURS_PER_DAY)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Split the set into maximal runs of consecutive hours, wrapping around midnight.
    ///
    /// Runs are ordered by their first hour. A full set yields no runs.
    #[must_use]
    pub fn spans(&self) -> Vec<HourSpan> {
        if self.is_full() {
            return Vec::new();
        }
        self.iter()
            .filter(|start| !self.contains(previous_hour(*start)))
            .map(|start| {
                let mut last = start;
                while self.contains(next_hour(last)) {
                    last = next_hour(last);
                }
                HourSpan { start, end: next_hour(last) }
            })
            .collect()
    }

    /// `All` for the full day, otherwise the comma-separated spans, for example `22:00–02:00`.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.is_full() { "All".to_string() } else { self.spans().iter().join(", ") }
    }
}

const fn next_hour(hour: u8) -> u8 {
    (hour + 1) % HOURS_PER_DAY
}

const fn previous_hour(hour: u8) -> u8 {
    (hour + HOURS_PER_DAY - 1) % HOURS_PER_DAY
}

impl Serialize for HourSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for HourSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::try_from_hours(Vec::<u8>::deserialize(deserializer)?).map_err(|hour| {
            de::Error::invalid_value(
                de::Unexpected::Unsigned(u64::from(hour)),
                &"an hour within 0..=24",
            )
        })
    }
}

/// Half-open run of hours, `end` is exclusive and may wrap to `0`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HourSpan {
    pub start: u8,
    pub end: u8,
}

impl Display for HourSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00–{:02}:00", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(hours: impl IntoIterator<Item = u8>) -> HourSet {
        HourSet::try_from_hours(hours).unwrap()
    }

    #[test]
    fn test_full_day_is_all() {
        assert_eq!(hours(0..24).describe(), "All");
    }

    #[test]
    fn test_midnight_alias_completes_full_day() {
        assert_eq!(hours(1..=24).describe(), "All");
    }

    #[test]
    fn test_single_hour() {
        assert_eq!(hours([9]).describe(), "09:00–10:00");
    }

    #[test]
    fn test_evening_ends_at_midnight() {
        assert_eq!(hours(17..24).describe(), "17:00–00:00");
    }

    #[test]
    fn test_wraps_around_midnight() {
        let set = hours([22, 23, 0, 1]);
        assert_eq!(set.spans(), vec![HourSpan { start: 22, end: 2 }]);
        assert_eq!(set.describe(), "22:00–02:00");
    }

    #[test]
    fn test_disjoint_runs() {
        assert_eq!(hours([6, 7, 20]).describe(), "06:00–08:00, 20:00–21:00");
    }

    #[test]
    fn test_empty() {
        assert_eq!(hours(std::iter::empty()).describe(), "");
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(HourSet::try_from_hours([3, 25]), Err(25));
    }

    #[test]
    fn test_deserialize() -> serde_json::Result<()> {
        let set: HourSet = serde_json::from_str("[23, 24]")?;
        assert!(set.contains(0));
        assert!(set.contains(23));
        assert!(serde_json::from_str::<HourSet>("[30]").is_err());
        Ok(())
    }
}
