use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDate, Weekday};
use enumset::{EnumSet, EnumSetType};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serializer, de};

/// Day of week, numbered from Sunday as in the plan catalogs.
#[derive(Debug, Hash, PartialOrd, Ord, clap::ValueEnum, EnumSetType)]
pub enum DayOfWeek {
    #[value(name = "sun", aliases = ["sunday", "0"])]
    Sunday,

    #[value(name = "mon", aliases = ["monday", "1"])]
    Monday,

    #[value(name = "tue", aliases = ["tuesday", "2"])]
    Tuesday,

    #[value(name = "wed", aliases = ["wednesday", "3"])]
    Wednesday,

    #[value(name = "thu", aliases = ["thursday", "4"])]
    Thursday,

    #[value(name = "fri", aliases = ["friday", "5"])]
    Friday,

    #[value(name = "sat", aliases = ["saturday", "6"])]
    Saturday,
}

impl DayOfWeek {
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Sunday => "Sun",
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => Self::Sunday,
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
        }
    }
}

impl From<NaiveDate> for DayOfWeek {
    fn from(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Describe the day set: `All` for the whole week, abbreviations in calendar order otherwise.
#[must_use]
pub fn describe(days: EnumSet<DayOfWeek>) -> String {
    if days == EnumSet::all() { "All".to_string() } else { days.iter().join(", ") }
}

/// Serde adapter for day sets stored as lists of `0..=6`.
pub mod indices {
    use super::*;

    pub fn serialize<S: Serializer>(
        days: &EnumSet<DayOfWeek>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(days.iter().map(DayOfWeek::index))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<EnumSet<DayOfWeek>, D::Error> {
        Vec::<u8>::deserialize(deserializer)?
            .into_iter()
            .map(|index| {
                DayOfWeek::from_index(index).ok_or_else(|| {
                    de::Error::invalid_value(
                        de::Unexpected::Unsigned(u64::from(index)),
                        &"a day of week within 0..=6",
                    )
                })
            })
            .collect()
    }
}
