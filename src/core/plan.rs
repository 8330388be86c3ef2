use std::fmt::{Display, Formatter};

use enumset::EnumSet;
use itertools::Itertools;
use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{
        hours::HourSet,
        weekday::{DayOfWeek, indices},
    },
    quantity::percent::Percent,
};

/// Discount plan as listed in the catalog.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "plan_active")]
    pub activity: Activity,

    pub company_name: String,

    #[serde(rename = "plan_description")]
    pub description: String,

    #[serde_as(as = "DisplayFromStr")]
    #[serde(rename = "plan_link")]
    pub link: Url,

    #[serde(rename = "days_of_week", with = "indices")]
    pub days: EnumSet<DayOfWeek>,

    #[serde(rename = "applicable_hours")]
    pub hours: HourSet,

    #[serde(rename = "discount")]
    pub discounts: Discounts,
}

/// Whether the plan is still offered: catalogs spell it either as a flag or as a label.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Activity {
    Flag(bool),
    Label(String),
}

impl Display for Activity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(true) => f.write_str("Yes"),
            Self::Flag(false) => f.write_str("No"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Discount percentages by years since signing up, never empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Discounts(Vec<Percent>);

impl Discounts {
    pub fn try_new(tiers: Vec<Percent>) -> Option<Self> {
        if tiers.is_empty() { None } else { Some(Self(tiers)) }
    }

    /// Discount in the specified year, plans without that many tiers stick to the last one.
    pub fn tier(&self, year: usize) -> Percent {
        self.0[year.min(self.0.len() - 1)]
    }
}

impl<'de> Deserialize<'de> for Discounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::try_new(Vec::deserialize(deserializer)?)
            .ok_or_else(|| de::Error::invalid_length(0, &"at least one discount tier"))
    }
}

impl Display for Discounts {
    /// Render like `7/7/6%`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0.iter().map(|percent| percent.0).join("/"))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub const CATALOG: &str = r#"[
        {
            "plan_active": "Yes",
            "company_name": "Electra",
            "plan_description": "Nights",
            "plan_link": "https://example.com/nights",
            "days_of_week": [0, 1, 2, 3, 4, 5, 6],
            "applicable_hours": [23, 0, 1, 2, 3, 4, 5, 6],
            "discount": [20]
        },
        {
            "plan_active": true,
            "company_name": "Cellcom",
            "plan_description": "Always",
            "plan_link": "https://example.com/always",
            "days_of_week": [0, 1, 2, 3, 4, 5, 6],
            "applicable_hours": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23],
            "discount": [7, 7, 6]
        },
        {
            "plan_active": false,
            "company_name": "Bezeq",
            "plan_description": "Working days",
            "plan_link": "https://example.com/days",
            "days_of_week": [0, 1, 2, 3, 4],
            "applicable_hours": [7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
            "discount": [15]
        }
    ]"#;

    pub fn catalog() -> Vec<Plan> {
        serde_json::from_str(CATALOG).unwrap()
    }

    #[test]
    fn test_deserialize() {
        let plans = catalog();
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].activity, Activity::Label("Yes".to_string()));
        assert_eq!(plans[1].activity.to_string(), "Yes");
        assert_eq!(plans[2].activity.to_string(), "No");
        assert_eq!(plans[1].link.as_str(), "https://example.com/always");
        assert!(plans[1].days == enumset::EnumSet::all());
        assert!(plans[1].hours.is_full());
        assert_eq!(plans[2].days.len(), 5);
    }

    #[test]
    fn test_tier_fallback() {
        let discounts = Discounts::try_new(vec![Percent(10.0)]).unwrap();
        assert_eq!(discounts.tier(0), Percent(10.0));
        assert_eq!(discounts.tier(5), Percent(10.0));

        let discounts = Discounts::try_new(vec![Percent(7.0), Percent(7.0), Percent(6.0)]).unwrap();
        assert_eq!(discounts.tier(1), Percent(7.0));
        assert_eq!(discounts.tier(2), Percent(6.0));
        assert_eq!(discounts.tier(usize::MAX), Percent(6.0));
    }

    #[test]
    fn test_display_discounts() {
        assert_eq!(catalog()[1].discounts.to_string(), "7/7/6%");
    }

    #[test]
    fn test_bundled_catalog() {
        let plans: Vec<Plan> = serde_json::from_str(include_str!("../../data/plans.json")).unwrap();
        assert_eq!(plans.len(), 4);
        assert!(plans[0].hours.contains(0));
        assert_eq!(plans[3].discounts.tier(3), Percent(8.0));
    }

    #[test]
    fn test_empty_discounts_rejected() {
        let catalog = CATALOG.replacen("[20]", "[]", 1);
        assert!(serde_json::from_str::<Vec<Plan>>(&catalog).is_err());
    }
}
