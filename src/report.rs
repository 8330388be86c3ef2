use serde::Serialize;

use crate::core::{
    aggregate::HourlyAggregate,
    export::{HeaderInfo, UsageSummary},
    filter::Filters,
    ranking::RankedPlan,
};

/// Everything the presentation needs after processing an export.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub header: HeaderInfo,

    /// Unfiltered.
    pub summary: UsageSummary,

    pub filters: Filters,

    /// Filtered consumption by hour.
    pub hourly: HourlyAggregate,

    pub ranking: Ranking,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Ranking {
    Ready { plans: Vec<RankedPlan> },

    /// The catalog could not be loaded.
    Unavailable { reason: String },
}
