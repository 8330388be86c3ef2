use std::cmp::Reverse;

use serde::Serialize;

use crate::{
    core::{evaluator::EvaluatedPlan, weekday},
    quantity::{energy::KilowattHours, percent::Percent},
};

/// Evaluated plan prepared for display.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedPlan {
    /// 1-based position, the best plan is the first.
    pub rank: usize,

    pub active: String,
    pub company_name: String,
    pub description: String,
    pub link: String,
    pub days: String,
    pub hours: String,

    /// All discount tiers, like `7/7/6%`.
    pub discounts: String,

    /// Applied discount tier.
    pub discount: Percent,

    pub kwh_free: KilowattHours,
}

impl RankedPlan {
    fn new(rank: usize, evaluated: &EvaluatedPlan<'_>) -> Self {
        let plan = evaluated.plan;
        Self {
            rank,
            active: plan.activity.to_string(),
            company_name: plan.company_name.clone(),
            description: plan.description.clone(),
            link: plan.link.to_string(),
            days: weekday::describe(plan.days),
            hours: plan.hours.describe(),
            discounts: plan.discounts.to_string(),
            discount: evaluated.discount,
            kwh_free: evaluated.kwh_free,
        }
    }
}

/// Order the plans by the discounted consumption, best first.
///
/// Plans with equal discounts keep their catalog order.
pub fn rank(mut evaluated: Vec<EvaluatedPlan<'_>>) -> Vec<RankedPlan> {
    evaluated.sort_by_key(|evaluated| Reverse(evaluated.kwh_free));
    evaluated
        .iter()
        .enumerate()
        .map(|(index, evaluated)| RankedPlan::new(index + 1, evaluated))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan::{Plan, tests::catalog};

    fn evaluated(plans: &[Plan], kwh_free: [f64; 3]) -> Vec<EvaluatedPlan<'_>> {
        plans
            .iter()
            .zip(kwh_free)
            .map(|(plan, kwh_free)| EvaluatedPlan {
                plan,
                discount: plan.discounts.tier(0),
                kwh_free: KilowattHours(kwh_free),
            })
            .collect()
    }

    #[test]
    fn test_best_first() {
        let plans = catalog();
        let ranked = rank(evaluated(&plans, [1.0, 3.0, 2.0]));
        assert_eq!(
            ranked.iter().map(|plan| plan.description.as_str()).collect::<Vec<_>>(),
            ["Always", "Working days", "Nights"],
        );
        assert_eq!(ranked.iter().map(|plan| plan.rank).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let plans = catalog();
        let ranked = rank(evaluated(&plans, [2.0, 1.0, 2.0]));
        assert_eq!(
            ranked.iter().map(|plan| plan.company_name.as_str()).collect::<Vec<_>>(),
            ["Electra", "Bezeq", "Cellcom"],
        );

        let ranked = rank(evaluated(&plans, [0.0, 0.0, 0.0]));
        assert_eq!(
            ranked.iter().map(|plan| plan.company_name.as_str()).collect::<Vec<_>>(),
            ["Electra", "Cellcom", "Bezeq"],
        );
    }

    #[test]
    fn test_descriptors() {
        let plans = catalog();
        let ranked = rank(evaluated(&plans, [3.0, 2.0, 1.0]));
        assert_eq!(ranked[0].days, "All");
        assert_eq!(ranked[0].hours, "23:00–07:00");
        assert_eq!(ranked[0].active, "Yes");
        assert_eq!(ranked[1].hours, "All");
        assert_eq!(ranked[1].discounts, "7/7/6%");
        assert_eq!(ranked[2].days, "Sun, Mon, Tue, Wed, Thu");
        assert_eq!(ranked[2].hours, "07:00–17:00");
        assert_eq!(ranked[2].active, "No");
    }
}
