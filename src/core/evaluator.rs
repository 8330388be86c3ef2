use bon::Builder;

use crate::{
    core::{aggregate::WeeklyAggregate, plan::Plan},
    prelude::*,
    quantity::{energy::KilowattHours, percent::Percent},
};

/// Plan together with the consumption it would have discounted.
#[must_use]
#[derive(Clone, Debug)]
pub struct EvaluatedPlan<'a> {
    pub plan: &'a Plan,

    /// Applied discount tier.
    pub discount: Percent,

    /// Discount expressed in free kilowatt-hours.
    pub kwh_free: KilowattHours,
}

#[derive(Builder)]
pub struct Evaluator<'a> {
    weekly: &'a WeeklyAggregate,
    plans: &'a [Plan],

    /// Years since signing up.
    #[builder(default)]
    discount_year: usize,
}

impl<'a> Evaluator<'a> {
    /// Evaluate every plan in catalog order.
    #[instrument(skip_all, fields(discount_year = self.discount_year))]
    pub fn evaluate(&self) -> Vec<EvaluatedPlan<'a>> {
        let evaluated = self.plans.iter().map(|plan| self.evaluate_plan(plan)).collect::<Vec<_>>();
        debug!(n_plans = evaluated.len(), "evaluated");
        evaluated
    }

    fn evaluate_plan(&self, plan: &'a Plan) -> EvaluatedPlan<'a> {
        let discount = plan.discounts.tier(self.discount_year);
        let kwh_free = self
            .weekly
            .iter()
            .filter(|(day, _)| plan.days.contains(*day))
            .flat_map(|(_, hourly)| hourly.iter())
            .filter(|(hour, _)| plan.hours.contains(*hour))
            .map(|(_, consumption)| consumption * discount)
            .sum();
        EvaluatedPlan { plan, discount, kwh_free }
    }
}
