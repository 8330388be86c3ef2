use std::ops::Mul;

use crate::quantity::percent::Percent;

quantity!(KilowattHours, "kWh");

impl Mul<Percent> for KilowattHours {
    type Output = Self;

    fn mul(self, percent: Percent) -> Self::Output {
        self * percent.to_proportion()
    }
}
