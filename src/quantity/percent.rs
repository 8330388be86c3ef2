quantity!(Percent, "%");

impl Percent {
    pub const fn to_proportion(self) -> f64 {
        0.01 * self.0
    }
}
