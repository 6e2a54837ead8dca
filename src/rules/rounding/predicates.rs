/// Numeric predicate selecting one tier of a rounding table.
///
/// Bounds are written the way the regulation states them; whether a bound is
/// inclusive is part of the variant, so two adjacent tiers never both claim
/// the same boundary value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// `v < bound`
    Below(f64),
    /// `lo <= v <= hi`
    Within(f64, f64),
    /// `lo <= v < hi`
    From(f64, f64),
    /// `v >= bound`
    AtLeast(f64),
    /// `v > bound`
    Above(f64),
    /// `v == 0`
    Zero,
    /// `v != 0`
    NonZero,
    /// Always true.
    Any,
}

impl Condition {
    /// Returns true when `v` falls in this tier.
    pub fn matches(self, v: f64) -> bool {
        match self {
            Condition::Below(bound) => v < bound,
            Condition::Within(lo, hi) => v >= lo && v <= hi,
            Condition::From(lo, hi) => v >= lo && v < hi,
            Condition::AtLeast(bound) => v >= bound,
            Condition::Above(bound) => v > bound,
            Condition::Zero => v == 0.0,
            Condition::NonZero => v != 0.0,
            Condition::Any => true,
        }
    }
}
