/// Lazily compiled, process-wide `Regex` for a literal pattern.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// One tier of a rounding table.
///
/// ```ignore
/// tier!(Below(5.0) => ToZero, "Round to 0 mg (< 5 mg)")
/// tier!(Within(5.0, 140.0) => NearestMultiple(5.0), "Round to nearest 5 mg (5-140 mg)")
/// ```
#[macro_export]
macro_rules! tier {
    ($cond:ident $( ( $($bound:expr),* ) )? => $action:ident $( ( $step:expr ) )?, $desc:literal) => {
        $crate::rules::rounding::RoundingRule {
            condition: $crate::rules::rounding::Condition::$cond $( ( $($bound),* ) )?,
            action: $crate::rules::rounding::Rounding::$action $( ( $step ) )?,
            description: $desc,
        }
    };
}
