//! Rounding applied to every computed amount
//!
//! Division by twelve regularly leaves amounts like `99.999999` that are
//! whole dollars in the agreement. Rounding happens when a field is computed,
//! so totals are sums of already-rounded values.

/// Round to two decimal places
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Snap `value` to the nearest integer when it is strictly closer than
/// `threshold`, otherwise round it to cents
pub fn round_near_whole(value: f64, threshold: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() < threshold {
        nearest
    } else {
        round_cents(value)
    }
}
