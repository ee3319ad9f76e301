//! Proration engine for co-terming cost calculations

mod rounding;
mod costs;
mod totals;
mod engine;

pub use rounding::{round_cents, round_near_whole};
pub use costs::{AnnualCosts, CostedRow, ModelCosts, MonthlyCosts, PrepaidCosts};
pub use totals::{Aggregates, ResultSet};
pub use engine::{calculate, ProrationEngine};

// ============================================================================
// Calculation constants
// ============================================================================
// - Annual fees are spread evenly over twelve months
// - Computed amounts within the near-whole threshold of an integer are snapped
//   to it, everything else is kept to cents

/// Description carried by the synthetic totals row
pub const TOTAL_ROW_MARKER: &str = "Total Licensing Cost";

/// Distance from an integer below which a computed amount is snapped to it
pub const NEAR_WHOLE_THRESHOLD: f64 = 0.25;

pub const MONTHS_PER_YEAR: f64 = 12.0;
