//! Co-terming cost calculator - prorated license costs for in-flight subscription agreements
//!
//! This library provides:
//! - Line item and agreement timing data structures with input validation
//! - The proration engine for Monthly, Annual and Prepaid billing models
//! - Per-customer persistence of line items as CSV
//! - Report rendering (text summary, CSV table) for the computed result

pub mod error;
pub mod agreement;
pub mod proration;
pub mod report;

// Re-export commonly used types
pub use error::{CotermError, Result};
pub use agreement::{AgreementContext, BillingModel, LineItem};
pub use proration::{calculate, ProrationEngine, ResultSet, TOTAL_ROW_MARKER};
