//! Report rendering for a computed result
//!
//! Only formatting happens here; every figure comes from the
//! [`ResultSet`](crate::proration::ResultSet) as computed.

mod columns;
mod text;

pub use columns::{visible_columns, Column};
pub use text::{format_money, render_text, write_csv, ReportHeader};
