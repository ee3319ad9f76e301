//! Core proration engine
//!
//! Costs every line item of an agreement under its billing model and builds
//! the totals row. The engine holds no state between calls, so distinct
//! agreements can be costed in parallel by the caller.

use super::costs::{AnnualCosts, CostedRow, ModelCosts, MonthlyCosts, PrepaidCosts};
use super::{round_near_whole, ResultSet, MONTHS_PER_YEAR, NEAR_WHOLE_THRESHOLD};
use crate::agreement::{AgreementContext, BillingModel, LineItem};
use crate::error::Result;
use log::{debug, warn};

/// Proration engine
#[derive(Debug, Clone, Copy)]
pub struct ProrationEngine {
    /// Distance from an integer below which amounts are snapped to it
    near_whole_threshold: f64,
}

impl Default for ProrationEngine {
    fn default() -> Self {
        Self {
            near_whole_threshold: NEAR_WHOLE_THRESHOLD,
        }
    }
}

impl ProrationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different near-whole rounding threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.near_whole_threshold = threshold;
        self
    }

    /// Cost every line item and append the totals row
    ///
    /// Items are expected to be validated already (see [`calculate`]). Rows
    /// carrying the totals marker are dropped first, so costing a previous
    /// result's table again gives the same answer.
    pub fn compute(&self, items: &[LineItem], ctx: &AgreementContext) -> ResultSet {
        let stale = items.iter().filter(|i| i.is_total_marker()).count();
        if stale > 0 {
            warn!("Discarding {} stale totals row(s) before costing", stale);
        }

        let rows: Vec<CostedRow> = items
            .iter()
            .filter(|i| !i.is_total_marker())
            .map(|item| self.cost_row(item, ctx))
            .collect();

        let result = ResultSet::new(ctx.billing_model(), rows);
        debug!(
            "Costed {} line items ({} billing, {:.2} months remaining): current={:.2} updated_annual={:.2} term_fee={:.2}",
            result.rows().len(),
            ctx.billing_model(),
            ctx.months_remaining(),
            result.aggregates().current_cost,
            result.aggregates().updated_annual_cost,
            result.aggregates().subscription_term_fee,
        );
        result
    }

    /// Cost a single line item
    pub fn cost_row(&self, item: &LineItem, ctx: &AgreementContext) -> CostedRow {
        let qty = f64::from(item.unit_quantity);
        let added = f64::from(item.additional_licenses);
        let fee = item.annual_unit_fee;

        let annual_total_fee = self.round(qty * fee);
        let updated_annual_cost = self.round((qty + added) * fee);
        let subscription_term_total_fee = self.round(
            (qty + added) * fee * ctx.total_term() / MONTHS_PER_YEAR,
        );

        let model_costs = match ctx.billing_model() {
            BillingModel::Monthly => ModelCosts::Monthly(MonthlyCosts {
                current_monthly_cost: self.round(qty * fee / MONTHS_PER_YEAR),
                monthly_co_termed_cost: self.round((qty + added) * fee / MONTHS_PER_YEAR),
                first_month_co_termed_cost: self.round(
                    added * fee / MONTHS_PER_YEAR * first_month_factor(ctx.months_remaining()),
                ),
            }),
            BillingModel::Annual => ModelCosts::Annual(AnnualCosts {
                current_annual_cost: annual_total_fee,
                first_year_co_termed_cost: self.round(
                    added * fee * months_to_anniversary(ctx.months_elapsed()) / MONTHS_PER_YEAR,
                ),
                updated_annual_cost,
            }),
            BillingModel::Prepaid => {
                let current_prepaid_cost = self.round(qty * fee);
                let prepaid_co_termed_cost = self.round(
                    added * fee * ctx.months_remaining() / ctx.agreement_term_months(),
                );
                ModelCosts::Prepaid(PrepaidCosts {
                    current_prepaid_cost,
                    prepaid_co_termed_cost,
                    remaining_subscription_total: self
                        .round(current_prepaid_cost + prepaid_co_termed_cost),
                })
            }
        };

        CostedRow {
            item: item.clone(),
            annual_total_fee,
            updated_annual_cost,
            subscription_term_total_fee,
            model_costs,
        }
    }

    fn round(&self, value: f64) -> f64 {
        round_near_whole(value, self.near_whole_threshold)
    }
}

/// Validate the line items, then cost them with the default engine
///
/// Errors name rows by their position in `items`; stale totals rows are
/// skipped rather than validated.
pub fn calculate(items: &[LineItem], ctx: &AgreementContext) -> Result<ResultSet> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_total_marker())
        .try_for_each(|(idx, item)| item.validate(idx))?;
    Ok(ProrationEngine::default().compute(items, ctx))
}

/// Share of a month billed for new seats in the first month
///
/// A co-term landing exactly on a month boundary still owes a full month.
fn first_month_factor(months_remaining: f64) -> f64 {
    let fraction = months_remaining - months_remaining.floor();
    if fraction == 0.0 {
        1.0
    } else {
        fraction
    }
}

/// Months left in the current annual period, in (0, 12]
fn months_to_anniversary(months_elapsed: f64) -> f64 {
    MONTHS_PER_YEAR - months_elapsed.rem_euclid(MONTHS_PER_YEAR)
}
