//! Totals row, aggregate totals and the calculation result

use super::{CostedRow, ModelCosts, TOTAL_ROW_MARKER};
use crate::agreement::{BillingModel, LineItem};
use serde::Serialize;

/// Scalar totals used by reports and summaries
///
/// Each value is read from the totals row, so it always matches the column
/// sum shown in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregates {
    /// Sum of the active model's current-cost field
    pub current_cost: f64,
    /// Sum of prepaid co-termed costs (Prepaid only)
    pub prepaid_cost: f64,
    /// Sum of first-year co-termed costs (Annual only)
    pub first_year_cost: f64,
    pub updated_annual_cost: f64,
    pub subscription_term_fee: f64,
}

impl Aggregates {
    pub fn from_total_row(total: &CostedRow) -> Self {
        Self {
            current_cost: total.model_costs.current_cost(),
            prepaid_cost: total.model_costs.prepaid_cost(),
            first_year_cost: total.model_costs.first_year_cost(),
            updated_annual_cost: total.updated_annual_cost,
            subscription_term_fee: total.subscription_term_total_fee,
        }
    }
}

/// Build the totals row as the column sums of `rows`
///
/// `rows` must not contain a totals row and must all be costed under
/// `billing_model`; [`ResultSet::new`] is the only caller.
pub(crate) fn total_row(rows: &[CostedRow], billing_model: BillingModel) -> CostedRow {
    let mut total = CostedRow {
        item: LineItem::new(TOTAL_ROW_MARKER, 0, 0.0, 0),
        annual_total_fee: 0.0,
        updated_annual_cost: 0.0,
        subscription_term_total_fee: 0.0,
        model_costs: ModelCosts::zero(billing_model),
    };

    for row in rows {
        total.item.unit_quantity = total.item.unit_quantity.saturating_add(row.item.unit_quantity);
        total.item.additional_licenses = total
            .item
            .additional_licenses
            .saturating_add(row.item.additional_licenses);
        total.item.annual_unit_fee += row.item.annual_unit_fee;
        total.annual_total_fee += row.annual_total_fee;
        total.updated_annual_cost += row.updated_annual_cost;
        total.subscription_term_total_fee += row.subscription_term_total_fee;
        total.model_costs.accumulate(&row.model_costs);
    }

    total
}

/// Output of one calculation: costed rows, the totals row and aggregates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    billing_model: BillingModel,
    rows: Vec<CostedRow>,
    total: CostedRow,
    aggregates: Aggregates,
}

impl ResultSet {
    pub(crate) fn new(billing_model: BillingModel, rows: Vec<CostedRow>) -> Self {
        let total = total_row(&rows, billing_model);
        let aggregates = Aggregates::from_total_row(&total);
        Self {
            billing_model,
            rows,
            total,
            aggregates,
        }
    }

    pub fn billing_model(&self) -> BillingModel {
        self.billing_model
    }

    /// Costed line items, without the totals row
    pub fn rows(&self) -> &[CostedRow] {
        &self.rows
    }

    pub fn total_row(&self) -> &CostedRow {
        &self.total
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// Every row in table order, the totals row last
    pub fn table(&self) -> impl Iterator<Item = &CostedRow> + '_ {
        self.rows.iter().chain(std::iter::once(&self.total))
    }

    /// Input line items of the costed rows, e.g. for persisting
    pub fn line_items(&self) -> Vec<LineItem> {
        self.rows.iter().map(|r| r.item.clone()).collect()
    }

    /// Consume the result into one table with the totals row appended
    pub fn into_table(self) -> Vec<CostedRow> {
        let mut table = self.rows;
        table.push(self.total);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proration::{AnnualCosts, MonthlyCosts};
    use approx::assert_relative_eq;

    fn annual_row(desc: &str, qty: u32, fee: f64, add: u32, first_year: f64) -> CostedRow {
        let annual = qty as f64 * fee;
        let updated = (qty + add) as f64 * fee;
        CostedRow {
            item: LineItem::new(desc, qty, fee, add),
            annual_total_fee: annual,
            updated_annual_cost: updated,
            subscription_term_total_fee: updated * 2.5,
            model_costs: ModelCosts::Annual(AnnualCosts {
                current_annual_cost: annual,
                first_year_co_termed_cost: first_year,
                updated_annual_cost: updated,
            }),
        }
    }

    #[test]
    fn test_total_row_sums_columns() {
        let rows = vec![
            annual_row("Backup", 10, 120.0, 2, 120.0),
            annual_row("Email", 5, 60.0, 5, 150.0),
        ];
        let total = total_row(&rows, BillingModel::Annual);

        assert!(total.is_total());
        assert_eq!(total.item.unit_quantity, 15);
        assert_eq!(total.item.additional_licenses, 7);
        assert_relative_eq!(total.item.annual_unit_fee, 180.0);
        assert_relative_eq!(total.annual_total_fee, 1500.0);
        assert_relative_eq!(total.updated_annual_cost, 2040.0);
        assert_relative_eq!(total.subscription_term_total_fee, 5100.0);
        assert_relative_eq!(total.model_costs.first_year_cost(), 270.0);
    }

    #[test]
    fn test_empty_rows_give_zero_total() {
        let result = ResultSet::new(BillingModel::Monthly, Vec::new());
        let total = result.total_row();
        assert_eq!(total.item.unit_quantity, 0);
        assert_eq!(total.model_costs, ModelCosts::Monthly(MonthlyCosts::default()));
        assert_eq!(*result.aggregates(), Aggregates::default());
        assert_eq!(result.table().count(), 1);
    }

    #[test]
    fn test_table_puts_total_last() {
        let rows = vec![annual_row("Backup", 10, 120.0, 2, 120.0)];
        let result = ResultSet::new(BillingModel::Annual, rows);

        let table = result.clone().into_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].description(), "Backup");
        assert_eq!(table[1].description(), TOTAL_ROW_MARKER);
        assert_eq!(result.line_items(), vec![LineItem::new("Backup", 10, 120.0, 2)]);
    }

    #[test]
    fn test_result_total_uses_rows_billing_model() {
        let rows = vec![annual_row("Backup", 10, 120.0, 2, 120.0)];
        let result = ResultSet::new(BillingModel::Annual, rows);
        assert_eq!(result.total_row().model_costs.billing_model(), BillingModel::Annual);
        assert_eq!(result.aggregates().current_cost, 1200.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "billing model")]
    fn test_total_row_with_other_billing_model_panics() {
        let rows = vec![annual_row("Backup", 10, 120.0, 2, 120.0)];
        total_row(&rows, BillingModel::Prepaid);
    }

    #[test]
    fn test_aggregates_read_from_total_row() {
        let rows = vec![
            annual_row("Backup", 10, 120.0, 2, 120.0),
            annual_row("Email", 5, 60.0, 5, 150.0),
        ];
        let result = ResultSet::new(BillingModel::Annual, rows);
        let agg = result.aggregates();
        let total = result.total_row();

        assert_eq!(agg.current_cost, total.model_costs.current_cost());
        assert_eq!(agg.first_year_cost, total.model_costs.first_year_cost());
        assert_eq!(agg.updated_annual_cost, total.updated_annual_cost);
        assert_eq!(agg.subscription_term_fee, total.subscription_term_total_fee);
        assert_eq!(agg.prepaid_cost, 0.0);
    }
}
