//! Table columns and which ones each billing model shows

use crate::agreement::BillingModel;
use crate::proration::CostedRow;

/// A column of the line item table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Description,
    UnitQuantity,
    AnnualUnitFee,
    AdditionalLicenses,
    CurrentMonthlyCost,
    MonthlyCoTermedCost,
    FirstMonthCoTermedCost,
    CurrentAnnualCost,
    FirstYearCoTermedCost,
    UpdatedAnnualCost,
    CurrentPrepaidCost,
    PrepaidCoTermedCost,
    RemainingSubscriptionTotal,
    SubscriptionTermTotalFee,
}

const MONTHLY_COLUMNS: &[Column] = &[
    Column::Description,
    Column::UnitQuantity,
    Column::AnnualUnitFee,
    Column::AdditionalLicenses,
    Column::CurrentMonthlyCost,
    Column::MonthlyCoTermedCost,
    Column::FirstMonthCoTermedCost,
    Column::SubscriptionTermTotalFee,
];

const ANNUAL_COLUMNS: &[Column] = &[
    Column::Description,
    Column::UnitQuantity,
    Column::AnnualUnitFee,
    Column::AdditionalLicenses,
    Column::CurrentAnnualCost,
    Column::FirstYearCoTermedCost,
    Column::UpdatedAnnualCost,
    Column::SubscriptionTermTotalFee,
];

const PREPAID_COLUMNS: &[Column] = &[
    Column::Description,
    Column::UnitQuantity,
    Column::AnnualUnitFee,
    Column::AdditionalLicenses,
    Column::CurrentPrepaidCost,
    Column::PrepaidCoTermedCost,
    Column::RemainingSubscriptionTotal,
    Column::SubscriptionTermTotalFee,
];

/// Columns shown for `model`; other models' columns are left out entirely
pub fn visible_columns(model: BillingModel) -> &'static [Column] {
    match model {
        BillingModel::Monthly => MONTHLY_COLUMNS,
        BillingModel::Annual => ANNUAL_COLUMNS,
        BillingModel::Prepaid => PREPAID_COLUMNS,
    }
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Description => "Cloud Service Description",
            Column::UnitQuantity => "Unit Quantity",
            Column::AnnualUnitFee => "Annual Unit Fee",
            Column::AdditionalLicenses => "Additional Licenses",
            Column::CurrentMonthlyCost => "Current Monthly Cost",
            Column::MonthlyCoTermedCost => "Monthly Co-Termed Cost",
            Column::FirstMonthCoTermedCost => "First Month Co-Termed Cost",
            Column::CurrentAnnualCost => "Current Annual Cost",
            Column::FirstYearCoTermedCost => "First Year Co-Termed Cost",
            Column::UpdatedAnnualCost => "Updated Annual Cost",
            Column::CurrentPrepaidCost => "Current Prepaid Cost",
            Column::PrepaidCoTermedCost => "Prepaid Co-Termed Cost",
            Column::RemainingSubscriptionTotal => "Remaining Subscription Total",
            Column::SubscriptionTermTotalFee => "Subscription Term Total Service Fee",
        }
    }

    /// Whether the column holds a dollar amount
    pub fn is_money(&self) -> bool {
        !matches!(
            self,
            Column::Description | Column::UnitQuantity | Column::AdditionalLicenses
        )
    }

    /// Numeric value of the column for `row`
    ///
    /// `None` for the description column and for a column that belongs to a
    /// billing model other than the row's.
    pub fn amount(&self, row: &CostedRow) -> Option<f64> {
        let costs = &row.model_costs;
        match self {
            Column::Description => None,
            Column::UnitQuantity => Some(f64::from(row.item.unit_quantity)),
            Column::AnnualUnitFee => Some(row.item.annual_unit_fee),
            Column::AdditionalLicenses => Some(f64::from(row.item.additional_licenses)),
            Column::CurrentMonthlyCost => costs.monthly().map(|m| m.current_monthly_cost),
            Column::MonthlyCoTermedCost => costs.monthly().map(|m| m.monthly_co_termed_cost),
            Column::FirstMonthCoTermedCost => costs.monthly().map(|m| m.first_month_co_termed_cost),
            Column::CurrentAnnualCost => costs.annual().map(|a| a.current_annual_cost),
            Column::FirstYearCoTermedCost => costs.annual().map(|a| a.first_year_co_termed_cost),
            Column::UpdatedAnnualCost => Some(row.updated_annual_cost),
            Column::CurrentPrepaidCost => costs.prepaid().map(|p| p.current_prepaid_cost),
            Column::PrepaidCoTermedCost => costs.prepaid().map(|p| p.prepaid_co_termed_cost),
            Column::RemainingSubscriptionTotal => costs.prepaid().map(|p| p.remaining_subscription_total),
            Column::SubscriptionTermTotalFee => Some(row.subscription_term_total_fee),
        }
    }
}
