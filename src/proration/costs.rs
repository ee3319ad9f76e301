//! Computed cost records
//!
//! Shared fields live directly on [`CostedRow`]. Fields that only make sense
//! for one billing model are carried by [`ModelCosts`], so a Monthly result
//! has no first-year or prepaid figures at all rather than zeros.

use crate::agreement::{BillingModel, LineItem};
use serde::Serialize;

/// Monthly billing figures for one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyCosts {
    /// Monthly charge at the current seat count
    pub current_monthly_cost: f64,
    /// Monthly charge once the additional seats are added
    pub monthly_co_termed_cost: f64,
    /// Prorated charge for the additional seats in the partial first month
    pub first_month_co_termed_cost: f64,
}

/// Annual billing figures for one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnnualCosts {
    pub current_annual_cost: f64,
    /// Additional seats prorated to the next annual anniversary
    pub first_year_co_termed_cost: f64,
    pub updated_annual_cost: f64,
}

/// Prepaid billing figures for one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PrepaidCosts {
    /// Prepaid value of the existing seats for one nominal year
    pub current_prepaid_cost: f64,
    /// Additional seats prorated over the original agreement term
    pub prepaid_co_termed_cost: f64,
    pub remaining_subscription_total: f64,
}

impl MonthlyCosts {
    fn accumulate(&mut self, other: &Self) {
        self.current_monthly_cost += other.current_monthly_cost;
        self.monthly_co_termed_cost += other.monthly_co_termed_cost;
        self.first_month_co_termed_cost += other.first_month_co_termed_cost;
    }
}

impl AnnualCosts {
    fn accumulate(&mut self, other: &Self) {
        self.current_annual_cost += other.current_annual_cost;
        self.first_year_co_termed_cost += other.first_year_co_termed_cost;
        self.updated_annual_cost += other.updated_annual_cost;
    }
}

impl PrepaidCosts {
    fn accumulate(&mut self, other: &Self) {
        self.current_prepaid_cost += other.current_prepaid_cost;
        self.prepaid_co_termed_cost += other.prepaid_co_termed_cost;
        self.remaining_subscription_total += other.remaining_subscription_total;
    }
}

/// Figures for the active billing model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "billing_model")]
pub enum ModelCosts {
    Monthly(MonthlyCosts),
    Annual(AnnualCosts),
    Prepaid(PrepaidCosts),
}

impl ModelCosts {
    /// All-zero figures for `model`
    pub fn zero(model: BillingModel) -> Self {
        match model {
            BillingModel::Monthly => ModelCosts::Monthly(MonthlyCosts::default()),
            BillingModel::Annual => ModelCosts::Annual(AnnualCosts::default()),
            BillingModel::Prepaid => ModelCosts::Prepaid(PrepaidCosts::default()),
        }
    }

    pub fn billing_model(&self) -> BillingModel {
        match self {
            ModelCosts::Monthly(_) => BillingModel::Monthly,
            ModelCosts::Annual(_) => BillingModel::Annual,
            ModelCosts::Prepaid(_) => BillingModel::Prepaid,
        }
    }

    /// Current-cost figure of the active model (monthly, annual or prepaid)
    pub fn current_cost(&self) -> f64 {
        match self {
            ModelCosts::Monthly(m) => m.current_monthly_cost,
            ModelCosts::Annual(a) => a.current_annual_cost,
            ModelCosts::Prepaid(p) => p.current_prepaid_cost,
        }
    }

    /// First-year co-termed cost; zero outside Annual billing
    pub fn first_year_cost(&self) -> f64 {
        match self {
            ModelCosts::Annual(a) => a.first_year_co_termed_cost,
            _ => 0.0,
        }
    }

    /// Prepaid co-termed cost; zero outside Prepaid billing
    pub fn prepaid_cost(&self) -> f64 {
        match self {
            ModelCosts::Prepaid(p) => p.prepaid_co_termed_cost,
            _ => 0.0,
        }
    }

    pub fn monthly(&self) -> Option<&MonthlyCosts> {
        match self {
            ModelCosts::Monthly(m) => Some(m),
            _ => None,
        }
    }

    pub fn annual(&self) -> Option<&AnnualCosts> {
        match self {
            ModelCosts::Annual(a) => Some(a),
            _ => None,
        }
    }

    pub fn prepaid(&self) -> Option<&PrepaidCosts> {
        match self {
            ModelCosts::Prepaid(p) => Some(p),
            _ => None,
        }
    }

    /// Add `other` field by field
    ///
    /// Rows of one result always share a billing model; mixing models is a
    /// bug in the caller and trips a debug assertion.
    pub(crate) fn accumulate(&mut self, other: &ModelCosts) {
        let total_model = self.billing_model();
        match (self, other) {
            (ModelCosts::Monthly(a), ModelCosts::Monthly(b)) => a.accumulate(b),
            (ModelCosts::Annual(a), ModelCosts::Annual(b)) => a.accumulate(b),
            (ModelCosts::Prepaid(a), ModelCosts::Prepaid(b)) => a.accumulate(b),
            _ => debug_assert!(
                false,
                "cannot add {} billing model figures to a {} total",
                other.billing_model(),
                total_model
            ),
        }
    }
}

/// A line item together with every figure computed for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostedRow {
    #[serde(flatten)]
    pub item: LineItem,

    /// Annual cost at the current seat count
    pub annual_total_fee: f64,

    /// Annual cost once the additional seats are added
    pub updated_annual_cost: f64,

    /// Fee for all seats over the remaining (possibly extended) term
    pub subscription_term_total_fee: f64,

    pub model_costs: ModelCosts,
}

impl CostedRow {
    pub fn description(&self) -> &str {
        &self.item.description
    }

    pub fn is_total(&self) -> bool {
        self.item.is_total_marker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_specific_accessors() {
        let annual = ModelCosts::Annual(AnnualCosts {
            current_annual_cost: 1200.0,
            first_year_co_termed_cost: 120.0,
            updated_annual_cost: 1440.0,
        });
        assert_eq!(annual.billing_model(), BillingModel::Annual);
        assert_eq!(annual.current_cost(), 1200.0);
        assert_eq!(annual.first_year_cost(), 120.0);
        assert_eq!(annual.prepaid_cost(), 0.0);
        assert!(annual.monthly().is_none());
        assert!(annual.prepaid().is_none());
    }

    #[test]
    fn test_accumulate_same_model() {
        let mut sum = ModelCosts::zero(BillingModel::Prepaid);
        let row = ModelCosts::Prepaid(PrepaidCosts {
            current_prepaid_cost: 1200.0,
            prepaid_co_termed_cost: 200.0,
            remaining_subscription_total: 1400.0,
        });
        sum.accumulate(&row);
        sum.accumulate(&row);
        assert_eq!(sum.prepaid().map(|p| p.remaining_subscription_total), Some(2800.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cannot add Annual billing model figures to a Monthly total")]
    fn test_accumulate_rejects_other_model() {
        let mut sum = ModelCosts::zero(BillingModel::Monthly);
        sum.accumulate(&ModelCosts::Annual(AnnualCosts {
            current_annual_cost: 1.0,
            first_year_co_termed_cost: 1.0,
            updated_annual_cost: 1.0,
        }));
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let costs = ModelCosts::Monthly(MonthlyCosts {
            current_monthly_cost: 100.0,
            monthly_co_termed_cost: 120.0,
            first_month_co_termed_cost: 5.0,
        });
        let json = serde_json::to_value(costs).unwrap();
        assert_eq!(json["billing_model"], "Monthly");
        assert_eq!(json["first_month_co_termed_cost"], 5.0);
        assert!(json.get("first_year_co_termed_cost").is_none());
    }
}
