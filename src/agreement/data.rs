//! Line items, billing models and agreement timing parameters

use crate::error::{CotermError, Result};
use crate::proration::TOTAL_ROW_MARKER;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Billing model of the agreement; selects which proration formulas apply
///
/// Deserialization goes through [`FromStr`], so files accept the same
/// spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BillingModel {
    Monthly,
    Annual,
    Prepaid,
}

impl BillingModel {
    pub const ALL: [BillingModel; 3] = [BillingModel::Monthly, BillingModel::Annual, BillingModel::Prepaid];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingModel::Monthly => "Monthly",
            BillingModel::Annual => "Annual",
            BillingModel::Prepaid => "Prepaid",
        }
    }
}

impl fmt::Display for BillingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingModel {
    type Err = CotermError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingModel::Monthly),
            "annual" => Ok(BillingModel::Annual),
            "prepaid" | "pre-paid" => Ok(BillingModel::Prepaid),
            other => Err(CotermError::invalid(
                "billing_model",
                format!("unrecognized billing model '{}', expected Monthly, Annual or Prepaid", other),
            )),
        }
    }
}

impl TryFrom<String> for BillingModel {
    type Error = CotermError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// One licensed service on the agreement
///
/// Only the four input fields live here. Computed costs are carried by
/// [`crate::proration::CostedRow`] and never written back into a `LineItem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Service label shown on the report
    pub description: String,
    /// Seats currently licensed
    pub unit_quantity: u32,
    /// Annual list price per seat
    pub annual_unit_fee: f64,
    /// Seats being added at co-term time
    pub additional_licenses: u32,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        unit_quantity: u32,
        annual_unit_fee: f64,
        additional_licenses: u32,
    ) -> Self {
        Self {
            description: description.into(),
            unit_quantity,
            annual_unit_fee,
            additional_licenses,
        }
    }

    /// True when this row is a totals row left over from an earlier calculation
    pub fn is_total_marker(&self) -> bool {
        self.description == TOTAL_ROW_MARKER
    }

    /// Check the row's fields, naming the offending field by its position in the list
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(CotermError::invalid(
                format!("line_items[{}].description", index),
                "must not be empty",
            ));
        }
        check_non_negative(
            &format!("line_items[{}].annual_unit_fee", index),
            self.annual_unit_fee,
        )
    }
}

/// Validate every line item, stopping at the first bad row
pub fn validate_line_items(items: &[LineItem]) -> Result<()> {
    items
        .iter()
        .enumerate()
        .try_for_each(|(idx, item)| item.validate(idx))
}

/// Line item as stored on disk or typed into an agreement file
///
/// Quantities are signed here so that a negative value is reported as
/// invalid input for its field instead of as a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRecord {
    #[serde(rename = "Cloud Service Description", alias = "description", default)]
    pub description: String,

    #[serde(rename = "Unit Quantity", alias = "unit_quantity", default)]
    pub unit_quantity: i64,

    #[serde(rename = "Annual Unit Fee", alias = "annual_unit_fee", default)]
    pub annual_unit_fee: f64,

    #[serde(rename = "Additional Licenses", alias = "additional_licenses", default)]
    pub additional_licenses: i64,
}

impl LineItemRecord {
    /// Convert to a validated [`LineItem`]; `index` is used in error messages
    pub fn into_line_item(self, index: usize) -> Result<LineItem> {
        let unit_quantity = to_count(&format!("line_items[{}].unit_quantity", index), self.unit_quantity)?;
        let additional_licenses = to_count(
            &format!("line_items[{}].additional_licenses", index),
            self.additional_licenses,
        )?;
        let item = LineItem {
            description: self.description.trim().to_string(),
            unit_quantity,
            annual_unit_fee: self.annual_unit_fee,
            additional_licenses,
        };
        item.validate(index)?;
        Ok(item)
    }
}

impl From<&LineItem> for LineItemRecord {
    fn from(item: &LineItem) -> Self {
        Self {
            description: item.description.clone(),
            unit_quantity: i64::from(item.unit_quantity),
            annual_unit_fee: item.annual_unit_fee,
            additional_licenses: i64::from(item.additional_licenses),
        }
    }
}

fn to_count(field: &str, value: i64) -> Result<u32> {
    if value < 0 {
        return Err(CotermError::invalid(field, format!("must be non-negative, got {}", value)));
    }
    u32::try_from(value).map_err(|_| CotermError::invalid(field, format!("{} is too large", value)))
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CotermError::invalid(field, format!("must be a finite number, got {}", value)));
    }
    if value < 0.0 {
        return Err(CotermError::invalid(field, format!("must be non-negative, got {}", value)));
    }
    Ok(())
}

/// Agreement timing parameters as supplied by a caller or an agreement file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementParams {
    /// Full original term length in months
    #[serde(default = "default_agreement_term")]
    pub agreement_term_months: f64,

    /// Months left before the original renewal date
    #[serde(default = "default_months_remaining")]
    pub months_remaining: f64,

    /// Months added to the remaining term when the agreement is extended
    #[serde(default)]
    pub extension_months: f64,

    /// Billing model name, parsed when the context is built so a bad
    /// value is reported against `billing_model`
    #[serde(default = "default_billing_model")]
    pub billing_model: String,
}

fn default_agreement_term() -> f64 { 36.0 }
fn default_months_remaining() -> f64 { 30.0 }
fn default_billing_model() -> String { BillingModel::Annual.to_string() }

impl Default for AgreementParams {
    fn default() -> Self {
        Self {
            agreement_term_months: 36.0,
            months_remaining: 30.0,
            extension_months: 0.0,
            billing_model: default_billing_model(),
        }
    }
}

/// Validated agreement timing parameters, constant for one calculation
///
/// Fields are private so a context can only exist once its ranges have been
/// checked; the proration engine relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AgreementParams")]
pub struct AgreementContext {
    agreement_term_months: f64,
    months_remaining: f64,
    extension_months: f64,
    billing_model: BillingModel,
}

impl AgreementContext {
    pub fn new(
        agreement_term_months: f64,
        months_remaining: f64,
        extension_months: f64,
        billing_model: BillingModel,
    ) -> Result<Self> {
        if !agreement_term_months.is_finite() || agreement_term_months <= 0.0 {
            return Err(CotermError::invalid(
                "agreement_term_months",
                format!("must be greater than zero, got {}", agreement_term_months),
            ));
        }
        check_non_negative("months_remaining", months_remaining)?;
        if months_remaining > agreement_term_months {
            return Err(CotermError::invalid(
                "months_remaining",
                format!(
                    "{} exceeds the agreement term of {} months",
                    months_remaining, agreement_term_months
                ),
            ));
        }
        check_non_negative("extension_months", extension_months)?;

        Ok(Self {
            agreement_term_months,
            months_remaining,
            extension_months,
            billing_model,
        })
    }

    pub fn agreement_term_months(&self) -> f64 {
        self.agreement_term_months
    }

    pub fn months_remaining(&self) -> f64 {
        self.months_remaining
    }

    pub fn extension_months(&self) -> f64 {
        self.extension_months
    }

    pub fn billing_model(&self) -> BillingModel {
        self.billing_model
    }

    /// Months already served on the original term
    pub fn months_elapsed(&self) -> f64 {
        self.agreement_term_months - self.months_remaining
    }

    /// Remaining months plus any extension
    pub fn total_term(&self) -> f64 {
        self.months_remaining + self.extension_months
    }

    /// Same timing, different billing model
    pub fn with_billing_model(self, billing_model: BillingModel) -> Self {
        Self { billing_model, ..self }
    }
}

impl TryFrom<AgreementParams> for AgreementContext {
    type Error = CotermError;

    fn try_from(params: AgreementParams) -> Result<Self> {
        Self::new(
            params.agreement_term_months,
            params.months_remaining,
            params.extension_months,
            params.billing_model.parse()?,
        )
    }
}

impl From<AgreementContext> for AgreementParams {
    fn from(ctx: AgreementContext) -> Self {
        Self {
            agreement_term_months: ctx.agreement_term_months,
            months_remaining: ctx.months_remaining,
            extension_months: ctx.extension_months,
            billing_model: ctx.billing_model.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_billing_model_parse() {
        assert_eq!("Monthly".parse::<BillingModel>().unwrap(), BillingModel::Monthly);
        assert_eq!(" annual ".parse::<BillingModel>().unwrap(), BillingModel::Annual);
        assert_eq!("PREPAID".parse::<BillingModel>().unwrap(), BillingModel::Prepaid);

        let err = "Quarterly".parse::<BillingModel>().unwrap_err();
        match err {
            CotermError::InvalidInput { field, .. } => assert_eq!(field, "billing_model"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_billing_model_deserialize_uses_from_str() {
        let model: BillingModel = serde_json::from_str(r#""pre-paid""#).unwrap();
        assert_eq!(model, BillingModel::Prepaid);
        assert!(serde_json::from_str::<BillingModel>(r#""Quarterly""#).is_err());
    }

    #[test]
    fn test_params_with_unknown_billing_model() {
        let params = AgreementParams {
            billing_model: "Quarterly".to_string(),
            ..Default::default()
        };
        match AgreementContext::try_from(params).unwrap_err() {
            CotermError::InvalidInput { field, .. } => assert_eq!(field, "billing_model"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_context_derived_terms() {
        let ctx = AgreementContext::new(36.0, 30.0, 6.0, BillingModel::Annual).unwrap();
        assert_relative_eq!(ctx.months_elapsed(), 6.0);
        assert_relative_eq!(ctx.total_term(), 36.0);
    }

    #[test]
    fn test_context_rejects_out_of_range() {
        let zero_term = AgreementContext::new(0.0, 0.0, 0.0, BillingModel::Prepaid).unwrap_err();
        assert!(zero_term.to_string().contains("agreement_term_months"));

        let too_long = AgreementContext::new(12.0, 12.5, 0.0, BillingModel::Monthly).unwrap_err();
        assert!(too_long.to_string().contains("months_remaining"));

        let negative = AgreementContext::new(12.0, -1.0, 0.0, BillingModel::Monthly).unwrap_err();
        assert!(negative.to_string().contains("months_remaining"));

        let ext = AgreementContext::new(12.0, 6.0, -3.0, BillingModel::Monthly).unwrap_err();
        assert!(ext.to_string().contains("extension_months"));
    }

    #[test]
    fn test_context_boundaries_accepted() {
        assert!(AgreementContext::new(36.0, 0.0, 0.0, BillingModel::Annual).is_ok());
        assert!(AgreementContext::new(36.0, 36.0, 0.0, BillingModel::Annual).is_ok());
    }

    #[test]
    fn test_context_deserialize_validates() {
        let ok: AgreementContext = serde_json::from_str(
            r#"{"agreement_term_months": 24, "months_remaining": 10.5, "billing_model": "Monthly"}"#,
        )
        .unwrap();
        assert_relative_eq!(ok.extension_months(), 0.0);
        assert_eq!(ok.billing_model(), BillingModel::Monthly);

        let bad = serde_json::from_str::<AgreementContext>(
            r#"{"agreement_term_months": 24, "months_remaining": 30}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_record_rejects_negative_counts() {
        let record = LineItemRecord {
            description: "Storage".to_string(),
            unit_quantity: -2,
            annual_unit_fee: 10.0,
            additional_licenses: 1,
        };
        let err = record.into_line_item(3).unwrap_err();
        match err {
            CotermError::InvalidInput { field, .. } => assert_eq!(field, "line_items[3].unit_quantity"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_line_items() {
        let items = vec![
            LineItem::new("Compute", 5, 100.0, 1),
            LineItem::new("   ", 5, 100.0, 1),
        ];
        let err = validate_line_items(&items).unwrap_err();
        assert!(err.to_string().contains("line_items[1].description"));

        let fee = vec![LineItem::new("Compute", 5, -0.01, 0)];
        assert!(validate_line_items(&fee).unwrap_err().to_string().contains("annual_unit_fee"));

        let nan = vec![LineItem::new("Compute", 5, f64::NAN, 0)];
        assert!(validate_line_items(&nan).is_err());

        assert!(validate_line_items(&[]).is_ok());
    }
}
