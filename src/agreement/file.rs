//! JSON agreement files
//!
//! An agreement file bundles the customer name, the timing parameters and the
//! line items for one calculation:
//!
//! ```json
//! {
//!   "customer_name": "Acme",
//!   "agreement": { "agreement_term_months": 36, "months_remaining": 30, "billing_model": "Annual" },
//!   "line_items": [
//!     { "description": "Cloud Backup", "unit_quantity": 10, "annual_unit_fee": 120.0, "additional_licenses": 2 }
//!   ]
//! }
//! ```
//!
//! Missing agreement fields fall back to [`AgreementParams::default`].

use super::{AgreementContext, AgreementParams, LineItem, LineItemRecord};
use crate::error::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgreementFile {
    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub agreement: AgreementParams,

    #[serde(default)]
    pub line_items: Vec<LineItemRecord>,
}

impl AgreementFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let parsed = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded agreement file {} ({} line items)",
            path.display(),
            parsed.line_items.len()
        );
        Ok(parsed)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validated timing parameters
    pub fn context(&self) -> Result<AgreementContext> {
        AgreementContext::try_from(self.agreement.clone())
    }

    /// Validated line items, with any stale totals row dropped
    pub fn line_items(&self) -> Result<Vec<LineItem>> {
        self.line_items
            .iter()
            .filter(|r| r.description.trim() != crate::proration::TOTAL_ROW_MARKER)
            .cloned()
            .enumerate()
            .map(|(idx, record)| record.into_line_item(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agreement::BillingModel;
    use crate::error::CotermError;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_full_file() {
        let json = r#"{
            "customer_name": "Acme",
            "agreement": {
                "agreement_term_months": 36,
                "months_remaining": 30.25,
                "extension_months": 12,
                "billing_model": "Monthly"
            },
            "line_items": [
                {"description": "Cloud Backup", "unit_quantity": 10, "annual_unit_fee": 120.0, "additional_licenses": 2},
                {"Cloud Service Description": "Archive", "Unit Quantity": 4, "Annual Unit Fee": 60.0, "Additional Licenses": 0}
            ]
        }"#;
        let file = AgreementFile::from_reader(json.as_bytes()).unwrap();
        assert_eq!(file.customer_name, "Acme");

        let ctx = file.context().unwrap();
        assert_eq!(ctx.billing_model(), BillingModel::Monthly);
        assert_relative_eq!(ctx.total_term(), 42.25);

        let items = file.line_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].description, "Archive");
        assert_eq!(items[1].unit_quantity, 4);
    }

    #[test]
    fn test_defaults_apply() {
        let file = AgreementFile::from_reader(r#"{"line_items": []}"#.as_bytes()).unwrap();
        let ctx = file.context().unwrap();
        assert_relative_eq!(ctx.agreement_term_months(), 36.0);
        assert_relative_eq!(ctx.months_remaining(), 30.0);
        assert_eq!(ctx.billing_model(), BillingModel::Annual);
        assert!(file.line_items().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_billing_model_is_invalid_input() {
        let json = r#"{"agreement": {"billing_model": "Quarterly"}}"#;
        let file = AgreementFile::from_reader(json.as_bytes()).unwrap();
        let err = file.context().unwrap_err();
        assert!(err.is_invalid_input());
        match err {
            CotermError::InvalidInput { field, .. } => assert_eq!(field, "billing_model"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_billing_model_case_insensitive() {
        let json = r#"{"agreement": {"billing_model": "monthly"}}"#;
        let file = AgreementFile::from_reader(json.as_bytes()).unwrap();
        assert_eq!(file.context().unwrap().billing_model(), BillingModel::Monthly);
    }

    #[test]
    fn test_stale_total_row_dropped() {
        let json = r#"{"line_items": [
            {"description": "Seats", "unit_quantity": 1, "annual_unit_fee": 12.0, "additional_licenses": 1},
            {"description": "Total Licensing Cost", "unit_quantity": 1, "annual_unit_fee": 12.0, "additional_licenses": 1}
        ]}"#;
        let file = AgreementFile::from_reader(json.as_bytes()).unwrap();
        assert_eq!(file.line_items().unwrap().len(), 1);
    }

    #[test]
    fn test_negative_license_count_rejected() {
        let json = r#"{"line_items": [
            {"description": "Seats", "unit_quantity": 1, "annual_unit_fee": 12.0, "additional_licenses": -1}
        ]}"#;
        let file = AgreementFile::from_reader(json.as_bytes()).unwrap();
        let err = file.line_items().unwrap_err();
        assert!(err.to_string().contains("line_items[0].additional_licenses"));
    }
}
