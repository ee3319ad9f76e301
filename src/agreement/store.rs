//! Per-customer line item storage
//!
//! Each customer's agreement is kept as `<root>/<customer>.csv` with the
//! columns `Cloud Service Description, Unit Quantity, Annual Unit Fee,
//! Additional Licenses`. Only inputs are stored; computed costs are always
//! recomputed from a fresh calculation. Extra columns in a file are ignored.

use super::{LineItem, LineItemRecord};
use crate::error::{CotermError, Result};
use crate::proration::TOTAL_ROW_MARKER;
use log::{info, warn};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Default store directory, relative to the working directory
pub const DEFAULT_STORE_DIR: &str = "customer_data";

const DESCRIPTION_COLUMN: &str = "Cloud Service Description";

/// Directory of stored customer agreements
#[derive(Debug, Clone)]
pub struct CustomerStore {
    root: PathBuf,
}

impl CustomerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `customer`; rejects names that would escape the store
    pub fn path_for(&self, customer: &str) -> Result<PathBuf> {
        let name = customer.trim();
        if name.is_empty() {
            return Err(CotermError::invalid("customer", "must not be empty"));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(CotermError::invalid(
                "customer",
                format!("'{}' is not a valid customer name", name),
            ));
        }
        Ok(self.root.join(format!("{}.csv", name)))
    }

    pub fn exists(&self, customer: &str) -> bool {
        self.path_for(customer).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Customer names with a stored agreement, sorted
    pub fn list_customers(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut customers = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                customers.push(stem.to_string());
            }
        }
        customers.sort();
        Ok(customers)
    }

    pub fn load(&self, customer: &str) -> Result<Vec<LineItem>> {
        let path = self.path_for(customer)?;
        if !path.is_file() {
            return Err(CotermError::CustomerNotFound {
                customer: customer.trim().to_string(),
            });
        }
        let items = load_line_items_from_reader(File::open(&path)?)?;
        info!("Loaded {} line items for {} from {}", items.len(), customer, path.display());
        Ok(items)
    }

    /// Validate and write `items`, replacing any previous agreement for `customer`
    pub fn save(&self, customer: &str, items: &[LineItem]) -> Result<PathBuf> {
        let path = self.path_for(customer)?;
        let rows: Vec<LineItem> = items.iter().filter(|i| !i.is_total_marker()).cloned().collect();
        super::validate_line_items(&rows)?;
        fs::create_dir_all(&self.root)?;
        write_line_items(File::create(&path)?, &rows)?;
        info!("Saved {} line items for {} to {}", rows.len(), customer, path.display());
        Ok(path)
    }
}

/// Load line items from CSV
///
/// A leftover totals row is skipped before its numbers are parsed, since
/// older exports filled its count columns with placeholders.
pub fn load_line_items_from_reader<R: Read>(reader: R) -> Result<Vec<LineItem>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let description_idx = headers.iter().position(|h| h == DESCRIPTION_COLUMN);

    let mut items = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let is_total = description_idx
            .and_then(|idx| record.get(idx))
            .map(|d| d == TOTAL_ROW_MARKER)
            .unwrap_or(false);
        if is_total {
            warn!("Skipping stored '{}' row", TOTAL_ROW_MARKER);
            continue;
        }

        let row: LineItemRecord = record.deserialize(Some(&headers))?;
        items.push(row.into_line_item(items.len())?);
    }

    Ok(items)
}

/// Validate and write line items as CSV; totals rows are never written
pub fn write_line_items<W: Write>(writer: W, items: &[LineItem]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut written = 0usize;
    for item in items.iter().filter(|i| !i.is_total_marker()) {
        item.validate(written)?;
        wtr.serialize(LineItemRecord::from(item))?;
        written += 1;
    }
    if written == 0 {
        wtr.write_record([
            DESCRIPTION_COLUMN,
            "Unit Quantity",
            "Annual Unit Fee",
            "Additional Licenses",
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
